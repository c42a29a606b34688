//! Paged command results.
//!
//! A TCL command can produce far more output than a caller wants to
//! render at once. The server returns the full text in one frame; the
//! pagination here is purely client-side, splitting the text into
//! `block_size`-character chunks drained by [`CommandResult::next_block`].

/// Status: all text delivered.
pub const STATUS_COMPLETE: i32 = 0;

/// Status: a remainder is pending; call `next_block`.
pub const STATUS_MORE_DATA: i32 = 1;

/// Result of one executed command, with optional pagination state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    /// [`STATUS_MORE_DATA`] while a remainder is pending, otherwise the
    /// server's own status (normally [`STATUS_COMPLETE`]).
    pub status_code: i32,
    /// Records left on the active select list after the command.
    pub at_selected: i32,
    /// The server's @SYSTEM.RETURN.CODE for the command.
    pub system_return_code: i32,
    /// The complete captured output.
    pub full_text: String,
    /// The block delivered by the most recent call.
    pub delivered_text: String,
    /// Undelivered text, present only while paginating.
    pub remainder_text: Option<String>,
}

impl CommandResult {
    /// Build a result from the server reply fields, applying pagination.
    ///
    /// `block_size == 0` disables pagination: the full text is delivered
    /// with terminal status.
    pub(crate) fn paged(
        server_status: i32,
        at_selected: i32,
        system_return_code: i32,
        full_text: String,
        block_size: usize,
    ) -> Self {
        let (delivered, remainder) = split_block(&full_text, block_size);
        let status_code = if remainder.is_some() {
            STATUS_MORE_DATA
        } else {
            server_status
        };
        CommandResult {
            status_code,
            at_selected,
            system_return_code,
            full_text,
            delivered_text: delivered,
            remainder_text: remainder,
        }
    }

    /// Deliver the next block of a paginated result.
    ///
    /// A no-op when nothing is pending; callers may drain in a loop
    /// guarded by [`is_complete`](CommandResult::is_complete) without a
    /// terminal-state check first.
    pub fn next_block(&mut self) {
        let Some(remainder) = self.remainder_text.take() else {
            return;
        };
        let block_size = self.delivered_text.chars().count();
        let (delivered, remainder) = split_block(&remainder, block_size);
        self.status_code = if remainder.is_some() {
            STATUS_MORE_DATA
        } else {
            STATUS_COMPLETE
        };
        self.delivered_text = delivered;
        self.remainder_text = remainder;
    }

    /// Check whether all text has been delivered.
    pub fn is_complete(&self) -> bool {
        self.remainder_text.is_none()
    }
}

/// Split `text` into a first block of at most `block_size` characters and
/// the remainder. `block_size == 0` means no pagination.
fn split_block(text: &str, block_size: usize) -> (String, Option<String>) {
    if block_size == 0 || text.chars().count() <= block_size {
        return (text.to_string(), None);
    }
    let cut = text
        .char_indices()
        .nth(block_size)
        .map(|(idx, _)| idx)
        .expect("char count checked above");
    (text[..cut].to_string(), Some(text[cut..].to_string()))
}
