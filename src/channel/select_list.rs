//! Select list cursor state.
//!
//! A select list is server-side iteration state: a numbered, ordered
//! cursor over record ids. The caller owns the client half (list number
//! and exhaustion flag); every movement happens through the channel,
//! which advances this state as replies come back.

/// Cursor lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// No list formed yet.
    Fresh,
    /// List populated, records remaining.
    Iterating,
    /// Last record delivered (or list cleared); further `select_next`
    /// calls return a terminal empty result without touching the server.
    Exhausted,
}

/// Client-side handle to one numbered server-side list.
#[derive(Debug, Clone)]
pub struct SelectList {
    list_id: i32,
    state: CursorState,
}

impl SelectList {
    /// Handle for list number `list_id` (callers conventionally use 0).
    pub fn new(list_id: i32) -> Self {
        Self {
            list_id,
            state: CursorState::Fresh,
        }
    }

    /// The list number on the server.
    pub fn list_id(&self) -> i32 {
        self.list_id
    }

    /// Current cursor state.
    pub fn state(&self) -> CursorState {
        self.state
    }

    /// Whether the final record has been read.
    pub fn last_record_read(&self) -> bool {
        self.state == CursorState::Exhausted
    }

    pub(crate) fn begin(&mut self) {
        self.state = CursorState::Iterating;
    }

    pub(crate) fn exhaust(&mut self) {
        self.state = CursorState::Exhausted;
    }
}

/// One step of cursor iteration.
///
/// `is_last` is true on the *final delivered value*: the caller must
/// still consume `value` on that call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectNext {
    /// The record id, empty on a terminal result past exhaustion.
    pub value: String,
    /// Whether the cursor is exhausted after this value.
    pub is_last: bool,
}

impl SelectNext {
    /// The result returned for calls past exhaustion.
    pub(crate) fn terminal() -> Self {
        SelectNext {
            value: String::new(),
            is_last: true,
        }
    }
}
