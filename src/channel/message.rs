//! Message vocabulary for the database protocol.
//!
//! Every request kind has a fixed numeric tag the server dispatches on.
//! The tag travels as decimal text in the first payload field; the codec
//! itself is symmetric and uninterested in the values.

/// Request kinds of the database protocol, with their wire tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum MessageTag {
    /// Authenticate and attach to an account.
    Logon = 1,
    /// Detach and release server-side session state.
    Logoff = 2,
    /// Run a TCL command and return its captured output.
    ExecuteCommand = 3,
    /// Open a file and return a handle id.
    OpenFile = 4,
    /// Close a file handle.
    CloseFile = 5,
    /// Read one record by key.
    ReadRecord = 6,
    /// Write one record by key.
    WriteRecord = 7,
    /// Delete one record by key.
    DeleteRecord = 8,
    /// Reset a numbered select list.
    ClearSelect = 9,
    /// Populate a numbered list from explicit ids.
    FormList = 10,
    /// Populate a numbered list from a saved named list.
    LoadNamedList = 11,
    /// Fetch all remaining ids of a list in one reply.
    ReadList = 12,
    /// Advance a list by one record.
    SelectNext = 13,
}

impl MessageTag {
    /// Numeric tag value.
    #[inline]
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Tag as it travels on the wire.
    pub fn wire(self) -> String {
        self.code().to_string()
    }
}

/// Record/file lock behavior requested from the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockStrategy {
    /// No lock.
    #[default]
    None,
    /// Shared read lock.
    Shared,
    /// Exclusive update lock.
    Exclusive,
}

impl LockStrategy {
    /// Wire code for the strategy.
    pub fn wire(self) -> &'static str {
        match self {
            LockStrategy::None => "0",
            LockStrategy::Shared => "1",
            LockStrategy::Exclusive => "2",
        }
    }
}

/// When a taken lock is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReleaseStrategy {
    /// Released when the file handle closes.
    #[default]
    OnClose,
    /// Held until released explicitly.
    Explicit,
}

impl ReleaseStrategy {
    /// Wire code for the strategy.
    pub fn wire(self) -> &'static str {
        match self {
            ReleaseStrategy::OnClose => "0",
            ReleaseStrategy::Explicit => "1",
        }
    }
}

/// Behavior when a requested lock is already held elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockingStrategy {
    /// Wait for the lock.
    #[default]
    Wait,
    /// Fail immediately.
    Fail,
}

impl BlockingStrategy {
    /// Wire code for the strategy.
    pub fn wire(self) -> &'static str {
        match self {
            BlockingStrategy::Wait => "0",
            BlockingStrategy::Fail => "1",
        }
    }
}
