//! Typed command channel over a database-protocol session.
//!
//! Every operation maps to exactly one request/response exchange on the
//! bound [`Session`], using the fixed numeric tag of its kind. Replies
//! are decoded by a strict positional parser: each operation knows how
//! many fields it needs, and a short reply is a
//! [`Protocol`](crate::MvWireError::Protocol) error rather than a
//! defaulted value. Silent defaults have masked server-side contract
//! breaks before.
//!
//! # Example
//!
//! ```ignore
//! use mvwire_client::channel::DatabaseChannel;
//! use mvwire_client::profile::ConnectionProfile;
//! use mvwire_client::Session;
//!
//! let profile = ConnectionProfile::from_json_str(settings_json)?;
//! let session = Session::connect(&profile).await?;
//! let mut channel = DatabaseChannel::new(session);
//! channel.logon(&profile.credentials).await?;
//!
//! let result = channel.execute("LIST VOC", 5000).await?;
//! println!("{}", result.delivered_text);
//! ```

mod command;
mod message;
mod select_list;

pub use command::{CommandResult, STATUS_COMPLETE, STATUS_MORE_DATA};
pub use message::{BlockingStrategy, LockStrategy, MessageTag, ReleaseStrategy};
pub use select_list::{CursorState, SelectList, SelectNext};

use tracing::debug;

use crate::codec::{editor_text_to_record, DynamicArray};
use crate::error::{MvWireError, Result};
use crate::profile::Credentials;
use crate::protocol::{split_fields, ARG_SEPARATOR, ATTRIBUTE_MARK};
use crate::session::Session;
use crate::transport::Transport;

/// An open file on the server, identified by the id the server assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    id: String,
    name: String,
}

impl FileHandle {
    /// Server-assigned handle id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The file name the handle was opened with.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Typed operations of the database protocol, bound to one session.
pub struct DatabaseChannel<T: Transport> {
    session: Session<T>,
}

impl<T: Transport> DatabaseChannel<T> {
    /// Bind a channel to a connected session.
    pub fn new(session: Session<T>) -> Self {
        Self { session }
    }

    /// The underlying session.
    pub fn session(&self) -> &Session<T> {
        &self.session
    }

    /// Give the session back, consuming the channel.
    pub fn into_session(self) -> Session<T> {
        self.session
    }

    /// Authenticate. A rejected logon faults the session: every later
    /// operation fails fast, and recovery requires a fresh session.
    pub async fn logon(&mut self, credentials: &Credentials) -> Result<()> {
        let fields = self
            .call(
                MessageTag::Logon,
                &[
                    &credentials.user,
                    &credentials.password,
                    &credentials.account,
                ],
                1,
            )
            .await?;
        let status = parse_i32(&fields[0], "logon status")?;
        if status != 0 {
            let message = fields
                .get(1)
                .filter(|m| !m.is_empty())
                .cloned()
                .unwrap_or_else(|| format!("server rejected logon (status {status})"));
            self.session.fault();
            return Err(MvWireError::LoginFailed(message));
        }
        debug!(user = %credentials.user, account = %credentials.account, "logged on");
        Ok(())
    }

    /// Log off and disconnect. The logoff is best-effort; the socket is
    /// closed either way.
    pub async fn logoff(&mut self) -> Result<()> {
        let result = self.call(MessageTag::Logoff, &[], 1).await;
        self.session.disconnect().await?;
        result.map(|_| ())
    }

    /// Run a TCL command, paginating output into `block_size`-character
    /// blocks (`0` disables pagination).
    pub async fn execute(&mut self, command: &str, block_size: usize) -> Result<CommandResult> {
        let fields = self.call(MessageTag::ExecuteCommand, &[command], 4).await?;
        let status = parse_i32(&fields[0], "execute status")?;
        let at_selected = parse_i32(&fields[1], "execute at-selected count")?;
        let system_return_code = parse_i32(&fields[2], "execute system return code")?;
        let text = rejoin_tail(&fields, 3);
        Ok(CommandResult::paged(
            status,
            at_selected,
            system_return_code,
            text,
            block_size,
        ))
    }

    /// Open a file. Reply is `[status, file-id]`; on a nonzero status
    /// the second field carries the server's message instead.
    pub async fn open_file(
        &mut self,
        name: &str,
        lock: LockStrategy,
        release: ReleaseStrategy,
    ) -> Result<FileHandle> {
        let fields = self
            .call(MessageTag::OpenFile, &[name, lock.wire(), release.wire()], 2)
            .await?;
        let status = parse_i32(&fields[0], "open status")?;
        if status != 0 {
            return Err(MvWireError::Server {
                status,
                message: fields[1].clone(),
            });
        }
        debug!(file = name, id = %fields[1], "file opened");
        Ok(FileHandle {
            id: fields[1].clone(),
            name: name.to_string(),
        })
    }

    /// Close a file handle.
    pub async fn close_file(&mut self, file: FileHandle) -> Result<()> {
        let fields = self.call(MessageTag::CloseFile, &[&file.id], 1).await?;
        self.expect_ok(&fields, "close")?;
        Ok(())
    }

    /// Read one record. Reply is `[status, record-text]`.
    pub async fn read_record(
        &mut self,
        file: &FileHandle,
        key: &str,
        lock: LockStrategy,
        release: ReleaseStrategy,
        blocking: BlockingStrategy,
    ) -> Result<DynamicArray> {
        let fields = self
            .call(
                MessageTag::ReadRecord,
                &[&file.id, key, lock.wire(), release.wire(), blocking.wire()],
                2,
            )
            .await?;
        let status = parse_i32(&fields[0], "read status")?;
        let body = rejoin_tail(&fields, 1);
        if status != 0 {
            return Err(MvWireError::Server {
                status,
                message: body,
            });
        }
        Ok(DynamicArray::parse(&body))
    }

    /// Write one record from editor text. Carriage returns are stripped
    /// and line feeds become attribute marks, so each line lands in its
    /// own attribute.
    pub async fn write_record(&mut self, file: &FileHandle, key: &str, text: &str) -> Result<()> {
        let record = editor_text_to_record(text);
        let fields = self
            .call(MessageTag::WriteRecord, &[&file.id, key, &record], 1)
            .await?;
        self.expect_ok(&fields, "write")?;
        debug!(file = %file.name, key, "record written");
        Ok(())
    }

    /// Delete one record by key.
    pub async fn delete_record(&mut self, file: &FileHandle, key: &str) -> Result<()> {
        let fields = self
            .call(MessageTag::DeleteRecord, &[&file.id, key], 1)
            .await?;
        self.expect_ok(&fields, "delete")?;
        Ok(())
    }

    /// Reset a numbered list on the server and exhaust the cursor.
    pub async fn clear_select(&mut self, list: &mut SelectList) -> Result<()> {
        let id = list.list_id().to_string();
        let fields = self.call(MessageTag::ClearSelect, &[&id], 1).await?;
        self.expect_ok(&fields, "clear-select")?;
        list.exhaust();
        Ok(())
    }

    /// Populate a list from an attribute-mark-delimited id string.
    pub async fn form_list(&mut self, list: &mut SelectList, id_list: &str) -> Result<()> {
        let id = list.list_id().to_string();
        let fields = self.call(MessageTag::FormList, &[&id, id_list], 1).await?;
        self.expect_ok(&fields, "form-list")?;
        list.begin();
        Ok(())
    }

    /// Populate a list from explicit ids.
    pub async fn form_list_from(&mut self, list: &mut SelectList, ids: &[&str]) -> Result<()> {
        let joined = join_with_attribute_mark(ids);
        self.form_list(list, &joined).await
    }

    /// Populate a list from a saved named list.
    pub async fn load_named_list(&mut self, list: &mut SelectList, name: &str) -> Result<()> {
        let id = list.list_id().to_string();
        let fields = self.call(MessageTag::LoadNamedList, &[&id, name], 1).await?;
        self.expect_ok(&fields, "load-named-list")?;
        list.begin();
        Ok(())
    }

    /// Fetch all remaining ids as one attribute-mark-delimited blob,
    /// exhausting the cursor.
    pub async fn read_list(&mut self, list: &mut SelectList) -> Result<String> {
        let id = list.list_id().to_string();
        let fields = self.call(MessageTag::ReadList, &[&id], 2).await?;
        let status = parse_i32(&fields[0], "read-list status")?;
        let blob = rejoin_tail(&fields, 1);
        if status != 0 {
            return Err(MvWireError::Server {
                status,
                message: blob,
            });
        }
        list.exhaust();
        Ok(blob)
    }

    /// Advance the cursor one record. Reply is `[status, id, last-flag]`;
    /// `is_last` is true on the final delivered value. Past exhaustion
    /// this returns a terminal empty result without any I/O, preserving
    /// the tolerant behavior existing callers lean on.
    pub async fn select_next(&mut self, list: &mut SelectList) -> Result<SelectNext> {
        if list.last_record_read() {
            return Ok(SelectNext::terminal());
        }
        let id = list.list_id().to_string();
        let fields = self.call(MessageTag::SelectNext, &[&id], 3).await?;
        let status = parse_i32(&fields[0], "select-next status")?;
        if status != 0 {
            return Err(MvWireError::Server {
                status,
                message: fields[1].clone(),
            });
        }
        let is_last = fields[2] == "1";
        if is_last {
            list.exhaust();
        } else {
            list.begin();
        }
        Ok(SelectNext {
            value: fields[1].clone(),
            is_last,
        })
    }

    /// One request/response exchange with field-count validation.
    async fn call(
        &mut self,
        tag: MessageTag,
        args: &[&str],
        min_fields: usize,
    ) -> Result<Vec<String>> {
        let payload = self.session.send_and_receive(&tag.wire(), args).await?;
        let fields: Vec<String> = split_fields(&payload)
            .into_iter()
            .map(str::to_string)
            .collect();
        if fields.len() < min_fields {
            return Err(MvWireError::Protocol(format!(
                "{tag:?} reply has {} field(s), expected at least {min_fields}",
                fields.len()
            )));
        }
        Ok(fields)
    }

    /// Check a status-only reply.
    fn expect_ok(&self, fields: &[String], operation: &str) -> Result<()> {
        let status = parse_i32(&fields[0], &format!("{operation} status"))?;
        if status != 0 {
            return Err(MvWireError::Server {
                status,
                message: fields.get(1).cloned().unwrap_or_default(),
            });
        }
        Ok(())
    }
}

/// Parse a numeric reply field, failing loudly on garbage.
fn parse_i32(field: &str, what: &str) -> Result<i32> {
    field
        .parse::<i32>()
        .map_err(|_| MvWireError::Protocol(format!("unparseable {what}: {field:?}")))
}

/// Rejoin trailing fields into one body. Command output and record text
/// may legitimately contain the separator byte; positional parsing stops
/// at the last structured field.
fn rejoin_tail(fields: &[String], from: usize) -> String {
    let mut out = String::new();
    for (i, field) in fields[from..].iter().enumerate() {
        if i > 0 {
            out.push(ARG_SEPARATOR);
        }
        out.push_str(field);
    }
    out
}

fn join_with_attribute_mark(ids: &[&str]) -> String {
    let mut out = String::new();
    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            out.push(ATTRIBUTE_MARK);
        }
        out.push_str(id);
    }
    out
}
