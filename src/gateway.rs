//! Gateway protocol channel.
//!
//! The gateway speaks the same framing scheme as the database protocol
//! with three differences: a 6-digit length header, string message tags
//! instead of numbers, and a configurable encoding. Its logon also
//! carries the target database flavor and a debug flag, and its write
//! path joins record lines with CHAR(2) rather than the attribute mark.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MvWireError, Result};
use crate::protocol::{split_fields, ARG_SEPARATOR, GATEWAY_LINE_MARK};
use crate::session::Session;
use crate::transport::Transport;

/// Message tags of the gateway protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayTag {
    /// Authenticate and attach.
    Connect,
    /// Detach.
    Disconnect,
    /// Run a command.
    Execute,
    /// Read one record.
    ReadRecord,
    /// Write one record.
    WriteRecord,
}

impl GatewayTag {
    /// Tag as it travels on the wire. Casing is part of the contract.
    pub fn wire(self) -> &'static str {
        match self {
            GatewayTag::Connect => "connect",
            GatewayTag::Disconnect => "disconnect",
            GatewayTag::Execute => "Execute",
            GatewayTag::ReadRecord => "ReadRecord",
            GatewayTag::WriteRecord => "WriteRecord",
        }
    }
}

/// MV database flavor behind the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    /// MVON# / .NET-hosted MV.
    Mvon,
    /// D3.
    D3,
    /// UniVerse.
    Universe,
    /// UniData.
    Unidata,
}

impl DatabaseType {
    /// Flavor name as the gateway expects it.
    pub fn wire(self) -> &'static str {
        match self {
            DatabaseType::Mvon => "MVON",
            DatabaseType::D3 => "D3",
            DatabaseType::Universe => "UNIVERSE",
            DatabaseType::Unidata => "UNIDATA",
        }
    }
}

/// Logon arguments for the gateway protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayCredentials {
    /// Server user name.
    pub user: String,
    /// Server password.
    pub password: String,
    /// MV account to attach to.
    pub account: String,
    /// Database flavor behind the gateway.
    pub database_type: DatabaseType,
    /// Ask the gateway for verbose server-side tracing.
    #[serde(default)]
    pub debug: bool,
}

/// Typed operations of the gateway protocol, bound to one session.
pub struct GatewayChannel<T: Transport> {
    session: Session<T>,
}

impl<T: Transport> GatewayChannel<T> {
    /// Bind a channel to a connected gateway session.
    pub fn new(session: Session<T>) -> Self {
        Self { session }
    }

    /// The underlying session.
    pub fn session(&self) -> &Session<T> {
        &self.session
    }

    /// Authenticate. A rejected logon faults the session, same as the
    /// database protocol.
    pub async fn logon(&mut self, credentials: &GatewayCredentials) -> Result<()> {
        let debug_flag = if credentials.debug { "1" } else { "0" };
        let fields = self
            .call(
                GatewayTag::Connect,
                &[
                    &credentials.user,
                    &credentials.password,
                    &credentials.account,
                    credentials.database_type.wire(),
                    debug_flag,
                ],
                1,
            )
            .await?;
        let status = parse_status(&fields[0])?;
        if status != 0 {
            let message = fields
                .get(1)
                .filter(|m| !m.is_empty())
                .cloned()
                .unwrap_or_else(|| format!("gateway rejected logon (status {status})"));
            self.session.fault();
            return Err(MvWireError::LoginFailed(message));
        }
        debug!(
            user = %credentials.user,
            db = credentials.database_type.wire(),
            "gateway logged on"
        );
        Ok(())
    }

    /// Run a command and return its captured output.
    pub async fn execute(&mut self, command: &str) -> Result<String> {
        let fields = self.call(GatewayTag::Execute, &[command], 2).await?;
        let status = parse_status(&fields[0])?;
        let body = rejoin_tail(&fields, 1);
        if status != 0 {
            return Err(MvWireError::Server {
                status,
                message: body,
            });
        }
        Ok(body)
    }

    /// Read one record as editor text: the gateway's CHAR(2) line joins
    /// come back as line feeds.
    pub async fn read_record(&mut self, file: &str, key: &str) -> Result<String> {
        let fields = self.call(GatewayTag::ReadRecord, &[file, key], 2).await?;
        let status = parse_status(&fields[0])?;
        let body = rejoin_tail(&fields, 1);
        if status != 0 {
            return Err(MvWireError::Server {
                status,
                message: body,
            });
        }
        Ok(body.replace(GATEWAY_LINE_MARK, "\n"))
    }

    /// Write one record from editor text: carriage returns are stripped
    /// and lines are joined with CHAR(2).
    pub async fn write_record(&mut self, file: &str, key: &str, text: &str) -> Result<()> {
        let record = text_to_gateway_record(text);
        let fields = self
            .call(GatewayTag::WriteRecord, &[file, key, &record], 1)
            .await?;
        let status = parse_status(&fields[0])?;
        if status != 0 {
            return Err(MvWireError::Server {
                status,
                message: fields.get(1).cloned().unwrap_or_default(),
            });
        }
        Ok(())
    }

    /// Detach and close the socket. The disconnect message is
    /// best-effort; the socket is closed either way.
    pub async fn disconnect(&mut self) -> Result<()> {
        let result = self.call(GatewayTag::Disconnect, &[], 1).await;
        self.session.disconnect().await?;
        result.map(|_| ())
    }

    async fn call(
        &mut self,
        tag: GatewayTag,
        args: &[&str],
        min_fields: usize,
    ) -> Result<Vec<String>> {
        let payload = self.session.send_and_receive(tag.wire(), args).await?;
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
}

fn parse_status(field: &str) -> Result<i32> {
    field
        .parse::<i32>()
        .map_err(|_| MvWireError::Protocol(format!("unparseable gateway status: {field:?}")))
}

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

fn text_to_gateway_record(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\r' => {}
            '\n' => out.push(GATEWAY_LINE_MARK),
            other => out.push(other),
        }
    }
    out
}
