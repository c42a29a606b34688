//! Wire format constants and length-header codec.
//!
//! A frame on the wire is:
//! ```text
//! ┌────────────────────┬──────────────────────────────────┐
//! │ Length header      │ Payload                          │
//! │ W ASCII digits     │ tag 0x01 arg1 0x01 ... 0x01 argN │
//! │ zero-padded        │ session encoding                 │
//! └────────────────────┴──────────────────────────────────┘
//! ```
//!
//! The header width `W` is dialect-specific: 10 digits for the database
//! protocol, 6 for the gateway. The declared length counts *decoded
//! characters* of the payload, not bytes.

use serde::{Deserialize, Serialize};

use crate::error::{MvWireError, Result};

/// Separator between the message tag and each argument inside a payload.
pub const ARG_SEPARATOR: char = '\u{01}';

/// Attribute mark, CHAR(254). Delimits attributes in a record.
pub const ATTRIBUTE_MARK: char = '\u{FE}';

/// Value mark, CHAR(253). Delimits values within an attribute.
pub const VALUE_MARK: char = '\u{FD}';

/// Subvalue mark, CHAR(252). Delimits subvalues within a value.
pub const SUBVALUE_MARK: char = '\u{FC}';

/// Text mark, CHAR(251). The fourth-level delimiter.
pub const TEXT_MARK: char = '\u{FB}';

/// Line-join delimiter on the gateway write path, CHAR(2).
pub const GATEWAY_LINE_MARK: char = '\u{02}';

/// Header width for the database protocol.
pub const DATABASE_HEADER_WIDTH: usize = 10;

/// Header width for the gateway protocol.
pub const GATEWAY_HEADER_WIDTH: usize = 6;

/// Which framing vocabulary a session speaks.
///
/// The two dialects share the framing scheme and differ in header width,
/// tag vocabulary (numeric vs. string) and default encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolDialect {
    /// Primary database transport: 10-digit header, numeric tags,
    /// ISO-8859-1 by default.
    Database,
    /// Gateway transport: 6-digit header, string tags, configurable
    /// encoding.
    Gateway,
}

impl ProtocolDialect {
    /// Length-header width in ASCII digits.
    #[inline]
    pub fn header_width(&self) -> usize {
        match self {
            ProtocolDialect::Database => DATABASE_HEADER_WIDTH,
            ProtocolDialect::Gateway => GATEWAY_HEADER_WIDTH,
        }
    }

    /// Largest payload character count the header can declare
    /// (`10^width - 1`).
    pub fn max_payload_chars(&self) -> u64 {
        10u64.pow(self.header_width() as u32) - 1
    }
}

/// Encode a payload character count as a zero-padded decimal header.
///
/// The width is bounded explicitly; a length that does not fit fails with
/// [`MvWireError::Framing`] instead of widening the header.
pub fn encode_length(dialect: ProtocolDialect, len: u64) -> Result<String> {
    if len > dialect.max_payload_chars() {
        return Err(MvWireError::Framing(format!(
            "payload length {} exceeds {}-digit header capacity",
            len,
            dialect.header_width()
        )));
    }
    Ok(format!("{:0width$}", len, width = dialect.header_width()))
}

/// Parse the declared length from the first `header_width` bytes.
///
/// Returns `None` if fewer bytes are buffered, [`MvWireError::Framing`]
/// if any header byte is not an ASCII digit.
pub fn decode_header(dialect: ProtocolDialect, buf: &[u8]) -> Result<Option<u64>> {
    let width = dialect.header_width();
    if buf.len() < width {
        return Ok(None);
    }
    let header = &buf[..width];
    if let Some(bad) = header.iter().find(|b| !b.is_ascii_digit()) {
        return Err(MvWireError::Framing(format!(
            "non-numeric byte 0x{bad:02X} in length header"
        )));
    }
    let text = std::str::from_utf8(header).expect("ASCII digits are valid UTF-8");
    let len = text
        .parse::<u64>()
        .map_err(|e| MvWireError::Framing(format!("unparseable length header {text:?}: {e}")))?;
    Ok(Some(len))
}
