//! Frame codec: pure functions from a tagged argument list to wire bytes.
//!
//! The codec is symmetric: any field list can be sent, and a server reply
//! is just a field list without the leading tag. Semantics of the fields
//! are interpreted by the peer, not here.
//!
//! # Example
//!
//! ```
//! use mvwire_client::codec::WireEncoding;
//! use mvwire_client::protocol::{encode_frame, ProtocolDialect};
//!
//! let frame = encode_frame(
//!     ProtocolDialect::Database,
//!     WireEncoding::Iso8859_1,
//!     "1",
//!     &["alice", "secret", "ACCT"],
//! )
//! .unwrap();
//! // "1\x01alice\x01secret\x01ACCT" is 19 characters
//! assert_eq!(&frame[..10], b"0000000019");
//! ```

use crate::codec::WireEncoding;
use crate::error::Result;

use super::wire_format::{encode_length, ProtocolDialect, ARG_SEPARATOR};

/// Join fields with the argument separator and frame them.
///
/// This is the symmetric core both request and reply framing share: the
/// declared length is the *character* count of the joined string, and the
/// bytes are produced in the session encoding.
pub fn encode_fields(
    dialect: ProtocolDialect,
    encoding: WireEncoding,
    fields: &[&str],
) -> Result<Vec<u8>> {
    let joined = join_fields(fields);
    let header = encode_length(dialect, joined.chars().count() as u64)?;
    let payload = encoding.encode(&joined)?;
    let mut frame = Vec::with_capacity(header.len() + payload.len());
    frame.extend_from_slice(header.as_bytes());
    frame.extend_from_slice(&payload);
    Ok(frame)
}

/// Encode one request: a message tag followed by its arguments.
pub fn encode_frame(
    dialect: ProtocolDialect,
    encoding: WireEncoding,
    tag: &str,
    args: &[&str],
) -> Result<Vec<u8>> {
    let mut fields = Vec::with_capacity(1 + args.len());
    fields.push(tag);
    fields.extend_from_slice(args);
    encode_fields(dialect, encoding, &fields)
}

/// Split a decoded reply payload into its positional fields.
pub fn split_fields(payload: &str) -> Vec<&str> {
    payload.split(ARG_SEPARATOR).collect()
}

fn join_fields(fields: &[&str]) -> String {
    let mut out = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(ARG_SEPARATOR);
        }
        out.push_str(field);
    }
    out
}
