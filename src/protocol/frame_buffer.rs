//! Frame buffer for accumulating partial socket reads.
//!
//! Responses arrive in arbitrary chunks: the header in one read, part of
//! the payload in the next, the remainder later. The buffer implements a
//! state machine over a single `BytesMut`:
//! - `WaitingForHeader`: need `header_width` bytes
//! - `WaitingForPayload`: header parsed, need enough bytes to decode the
//!   declared number of *characters* in the session encoding
//!
//! Bytes beyond the completed frame stay buffered.
//!
//! # Example
//!
//! ```
//! use mvwire_client::codec::WireEncoding;
//! use mvwire_client::protocol::{FrameBuffer, ProtocolDialect};
//!
//! let mut buffer = FrameBuffer::new(ProtocolDialect::Gateway, WireEncoding::Iso8859_1);
//! assert!(buffer.push(b"0000").unwrap().is_none()); // partial header
//! assert!(buffer.push(b"05hel").unwrap().is_none()); // header + partial payload
//! let payload = buffer.push(b"lo").unwrap().unwrap();
//! assert_eq!(payload, "hello");
//! ```

use bytes::BytesMut;

use crate::codec::WireEncoding;
use crate::error::Result;

use super::wire_format::{decode_header, ProtocolDialect};

#[derive(Debug, Clone, Copy)]
enum State {
    WaitingForHeader,
    WaitingForPayload { declared_chars: u64 },
}

/// Accumulates incoming bytes and extracts one decoded payload at a time.
///
/// The protocol is strictly half-duplex, so at most one response is in
/// flight; a second buffered frame is possible only if the server breaks
/// the contract, and its bytes are simply held until the next request.
#[derive(Debug)]
pub struct FrameBuffer {
    buffer: BytesMut,
    state: State,
    dialect: ProtocolDialect,
    encoding: WireEncoding,
}

impl FrameBuffer {
    /// Create a buffer for one session's dialect and encoding.
    pub fn new(dialect: ProtocolDialect, encoding: WireEncoding) -> Self {
        Self {
            buffer: BytesMut::with_capacity(8 * 1024),
            state: State::WaitingForHeader,
            dialect,
            encoding,
        }
    }

    /// Push freshly read bytes; returns the decoded payload once a frame
    /// completes.
    ///
    /// # Errors
    ///
    /// [`MvWireError::Framing`](crate::MvWireError::Framing) on a
    /// non-numeric header or a payload that does not decode cleanly.
    pub fn push(&mut self, data: &[u8]) -> Result<Option<String>> {
        self.buffer.extend_from_slice(data);
        self.try_extract()
    }

    fn try_extract(&mut self) -> Result<Option<String>> {
        if let State::WaitingForHeader = self.state {
            match decode_header(self.dialect, &self.buffer)? {
                None => return Ok(None),
                Some(declared_chars) => {
                    let _ = self.buffer.split_to(self.dialect.header_width());
                    self.state = State::WaitingForPayload { declared_chars };
                }
            }
        }

        if let State::WaitingForPayload { declared_chars } = self.state {
            match self
                .encoding
                .decode_prefix(&self.buffer, declared_chars as usize)?
            {
                None => return Ok(None),
                Some((payload, consumed)) => {
                    let _ = self.buffer.split_to(consumed);
                    self.state = State::WaitingForHeader;
                    return Ok(Some(payload));
                }
            }
        }
        Ok(None)
    }

    /// Number of buffered bytes not yet consumed.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Drop buffered bytes and reset to waiting for a header.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.state = State::WaitingForHeader;
    }

    #[cfg(test)]
    fn state_name(&self) -> &'static str {
        match self.state {
            State::WaitingForHeader => "WaitingForHeader",
            State::WaitingForPayload { .. } => "WaitingForPayload",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::frame::encode_fields;

    fn gateway_buffer() -> FrameBuffer {
        FrameBuffer::new(ProtocolDialect::Gateway, WireEncoding::Iso8859_1)
    }

    fn make_frame(fields: &[&str]) -> Vec<u8> {
        encode_fields(ProtocolDialect::Gateway, WireEncoding::Iso8859_1, fields).unwrap()
    }

    #[test]
    fn test_single_complete_frame() {
        let mut buffer = gateway_buffer();
        let payload = buffer.push(&make_frame(&["0", "ok"])).unwrap().unwrap();
        assert_eq!(payload, "0\u{01}ok");
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_three_partial_reads_reassemble_identically() {
        // Header in read 1, partial payload in read 2, remainder in read 3.
        let frame = make_frame(&["0", "3", "0", "some longer command output"]);
        let width = ProtocolDialect::Gateway.header_width();

        let mut single = gateway_buffer();
        let whole = single.push(&frame).unwrap().unwrap();

        let mut split = gateway_buffer();
        assert!(split.push(&frame[..width]).unwrap().is_none());
        assert_eq!(split.state_name(), "WaitingForPayload");
        let mid = width + (frame.len() - width) / 2;
        assert!(split.push(&frame[width..mid]).unwrap().is_none());
        let reassembled = split.push(&frame[mid..]).unwrap().unwrap();

        assert_eq!(reassembled, whole);
    }

    #[test]
    fn test_byte_at_a_time() {
        let frame = make_frame(&["0", "hi"]);
        let mut buffer = gateway_buffer();
        let mut result = None;
        for byte in &frame {
            if let Some(payload) = buffer.push(&[*byte]).unwrap() {
                result = Some(payload);
            }
        }
        assert_eq!(result.unwrap(), "0\u{01}hi");
    }

    #[test]
    fn test_fragmented_header() {
        let mut buffer = gateway_buffer();
        let frame = make_frame(&["0"]);
        assert!(buffer.push(&frame[..3]).unwrap().is_none());
        assert_eq!(buffer.state_name(), "WaitingForHeader");
        let payload = buffer.push(&frame[3..]).unwrap().unwrap();
        assert_eq!(payload, "0");
    }

    #[test]
    fn test_empty_payload_frame() {
        let mut buffer = gateway_buffer();
        let payload = buffer.push(b"000000").unwrap().unwrap();
        assert_eq!(payload, "");
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_excess_bytes_stay_buffered() {
        let mut buffer = gateway_buffer();
        let mut data = make_frame(&["first"]);
        data.extend_from_slice(b"000006");
        let payload = buffer.push(&data).unwrap().unwrap();
        assert_eq!(payload, "first");
        assert_eq!(buffer.len(), 6); // next header still buffered
        let next = buffer.push(b"second").unwrap().unwrap();
        assert_eq!(next, "second");
    }

    #[test]
    fn test_non_numeric_header_errors() {
        let mut buffer = gateway_buffer();
        let result = buffer.push(b"00x042");
        assert!(matches!(result, Err(crate::MvWireError::Framing(_))));
    }

    #[test]
    fn test_database_width_header() {
        let mut buffer = FrameBuffer::new(ProtocolDialect::Database, WireEncoding::Iso8859_1);
        let frame =
            encode_fields(ProtocolDialect::Database, WireEncoding::Iso8859_1, &["0", "ok"]) // 4 chars
                .unwrap();
        assert_eq!(&frame[..10], b"0000000004");
        let payload = buffer.push(&frame).unwrap().unwrap();
        assert_eq!(payload, "0\u{01}ok");
    }

    #[test]
    fn test_utf8_declared_length_in_chars() {
        let mut buffer = FrameBuffer::new(ProtocolDialect::Gateway, WireEncoding::Utf8);
        let frame = encode_fields(ProtocolDialect::Gateway, WireEncoding::Utf8, &["caf\u{E9}"])
            .unwrap();
        // 4 chars declared, 5 payload bytes on the wire.
        assert_eq!(&frame[..6], b"000004");
        assert_eq!(frame.len() - 6, 5);

        // Deliver the multi-byte char split across reads.
        let cut = frame.len() - 1;
        assert!(buffer.push(&frame[..cut]).unwrap().is_none());
        let payload = buffer.push(&frame[cut..]).unwrap().unwrap();
        assert_eq!(payload, "caf\u{E9}");
    }

    #[test]
    fn test_high_bytes_latin1_payload() {
        // Record marks are high Latin-1 bytes; they must survive decoding.
        let mut buffer = gateway_buffer();
        let mut data = b"000003".to_vec();
        data.extend_from_slice(&[b'a', 0xFE, b'b']);
        let payload = buffer.push(&data).unwrap().unwrap();
        assert_eq!(payload, "a\u{FE}b");
    }

    #[test]
    fn test_clear_resets_state() {
        let mut buffer = gateway_buffer();
        buffer.push(b"000010abc").unwrap();
        assert_eq!(buffer.state_name(), "WaitingForPayload");
        buffer.clear();
        assert_eq!(buffer.state_name(), "WaitingForHeader");
        assert!(buffer.is_empty());
    }
}
