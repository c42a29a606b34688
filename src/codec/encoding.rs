//! Wire character encoding.
//!
//! The protocol declares frame lengths in *decoded characters*, not bytes.
//! For ISO-8859-1 (the database protocol default) the two are equal; for
//! UTF-8 (selectable on the gateway) a multi-byte character counts once.
//! [`WireEncoding::decode_prefix`] is the primitive the reassembly loop
//! uses to compare buffered bytes against a declared character count.

use serde::{Deserialize, Serialize};

use crate::error::{MvWireError, Result};

/// Byte encoding used on the wire for one session.
///
/// Configured per session, not per frame. The database protocol defaults
/// to ISO-8859-1; the gateway protocol accepts either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WireEncoding {
    /// ISO-8859-1 (Latin-1). One byte per character, the full 0x00-0xFF
    /// range maps to U+0000-U+00FF. Characters above U+00FF cannot be
    /// encoded.
    #[default]
    #[serde(rename = "iso-8859-1")]
    Iso8859_1,
    /// UTF-8. Character count and byte count diverge for non-ASCII text.
    #[serde(rename = "utf-8")]
    Utf8,
}

impl WireEncoding {
    /// Encode a string to wire bytes.
    ///
    /// Latin-1 fails with [`MvWireError::Framing`] on any character above
    /// U+00FF, since silently substituting would corrupt record data.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        match self {
            WireEncoding::Iso8859_1 => {
                let mut out = Vec::with_capacity(text.len());
                for ch in text.chars() {
                    let code = ch as u32;
                    if code > 0xFF {
                        return Err(MvWireError::Framing(format!(
                            "character U+{code:04X} is not representable in ISO-8859-1"
                        )));
                    }
                    out.push(code as u8);
                }
                Ok(out)
            }
            WireEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
        }
    }

    /// Decode a complete byte buffer to a string.
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            WireEncoding::Iso8859_1 => Ok(bytes.iter().map(|&b| b as char).collect()),
            WireEncoding::Utf8 => String::from_utf8(bytes.to_vec())
                .map_err(|e| MvWireError::Framing(format!("invalid UTF-8 payload: {e}"))),
        }
    }

    /// Decode exactly `char_count` characters from the head of `bytes`.
    ///
    /// Returns the decoded string and the number of bytes consumed, or
    /// `None` if the buffer does not yet hold that many characters.
    /// An invalid byte sequence inside the needed prefix is a
    /// [`MvWireError::Framing`] error; an incomplete trailing sequence
    /// just means more bytes are needed.
    pub fn decode_prefix(&self, bytes: &[u8], char_count: usize) -> Result<Option<(String, usize)>> {
        match self {
            WireEncoding::Iso8859_1 => {
                if bytes.len() < char_count {
                    return Ok(None);
                }
                let text: String = bytes[..char_count].iter().map(|&b| b as char).collect();
                Ok(Some((text, char_count)))
            }
            WireEncoding::Utf8 => {
                let (valid, complete) = match std::str::from_utf8(bytes) {
                    Ok(s) => (s, true),
                    Err(e) => {
                        let valid = std::str::from_utf8(&bytes[..e.valid_up_to()])
                            .expect("valid_up_to marks a char boundary");
                        // error_len() == None means the buffer ends inside a
                        // multi-byte sequence; anything else is corrupt.
                        (valid, e.error_len().is_some())
                    }
                };

                let mut chars_seen = 0usize;
                for (byte_idx, _) in valid.char_indices() {
                    if chars_seen == char_count {
                        return Ok(Some((valid[..byte_idx].to_string(), byte_idx)));
                    }
                    chars_seen += 1;
                }
                if chars_seen >= char_count {
                    return Ok(Some((valid.to_string(), valid.len())));
                }

                if complete && valid.len() < bytes.len() {
                    // Corrupt bytes sit before we reached the declared count.
                    return Err(MvWireError::Framing(format!(
                        "invalid UTF-8 at byte {} of payload",
                        valid.len()
                    )));
                }
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin1_round_trip_full_byte_range() {
        let all_bytes: Vec<u8> = (0..=255).collect();
        let text = WireEncoding::Iso8859_1.decode(&all_bytes).unwrap();
        assert_eq!(text.chars().count(), 256);
        let bytes = WireEncoding::Iso8859_1.encode(&text).unwrap();
        assert_eq!(bytes, all_bytes);
    }

    #[test]
    fn test_latin1_rejects_wide_char() {
        let result = WireEncoding::Iso8859_1.encode("snowman \u{2603}");
        assert!(matches!(result, Err(MvWireError::Framing(_))));
    }

    #[test]
    fn test_latin1_char_count_equals_byte_count() {
        let text = "caf\u{E9}"; // é = 0xE9, one byte in Latin-1
        let bytes = WireEncoding::Iso8859_1.encode(text).unwrap();
        assert_eq!(bytes.len(), 4);
        assert_eq!(bytes[3], 0xE9);
    }

    #[test]
    fn test_utf8_round_trip() {
        let text = "héllo wörld \u{2603}";
        let bytes = WireEncoding::Utf8.encode(text).unwrap();
        assert_eq!(WireEncoding::Utf8.decode(&bytes).unwrap(), text);
    }

    #[test]
    fn test_decode_prefix_latin1_exact() {
        let bytes = b"hello world";
        let (text, consumed) = WireEncoding::Iso8859_1
            .decode_prefix(bytes, 5)
            .unwrap()
            .unwrap();
        assert_eq!(text, "hello");
        assert_eq!(consumed, 5);
    }

    #[test]
    fn test_decode_prefix_latin1_short() {
        assert!(WireEncoding::Iso8859_1
            .decode_prefix(b"hel", 5)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_decode_prefix_utf8_multibyte() {
        // "héllo": h=1 byte, é=2 bytes, l, l, o
        let bytes = "h\u{E9}llo".as_bytes();
        assert_eq!(bytes.len(), 6);
        let (text, consumed) = WireEncoding::Utf8.decode_prefix(bytes, 2).unwrap().unwrap();
        assert_eq!(text, "h\u{E9}");
        assert_eq!(consumed, 3); // 2 chars = 3 bytes

        // 5 chars need all 6 bytes
        let (text, consumed) = WireEncoding::Utf8.decode_prefix(bytes, 5).unwrap().unwrap();
        assert_eq!(text, "h\u{E9}llo");
        assert_eq!(consumed, 6);
    }

    #[test]
    fn test_decode_prefix_utf8_incomplete_tail_needs_more() {
        // Cut the é (0xC3 0xA9) in half.
        let bytes = &"h\u{E9}".as_bytes()[..2]; // h + first byte of é
        assert!(WireEncoding::Utf8.decode_prefix(bytes, 2).unwrap().is_none());
    }

    #[test]
    fn test_decode_prefix_utf8_invalid_sequence_errors() {
        let bytes = [b'h', 0xFF, 0xFF, b'x'];
        let result = WireEncoding::Utf8.decode_prefix(&bytes, 3);
        assert!(matches!(result, Err(MvWireError::Framing(_))));
    }

    #[test]
    fn test_decode_prefix_utf8_invalid_past_prefix_is_fine() {
        // The needed prefix is clean; garbage after it stays buffered.
        let bytes = [b'h', b'i', 0xFF];
        let (text, consumed) = WireEncoding::Utf8.decode_prefix(&bytes, 2).unwrap().unwrap();
        assert_eq!(text, "hi");
        assert_eq!(consumed, 2);
    }

    #[test]
    fn test_decode_prefix_zero_chars() {
        let (text, consumed) = WireEncoding::Utf8.decode_prefix(b"abc", 0).unwrap().unwrap();
        assert_eq!(text, "");
        assert_eq!(consumed, 0);
    }

    #[test]
    fn test_default_is_latin1() {
        assert_eq!(WireEncoding::default(), WireEncoding::Iso8859_1);
    }

    #[test]
    fn test_serde_names() {
        let enc: WireEncoding = serde_json::from_str("\"iso-8859-1\"").unwrap();
        assert_eq!(enc, WireEncoding::Iso8859_1);
        let enc: WireEncoding = serde_json::from_str("\"utf-8\"").unwrap();
        assert_eq!(enc, WireEncoding::Utf8);
    }
}
