//! Codec module - wire character encoding and record serialization.
//!
//! Two concerns live here:
//!
//! - [`WireEncoding`] - the session's byte encoding (ISO-8859-1 or UTF-8),
//!   including the character-counted prefix decoding the frame reassembly
//!   loop depends on
//! - [`DynamicArray`] - the MV delimited record format, plus the editor
//!   text / record text conversions used on the file read/write paths
//!
//! # Example
//!
//! ```
//! use mvwire_client::codec::{DynamicArray, WireEncoding};
//!
//! let bytes = WireEncoding::Iso8859_1.encode("OPEN\u{01}BP").unwrap();
//! assert_eq!(bytes.len(), 7);
//!
//! let record = DynamicArray::parse("A\u{FD}B");
//! assert_eq!(record.attribute(2), "B");
//! ```

mod dynarray;
mod encoding;

pub use dynarray::{editor_text_to_record, record_to_editor_text, DynamicArray};
pub use encoding::WireEncoding;
