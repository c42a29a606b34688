//! Dynamic array codec for MV delimited records.
//!
//! A record travels as flat text carved up by a fixed delimiter
//! hierarchy: attribute mark (254), value mark (253), subvalue mark
//! (252), text mark (251). [`DynamicArray`] holds the top-level segments
//! and resolves deeper levels lazily through 1-indexed accessors.
//!
//! The top level splits on the *value mark*, not the attribute mark,
//! even though the accessors are named for attributes. Deployed servers
//! and callers depend on this exact split; changing it to the attribute
//! mark would silently change what every accessor returns. The
//! attribute-mark join belongs to the record write path
//! ([`editor_text_to_record`]), not to this codec.
//!
//! # Example
//!
//! ```
//! use mvwire_client::codec::DynamicArray;
//!
//! let array = DynamicArray::parse("100\u{FD}200\u{FD}300");
//! assert_eq!(array.attribute(2), "200");
//! assert_eq!(array.attribute(9), ""); // out of range is a safe miss
//! ```

use crate::protocol::{ATTRIBUTE_MARK, SUBVALUE_MARK, VALUE_MARK};

/// An MV record held as its top-level delimited segments.
///
/// Value-like: cheap to clone, replaced wholesale by
/// [`set_raw`](DynamicArray::set_raw). Serialization is lossless
/// round-trip only when no segment contains a delimiter character.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DynamicArray {
    segments: Vec<String>,
}

impl DynamicArray {
    /// Create an empty array (zero attributes).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse raw record text. The top level splits on the value mark.
    pub fn parse(raw: &str) -> Self {
        Self {
            segments: raw.split(VALUE_MARK).map(str::to_string).collect(),
        }
    }

    /// Build an array from explicit top-level segments.
    pub fn from_attributes<I, S>(attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: attributes.into_iter().map(Into::into).collect(),
        }
    }

    /// Serialize back to raw record text, the exact inverse of
    /// [`parse`](DynamicArray::parse).
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push(VALUE_MARK);
            }
            out.push_str(segment);
        }
        out
    }

    /// Replace the whole array from raw text.
    pub fn set_raw(&mut self, raw: &str) {
        *self = Self::parse(raw);
    }

    /// Append a top-level segment.
    pub fn push_attribute(&mut self, attribute: impl Into<String>) {
        self.segments.push(attribute.into());
    }

    /// Number of top-level segments.
    pub fn attribute_count(&self) -> usize {
        self.segments.len()
    }

    /// Check if the array has no segments at all.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Get attribute `n` (1-indexed). Out-of-range returns `""`; callers
    /// rely on the safe miss instead of bounds-checking.
    pub fn attribute(&self, n: usize) -> &str {
        if n == 0 {
            return "";
        }
        self.segments.get(n - 1).map(String::as_str).unwrap_or("")
    }

    /// Get value `v` of attribute `n` (both 1-indexed), splitting the
    /// segment on the value mark. Out-of-range returns `""`.
    pub fn value(&self, n: usize, v: usize) -> &str {
        if v == 0 {
            return "";
        }
        self.attribute(n).split(VALUE_MARK).nth(v - 1).unwrap_or("")
    }

    /// Get subvalue `s` of value `v` of attribute `n` (all 1-indexed),
    /// splitting on the subvalue mark. Out-of-range returns `""`.
    pub fn subvalue(&self, n: usize, v: usize, s: usize) -> &str {
        if s == 0 {
            return "";
        }
        self.value(n, v)
            .split(SUBVALUE_MARK)
            .nth(s - 1)
            .unwrap_or("")
    }
}

/// Convert multi-line editor text into record form: carriage returns are
/// stripped and each line feed becomes an attribute mark, so a document
/// becomes one attribute per line.
pub fn editor_text_to_record(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\r' => {}
            '\n' => out.push(ATTRIBUTE_MARK),
            other => out.push(other),
        }
    }
    out
}

/// Convert record form back into editor text: each attribute mark becomes
/// a line feed.
pub fn record_to_editor_text(record: &str) -> String {
    record.replace(ATTRIBUTE_MARK, "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const VM: char = '\u{FD}';
    const SVM: char = '\u{FC}';
    const AM: char = '\u{FE}';

    #[test]
    fn test_parse_splits_top_level_on_value_mark() {
        let array = DynamicArray::parse(&format!("a{VM}b{VM}c"));
        assert_eq!(array.attribute_count(), 3);
        assert_eq!(array.attribute(1), "a");
        assert_eq!(array.attribute(3), "c");
    }

    #[test]
    fn test_attribute_mark_is_not_a_top_level_delimiter() {
        // The whole AM-joined text lands in one segment.
        let array = DynamicArray::parse(&format!("a{AM}b{AM}c"));
        assert_eq!(array.attribute_count(), 1);
        assert_eq!(array.attribute(1), format!("a{AM}b{AM}c"));
    }

    #[test]
    fn test_round_trip_delimiter_free_content() {
        let array = DynamicArray::from_attributes(["100", "NAME", "last\u{FC}first"]);
        let parsed = DynamicArray::parse(&array.serialize());
        assert_eq!(parsed.attribute(1), "100");
        assert_eq!(parsed.attribute(2), "NAME");
        assert_eq!(parsed.attribute(3), "last\u{FC}first");
    }

    #[test]
    fn test_round_trip_property() {
        let cases = [
            String::new(),
            "plain".to_string(),
            format!("a{VM}b"),
            format!("x{VM}{VM}y"),
        ];
        for raw in &cases {
            let array = DynamicArray::parse(raw);
            assert_eq!(DynamicArray::parse(&array.serialize()), array);
        }
    }

    #[test]
    fn test_safe_miss_never_panics() {
        let empty = DynamicArray::new();
        assert_eq!(empty.attribute(1), "");
        assert_eq!(empty.value(1, 1), "");
        assert_eq!(empty.subvalue(1, 1, 1), "");
        assert_eq!(empty.attribute(usize::MAX), "");

        let array = DynamicArray::parse("only");
        assert_eq!(array.attribute(2), "");
        assert_eq!(array.value(1, 2), "");
        assert_eq!(array.subvalue(1, 1, 2), "");
    }

    #[test]
    fn test_zero_index_is_a_safe_miss() {
        let array = DynamicArray::parse("a");
        assert_eq!(array.attribute(0), "");
        assert_eq!(array.value(1, 0), "");
        assert_eq!(array.subvalue(1, 1, 0), "");
    }

    #[test]
    fn test_value_accessor_splits_segment() {
        // Segments built directly can contain value marks.
        let array = DynamicArray::from_attributes([format!("v1{VM}v2{VM}v3")]);
        assert_eq!(array.value(1, 1), "v1");
        assert_eq!(array.value(1, 3), "v3");
        assert_eq!(array.value(1, 4), "");
    }

    #[test]
    fn test_subvalue_accessor() {
        let array = DynamicArray::from_attributes([format!("a{SVM}b{VM}c{SVM}d")]);
        assert_eq!(array.subvalue(1, 1, 1), "a");
        assert_eq!(array.subvalue(1, 1, 2), "b");
        assert_eq!(array.subvalue(1, 2, 1), "c");
        assert_eq!(array.subvalue(1, 2, 2), "d");
        assert_eq!(array.subvalue(1, 2, 3), "");
    }

    #[test]
    fn test_set_raw_replaces_wholesale() {
        let mut array = DynamicArray::from_attributes(["old", "state"]);
        array.set_raw(&format!("new{VM}contents"));
        assert_eq!(array.attribute(1), "new");
        assert_eq!(array.attribute(2), "contents");
        assert_eq!(array.attribute_count(), 2);
    }

    #[test]
    fn test_push_attribute() {
        let mut array = DynamicArray::new();
        array.push_attribute("first");
        array.push_attribute("second");
        assert_eq!(array.serialize(), format!("first{VM}second"));
    }

    #[test]
    fn test_parse_empty_string_is_one_empty_segment() {
        let array = DynamicArray::parse("");
        assert_eq!(array.attribute_count(), 1);
        assert_eq!(array.attribute(1), "");
    }

    #[test]
    fn test_editor_text_to_record_strips_cr_joins_with_am() {
        let record = editor_text_to_record("line1\r\nline2\nline3");
        assert_eq!(record, format!("line1{AM}line2{AM}line3"));
        assert_eq!(record.matches(AM).count(), 2);
        assert!(!record.contains('\r'));
    }

    #[test]
    fn test_record_to_editor_text() {
        let text = record_to_editor_text(&format!("line1{AM}line2{AM}line3"));
        assert_eq!(text, "line1\nline2\nline3");
    }

    #[test]
    fn test_editor_round_trip() {
        let text = "0001 PROGRAM\n0002 CRT 'HI'\n0003 END";
        assert_eq!(record_to_editor_text(&editor_text_to_record(text)), text);
    }
}
