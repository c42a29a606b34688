//! Protocol layer: framing constants, frame codec, response reassembly.

mod frame;
mod frame_buffer;
mod wire_format;

pub use frame::{encode_fields, encode_frame, split_fields};
pub use frame_buffer::FrameBuffer;
pub use wire_format::{
    decode_header, encode_length, ProtocolDialect, ARG_SEPARATOR, ATTRIBUTE_MARK,
    DATABASE_HEADER_WIDTH, GATEWAY_HEADER_WIDTH, GATEWAY_LINE_MARK, SUBVALUE_MARK, TEXT_MARK,
    VALUE_MARK,
};
