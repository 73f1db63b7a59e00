//! Container decoding and encoding around the quantizer.

pub mod decode;
pub mod encode;

pub use decode::{decode_bytes, decode_file};
pub use encode::{encode, encode_jpeg, encode_png, EncodeOptions};
