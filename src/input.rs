//! Keystroke input: raw byte decoding and the edit buffer it feeds.

pub mod buffer;
pub mod decoder;

pub use buffer::EditBuffer;
pub use decoder::{any_byte, digits_only, KeyDecoder, KeyEvent, KeyParser};
