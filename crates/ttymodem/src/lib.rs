//! Streaming UTF-8 to UTF-16 decoding for terminal output.
//!
//! A program writing to standard output hands its bytes to the host one at a
//! time. [`StreamDecoder`] turns that byte stream back into characters as the
//! bytes arrive, keeping any partial multi-byte sequence between calls, and
//! emits each character as UTF-16 code units ([`Fragment`]), splitting
//! characters above U+FFFF into surrogate pairs.
//!
//! ```rust
//! use ttymodem::StreamDecoder;
//!
//! let mut decoder = StreamDecoder::new();
//! assert!(decoder.decode_byte(0xF0).is_empty());
//! assert!(decoder.decode_byte(0x90).is_empty());
//! assert!(decoder.decode_byte(0x80).is_empty());
//! assert_eq!(decoder.decode_byte(0x80).as_units(), &[0xD800, 0xDC00]);
//! ```
//!
//! [`TtyStream`] and [`Console`] wire decoders to a [`DisplaySink`], one
//! decoder per output stream.

#![no_std]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod decoder;
mod error;
mod fragment;
mod options;
mod pending;
mod sink;
mod tty;

#[cfg(test)]
mod tests;

pub use decoder::{Fragments, StreamDecoder, TryFragments};
pub use error::DecodeError;
pub use fragment::Fragment;
pub use options::{DecoderOptions, ValidationMode};
pub use sink::{DisplaySink, Utf16Buffer};
pub use tty::{Console, StreamId, TtyStream};
