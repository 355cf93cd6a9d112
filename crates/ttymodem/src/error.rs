use thiserror::Error;

/// Errors reported by the checked entry points of [`StreamDecoder`].
///
/// The permissive [`StreamDecoder::decode_byte`] never produces these; they
/// surface only from [`StreamDecoder::try_decode_byte`],
/// [`StreamDecoder::try_decode_code`] and [`StreamDecoder::finish`].
///
/// [`StreamDecoder`]: crate::StreamDecoder
/// [`StreamDecoder::decode_byte`]: crate::StreamDecoder::decode_byte
/// [`StreamDecoder::try_decode_byte`]: crate::StreamDecoder::try_decode_byte
/// [`StreamDecoder::try_decode_code`]: crate::StreamDecoder::try_decode_code
/// [`StreamDecoder::finish`]: crate::StreamDecoder::finish
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// A host handed over a value that does not fit in a byte.
    #[error("byte value {0} is outside 0..=255")]
    ByteOutOfRange(u32),
    /// A byte that cannot start a sequence arrived while no sequence was open.
    #[error("invalid lead byte 0x{0:02X}")]
    InvalidLeadByte(u8),
    /// A byte inside a sequence lacked the `10xxxxxx` continuation pattern.
    #[error("invalid continuation byte 0x{byte:02X} at offset {index}")]
    InvalidContinuation {
        /// The offending byte.
        byte: u8,
        /// Its offset within the sequence (the lead byte is offset 0).
        index: usize,
    },
    /// The sequence decoded to an overlong form, a surrogate, or a value above
    /// U+10FFFF.
    #[error("invalid code point U+{0:04X}")]
    InvalidCodePoint(u32),
    /// The stream ended in the middle of a multi-byte sequence.
    #[error("incomplete sequence: {collected} byte(s) collected, {missing} missing")]
    IncompleteSequence {
        /// Bytes of the sequence received so far, lead byte included.
        collected: usize,
        /// Continuation bytes that never arrived.
        missing: usize,
    },
}
