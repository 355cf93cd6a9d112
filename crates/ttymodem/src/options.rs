/// How much checking the decoder applies to the bytes it is fed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ValidationMode {
    /// Trust the byte stream.
    ///
    /// Lead bytes are classified by their top bits only, continuation bytes
    /// are masked without checking their `10xxxxxx` marker, and the decoded
    /// value is converted to code units as-is. Malformed input produces a
    /// deterministic but meaningless result instead of an error.
    #[default]
    Permissive,
    /// Reject malformed sequences.
    ///
    /// Stray continuation bytes, `0xF8..=0xFF` lead bytes, continuation bytes
    /// without the `10xxxxxx` marker, overlong forms, surrogates and values
    /// above U+10FFFF are reported as [`DecodeError`](crate::DecodeError)s by
    /// the checked entry points and replaced by U+FFFD by the unchecked ones.
    Strict,
}

/// Configuration options for a [`StreamDecoder`](crate::StreamDecoder).
///
/// # Examples
///
/// ```rust
/// use ttymodem::{DecoderOptions, StreamDecoder, ValidationMode};
///
/// let decoder = StreamDecoder::with_options(DecoderOptions {
///     validation: ValidationMode::Strict,
/// });
/// assert_eq!(decoder.options().validation, ValidationMode::Strict);
/// ```
///
/// # Default
///
/// Permissive decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecoderOptions {
    /// Whether malformed byte sequences are accepted or rejected.
    ///
    /// # Default
    ///
    /// [`ValidationMode::Permissive`]
    pub validation: ValidationMode,
}

impl DecoderOptions {
    /// Options with [`ValidationMode::Strict`].
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            validation: ValidationMode::Strict,
        }
    }

    pub(crate) const fn is_strict(self) -> bool {
        matches!(self.validation, ValidationMode::Strict)
    }
}
