//! Byte-at-a-time UTF-8 to UTF-16 decoder.
//!
//! A [`StreamDecoder`] is a two-state machine. While no sequence is open, an
//! ASCII byte is returned immediately and any other byte opens a sequence whose
//! length is read off the lead byte's top bits. While a sequence is open, each
//! byte is appended until the announced count is reached; the sequence is then
//! decoded, cleared and returned as a [`Fragment`].
//!
//! Each call consumes exactly one byte, never looks ahead, and never buffers
//! more than the four bytes of one sequence. One decoder belongs to one output
//! stream; two streams must never share a decoder or their partial sequences
//! would interleave.

use crate::{DecodeError, DecoderOptions, Fragment, pending::PendingSequence};

const REPLACEMENT: Fragment = Fragment::unit(0xFFFD);

/// Streaming decoder for one output stream.
///
/// # Examples
///
/// ```rust
/// use ttymodem::StreamDecoder;
///
/// let mut decoder = StreamDecoder::new();
/// let out: Vec<String> = [b'A', 0xE2, 0x82, 0xAC, b'B']
///     .into_iter()
///     .map(|b| decoder.decode_byte(b).to_string())
///     .collect();
/// assert_eq!(out, ["A", "", "", "€", "B"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StreamDecoder {
    pending: PendingSequence,
    options: DecoderOptions,
}

impl StreamDecoder {
    /// Creates a permissive decoder with no sequence in progress.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(DecoderOptions::default())
    }

    /// Creates a decoder with the given options.
    #[must_use]
    pub fn with_options(options: DecoderOptions) -> Self {
        Self {
            pending: PendingSequence::new(),
            options,
        }
    }

    /// The options this decoder was created with.
    #[must_use]
    pub fn options(&self) -> DecoderOptions {
        self.options
    }

    /// Whether a multi-byte sequence is partially collected.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Bytes of the current sequence collected so far (0 to 3 between calls).
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Continuation bytes still expected; 0 when nothing is pending.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.pending.remaining()
    }

    /// Discards any partially collected sequence.
    pub fn reset(&mut self) {
        self.pending.clear();
    }

    /// Decodes one byte.
    ///
    /// Returns [`Fragment::EMPTY`] while a multi-byte sequence is still
    /// accumulating, otherwise the code units of exactly one character. In
    /// permissive mode malformed input decodes to whatever the bit arithmetic
    /// yields; in strict mode it decodes to U+FFFD.
    pub fn decode_byte(&mut self, byte: u8) -> Fragment {
        self.try_decode_byte(byte).unwrap_or(REPLACEMENT)
    }

    /// Decodes one byte, reporting malformed input.
    ///
    /// # Errors
    ///
    /// Only in [`ValidationMode::Strict`](crate::ValidationMode::Strict):
    /// - [`DecodeError::InvalidLeadByte`] for a byte that cannot open a
    ///   sequence,
    /// - [`DecodeError::InvalidContinuation`] for a byte inside a sequence that
    ///   lacks the `10xxxxxx` marker,
    /// - [`DecodeError::InvalidCodePoint`] for an overlong form, a surrogate or
    ///   a value above U+10FFFF.
    ///
    /// The offending byte is consumed and the decoder is left with no sequence
    /// in progress.
    pub fn try_decode_byte(&mut self, byte: u8) -> Result<Fragment, DecodeError> {
        let strict = self.options.is_strict();

        if self.pending.is_empty() {
            if byte < 0x80 {
                return Ok(Fragment::unit(u16::from(byte)));
            }
            if strict && !is_lead_byte(byte) {
                return Err(rejected(DecodeError::InvalidLeadByte(byte)));
            }
            let remaining = self.pending.start(byte);
            tracing::trace!(lead = byte, remaining, "sequence started");
            return Ok(Fragment::EMPTY);
        }

        if strict && byte & 0xC0 != 0x80 {
            let index = self.pending.len();
            self.pending.clear();
            return Err(rejected(DecodeError::InvalidContinuation { byte, index }));
        }

        if !self.pending.push(byte) {
            return Ok(Fragment::EMPTY);
        }

        let len = self.pending.len();
        let code_point = self.pending.code_point();
        self.pending.clear();
        tracing::trace!(len, code_point, "sequence complete");

        if strict {
            check_code_point(len, code_point).map_err(rejected)?;
        }

        Ok(if len == 4 {
            Fragment::surrogates(code_point)
        } else {
            Fragment::from_code_point(code_point)
        })
    }

    /// Decodes a byte handed over as a wider integer, keeping only its low
    /// eight bits.
    pub fn decode_code(&mut self, value: u32) -> Fragment {
        let [byte, ..] = (value & 0xFF).to_le_bytes();
        self.decode_byte(byte)
    }

    /// Decodes a byte handed over as a wider integer, rejecting values that do
    /// not fit in a byte.
    ///
    /// # Errors
    ///
    /// [`DecodeError::ByteOutOfRange`] when `value > 255`, in either
    /// validation mode; the decoder state is untouched. Otherwise as
    /// [`try_decode_byte`](Self::try_decode_byte).
    pub fn try_decode_code(&mut self, value: u32) -> Result<Fragment, DecodeError> {
        let byte = u8::try_from(value).map_err(|_| DecodeError::ByteOutOfRange(value))?;
        self.try_decode_byte(byte)
    }

    /// Decodes a chunk of bytes in order, yielding the non-empty fragments.
    ///
    /// Bytes are consumed lazily: dropping the iterator early leaves the rest
    /// of `bytes` unread and the decoder consistent with what was consumed.
    pub fn feed<'a>(&'a mut self, bytes: &'a [u8]) -> Fragments<'a> {
        Fragments {
            decoder: self,
            bytes: bytes.iter(),
        }
    }

    /// Like [`feed`](Self::feed), but yields strict-mode errors in place.
    pub fn try_feed<'a>(&'a mut self, bytes: &'a [u8]) -> TryFragments<'a> {
        TryFragments {
            decoder: self,
            bytes: bytes.iter(),
        }
    }

    /// Ends the stream.
    ///
    /// # Errors
    ///
    /// [`DecodeError::IncompleteSequence`] if the stream stopped in the middle
    /// of a multi-byte sequence. The partial character is lost either way.
    pub fn finish(self) -> Result<(), DecodeError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        let err = DecodeError::IncompleteSequence {
            collected: self.pending.len(),
            missing: self.pending.remaining(),
        };
        tracing::debug!(error = %err, "stream finished mid-sequence");
        Err(err)
    }
}

fn is_lead_byte(byte: u8) -> bool {
    byte & 0xE0 == 0xC0 || byte & 0xF0 == 0xE0 || byte & 0xF8 == 0xF0
}

fn check_code_point(len: usize, code_point: u32) -> Result<(), DecodeError> {
    let min = match len {
        2 => 0x80,
        3 => 0x800,
        _ => 0x1_0000,
    };
    if code_point < min || (0xD800..=0xDFFF).contains(&code_point) || code_point > 0x10_FFFF {
        return Err(DecodeError::InvalidCodePoint(code_point));
    }
    Ok(())
}

fn rejected(err: DecodeError) -> DecodeError {
    tracing::debug!(error = %err, "rejected malformed input");
    err
}

/// Iterator returned by [`StreamDecoder::feed`].
#[derive(Debug)]
pub struct Fragments<'a> {
    decoder: &'a mut StreamDecoder,
    bytes: core::slice::Iter<'a, u8>,
}

impl Iterator for Fragments<'_> {
    type Item = Fragment;

    fn next(&mut self) -> Option<Self::Item> {
        for &byte in self.bytes.by_ref() {
            let fragment = self.decoder.decode_byte(byte);
            if !fragment.is_empty() {
                return Some(fragment);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.bytes.len()))
    }
}

/// Iterator returned by [`StreamDecoder::try_feed`].
#[derive(Debug)]
pub struct TryFragments<'a> {
    decoder: &'a mut StreamDecoder,
    bytes: core::slice::Iter<'a, u8>,
}

impl Iterator for TryFragments<'_> {
    type Item = Result<Fragment, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        for &byte in self.bytes.by_ref() {
            match self.decoder.try_decode_byte(byte) {
                Ok(fragment) if fragment.is_empty() => {}
                other => return Some(other),
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.bytes.len()))
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::String, vec::Vec};

    use rstest::rstest;

    use super::StreamDecoder;
    use crate::{DecodeError, DecoderOptions, Fragment};

    fn decode_all(decoder: &mut StreamDecoder, bytes: &[u8]) -> Vec<Fragment> {
        bytes.iter().map(|&b| decoder.decode_byte(b)).collect()
    }

    #[test]
    fn ascii_passes_through_immediately() {
        let mut decoder = StreamDecoder::new();
        for b in 0u8..0x80 {
            assert_eq!(decoder.decode_byte(b).as_units(), &[u16::from(b)]);
            assert!(!decoder.is_pending());
        }
    }

    #[test]
    fn euro_sign_between_ascii() {
        let mut decoder = StreamDecoder::new();
        let frags = decode_all(&mut decoder, b"A\xE2\x82\xACB");
        let rendered: Vec<String> = frags.iter().map(alloc::string::ToString::to_string).collect();
        assert_eq!(rendered, ["A", "", "", "€", "B"]);
    }

    #[rstest]
    #[case(&[0xC2, 0x80], &[0x0080])]
    #[case(&[0xDF, 0xBF], &[0x07FF])]
    #[case(&[0xE0, 0xA0, 0x80], &[0x0800])]
    #[case(&[0xEF, 0xBF, 0xBF], &[0xFFFF])]
    #[case(&[0xF0, 0x90, 0x80, 0x80], &[0xD800, 0xDC00])]
    #[case(&[0xF0, 0x9F, 0x98, 0x80], &[0xD83D, 0xDE00])]
    #[case(&[0xF4, 0x8F, 0xBF, 0xBF], &[0xDBFF, 0xDFFF])]
    fn sequence_boundaries(#[case] bytes: &[u8], #[case] units: &[u16]) {
        let mut decoder = StreamDecoder::new();
        let (last, init) = bytes.split_last().unwrap();
        for (i, &b) in init.iter().enumerate() {
            assert!(decoder.decode_byte(b).is_empty());
            assert_eq!(decoder.pending_len(), i + 1);
            assert_eq!(decoder.remaining(), bytes.len() - i - 1);
        }
        assert_eq!(decoder.decode_byte(*last).as_units(), units);
        assert!(!decoder.is_pending());
        assert_eq!(decoder.decode_byte(b'z').as_units(), &[u16::from(b'z')]);
    }

    #[test]
    fn permissive_accepts_bad_continuation() {
        let mut decoder = StreamDecoder::new();
        // 'A' where a continuation byte belongs: masked to 0x01.
        assert!(decoder.decode_byte(0xC3).is_empty());
        assert_eq!(decoder.decode_byte(b'A').as_units(), &[0x00C1]);
    }

    #[test]
    fn permissive_stray_continuation_opens_four_byte_sequence() {
        let mut decoder = StreamDecoder::new();
        let frags = decode_all(&mut decoder, &[0x80, b'a', b'b', b'c']);
        assert!(frags[..3].iter().all(Fragment::is_empty));
        // ((0x80 & 7) << 18) | (0x21 << 12) | (0x22 << 6) | 0x23
        assert_eq!(frags[3], Fragment::surrogates(0x2_18A3));
        assert!(!decoder.is_pending());
    }

    #[test]
    fn permissive_overlong_four_byte_wraps() {
        let mut decoder = StreamDecoder::new();
        let frags = decode_all(&mut decoder, &[0xF0, 0x80, 0x80, 0x80]);
        assert_eq!(frags[3].as_units(), &[0xD7C0, 0xDC00]);
    }

    #[test]
    fn permissive_never_errors() {
        let mut decoder = StreamDecoder::new();
        for b in 0..=u8::MAX {
            assert!(decoder.try_decode_byte(b).is_ok());
            assert!(decoder.pending_len() <= 3);
        }
    }

    #[test]
    fn strict_rejects_and_recovers() {
        let mut decoder = StreamDecoder::with_options(DecoderOptions::strict());

        assert_eq!(
            decoder.try_decode_byte(0x80),
            Err(DecodeError::InvalidLeadByte(0x80))
        );
        assert_eq!(
            decoder.try_decode_byte(0xF8),
            Err(DecodeError::InvalidLeadByte(0xF8))
        );

        assert_eq!(decoder.try_decode_byte(0xE2), Ok(Fragment::EMPTY));
        assert_eq!(
            decoder.try_decode_byte(b'x'),
            Err(DecodeError::InvalidContinuation {
                byte: b'x',
                index: 1
            })
        );
        assert!(!decoder.is_pending());
        assert_eq!(decoder.try_decode_byte(b'y'), Ok(Fragment::unit(0x79)));
    }

    #[rstest]
    // overlong two-byte NUL
    #[case(&[0xC0, 0x80], 0x00)]
    // overlong three-byte '/'
    #[case(&[0xE0, 0x80, 0xAF], 0x2F)]
    // UTF-16 surrogate encoded as UTF-8
    #[case(&[0xED, 0xA0, 0x80], 0xD800)]
    // overlong four-byte form of U+FFFF
    #[case(&[0xF0, 0x8F, 0xBF, 0xBF], 0xFFFF)]
    // beyond U+10FFFF
    #[case(&[0xF4, 0x90, 0x80, 0x80], 0x11_0000)]
    fn strict_rejects_invalid_code_points(#[case] bytes: &[u8], #[case] cp: u32) {
        let mut decoder = StreamDecoder::with_options(DecoderOptions::strict());
        let (last, init) = bytes.split_last().unwrap();
        for &b in init {
            assert_eq!(decoder.try_decode_byte(b), Ok(Fragment::EMPTY));
        }
        assert_eq!(
            decoder.try_decode_byte(*last),
            Err(DecodeError::InvalidCodePoint(cp))
        );
        assert!(!decoder.is_pending());
    }

    #[test]
    fn strict_decode_byte_substitutes_replacement() {
        let mut decoder = StreamDecoder::with_options(DecoderOptions::strict());
        let frags = decode_all(&mut decoder, &[0xFF, 0xC3, b'A', 0xC3, 0xA9]);
        let rendered: String = frags.iter().map(alloc::string::ToString::to_string).collect();
        assert_eq!(rendered, "\u{FFFD}\u{FFFD}é");
    }

    #[test]
    fn decode_code_masks_to_low_byte() {
        let mut decoder = StreamDecoder::new();
        assert_eq!(decoder.decode_code(0x141).as_units(), &[0x41]);
        assert_eq!(decoder.decode_code(0xFFFF_FFE2), Fragment::EMPTY);
        assert!(decoder.is_pending());
    }

    #[test]
    fn try_decode_code_rejects_without_touching_state() {
        let mut decoder = StreamDecoder::new();
        assert_eq!(decoder.try_decode_code(0xE2), Ok(Fragment::EMPTY));
        assert_eq!(
            decoder.try_decode_code(0x182),
            Err(DecodeError::ByteOutOfRange(0x182))
        );
        assert_eq!(decoder.pending_len(), 1);
        assert_eq!(decoder.try_decode_code(0x82), Ok(Fragment::EMPTY));
        assert_eq!(decoder.try_decode_code(0xAC), Ok(Fragment::unit(0x20AC)));
    }

    #[test]
    fn feed_skips_empty_fragments() {
        let mut decoder = StreamDecoder::new();
        let out: Vec<Fragment> = decoder.feed("h€😀".as_bytes()).collect();
        assert_eq!(out, [Fragment::from('h'), Fragment::from('€'), Fragment::from('😀')]);
    }

    #[test]
    fn feed_dropped_early_keeps_state() {
        let mut decoder = StreamDecoder::new();
        let bytes = "a😀".as_bytes();
        let first = decoder.feed(&bytes[..3]).next();
        assert_eq!(first, Some(Fragment::from('a')));
        // The iterator was dropped after 'a'; the emoji lead byte is unread.
        assert!(!decoder.is_pending());

        assert_eq!(decoder.feed(&bytes[1..3]).count(), 0);
        assert_eq!(decoder.pending_len(), 2);
        let rest: Vec<Fragment> = decoder.feed(&bytes[3..]).collect();
        assert_eq!(rest, [Fragment::from('😀')]);
    }

    #[test]
    fn try_feed_reports_errors_in_order() {
        let mut decoder = StreamDecoder::with_options(DecoderOptions::strict());
        let out: Vec<_> = decoder.try_feed(b"a\x80b").collect();
        assert_eq!(
            out,
            [
                Ok(Fragment::from('a')),
                Err(DecodeError::InvalidLeadByte(0x80)),
                Ok(Fragment::from('b')),
            ]
        );
    }

    #[test]
    fn finish_reports_incomplete_sequence() {
        let mut decoder = StreamDecoder::new();
        decoder.decode_byte(0xF0);
        decoder.decode_byte(0x9F);
        assert_eq!(
            decoder.finish(),
            Err(DecodeError::IncompleteSequence {
                collected: 2,
                missing: 2
            })
        );

        let mut decoder = StreamDecoder::new();
        decoder.decode_byte(b'x');
        assert_eq!(decoder.finish(), Ok(()));
    }

    #[test]
    fn reset_discards_partial_sequence() {
        let mut decoder = StreamDecoder::new();
        decoder.decode_byte(0xE2);
        decoder.reset();
        assert!(!decoder.is_pending());
        assert_eq!(decoder.decode_byte(b'q'), Fragment::from('q'));
    }

    #[test]
    fn decoder_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<StreamDecoder>();
    }
}
