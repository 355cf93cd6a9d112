//! UTF-16 output of a single decode step.
//!
//! Every byte fed to the decoder produces exactly one [`Fragment`]: empty while
//! a multi-byte sequence is still accumulating, one code unit for a character
//! in the Basic Multilingual Plane, or a high/low surrogate pair for anything
//! above U+FFFF. Fragments are stored inline so that decoding never allocates.

use core::fmt;

const SUPPLEMENTARY_BASE: i64 = 0x1_0000;
const SURROGATE_SPAN: i64 = 0x400;
const HIGH_SURROGATE_BASE: i64 = 0xD800;
const LOW_SURROGATE_BASE: i64 = 0xDC00;

/// Zero, one or two UTF-16 code units representing at most one character.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Fragment {
    units: [u16; 2],
    len: u8,
}

impl Fragment {
    /// The fragment returned while a sequence is still being collected.
    pub const EMPTY: Self = Self {
        units: [0; 2],
        len: 0,
    };

    /// A single code unit.
    #[must_use]
    pub const fn unit(unit: u16) -> Self {
        Self {
            units: [unit, 0],
            len: 1,
        }
    }

    /// A high/low surrogate pair, stored in that order.
    #[must_use]
    pub const fn pair(high: u16, low: u16) -> Self {
        Self {
            units: [high, low],
            len: 2,
        }
    }

    /// Encodes `code_point` as UTF-16 code units.
    ///
    /// Values up to U+FFFF become a single unit. Larger values are split into a
    /// surrogate pair with
    ///
    /// ```text
    /// high = floor((cp - 0x10000) / 0x400) + 0xD800
    /// low  = (cp - 0x10000) rem 0x400 + 0xDC00
    /// ```
    ///
    /// Nothing is validated: surrogate code points pass through as lone units
    /// and values above U+10FFFF yield a `high` unit outside the high-surrogate
    /// range.
    #[must_use]
    pub fn from_code_point(code_point: u32) -> Self {
        match u16::try_from(code_point) {
            Ok(unit) => Self::unit(unit),
            Err(_) => Self::surrogates(code_point),
        }
    }

    /// Splits `code_point` into a surrogate pair unconditionally.
    ///
    /// This is the four-byte path of the decoder, which never checks whether the
    /// value actually needs a pair. Below U+10000 the offset goes negative: the
    /// quotient is floored, the remainder keeps the dividend's sign, and each
    /// unit is reduced modulo 2^16.
    #[must_use]
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn surrogates(code_point: u32) -> Self {
        let offset = i64::from(code_point) - SUPPLEMENTARY_BASE;
        let high = offset.div_euclid(SURROGATE_SPAN) + HIGH_SURROGATE_BASE;
        let low = offset % SURROGATE_SPAN + LOW_SURROGATE_BASE;
        Self::pair(high as u16, low as u16)
    }

    /// Whether this fragment carries no code units.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of code units: 0, 1 or 2.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// Whether this fragment is two code units.
    #[must_use]
    pub const fn is_surrogate_pair(&self) -> bool {
        self.len == 2
    }

    /// The code units of this fragment.
    #[must_use]
    pub fn as_units(&self) -> &[u16] {
        &self.units[..self.len()]
    }

    /// The character these units encode, if they form a valid scalar value.
    ///
    /// Returns `None` for an empty fragment, a lone surrogate, or a pair that
    /// is not a high surrogate followed by a low one.
    #[must_use]
    pub fn to_char(&self) -> Option<char> {
        if self.is_empty() {
            return None;
        }
        let mut decoded = char::decode_utf16(self.as_units().iter().copied());
        let ch = decoded.next()?.ok()?;
        decoded.next().is_none().then_some(ch)
    }
}

impl fmt::Debug for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Fragment[")?;
        for (i, unit) in self.as_units().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{unit:#06X}")?;
        }
        f.write_str("]")
    }
}

/// Writes the encoded character, substituting U+FFFD for units that do not
/// form a scalar value.
impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in char::decode_utf16(self.as_units().iter().copied()) {
            fmt::Write::write_char(f, ch.unwrap_or(char::REPLACEMENT_CHARACTER))?;
        }
        Ok(())
    }
}

impl From<char> for Fragment {
    fn from(ch: char) -> Self {
        Self::from_code_point(u32::from(ch))
    }
}

impl IntoIterator for Fragment {
    type Item = u16;
    type IntoIter = core::iter::Take<core::array::IntoIter<u16, 2>>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.into_iter().take(self.len())
    }
}
