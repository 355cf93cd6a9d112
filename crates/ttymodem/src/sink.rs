use alloc::{string::String, vec::Vec};
use core::fmt::Write as _;

use crate::Fragment;

/// Destination for decoded fragments, such as a visible output area.
///
/// Fragments arrive in the order their bytes were decoded. Callers are
/// expected to skip empty fragments, but implementations must tolerate them.
pub trait DisplaySink {
    /// Appends the code units of `fragment`.
    fn push_fragment(&mut self, fragment: Fragment);

    /// Removes everything displayed so far.
    fn clear(&mut self);
}

/// Growable UTF-16 text, the way a host string stores decoded output.
///
/// Unlike a [`String`], it keeps whatever code units it is given, including
/// lone surrogates produced from malformed input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Utf16Buffer {
    units: Vec<u16>,
}

impl Utf16Buffer {
    /// An empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The code units appended so far.
    #[must_use]
    pub fn as_units(&self) -> &[u16] {
        &self.units
    }

    /// Number of code units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether nothing has been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Renders the buffer, replacing unpaired surrogates with U+FFFD.
    #[must_use]
    pub fn to_string_lossy(&self) -> String {
        String::from_utf16_lossy(&self.units)
    }

    /// Consumes the buffer, returning its code units.
    #[must_use]
    pub fn into_units(self) -> Vec<u16> {
        self.units
    }
}

impl DisplaySink for Utf16Buffer {
    fn push_fragment(&mut self, fragment: Fragment) {
        self.units.extend(fragment);
    }

    fn clear(&mut self) {
        self.units.clear();
    }
}

impl DisplaySink for Vec<u16> {
    fn push_fragment(&mut self, fragment: Fragment) {
        self.extend(fragment);
    }

    fn clear(&mut self) {
        Vec::clear(self);
    }
}

/// Lossy: a fragment that is not a valid scalar value is appended as U+FFFD.
impl DisplaySink for String {
    fn push_fragment(&mut self, fragment: Fragment) {
        // Writing to a String cannot fail.
        let _ = write!(self, "{fragment}");
    }

    fn clear(&mut self) {
        String::clear(self);
    }
}

impl<S: DisplaySink + ?Sized> DisplaySink for &mut S {
    fn push_fragment(&mut self, fragment: Fragment) {
        (**self).push_fragment(fragment);
    }

    fn clear(&mut self) {
        (**self).clear();
    }
}
