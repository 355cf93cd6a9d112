//! Accumulator for the bytes of one in-flight multi-byte sequence.
//!
//! [`PendingSequence`] holds the lead byte plus the continuation bytes that
//! have arrived so far, together with the number of continuation bytes still
//! expected. It never holds more than four bytes and is cleared as soon as
//! the sequence it describes is complete.

use core::fmt;

use bstr::ByteSlice;

/// Number of continuation bytes a lead byte announces, judged by its top bits
/// alone: `110xxxxx` → 1, `1110xxxx` → 2, anything else → 3.
#[must_use]
pub(crate) const fn continuation_count(lead: u8) -> u8 {
    if lead & 0xE0 == 0xC0 {
        1
    } else if lead & 0xF0 == 0xE0 {
        2
    } else {
        3
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct PendingSequence {
    bytes: [u8; 4],
    len: u8,
    remaining: u8,
}

impl PendingSequence {
    pub const fn new() -> Self {
        Self {
            bytes: [0; 4],
            len: 0,
            remaining: 0,
        }
    }

    /// Drops any collected bytes.
    pub fn clear(&mut self) {
        self.len = 0;
        self.remaining = 0;
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub const fn len(&self) -> usize {
        self.len as usize
    }

    pub const fn remaining(&self) -> usize {
        self.remaining as usize
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len()]
    }

    /// Opens a new sequence with `lead` and returns how many continuation
    /// bytes it expects.
    pub fn start(&mut self, lead: u8) -> u8 {
        debug_assert!(self.is_empty(), "sequence already in progress");
        self.bytes[0] = lead;
        self.len = 1;
        self.remaining = continuation_count(lead);
        self.remaining
    }

    /// Appends a continuation byte.
    ///
    /// Returns `true` once the last expected byte has been pushed; the caller
    /// then decodes [`as_bytes`](Self::as_bytes) and clears the sequence.
    pub fn push(&mut self, byte: u8) -> bool {
        debug_assert!(self.remaining > 0, "no continuation byte expected");
        self.bytes[self.len()] = byte;
        self.len += 1;
        self.remaining -= 1;
        self.remaining == 0
    }

    /// Combines the collected bytes into a code point, masking each byte to its
    /// payload bits without checking the marker bits.
    ///
    /// A lone lead byte decodes to zero; it is never asked for in practice
    /// because a sequence is only decoded once complete.
    pub fn code_point(&self) -> u32 {
        let b = |i: usize| u32::from(self.bytes[i]);
        match self.len {
            2 => ((b(0) & 0x1F) << 6) | (b(1) & 0x3F),
            3 => ((b(0) & 0x0F) << 12) | ((b(1) & 0x3F) << 6) | (b(2) & 0x3F),
            4 => {
                ((b(0) & 0x07) << 18)
                    | ((b(1) & 0x3F) << 12)
                    | ((b(2) & 0x3F) << 6)
                    | (b(3) & 0x3F)
            }
            _ => 0,
        }
    }
}

impl fmt::Debug for PendingSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingSequence")
            .field("bytes", &self.as_bytes().as_bstr())
            .field("remaining", &self.remaining)
            .finish()
    }
}
