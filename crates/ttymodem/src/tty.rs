//! Per-character output hooks.
//!
//! A [`TtyStream`] is what a host installs as the "write one character"
//! callback of an output device: every byte the program writes goes through
//! its own decoder and lands in a display as soon as it completes a character.
//! [`Console`] pairs a standard output and a standard error stream that share
//! one display, each with a private decoder.

use crate::{DecoderOptions, DisplaySink, Fragment, StreamDecoder};

/// Decoder plus the display it writes into.
#[derive(Debug, Clone, Default)]
pub struct TtyStream<S> {
    decoder: StreamDecoder,
    sink: S,
}

impl<S: DisplaySink> TtyStream<S> {
    /// Wraps `sink` with a fresh permissive decoder.
    #[must_use]
    pub fn new(sink: S) -> Self {
        Self::with_options(sink, DecoderOptions::default())
    }

    /// Wraps `sink` with a fresh decoder using `options`.
    #[must_use]
    pub fn with_options(sink: S, options: DecoderOptions) -> Self {
        Self {
            decoder: StreamDecoder::with_options(options),
            sink,
        }
    }

    /// Decodes `byte` and appends the result, if any, to the display.
    ///
    /// Returns the fragment that was appended (empty if none).
    pub fn put_char(&mut self, byte: u8) -> Fragment {
        let fragment = self.decoder.decode_byte(byte);
        if !fragment.is_empty() {
            self.sink.push_fragment(fragment);
        }
        fragment
    }

    /// Like [`put_char`](Self::put_char) for a byte delivered as a wider
    /// integer; only the low eight bits are used.
    pub fn put_code(&mut self, value: u32) -> Fragment {
        let fragment = self.decoder.decode_code(value);
        if !fragment.is_empty() {
            self.sink.push_fragment(fragment);
        }
        fragment
    }

    /// Writes every byte of `bytes` in order.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for fragment in self.decoder.feed(bytes) {
            self.sink.push_fragment(fragment);
        }
    }

    /// The decoder's state, for inspection.
    #[must_use]
    pub fn decoder(&self) -> &StreamDecoder {
        &self.decoder
    }

    /// The display written so far.
    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access to the display.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Splits the stream into its decoder and display.
    #[must_use]
    pub fn into_parts(self) -> (StreamDecoder, S) {
        (self.decoder, self.sink)
    }
}

#[cfg(feature = "std")]
impl<S: DisplaySink> std::io::Write for TtyStream<S> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.write_bytes(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// One of the two output streams of a [`Console`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StreamId {
    /// Standard output, descriptor 1.
    Stdout,
    /// Standard error, descriptor 2.
    Stderr,
}

impl StreamId {
    /// Maps a file descriptor to a stream; only 1 and 2 are console streams.
    #[must_use]
    pub fn from_fd(fd: u32) -> Option<Self> {
        match fd {
            1 => Some(Self::Stdout),
            2 => Some(Self::Stderr),
            _ => None,
        }
    }

    /// The file descriptor of this stream.
    #[must_use]
    pub fn fd(self) -> u32 {
        match self {
            Self::Stdout => 1,
            Self::Stderr => 2,
        }
    }
}

/// Standard output and standard error feeding a single display.
///
/// Each stream owns its decoder, so a character split across writes on one
/// stream is never corrupted by bytes arriving on the other.
///
/// ```rust
/// use ttymodem::{Console, StreamId, Utf16Buffer};
///
/// let mut console = Console::new(Utf16Buffer::new());
/// console.write(StreamId::Stdout, &[0xE2, 0x82]);
/// console.write(StreamId::Stderr, b"!");
/// console.write(StreamId::Stdout, &[0xAC]);
/// assert_eq!(console.display().to_string_lossy(), "!€");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Console<S> {
    stdout: StreamDecoder,
    stderr: StreamDecoder,
    display: S,
}

impl<S: DisplaySink> Console<S> {
    /// Creates a console with permissive decoders.
    #[must_use]
    pub fn new(display: S) -> Self {
        Self::with_options(display, DecoderOptions::default())
    }

    /// Creates a console whose two decoders use `options`.
    #[must_use]
    pub fn with_options(display: S, options: DecoderOptions) -> Self {
        Self {
            stdout: StreamDecoder::with_options(options),
            stderr: StreamDecoder::with_options(options),
            display,
        }
    }

    /// Decodes one byte written to `stream` and appends any completed
    /// character to the display.
    pub fn put_char(&mut self, stream: StreamId, byte: u8) -> Fragment {
        let fragment = self.decoder_mut(stream).decode_byte(byte);
        if !fragment.is_empty() {
            self.display.push_fragment(fragment);
        }
        fragment
    }

    /// Writes `bytes` to `stream` one at a time.
    pub fn write(&mut self, stream: StreamId, bytes: &[u8]) {
        let decoder = match stream {
            StreamId::Stdout => &mut self.stdout,
            StreamId::Stderr => &mut self.stderr,
        };
        for fragment in decoder.feed(bytes) {
            self.display.push_fragment(fragment);
        }
    }

    /// Empties the display before a new run.
    ///
    /// Decoder state is kept: a sequence left open by the previous run
    /// continues with the next byte on that stream.
    pub fn clear(&mut self) {
        self.display.clear();
    }

    /// The decoder of `stream`.
    #[must_use]
    pub fn decoder(&self, stream: StreamId) -> &StreamDecoder {
        match stream {
            StreamId::Stdout => &self.stdout,
            StreamId::Stderr => &self.stderr,
        }
    }

    fn decoder_mut(&mut self, stream: StreamId) -> &mut StreamDecoder {
        match stream {
            StreamId::Stdout => &mut self.stdout,
            StreamId::Stderr => &mut self.stderr,
        }
    }

    /// The shared display.
    #[must_use]
    pub fn display(&self) -> &S {
        &self.display
    }

    /// Consumes the console, returning the display.
    #[must_use]
    pub fn into_display(self) -> S {
        self.display
    }
}
