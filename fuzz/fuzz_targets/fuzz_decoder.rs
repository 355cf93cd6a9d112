#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use ttymodem::{DecoderOptions, DisplaySink, StreamDecoder, Utf16Buffer};

#[derive(Debug, Arbitrary)]
struct Input<'a> {
    strict: bool,
    split_seed: u64,
    data: &'a [u8],
}

/// Cut `data` into chunks whose sizes come from a deterministic RNG. Chunks
/// deliberately ignore UTF-8 boundaries.
fn split_chunks(data: &[u8], split_seed: u64) -> Vec<&[u8]> {
    let mut rng = SmallRng::seed_from_u64(split_seed);
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < data.len() {
        let size = rng.random_range(1..=data.len() - start);
        chunks.push(&data[start..start + size]);
        start += size;
    }
    chunks
}

/// Arbitrary bytes: decoding is total, bounded and never panics.
fn check_total(input: &Input<'_>) {
    let options = if input.strict {
        DecoderOptions::strict()
    } else {
        DecoderOptions::default()
    };
    let mut decoder = StreamDecoder::with_options(options);
    for chunk in split_chunks(input.data, input.split_seed) {
        for item in decoder.try_feed(chunk) {
            match item {
                Ok(frag) => assert!(!frag.is_empty() && frag.len() <= 2),
                Err(_) => assert!(input.strict, "permissive decoding reported an error"),
            }
        }
        assert!(decoder.pending_len() <= 3);
    }
    let _ = decoder.finish();
}

/// The longest valid UTF-8 prefix decodes to exactly what `str::encode_utf16`
/// produces, in either mode.
fn check_valid_prefix(input: &Input<'_>) {
    let text = match std::str::from_utf8(input.data) {
        Ok(text) => text,
        Err(e) => std::str::from_utf8(&input.data[..e.valid_up_to()]).unwrap(),
    };

    for options in [DecoderOptions::default(), DecoderOptions::strict()] {
        let mut decoder = StreamDecoder::with_options(options);
        let mut out = Utf16Buffer::new();
        for chunk in split_chunks(text.as_bytes(), input.split_seed) {
            for frag in decoder.feed(chunk) {
                out.push_fragment(frag);
            }
        }
        let expected: Vec<u16> = text.encode_utf16().collect();
        assert_eq!(out.as_units(), expected.as_slice());
        assert!(decoder.finish().is_ok());
    }
}

fuzz_target!(|input: Input<'_>| {
    check_total(&input);
    check_valid_prefix(&input);
});
