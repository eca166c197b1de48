//! Fuzz target for decoding a single sidecar line.
//!
//! Run with: cargo +nightly fuzz run sidecar_line
//!
//! Properties checked:
//! - Decoding never panics
//! - A decoded header encodes to a line that decodes to the same header

#![no_main]

use guitar::format::sidecar::{decode_line, encode_line};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(header) = decode_line(text, 1) {
        let line = encode_line(&header).expect("decoded header must encode");
        let again = decode_line(&line, 1).expect("encoded line must decode");
        assert_eq!(again, header);
    }
});
