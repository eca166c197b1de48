//! Fuzz target for the decimal-digit mode convention.
//!
//! Run with: cargo +nightly fuzz run mode_digits

#![no_main]

use guitar::format::mode::{MAX_MODE, decode_mode, encode_mode};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|digits: i64| {
    if let Ok(mode) = decode_mode(digits) {
        assert!(mode <= MAX_MODE);
        assert_eq!(encode_mode(mode), Ok(digits));
    }
});
