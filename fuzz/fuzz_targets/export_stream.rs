//! Fuzz target for exporting arbitrary byte streams.
//!
//! Run with: cargo +nightly fuzz run export_stream
//!
//! Malformed archives must fail with an error, never panic, and never write
//! outside the destination.

#![no_main]

use std::io::Cursor;

use guitar::{ExportOptions, export_from_reader};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let dest = std::env::temp_dir().join(format!("guitar-fuzz-{}", std::process::id()));
    let _ = export_from_reader(Cursor::new(data), &dest, &ExportOptions::default());
    let _ = std::fs::remove_dir_all(&dest);
});
