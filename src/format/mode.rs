//! The decimal-digits-of-octal mode convention.
//!
//! Sidecar records store permission bits so that the stored integer, read as
//! decimal, spells the octal mode: `0o644` is stored as `644` and `0o4755` as
//! `4755`. This keeps the JSON readable without a string field.
//!
//! ```rust
//! use guitar::format::mode::{decode_mode, encode_mode};
//!
//! assert_eq!(encode_mode(0o755), Ok(755));
//! assert_eq!(decode_mode(755), Ok(0o755));
//! ```

use crate::error::ModeFault;

/// The largest mode a ustar mode field (seven octal digits) can carry.
pub const MAX_MODE: u32 = 0o7777777;

/// Converts a native mode to its decimal-digit form.
pub fn encode_mode(mode: u32) -> Result<i64, ModeFault> {
    if mode > MAX_MODE {
        return Err(ModeFault::OutOfRange);
    }

    let mut remaining = mode;
    let mut digits: i64 = 0;
    let mut place: i64 = 1;
    while remaining > 0 {
        digits += i64::from(remaining & 0o7) * place;
        remaining >>= 3;
        place *= 10;
    }
    Ok(digits)
}

/// Converts a decimal-digit mode back to the native value.
pub fn decode_mode(digits: i64) -> Result<u32, ModeFault> {
    if digits < 0 {
        return Err(ModeFault::Negative);
    }

    let mut remaining = digits;
    let mut mode: u64 = 0;
    let mut shift = 0;
    while remaining > 0 {
        let digit = remaining % 10;
        if digit > 7 {
            return Err(ModeFault::NonOctalDigit);
        }
        // Seven octal digits fill 21 bits; anything beyond is out of range.
        if shift > 18 {
            return Err(ModeFault::OutOfRange);
        }
        mode |= (digit as u64) << shift;
        remaining /= 10;
        shift += 3;
    }

    u32::try_from(mode)
        .ok()
        .filter(|m| *m <= MAX_MODE)
        .ok_or(ModeFault::OutOfRange)
}
