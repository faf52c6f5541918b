// Licensed under the Apache-2.0 license

//! Packed binary-coded decimal, two digits per byte.

/// `0x59` -> `59`. Nibbles above 9 are not rejected.
#[must_use]
pub const fn bcd_to_dec(bcd: u8) -> u8 {
    (bcd >> 4) * 10 + (bcd & 0x0F)
}

/// `59` -> `0x59`. Only meaningful for `0..=99`.
#[must_use]
pub const fn dec_to_bcd(dec: u8) -> u8 {
    ((dec / 10) << 4) | (dec % 10)
}
