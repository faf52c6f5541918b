// Licensed under the Apache-2.0 license

//! Register access over an `embedded-hal` I2C bus.
//!
//! This is the leaf layer of the crate: fixed-size register reads and writes,
//! unaddressed stream reads, and pre-framed writes, all bounded by the 32-byte
//! transaction buffer of the devices this crate drives.

pub mod common;
pub mod traits;

pub use common::{is_seven_bit, BUS_BUFFER_LEN, MAX_PAYLOAD_LEN, MAX_SEVEN_BIT_ADDRESS};
pub use traits::RegisterAccess;
