// Licensed under the Apache-2.0 license

//! Bus-level constants and address helpers shared by every device driver.

/// Receive buffer of the device side of the bus, per transaction.
pub const BUS_BUFFER_LEN: usize = 32;

/// Payload that fits after the register byte in one transaction.
pub const MAX_PAYLOAD_LEN: usize = BUS_BUFFER_LEN - 1;

/// Highest 7-bit address.
pub const MAX_SEVEN_BIT_ADDRESS: u8 = 0x7F;

/// Returns `true` if `addr` can be placed on the bus as a 7-bit address.
#[must_use]
pub const fn is_seven_bit(addr: u8) -> bool {
    addr <= MAX_SEVEN_BIT_ADDRESS
}
