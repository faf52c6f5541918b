// Licensed under the Apache-2.0 license

//! RV-3028-C7 register map (subset used by the driver).

pub const DEFAULT_ADDRESS: u8 = 0x52;

pub const SECONDS: u8 = 0x00;
pub const HOURS: u8 = 0x02;
pub const YEAR: u8 = 0x06;

pub const MINUTES_ALARM: u8 = 0x07;
pub const HOURS_ALARM: u8 = 0x08;
pub const DATE_ALARM: u8 = 0x09;

pub const STATUS: u8 = 0x0E;
pub const CTRL1: u8 = 0x0F;
pub const CTRL2: u8 = 0x10;

/// Length of the SECONDS..=YEAR block.
pub const TIME_BLOCK_LEN: usize = 7;

/// Alarm register bit 7: set means the field takes no part in matching.
pub const ALARM_DISABLE: u8 = 1 << 7;

/// STATUS: alarm flag.
pub const STATUS_AF: u8 = 1 << 2;
/// CTRL1: alarm day register holds a date (set) or a weekday (clear).
pub const CTRL1_WADA: u8 = 1 << 5;
/// CTRL2: alarm interrupt enable.
pub const CTRL2_AIE: u8 = 1 << 3;
/// CTRL2: 12-hour mode.
pub const CTRL2_12_24: u8 = 1 << 1;

/// HOURS in 12-hour mode: PM flag.
pub const HOURS_PM: u8 = 1 << 5;
/// HOURS in 12-hour mode: BCD hour 1..=12.
pub const HOURS_12_MASK: u8 = 0x1F;
/// HOURS in 24-hour mode: BCD hour 0..=23.
pub const HOURS_24_MASK: u8 = 0x3F;
