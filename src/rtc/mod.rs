// Licensed under the Apache-2.0 license

//! Driver for the RV-3028 real-time clock found next to later OpenLog
//! revisions.

pub mod bcd;
pub mod device;
pub mod registers;
pub mod time;

pub use device::{Alarm, AlarmDay, Rv3028};
pub use time::{DateTime, TimeRegisters};
