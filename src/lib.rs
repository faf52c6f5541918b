// Licensed under the Apache-2.0 license

//! Drivers for the SparkFun Qwiic OpenLog and its companion RV-3028 RTC over
//! `embedded-hal` I2C.
//!
//! ```rust,no_run
//! # fn demo<I2C: embedded_hal::i2c::I2c, D: embedded_hal::delay::DelayNs>(i2c: I2C, delay: D)
//! # -> Result<(), qwiic_openlog::Error<I2C::Error>> {
//! use qwiic_openlog::openlog::{OpenLog, OpenLogConfig};
//!
//! let mut log = OpenLog::new(i2c, delay, OpenLogConfig::default());
//! log.begin()?;
//! log.append("LOG.TXT")?;
//! log.write_string("boot ok")?;
//! log.sync_file()?;
//! # Ok(())
//! # }
//! ```

// Enforce Copilot coding guidelines - prevent panic-prone patterns in production code only
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::indexing_slicing))]
#![cfg_attr(not(test), warn(clippy::expect_used))]
#![cfg_attr(not(test), no_std)]

#[cfg(all(feature = "std", not(test)))]
extern crate std;

pub mod common;
pub mod error;
pub mod i2c;
pub mod openlog;
pub mod rtc;
pub mod tests;

#[cfg(test)]
mod sim;

pub use common::{Logger, NoOpLogger, SerialLogger};
pub use error::Error;
pub use openlog::{OpenLog, OpenLogConfig};
pub use rtc::Rv3028;
