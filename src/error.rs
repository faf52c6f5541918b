// Licensed under the Apache-2.0 license

//! Error type shared by the register, command and RTC layers.

use core::fmt::{self, Debug, Display};
use embedded_hal::i2c::ErrorKind;

/// Driver error, generic over the bus error `E`.
///
/// Bus failures are kept intact in [`Error::Transport`]; every other variant is
/// a logical failure detected by the driver itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// The underlying I2C transaction failed (NACK, arbitration loss, ...).
    Transport(E),
    /// The command-ready register never reported ready within the timeout.
    DeviceUnresponsive,
    /// The argument does not fit in one bus transaction.
    ArgumentTooLarge { len: usize, max: usize },
    /// The argument contains a byte the device cannot accept (embedded NUL).
    InvalidArgument,
    /// Not a 7-bit I2C address.
    InvalidAddress(u8),
    /// The device reported that the file does not exist.
    NotFound,
    /// A directory entry exceeded the configured length without a terminator.
    EntryTooLong { max: usize },
    /// A directory entry was not valid UTF-8.
    MalformedEntry,
    /// A time or date field is out of range, or a timestamp failed to parse.
    InvalidTime,
}

impl<E> Error<E> {
    /// True when the failure came from the bus rather than from the driver.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }
}

impl<E: Debug> Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Transport(e) => write!(f, "bus transaction failed: {e:?}"),
            Error::DeviceUnresponsive => f.write_str("device did not become ready"),
            Error::ArgumentTooLarge { len, max } => {
                write!(f, "argument of {len} bytes exceeds the {max} byte limit")
            }
            Error::InvalidArgument => f.write_str("argument contains a NUL byte"),
            Error::InvalidAddress(addr) => write!(f, "0x{addr:02X} is not a 7-bit address"),
            Error::NotFound => f.write_str("file not found"),
            Error::EntryTooLong { max } => {
                write!(f, "directory entry longer than {max} bytes")
            }
            Error::MalformedEntry => f.write_str("directory entry is not valid UTF-8"),
            Error::InvalidTime => f.write_str("invalid time or date"),
        }
    }
}

impl<E: embedded_hal::i2c::Error> embedded_hal::i2c::Error for Error<E> {
    fn kind(&self) -> ErrorKind {
        match self {
            Error::Transport(e) => e.kind(),
            _ => ErrorKind::Other,
        }
    }
}

impl<E: Debug> embedded_io::Error for Error<E> {
    fn kind(&self) -> embedded_io::ErrorKind {
        embedded_io::ErrorKind::Other
    }
}

#[cfg(feature = "std")]
impl<E: Debug> std::error::Error for Error<E> {}
