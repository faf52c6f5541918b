// Licensed under the Apache-2.0 license

use crate::common::Logger;
use crate::error::Error;
use crate::openlog::device::OpenLog;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

/// Byte sink over the currently open file.
///
/// Each `write` sends at most one payload (31 bytes) without terminator, so
/// `write_all` and `write!` split longer data over several frames. `flush`
/// syncs the file to the card.
pub struct LogWriter<'a, I2C, D, L: Logger> {
    log: &'a mut OpenLog<I2C, D, L>,
}

impl<'a, I2C, D, L: Logger> LogWriter<'a, I2C, D, L> {
    pub(crate) fn new(log: &'a mut OpenLog<I2C, D, L>) -> Self {
        Self { log }
    }
}

impl<I2C: I2c, D: DelayNs, L: Logger> embedded_io::ErrorType for LogWriter<'_, I2C, D, L> {
    type Error = Error<I2C::Error>;
}

impl<I2C: I2c, D: DelayNs, L: Logger> embedded_io::Write for LogWriter<'_, I2C, D, L> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.log.write_bytes(buf)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.log.sync_file()
    }
}
