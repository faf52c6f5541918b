// Licensed under the Apache-2.0 license

//! # Register Access Layer
//!
//! Register-style access on top of any `embedded_hal::i2c::I2c` bus. A
//! transaction is one register-offset byte, optionally followed by payload
//! bytes, against a 7-bit device address:
//!
//! ```text
//! write:        [S] addr+W  offset  payload...            [P]
//! read:         [S] addr+W  offset  [Sr] addr+R  data...  [P]
//! stream read:  [S] addr+R  data...                       [P]
//! ```
//!
//! Every call is one blocking bus transaction. Nothing is buffered and nothing
//! is retried; bus failures surface as [`Error::Transport`].

use crate::error::Error;
use crate::i2c::common::{BUS_BUFFER_LEN, MAX_PAYLOAD_LEN};
use embedded_hal::i2c::{ErrorType, I2c, SevenBitAddress};
use heapless::Vec;

/// Register-level operations against a device on the bus.
///
/// Implemented for every `embedded_hal::i2c::I2c`, including `&mut I2C`, so a
/// bus can be lent to a driver without giving up ownership.
///
/// # Examples
///
/// ```rust,no_run
/// use qwiic_openlog::i2c::RegisterAccess;
/// use qwiic_openlog::Error;
///
/// fn firmware_major<B: RegisterAccess>(bus: &mut B) -> Result<u8, Error<B::Error>> {
///     bus.read_register(0x2A, 0x03)
/// }
/// ```
pub trait RegisterAccess: ErrorType {
    /// Read a single register.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the bus transaction fails.
    fn read_register(&mut self, address: SevenBitAddress, offset: u8)
        -> Result<u8, Error<Self::Error>>;

    /// Read `buffer.len()` contiguous registers starting at `offset`.
    ///
    /// The length is taken from the destination slice, so the destination is
    /// always large enough. Keeping the length within what the device can
    /// serve in one transaction is the caller's responsibility.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the bus transaction fails.
    fn read_register_region(
        &mut self,
        address: SevenBitAddress,
        offset: u8,
        buffer: &mut [u8],
    ) -> Result<(), Error<Self::Error>>;

    /// Write a single register.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the bus transaction fails.
    fn write_register(
        &mut self,
        address: SevenBitAddress,
        offset: u8,
        value: u8,
    ) -> Result<(), Error<Self::Error>>;

    /// Write contiguous registers starting at `offset` in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArgumentTooLarge`] without touching the bus if
    /// `values` exceeds [`MAX_PAYLOAD_LEN`], and [`Error::Transport`] if the
    /// bus transaction fails.
    fn write_multiple_registers(
        &mut self,
        address: SevenBitAddress,
        offset: u8,
        values: &[u8],
    ) -> Result<(), Error<Self::Error>>;

    /// Read bytes the device has queued, without addressing a register first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the bus transaction fails.
    fn read_stream(
        &mut self,
        address: SevenBitAddress,
        buffer: &mut [u8],
    ) -> Result<(), Error<Self::Error>>;

    /// Write an already framed transaction (register byte included).
    ///
    /// # Errors
    ///
    /// Returns [`Error::ArgumentTooLarge`] without touching the bus if `frame`
    /// exceeds [`BUS_BUFFER_LEN`], and [`Error::Transport`] if the bus
    /// transaction fails.
    fn write_frame(&mut self, address: SevenBitAddress, frame: &[u8])
        -> Result<(), Error<Self::Error>>;
}

impl<T: I2c> RegisterAccess for T {
    fn read_register(
        &mut self,
        address: SevenBitAddress,
        offset: u8,
    ) -> Result<u8, Error<Self::Error>> {
        let mut value = [0u8; 1];
        self.write_read(address, &[offset], &mut value)
            .map_err(Error::Transport)?;
        let [byte] = value;
        Ok(byte)
    }

    fn read_register_region(
        &mut self,
        address: SevenBitAddress,
        offset: u8,
        buffer: &mut [u8],
    ) -> Result<(), Error<Self::Error>> {
        self.write_read(address, &[offset], buffer)
            .map_err(Error::Transport)
    }

    fn write_register(
        &mut self,
        address: SevenBitAddress,
        offset: u8,
        value: u8,
    ) -> Result<(), Error<Self::Error>> {
        self.write(address, &[offset, value])
            .map_err(Error::Transport)
    }

    fn write_multiple_registers(
        &mut self,
        address: SevenBitAddress,
        offset: u8,
        values: &[u8],
    ) -> Result<(), Error<Self::Error>> {
        let too_large = || Error::ArgumentTooLarge {
            len: values.len(),
            max: MAX_PAYLOAD_LEN,
        };
        if values.len() > MAX_PAYLOAD_LEN {
            return Err(too_large());
        }

        let mut frame: Vec<u8, BUS_BUFFER_LEN> = Vec::new();
        frame.push(offset).map_err(|_| too_large())?;
        frame.extend_from_slice(values).map_err(|()| too_large())?;
        self.write(address, &frame).map_err(Error::Transport)
    }

    fn read_stream(
        &mut self,
        address: SevenBitAddress,
        buffer: &mut [u8],
    ) -> Result<(), Error<Self::Error>> {
        self.read(address, buffer).map_err(Error::Transport)
    }

    fn write_frame(
        &mut self,
        address: SevenBitAddress,
        frame: &[u8],
    ) -> Result<(), Error<Self::Error>> {
        if frame.len() > BUS_BUFFER_LEN {
            return Err(Error::ArgumentTooLarge {
                len: frame.len(),
                max: BUS_BUFFER_LEN,
            });
        }
        self.write(address, frame).map_err(Error::Transport)
    }
}
