// Licensed under the Apache-2.0 license

//! # OpenLog command protocol
//!
//! Each logical operation follows the same sequence:
//!
//! ```text
//! Idle ──► CommandReady-Wait ──► Sending ──► AwaitingResponse ──► Idle
//!              (handshake only)        └──────────────────────────► Idle
//!                                        (append, create, mkdir, cd, write, sync)
//! ```
//!
//! The wait polls `CMD_READY` every `poll_interval` and gives up with
//! [`Error::DeviceUnresponsive`] once `ready_timeout` has been spent. Response
//! bearing commands (size, read, remove, list) are followed by the reads the
//! device expects; no other command may be interleaved until they are done.
//!
//! # Thread Safety
//!
//! The handle is a single-owner value. The device keeps one command state
//! machine, so sharing a handle between execution contexts needs a mutex (or a
//! single owner task) around the whole handle, not around individual calls.

use crate::common::{Logger, NoOpLogger};
use crate::error::Error;
use crate::i2c::common::{is_seven_bit, BUS_BUFFER_LEN, MAX_PAYLOAD_LEN};
use crate::i2c::traits::RegisterAccess;
use crate::openlog::config::{OpenLogConfig, OverflowPolicy, MAX_ENTRY_LEN};
use crate::openlog::directory::{DirectoryEntry, DirectoryListing};
use crate::openlog::frame::{truncate_to_fit, CommandFrame};
use crate::openlog::registers::{self, Status, Version};
use crate::openlog::writer::LogWriter;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use heapless::Vec;

/// Handle for one Qwiic OpenLog on the bus.
pub struct OpenLog<I2C, D, L: Logger = NoOpLogger> {
    i2c: I2C,
    delay: D,
    config: OpenLogConfig,
    address: u8,
    search_active: bool,
    logger: L,
}

impl<I2C: I2c, D: DelayNs> OpenLog<I2C, D, NoOpLogger> {
    pub fn new(i2c: I2C, delay: D, config: OpenLogConfig) -> Self {
        Self::with_logger(i2c, delay, config, NoOpLogger)
    }
}

impl<I2C: I2c, D: DelayNs, L: Logger> OpenLog<I2C, D, L> {
    pub fn with_logger(i2c: I2C, delay: D, config: OpenLogConfig, logger: L) -> Self {
        Self {
            i2c,
            delay,
            address: config.address,
            config,
            search_active: false,
            logger,
        }
    }

    /// Address the handle currently talks to.
    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn config(&self) -> &OpenLogConfig {
        &self.config
    }

    pub fn logger(&self) -> &L {
        &self.logger
    }

    /// True between a successful `search_directory` and the end of its listing.
    pub fn is_search_active(&self) -> bool {
        self.search_active
    }

    /// Give the bus and delay back.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    /// Confirm the device answers and report its status.
    ///
    /// # Errors
    ///
    /// [`Error::Transport`] if nothing acknowledges at the configured address.
    pub fn begin(&mut self) -> Result<Status, Error<I2C::Error>> {
        let status = self.status()?;
        if !status.sd_init_good() {
            self.logger.warn(format_args!(
                "OpenLog 0x{:02X}: SD card not initialised (status 0x{:02X})",
                self.address,
                status.bits()
            ));
        }
        Ok(status)
    }

    /// Firmware version.
    ///
    /// # Errors
    ///
    /// [`Error::Transport`] on bus failure.
    pub fn version(&mut self) -> Result<Version, Error<I2C::Error>> {
        let major = self.i2c.read_register(self.address, registers::FW_MAJOR)?;
        let minor = self.i2c.read_register(self.address, registers::FW_MINOR)?;
        Ok(Version { major, minor })
    }

    /// Status register.
    ///
    /// Must not be called while another command still has response bytes
    /// queued (between `size`/`read`/`remove` and their reads, or mid-listing).
    ///
    /// # Errors
    ///
    /// [`Error::Transport`] on bus failure.
    pub fn status(&mut self) -> Result<Status, Error<I2C::Error>> {
        self.i2c
            .read_register(self.address, registers::STATUS)
            .map(Status::from_bits)
    }

    /// Move the device to a new address. The device stores it persistently;
    /// this handle follows once the command has been sent.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidAddress`] for addresses above `0x7F`, without bus
    /// traffic. Acceptance by the device is not verified.
    pub fn set_i2c_address(&mut self, new_address: u8) -> Result<(), Error<I2C::Error>> {
        if !is_seven_bit(new_address) {
            return Err(Error::InvalidAddress(new_address));
        }
        let frame =
            CommandFrame::with_payload::<I2C::Error>(registers::I2C_ADDRESS, &[new_address], &[])?;
        self.send_command(&frame)?;
        self.logger.debug(format_args!(
            "OpenLog moved from 0x{:02X} to 0x{:02X}",
            self.address, new_address
        ));
        self.address = new_address;
        Ok(())
    }

    /// Open `name` for appending, creating it if needed. Later writes go to it.
    ///
    /// # Errors
    ///
    /// [`Error::ArgumentTooLarge`] or [`Error::InvalidArgument`] for a bad
    /// name (no bus traffic), [`Error::DeviceUnresponsive`], [`Error::Transport`].
    pub fn append(&mut self, name: &str) -> Result<(), Error<I2C::Error>> {
        self.name_command(registers::OPEN_FILE, name)
    }

    /// Create `name` in the current directory.
    ///
    /// # Errors
    ///
    /// As for [`OpenLog::append`].
    pub fn create(&mut self, name: &str) -> Result<(), Error<I2C::Error>> {
        self.name_command(registers::CREATE_FILE, name)
    }

    /// # Errors
    ///
    /// As for [`OpenLog::append`].
    pub fn make_directory(&mut self, name: &str) -> Result<(), Error<I2C::Error>> {
        self.name_command(registers::MKDIR, name)
    }

    /// Change the working directory; `..` moves up one level.
    ///
    /// # Errors
    ///
    /// As for [`OpenLog::append`].
    pub fn change_directory(&mut self, name: &str) -> Result<(), Error<I2C::Error>> {
        self.name_command(registers::CD, name)
    }

    /// Size of `name` in bytes, or `None` if the device reports it missing.
    ///
    /// The device answers with a signed 32-bit big-endian value and uses `-1`
    /// for a missing file; an existing empty file is `Some(0)`.
    ///
    /// # Errors
    ///
    /// As for [`OpenLog::append`].
    pub fn size(&mut self, name: &str) -> Result<Option<u32>, Error<I2C::Error>> {
        self.name_command(registers::FILE_SIZE, name)?;
        let mut raw = [0u8; 4];
        self.i2c
            .read_register_region(self.address, registers::FILE_SIZE, &mut raw)?;
        let size = u32::from_be_bytes(raw);
        Ok((size != registers::SIZE_NOT_FOUND).then_some(size))
    }

    /// Fill `buffer` with the start of `name`.
    ///
    /// The device pads with zeros past the end of the file, so trailing zeros
    /// in `buffer` are indistinguishable from file content. Use
    /// [`OpenLog::read_file`] when the length matters.
    ///
    /// # Errors
    ///
    /// As for [`OpenLog::append`].
    pub fn read(&mut self, name: &str, buffer: &mut [u8]) -> Result<(), Error<I2C::Error>> {
        self.name_command(registers::READ_FILE, name)?;
        for (index, chunk) in buffer.chunks_mut(BUS_BUFFER_LEN).enumerate() {
            let register = if index > 0 && self.config.command_ready_handshake {
                registers::CONTINUE_READ
            } else {
                registers::READ_FILE
            };
            self.i2c.read_register_region(self.address, register, chunk)?;
        }
        Ok(())
    }

    /// Read `name` into `buffer` and return how many bytes are file content.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if the file does not exist, otherwise as for
    /// [`OpenLog::append`].
    pub fn read_file(&mut self, name: &str, buffer: &mut [u8]) -> Result<usize, Error<I2C::Error>> {
        let size = self.size(name)?.ok_or(Error::<I2C::Error>::NotFound)?;
        let len = usize::try_from(size).map_or(buffer.len(), |s| s.min(buffer.len()));
        match buffer.get_mut(..len) {
            Some(content) if !content.is_empty() => self.read(name, content)?,
            _ => {}
        }
        Ok(len)
    }

    /// Start a directory search. `pattern` uses the device's wildcard syntax
    /// (`*`, `?`); an empty pattern lists everything.
    ///
    /// # Errors
    ///
    /// As for [`OpenLog::append`]. On error no search is active.
    pub fn search_directory(&mut self, pattern: &str) -> Result<(), Error<I2C::Error>> {
        self.search_active = false;
        self.name_command(registers::LIST, pattern)?;
        self.search_active = true;
        Ok(())
    }

    /// Next name from the running search, or `None` at the end of the listing
    /// (and whenever no search is active). Empty records are skipped.
    ///
    /// # Errors
    ///
    /// [`Error::EntryTooLong`] if more than `max_entry_len` bytes arrive without
    /// a terminator, [`Error::MalformedEntry`] for non UTF-8 names,
    /// [`Error::Transport`] on bus failure. A transport error or an over-long
    /// entry ends the search.
    pub fn next_directory_item(&mut self) -> Result<Option<DirectoryEntry>, Error<I2C::Error>> {
        if !self.search_active {
            return Ok(None);
        }

        let max = self.config.max_entry_len;
        let mut name: Vec<u8, MAX_ENTRY_LEN> = Vec::new();
        // Empty records count against the bound so a stream of zeros ends.
        let mut skipped = 0usize;
        loop {
            let mut byte = [0u8; 1];
            if let Err(e) = self.i2c.read_stream(self.address, &mut byte) {
                self.search_active = false;
                return Err(e);
            }
            let [byte] = byte;

            if name.is_empty() && byte == registers::END_OF_LISTING {
                self.search_active = false;
                self.logger.debug(format_args!("OpenLog listing complete"));
                return Ok(None);
            }
            if byte == 0 && !name.is_empty() {
                return DirectoryEntry::from_bytes(&name).map(Some);
            }

            let overflow = if byte == 0 {
                skipped += 1;
                skipped > max
            } else {
                skipped + name.len() >= max || name.push(byte).is_err()
            };
            if overflow {
                self.search_active = false;
                self.logger.error(format_args!(
                    "OpenLog listing entry exceeds {max} bytes, search abandoned"
                ));
                return Err(Error::EntryTooLong { max });
            }
        }
    }

    /// Start a search and iterate over its entries.
    ///
    /// # Errors
    ///
    /// As for [`OpenLog::search_directory`].
    pub fn list(
        &mut self,
        pattern: &str,
    ) -> Result<DirectoryListing<'_, I2C, D, L>, Error<I2C::Error>> {
        self.search_directory(pattern)?;
        Ok(DirectoryListing::new(self))
    }

    /// Remove files matching `name`. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// As for [`OpenLog::append`].
    pub fn remove_file(&mut self, name: &str) -> Result<u32, Error<I2C::Error>> {
        self.remove(name, false)
    }

    /// Remove a directory and everything in it. The device counts a removed
    /// directory as one item regardless of its contents.
    ///
    /// # Errors
    ///
    /// As for [`OpenLog::append`].
    pub fn remove_directory(&mut self, name: &str) -> Result<u32, Error<I2C::Error>> {
        self.remove(name, true)
    }

    /// Remove `target`; with `recursive` directory contents go first.
    ///
    /// # Errors
    ///
    /// As for [`OpenLog::append`].
    pub fn remove(&mut self, target: &str, recursive: bool) -> Result<u32, Error<I2C::Error>> {
        let register = if recursive { registers::RMRF } else { registers::RM };
        self.name_command(register, target)?;
        let mut raw = [0u8; 4];
        self.i2c.read_stream(self.address, &mut raw)?;
        Ok(u32::from_be_bytes(raw))
    }

    /// Append one byte to the open file.
    ///
    /// # Errors
    ///
    /// [`Error::DeviceUnresponsive`], [`Error::Transport`].
    pub fn write_character(&mut self, byte: u8) -> Result<(), Error<I2C::Error>> {
        let frame = CommandFrame::with_payload::<I2C::Error>(registers::WRITE_FILE, &[byte], &[])?;
        self.send_command(&frame)
    }

    /// Append `text` and the configured terminator to the open file, in one
    /// transaction. Returns the number of text bytes sent.
    ///
    /// Text and terminator share the 31 byte payload. Longer text is rejected
    /// under [`OverflowPolicy::Reject`] and cut under
    /// [`OverflowPolicy::Truncate`]. Empty text sends nothing.
    ///
    /// # Errors
    ///
    /// [`Error::ArgumentTooLarge`] (no bus traffic), [`Error::DeviceUnresponsive`],
    /// [`Error::Transport`].
    pub fn write_string(&mut self, text: &str) -> Result<usize, Error<I2C::Error>> {
        if text.is_empty() {
            return Ok(0);
        }
        let terminator = self.config.write_terminator.bytes();
        let room = MAX_PAYLOAD_LEN - terminator.len();

        let text = if text.len() > room {
            match self.config.overflow_policy {
                OverflowPolicy::Reject => {
                    return Err(Error::ArgumentTooLarge {
                        len: text.len() + terminator.len(),
                        max: MAX_PAYLOAD_LEN,
                    });
                }
                OverflowPolicy::Truncate => {
                    let kept = truncate_to_fit(text, room);
                    self.logger.warn(format_args!(
                        "OpenLog write truncated from {} to {} bytes",
                        text.len(),
                        kept.len()
                    ));
                    kept
                }
            }
        } else {
            text
        };

        let frame = CommandFrame::with_payload::<I2C::Error>(
            registers::WRITE_FILE,
            text.as_bytes(),
            terminator,
        )?;
        self.send_command(&frame)?;
        Ok(text.len())
    }

    /// Append up to one payload of raw bytes, without terminator. Returns the
    /// number of bytes taken from `data`.
    ///
    /// # Errors
    ///
    /// [`Error::DeviceUnresponsive`], [`Error::Transport`].
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<usize, Error<I2C::Error>> {
        let chunk = data.get(..MAX_PAYLOAD_LEN).unwrap_or(data);
        if chunk.is_empty() {
            return Ok(0);
        }
        let frame = CommandFrame::with_payload::<I2C::Error>(registers::WRITE_FILE, chunk, &[])?;
        self.send_command(&frame)?;
        Ok(chunk.len())
    }

    /// Flush the open file to the card.
    ///
    /// # Errors
    ///
    /// [`Error::DeviceUnresponsive`], [`Error::Transport`].
    pub fn sync_file(&mut self) -> Result<(), Error<I2C::Error>> {
        self.send_command(&CommandFrame::bare::<I2C::Error>(registers::SYNC_FILE)?)
    }

    /// `embedded_io::Write` view of the open file.
    pub fn writer(&mut self) -> LogWriter<'_, I2C, D, L> {
        LogWriter::new(self)
    }

    fn name_command(&mut self, register: u8, name: &str) -> Result<(), Error<I2C::Error>> {
        let frame = CommandFrame::with_name::<I2C::Error>(register, name)?;
        self.send_command(&frame)
    }

    fn send_command(&mut self, frame: &CommandFrame) -> Result<(), Error<I2C::Error>> {
        self.wait_for_ready()?;
        self.logger.debug(format_args!(
            "OpenLog 0x{:02X} <- {:02X?}",
            self.address,
            &frame[..]
        ));
        self.i2c.write_frame(self.address, frame)
    }

    fn wait_for_ready(&mut self) -> Result<(), Error<I2C::Error>> {
        if !self.config.command_ready_handshake {
            return Ok(());
        }

        let limit = self.config.ready_poll_limit();
        let interval_ms = self.config.poll_interval.to_millis();
        for attempt in 1..=limit {
            if self.i2c.read_register(self.address, registers::CMD_READY)? != 0 {
                return Ok(());
            }
            if attempt < limit {
                self.delay.delay_ms(interval_ms);
            }
        }

        self.logger.error(format_args!(
            "OpenLog 0x{:02X} not ready after {} polls",
            self.address, limit
        ));
        Err(Error::DeviceUnresponsive)
    }
}
