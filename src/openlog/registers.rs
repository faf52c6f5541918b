// Licensed under the Apache-2.0 license

//! Qwiic OpenLog register map and the decoded status/version registers.

use core::fmt;

/// Factory default 7-bit address.
pub const DEFAULT_ADDRESS: u8 = 0x2A;

pub const STATUS: u8 = 0x01;
pub const FW_MINOR: u8 = 0x02;
pub const FW_MAJOR: u8 = 0x03;
pub const CREATE_FILE: u8 = 0x06;
pub const MKDIR: u8 = 0x07;
pub const CD: u8 = 0x08;
pub const READ_FILE: u8 = 0x09;
pub const OPEN_FILE: u8 = 0x0B;
pub const WRITE_FILE: u8 = 0x0C;
pub const FILE_SIZE: u8 = 0x0D;
pub const LIST: u8 = 0x0E;
pub const RM: u8 = 0x0F;
pub const RMRF: u8 = 0x10;
pub const SYNC_FILE: u8 = 0x11;
pub const CMD_READY: u8 = 0x12;
pub const CONTINUE_READ: u8 = 0x13;
pub const I2C_ADDRESS: u8 = 0x1E;

/// Byte that opens the end-of-listing marker in a directory listing.
pub const END_OF_LISTING: u8 = 0xFF;

/// Size reported by the device for a file that does not exist (`-1`).
pub const SIZE_NOT_FOUND: u32 = 0xFFFF_FFFF;

/// Contents of the status register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Status(u8);

impl Status {
    pub const SD_INIT_GOOD: u8 = 1 << 0;
    pub const LAST_COMMAND_SUCCESS: u8 = 1 << 1;
    pub const LAST_COMMAND_KNOWN: u8 = 1 << 2;
    pub const FILE_OPEN: u8 = 1 << 3;
    pub const IN_ROOT_DIRECTORY: u8 = 1 << 4;

    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn sd_init_good(self) -> bool {
        self.0 & Self::SD_INIT_GOOD != 0
    }

    #[must_use]
    pub const fn last_command_succeeded(self) -> bool {
        self.0 & Self::LAST_COMMAND_SUCCESS != 0
    }

    #[must_use]
    pub const fn last_command_known(self) -> bool {
        self.0 & Self::LAST_COMMAND_KNOWN != 0
    }

    #[must_use]
    pub const fn file_open(self) -> bool {
        self.0 & Self::FILE_OPEN != 0
    }

    #[must_use]
    pub const fn in_root_directory(self) -> bool {
        self.0 & Self::IN_ROOT_DIRECTORY != 0
    }
}

/// Firmware version, `major.minor`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
}

impl From<Version> for u16 {
    fn from(v: Version) -> u16 {
        u16::from_be_bytes([v.major, v.minor])
    }
}

impl From<u16> for Version {
    fn from(raw: u16) -> Self {
        let [major, minor] = raw.to_be_bytes();
        Self { major, minor }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
