// Licensed under the Apache-2.0 license

//! Directory listings.
//!
//! After a `LIST` command the device serves the matching names one byte per
//! read: each name ends with NUL, directories carry a trailing `/`, and a
//! first byte of `0xFF` marks the end of the listing.

use crate::common::Logger;
use crate::error::Error;
use crate::openlog::config::MAX_ENTRY_LEN;
use crate::openlog::device::OpenLog;
use core::fmt;
use core::ops::Deref;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use heapless::String;

/// One name returned by a directory search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectoryEntry {
    name: String<MAX_ENTRY_LEN>,
}

impl DirectoryEntry {
    pub(crate) fn from_bytes<E>(bytes: &[u8]) -> Result<Self, Error<E>> {
        let text = core::str::from_utf8(bytes).map_err(|_| Error::<E>::MalformedEntry)?;
        let mut name = String::new();
        name.push_str(text)
            .map_err(|()| Error::<E>::EntryTooLong { max: MAX_ENTRY_LEN })?;
        Ok(Self { name })
    }

    /// Name as reported by the device, including any trailing `/`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.name.ends_with('/')
    }

    /// Name without the directory marker.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.strip_suffix('/').unwrap_or(&self.name)
    }
}

impl Deref for DirectoryEntry {
    type Target = str;

    fn deref(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for DirectoryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Iterator over a running directory search.
///
/// Created by [`OpenLog::list`]. Yields entries until the device reports the
/// end of the listing; after an error it yields that error once and stops.
pub struct DirectoryListing<'a, I2C, D, L: Logger> {
    log: &'a mut OpenLog<I2C, D, L>,
    finished: bool,
}

impl<'a, I2C, D, L: Logger> DirectoryListing<'a, I2C, D, L> {
    pub(crate) fn new(log: &'a mut OpenLog<I2C, D, L>) -> Self {
        Self {
            log,
            finished: false,
        }
    }
}

impl<I2C: I2c, D: DelayNs, L: Logger> Iterator for DirectoryListing<'_, I2C, D, L> {
    type Item = Result<DirectoryEntry, Error<I2C::Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.log.next_directory_item() {
            Ok(Some(entry)) => Some(Ok(entry)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
