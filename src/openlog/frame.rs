// Licensed under the Apache-2.0 license

//! Command frames: `[register][argument bytes...][terminator]`.
//!
//! There is no length prefix; the device takes the length from the I2C
//! transaction. A frame therefore has to fit the device receive buffer in one
//! piece, and every constructor enforces that before any bus traffic happens.

use crate::error::Error;
use crate::i2c::common::{BUS_BUFFER_LEN, MAX_PAYLOAD_LEN};
use core::ops::Deref;
use heapless::Vec;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandFrame {
    bytes: Vec<u8, BUS_BUFFER_LEN>,
}

impl CommandFrame {
    /// Frame carrying a name, path or wildcard pattern.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `argument` contains a NUL byte,
    /// [`Error::ArgumentTooLarge`] if it exceeds the payload ceiling.
    pub fn with_name<E>(register: u8, argument: &str) -> Result<Self, Error<E>> {
        if argument.bytes().any(|b| b == 0) {
            return Err(Error::InvalidArgument);
        }
        Self::with_payload(register, argument.as_bytes(), &[])
    }

    /// Frame carrying raw payload bytes followed by `terminator`.
    ///
    /// # Errors
    ///
    /// [`Error::ArgumentTooLarge`] if payload and terminator together exceed
    /// the payload ceiling.
    pub fn with_payload<E>(
        register: u8,
        payload: &[u8],
        terminator: &[u8],
    ) -> Result<Self, Error<E>> {
        let len = payload.len() + terminator.len();
        let too_large = || Error::ArgumentTooLarge {
            len,
            max: MAX_PAYLOAD_LEN,
        };
        if len > MAX_PAYLOAD_LEN {
            return Err(too_large());
        }

        let mut bytes = Vec::new();
        bytes.push(register).map_err(|_| too_large())?;
        bytes.extend_from_slice(payload).map_err(|()| too_large())?;
        bytes.extend_from_slice(terminator).map_err(|()| too_large())?;
        Ok(Self { bytes })
    }

    /// Frame that is just the register byte.
    ///
    /// # Errors
    ///
    /// Never for a single byte; built through [`CommandFrame::with_payload`].
    pub fn bare<E>(register: u8) -> Result<Self, Error<E>> {
        Self::with_payload(register, &[], &[])
    }

    #[must_use]
    pub fn register(&self) -> Option<u8> {
        self.bytes.first().copied()
    }

    #[must_use]
    pub fn argument(&self) -> &[u8] {
        self.bytes.get(1..).unwrap_or(&[])
    }
}

impl Deref for CommandFrame {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Longest prefix of `text` that fits in `max` bytes without splitting a
/// UTF-8 sequence.
#[must_use]
pub fn truncate_to_fit(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.get(..end).unwrap_or("")
}
