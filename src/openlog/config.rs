// Licensed under the Apache-2.0 license

//! Protocol options for the OpenLog command layer.
//!
//! Firmware revisions of the OpenLog differ in whether they expose a
//! command-ready register and in how text writes are terminated. One
//! [`OpenLogConfig`] covers all of them instead of one driver per revision.

use crate::openlog::registers::DEFAULT_ADDRESS;
use fugit::MillisDurationU32;

/// Longest directory entry the driver will buffer.
pub const MAX_ENTRY_LEN: usize = 255;

/// Bytes appended after every `write_string` payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum WriteTerminator {
    None,
    CarriageReturn,
}

impl WriteTerminator {
    #[must_use]
    pub const fn bytes(self) -> &'static [u8] {
        match self {
            WriteTerminator::None => &[],
            WriteTerminator::CarriageReturn => b"\r",
        }
    }
}

/// What `write_string` does with text that does not fit in one transaction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Fail with `ArgumentTooLarge` before touching the bus.
    Reject,
    /// Send as much as fits and drop the rest.
    Truncate,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OpenLogConfig {
    pub address: u8,
    pub command_ready_handshake: bool,
    pub write_terminator: WriteTerminator,
    pub overflow_policy: OverflowPolicy,
    pub poll_interval: MillisDurationU32,
    pub ready_timeout: MillisDurationU32,
    pub max_entry_len: usize,
}

impl Default for OpenLogConfig {
    fn default() -> Self {
        OpenLogConfigBuilder::new().build()
    }
}

impl OpenLogConfig {
    /// Number of command-ready polls before giving up. Always at least one.
    #[must_use]
    pub fn ready_poll_limit(&self) -> u32 {
        let interval = self.poll_interval.to_millis().max(1);
        self.ready_timeout.to_millis().div_ceil(interval).max(1)
    }
}

pub struct OpenLogConfigBuilder {
    address: u8,
    command_ready_handshake: bool,
    write_terminator: WriteTerminator,
    overflow_policy: OverflowPolicy,
    poll_interval: MillisDurationU32,
    ready_timeout: MillisDurationU32,
    max_entry_len: usize,
}

impl Default for OpenLogConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenLogConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            command_ready_handshake: false,
            write_terminator: WriteTerminator::CarriageReturn,
            overflow_policy: OverflowPolicy::Reject,
            poll_interval: MillisDurationU32::millis(5),
            ready_timeout: MillisDurationU32::millis(500),
            max_entry_len: MAX_ENTRY_LEN,
        }
    }
    #[must_use]
    pub fn address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }
    #[must_use]
    pub fn command_ready_handshake(mut self, enabled: bool) -> Self {
        self.command_ready_handshake = enabled;
        self
    }
    #[must_use]
    pub fn write_terminator(mut self, terminator: WriteTerminator) -> Self {
        self.write_terminator = terminator;
        self
    }
    #[must_use]
    pub fn overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }
    #[must_use]
    pub fn poll_interval(mut self, interval: MillisDurationU32) -> Self {
        self.poll_interval = interval;
        self
    }
    #[must_use]
    pub fn ready_timeout(mut self, timeout: MillisDurationU32) -> Self {
        self.ready_timeout = timeout;
        self
    }
    /// Clamped to [`MAX_ENTRY_LEN`].
    #[must_use]
    pub fn max_entry_len(mut self, len: usize) -> Self {
        self.max_entry_len = len.min(MAX_ENTRY_LEN);
        self
    }
    #[must_use]
    pub fn build(self) -> OpenLogConfig {
        OpenLogConfig {
            address: self.address,
            command_ready_handshake: self.command_ready_handshake,
            write_terminator: self.write_terminator,
            overflow_policy: self.overflow_policy,
            poll_interval: self.poll_interval,
            ready_timeout: self.ready_timeout,
            max_entry_len: self.max_entry_len,
        }
    }
}
