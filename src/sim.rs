// Licensed under the Apache-2.0 license

//! Simulated I2C bus used by the unit tests.
//!
//! Hosts an OpenLog model (files, directories, listing cursor, command-ready
//! register) and an RV-3028 register file behind `embedded_hal::i2c::I2c`, and
//! records every transaction so tests can assert on bus traffic.

use crate::openlog::registers as ol;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::string::String;
use std::vec::Vec;

/// One recorded bus transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Txn {
    pub address: u8,
    pub written: Vec<u8>,
    pub read_len: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Readiness {
    Always,
    Never,
    /// Reports not-ready for this many polls, then ready.
    AfterPolls(u32),
}

pub struct SimOpenLog {
    pub address: u8,
    pub status: u8,
    pub version: (u8, u8),
    pub files: BTreeMap<String, Vec<u8>>,
    pub dirs: BTreeSet<String>,
    pub cwd: String,
    pub open_file: Option<String>,
    pub syncs: usize,
    pub readiness: Readiness,
    pub ready_polls: u32,
    /// When set, replaces the generated listing bytes.
    pub listing_override: Option<Vec<u8>>,
    pointer: u8,
    read_data: Vec<u8>,
    read_pos: usize,
    size_response: [u8; 4],
    pending: VecDeque<u8>,
    listing: Option<VecDeque<u8>>,
}

impl SimOpenLog {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            status: ol::Status::SD_INIT_GOOD | ol::Status::IN_ROOT_DIRECTORY,
            version: (3, 1),
            files: BTreeMap::new(),
            dirs: BTreeSet::new(),
            cwd: String::new(),
            open_file: None,
            syncs: 0,
            readiness: Readiness::Always,
            ready_polls: 0,
            listing_override: None,
            pointer: 0,
            read_data: Vec::new(),
            read_pos: 0,
            size_response: [0; 4],
            pending: VecDeque::new(),
            listing: None,
        }
    }

    pub fn path(&self, name: &str) -> String {
        if self.cwd.is_empty() {
            name.into()
        } else {
            std::format!("{}/{}", self.cwd, name)
        }
    }

    pub fn file(&self, name: &str) -> Option<&Vec<u8>> {
        self.files.get(&self.path(name))
    }

    fn children(&self) -> Vec<(String, bool)> {
        let prefix = if self.cwd.is_empty() {
            String::new()
        } else {
            std::format!("{}/", self.cwd)
        };
        let direct = |p: &String| {
            p.strip_prefix(prefix.as_str())
                .filter(|rest| !rest.contains('/'))
                .map(String::from)
        };
        let mut out: Vec<(String, bool)> = self
            .dirs
            .iter()
            .filter_map(|d| direct(d).map(|n| (n, true)))
            .collect();
        out.extend(self.files.keys().filter_map(|f| direct(f).map(|n| (n, false))));
        out
    }

    fn remove_matching(&mut self, pattern: &str, recursive: bool) -> u32 {
        let mut removed = 0;
        for (name, is_dir) in self.children() {
            if !glob(pattern, &name) {
                continue;
            }
            let path = self.path(&name);
            if is_dir {
                if !recursive {
                    continue;
                }
                let inner = std::format!("{path}/");
                self.files.retain(|f, _| !f.starts_with(&inner));
                self.dirs.retain(|d| !d.starts_with(&inner));
                self.dirs.remove(&path);
                // A directory counts once regardless of its contents.
                removed += 1;
            } else {
                self.files.remove(&path);
                removed += 1;
            }
        }
        removed
    }

    fn command(&mut self, register: u8, arg: &[u8]) {
        self.pointer = register;
        if register != ol::LIST {
            self.listing = None;
        }
        let text = || String::from_utf8_lossy(arg).into_owned();
        match register {
            ol::CREATE_FILE | ol::OPEN_FILE if !arg.is_empty() => {
                let path = self.path(&text());
                self.files.entry(path.clone()).or_default();
                self.open_file = Some(path);
            }
            ol::MKDIR if !arg.is_empty() => {
                let path = self.path(&text());
                self.dirs.insert(path);
            }
            ol::CD if !arg.is_empty() => {
                let name = text();
                if name == ".." {
                    self.cwd = self
                        .cwd
                        .rsplit_once('/')
                        .map(|(parent, _)| parent.into())
                        .unwrap_or_default();
                } else if self.dirs.contains(&self.path(&name)) {
                    self.cwd = self.path(&name);
                }
                if self.cwd.is_empty() {
                    self.status |= ol::Status::IN_ROOT_DIRECTORY;
                } else {
                    self.status &= !ol::Status::IN_ROOT_DIRECTORY;
                }
            }
            ol::READ_FILE if !arg.is_empty() => {
                self.read_data = self.files.get(&self.path(&text())).cloned().unwrap_or_default();
                self.read_pos = 0;
            }
            ol::FILE_SIZE if !arg.is_empty() => {
                let size = self
                    .files
                    .get(&self.path(&text()))
                    .map_or(ol::SIZE_NOT_FOUND, |f| f.len() as u32);
                self.size_response = size.to_be_bytes();
            }
            ol::WRITE_FILE if !arg.is_empty() => {
                if let Some(path) = self.open_file.clone() {
                    self.files.entry(path).or_default().extend_from_slice(arg);
                    self.status |= ol::Status::FILE_OPEN;
                }
            }
            ol::LIST => {
                let bytes = match &self.listing_override {
                    Some(bytes) => bytes.clone(),
                    None => {
                        let pattern = if arg.is_empty() { "*".into() } else { text() };
                        let mut bytes = Vec::new();
                        for (name, is_dir) in self.children() {
                            if glob(&pattern, &name) {
                                bytes.extend_from_slice(name.as_bytes());
                                if is_dir {
                                    bytes.push(b'/');
                                }
                                bytes.push(0);
                            }
                        }
                        bytes.push(ol::END_OF_LISTING);
                        bytes
                    }
                };
                self.listing = Some(bytes.into());
            }
            ol::RM | ol::RMRF if !arg.is_empty() => {
                let count = self.remove_matching(&text(), register == ol::RMRF);
                self.pending = count.to_be_bytes().into_iter().collect();
            }
            ol::SYNC_FILE => self.syncs += 1,
            ol::I2C_ADDRESS => {
                if let Some(&addr) = arg.first() {
                    self.address = addr;
                }
            }
            _ => {}
        }
        self.status |= ol::Status::LAST_COMMAND_KNOWN | ol::Status::LAST_COMMAND_SUCCESS;
    }

    fn register_read(&mut self, buf: &mut [u8]) {
        match self.pointer {
            ol::STATUS => buf.fill(self.status),
            ol::FW_MAJOR => buf.fill(self.version.0),
            ol::FW_MINOR => buf.fill(self.version.1),
            ol::CMD_READY => {
                self.ready_polls += 1;
                let ready = match self.readiness {
                    Readiness::Always => true,
                    Readiness::Never => false,
                    Readiness::AfterPolls(n) => self.ready_polls > n,
                };
                buf.fill(u8::from(ready));
            }
            ol::FILE_SIZE => {
                for (dst, src) in buf.iter_mut().zip(self.size_response) {
                    *dst = src;
                }
            }
            ol::READ_FILE | ol::CONTINUE_READ => {
                for b in buf.iter_mut() {
                    *b = self.read_data.get(self.read_pos).copied().unwrap_or(0);
                    self.read_pos += 1;
                }
            }
            _ => buf.fill(0),
        }
    }

    fn stream_read(&mut self, buf: &mut [u8]) {
        for b in buf.iter_mut() {
            *b = if let Some(listing) = self.listing.as_mut() {
                listing.pop_front().unwrap_or(ol::END_OF_LISTING)
            } else {
                self.pending.pop_front().unwrap_or(0)
            };
        }
    }
}

/// RV-3028 register file with an auto-incrementing pointer.
pub struct SimRtc {
    pub address: u8,
    pub regs: [u8; 0x40],
    pointer: u8,
}

impl SimRtc {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            regs: [0; 0x40],
            pointer: 0,
        }
    }

    fn write(&mut self, bytes: &[u8]) {
        if let Some((&offset, data)) = bytes.split_first() {
            self.pointer = offset;
            for &b in data {
                if let Some(r) = self.regs.get_mut(usize::from(self.pointer)) {
                    *r = b;
                }
                self.pointer = self.pointer.wrapping_add(1);
            }
        }
    }

    fn read(&mut self, buf: &mut [u8]) {
        for b in buf.iter_mut() {
            *b = self.regs.get(usize::from(self.pointer)).copied().unwrap_or(0);
            self.pointer = self.pointer.wrapping_add(1);
        }
    }
}

#[derive(Default)]
pub struct SimBus {
    pub openlog: Option<SimOpenLog>,
    pub rtc: Option<SimRtc>,
    pub txns: Vec<Txn>,
    /// Transactions with an index at or beyond this value are NACKed.
    pub fail_from: Option<usize>,
}

impl SimBus {
    pub fn with_openlog() -> Self {
        Self {
            openlog: Some(SimOpenLog::new(ol::DEFAULT_ADDRESS)),
            ..Self::default()
        }
    }

    pub fn with_rtc() -> Self {
        Self {
            rtc: Some(SimRtc::new(crate::rtc::registers::DEFAULT_ADDRESS)),
            ..Self::default()
        }
    }

    pub fn device(&self) -> &SimOpenLog {
        self.openlog.as_ref().expect("no OpenLog on the bus")
    }

    pub fn device_mut(&mut self) -> &mut SimOpenLog {
        self.openlog.as_mut().expect("no OpenLog on the bus")
    }

    pub fn rtc_regs(&self) -> &[u8; 0x40] {
        &self.rtc.as_ref().expect("no RTC on the bus").regs
    }

    pub fn rtc_regs_mut(&mut self) -> &mut [u8; 0x40] {
        &mut self.rtc.as_mut().expect("no RTC on the bus").regs
    }

    /// Frames written to `address`, in order.
    pub fn writes_to(&self, address: u8) -> Vec<Vec<u8>> {
        self.txns
            .iter()
            .filter(|t| t.address == address && !t.written.is_empty())
            .map(|t| t.written.clone())
            .collect()
    }
}

impl ErrorType for SimBus {
    type Error = ErrorKind;
}

impl I2c for SimBus {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut txn = Txn {
            address,
            written: Vec::new(),
            read_len: 0,
        };
        for op in operations.iter() {
            match op {
                Operation::Write(bytes) => txn.written.extend_from_slice(bytes),
                Operation::Read(buf) => txn.read_len += buf.len(),
            }
        }
        let index = self.txns.len();
        self.txns.push(txn);
        if self.fail_from.is_some_and(|n| index >= n) {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        if let Some(dev) = self.openlog.as_mut().filter(|d| d.address == address) {
            let mut addressed = false;
            for op in operations.iter_mut() {
                match op {
                    Operation::Write(bytes) => {
                        if let Some((&register, arg)) = bytes.split_first() {
                            dev.command(register, arg);
                            addressed = true;
                        }
                    }
                    Operation::Read(buf) if addressed => dev.register_read(buf),
                    Operation::Read(buf) => dev.stream_read(buf),
                }
            }
            return Ok(());
        }

        if let Some(rtc) = self.rtc.as_mut().filter(|r| r.address == address) {
            for op in operations.iter_mut() {
                match op {
                    Operation::Write(bytes) => rtc.write(bytes),
                    Operation::Read(buf) => rtc.read(buf),
                }
            }
            return Ok(());
        }

        Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address))
    }
}

/// `DelayNs` that only accumulates virtual time.
#[derive(Default)]
pub struct CountingDelay {
    pub elapsed_ns: u64,
    pub calls: usize,
}

impl CountingDelay {
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ns / 1_000_000
    }
}

impl DelayNs for CountingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns += u64::from(ns);
        self.calls += 1;
    }
}

/// `*` and `?` wildcard match, case-insensitive like FAT.
pub fn glob(pattern: &str, name: &str) -> bool {
    fn go(p: &[u8], n: &[u8]) -> bool {
        match (p.split_first(), n.split_first()) {
            (None, None) => true,
            (Some((b'*', rest)), _) => go(rest, n) || (!n.is_empty() && go(p, &n[1..])),
            (Some((b'?', rest)), Some((_, nrest))) => go(rest, nrest),
            (Some((pc, rest)), Some((nc, nrest))) => {
                pc.eq_ignore_ascii_case(nc) && go(rest, nrest)
            }
            _ => false,
        }
    }
    go(pattern.as_bytes(), name.as_bytes())
}
