// Licensed under the Apache-2.0 license

//! Driver for the SparkFun Qwiic OpenLog.

pub mod config;
pub mod device;
pub mod directory;
pub mod frame;
pub mod registers;
pub mod writer;

pub use config::{OpenLogConfig, OpenLogConfigBuilder, OverflowPolicy, WriteTerminator};
pub use device::OpenLog;
pub use directory::{DirectoryEntry, DirectoryListing};
pub use registers::{Status, Version, DEFAULT_ADDRESS};
pub use writer::LogWriter;
