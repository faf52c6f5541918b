// Licensed under the Apache-2.0 license

//! Logging seam shared by the drivers in this crate.
//!
//! Every driver carries a `L: Logger = NoOpLogger` parameter so that production
//! builds pay nothing for diagnostics, while bring-up builds can route messages
//! to a UART through [`SerialLogger`].

use core::fmt;

/// Sink for driver diagnostics.
pub trait Logger {
    fn debug(&mut self, args: fmt::Arguments<'_>);
    fn warn(&mut self, args: fmt::Arguments<'_>);
    fn error(&mut self, args: fmt::Arguments<'_>);
}

/// Logger that discards every message.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpLogger;

impl Logger for NoOpLogger {
    #[inline]
    fn debug(&mut self, _args: fmt::Arguments<'_>) {}
    #[inline]
    fn warn(&mut self, _args: fmt::Arguments<'_>) {}
    #[inline]
    fn error(&mut self, _args: fmt::Arguments<'_>) {}
}

/// Logger that writes `[LEVEL] message\r\n` lines to a serial sink.
///
/// Write failures are dropped: a broken debug UART must never turn into a
/// failed bus operation.
pub struct SerialLogger<W: embedded_io::Write> {
    writer: W,
}

impl<W: embedded_io::Write> SerialLogger<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn line(&mut self, level: &str, args: fmt::Arguments<'_>) {
        let _ = write!(self.writer, "[{level}] ");
        let _ = self.writer.write_fmt(args);
        let _ = self.writer.write_all(b"\r\n");
    }
}

impl<W: embedded_io::Write> Logger for SerialLogger<W> {
    fn debug(&mut self, args: fmt::Arguments<'_>) {
        self.line("DEBUG", args);
    }

    fn warn(&mut self, args: fmt::Arguments<'_>) {
        self.line("WARN", args);
    }

    fn error(&mut self, args: fmt::Arguments<'_>) {
        self.line("ERROR", args);
    }
}
