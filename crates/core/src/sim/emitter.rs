//! File-backed [`CommandSink`] implementation (spec §4.10).

use std::io::{BufWriter, Write};

use crate::common::{SimError, SimResult};
use crate::core::command::Command;
use crate::core::sink::CommandSink;

/// Writes one formatted line per issued command to any [`Write`] — a real
/// file in production, an in-memory buffer in tests.
pub struct CommandLog<W: Write> {
    writer: BufWriter<W>,
}

impl<W: Write> CommandLog<W> {
    pub fn new(writer: W) -> Self {
        Self { writer: BufWriter::new(writer) }
    }

    /// Flushes any buffered output. The CLI calls this explicitly before
    /// reporting its exit code; `Drop` also flushes as a backstop.
    ///
    /// # Errors
    /// Propagates the underlying writer's flush failure.
    pub fn flush(&mut self) -> SimResult<()> {
        self.writer.flush().map_err(SimError::Io)
    }
}

impl<W: Write> CommandSink for CommandLog<W> {
    fn emit(&mut self, cycle: u64, channel: usize, cmd: &Command) -> SimResult<()> {
        writeln!(self.writer, "{}", cmd.format_line(cycle, channel)).map_err(SimError::Io)
    }
}

impl<W: Write> Drop for CommandLog<W> {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}
