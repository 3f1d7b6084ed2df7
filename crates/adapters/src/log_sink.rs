//! Line-oriented output targets for the JSON logger and the publishing adapter.

use std::io;
use std::io::Write;
use std::sync::Mutex;

/// A sink that receives pre-formatted, newline-terminated lines.
pub trait LogSink: Send + Sync {
    /// Write a line to the sink, reporting failures out of band.
    fn write_line(&self, line: &str);

    /// Write a line and surface the I/O failure to the caller.
    ///
    /// Sinks that cannot fail keep the default.
    fn try_write_line(&self, line: &str) -> io::Result<()> {
        self.write_line(line);
        Ok(())
    }
}

/// Log sink that writes to stderr.
#[derive(Debug, Default)]
pub struct StderrLogSink;

impl LogSink for StderrLogSink {
    fn write_line(&self, line: &str) {
        if let Err(error) = self.try_write_line(line) {
            eprintln!("log sink write failed: {error}");
        }
    }

    fn try_write_line(&self, line: &str) -> io::Result<()> {
        io::stderr().write_all(line.as_bytes())
    }
}

/// Log sink over any writer, such as an append-mode file.
///
/// Writes are serialized through a mutex and flushed per line so that
/// concurrent recorders never interleave partial records.
#[derive(Debug)]
pub struct WriterLogSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterLogSink<W> {
    /// Wrap a writer.
    pub const fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Return the writer, if the lock is not poisoned.
    pub fn into_inner(self) -> Option<W> {
        self.writer.into_inner().ok()
    }
}

impl<W: Write + Send> LogSink for WriterLogSink<W> {
    fn write_line(&self, line: &str) {
        if let Err(error) = self.try_write_line(line) {
            eprintln!("log sink write failed: {error}");
        }
    }

    fn try_write_line(&self, line: &str) -> io::Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| io::Error::other("writer lock poisoned"))?;
        writer.write_all(line.as_bytes())?;
        writer.flush()
    }
}
