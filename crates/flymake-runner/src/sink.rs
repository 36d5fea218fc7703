//! Shared output sink.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

type BoxedWriter = Box<dyn Write + Send>;

/// The single destination all transform tasks write into.
///
/// Every [`write_line`](Self::write_line) holds the lock for the whole line and
/// its terminator, so concurrent writers never interleave partial lines.
#[derive(Clone)]
pub struct SharedSink {
    writer: Arc<Mutex<BoxedWriter>>,
}

impl SharedSink {
    /// Wraps an arbitrary writer.
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Creates a sink writing to the process's standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Creates a sink that records everything written to it.
    pub fn in_memory() -> (Self, CapturedOutput) {
        let captured = CapturedOutput::default();
        let sink = Self::new(CaptureWriter(Arc::clone(&captured.buffer)));
        (sink, captured)
    }

    /// Writes one complete line followed by `\n`.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        // Poisoned only if another writer panicked; the buffer is still usable.
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()
    }
}

impl fmt::Debug for SharedSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedSink").finish_non_exhaustive()
    }
}

/// Handle to the bytes written into an in-memory [`SharedSink`].
#[derive(Debug, Clone, Default)]
pub struct CapturedOutput {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CapturedOutput {
    /// Returns everything written so far.
    pub fn contents(&self) -> String {
        let buffer = self.buffer.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// Returns the written lines, without terminators.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut buffer = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
