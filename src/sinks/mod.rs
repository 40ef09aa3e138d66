//! Output sinks
//!
//! A [`Sink`] is the destination of serialized log lines: any `io::Write`
//! behind a mutex, paired with the encoder pool that serves log calls
//! targeting it.

pub mod memory;

pub use memory::MemoryWriter;

use crate::core::{EncoderPool, LoggerError, PooledEncoder, Result, SinkMetrics, DEFAULT_POOL_SIZE};
use parking_lot::Mutex;
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

/// Report the first write failure and every 1000th after it.
const WRITE_ERROR_REPORT_INTERVAL: u64 = 1000;

struct SinkInner {
    name: String,
    writer: Mutex<Box<dyn Write + Send>>,
    pool: EncoderPool,
    metrics: Arc<SinkMetrics>,
}

/// Shared handle to a log destination.
///
/// Cloning is cheap; clones write to the same writer and share one pool.
#[derive(Clone)]
pub struct Sink {
    inner: Arc<SinkInner>,
}

impl Sink {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self::with_pool_size("writer", writer, DEFAULT_POOL_SIZE)
    }

    /// Create a sink whose pool keeps at most `pool_size` idle encoders.
    pub fn with_pool_size<W: Write + Send + 'static>(
        name: impl Into<String>,
        writer: W,
        pool_size: usize,
    ) -> Self {
        let metrics = Arc::new(SinkMetrics::new());
        Self {
            inner: Arc::new(SinkInner {
                name: name.into(),
                writer: Mutex::new(Box::new(writer)),
                pool: EncoderPool::with_metrics(pool_size, Arc::clone(&metrics)),
                metrics,
            }),
        }
    }

    /// A sink that drops everything written to it.
    pub fn discard() -> Self {
        Self::with_pool_size("discard", io::sink(), DEFAULT_POOL_SIZE)
    }

    pub fn stdout() -> Self {
        Self::with_pool_size("stdout", io::stdout(), DEFAULT_POOL_SIZE)
    }

    pub fn stderr() -> Self {
        Self::with_pool_size("stderr", io::stderr(), DEFAULT_POOL_SIZE)
    }

    /// Append to the file at `path`, creating it if needed.
    ///
    /// Writes are unbuffered: each line reaches the file before the log call
    /// returns, which matters for fatal entries followed by process exit.
    pub fn file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::io_operation("opening log file", path.display().to_string(), e)
            })?;
        Ok(Self::with_pool_size(
            path.display().to_string(),
            file,
            DEFAULT_POOL_SIZE,
        ))
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Borrow an encoder from this sink's pool.
    #[inline]
    pub fn acquire(&self) -> PooledEncoder<'_> {
        self.inner.pool.acquire()
    }

    /// Write one serialized line.
    ///
    /// Failures are counted and reported on stderr, never returned: logging
    /// must not disturb the caller's control flow.
    pub fn write_line(&self, line: &[u8]) {
        let result = self.inner.writer.lock().write_all(line);
        match result {
            Ok(()) => self.inner.metrics.record_line(line.len()),
            Err(e) => {
                let failures = self.inner.metrics.record_write_error();
                if failures % WRITE_ERROR_REPORT_INTERVAL == 0 {
                    eprintln!(
                        "[LOGGER ERROR] Sink '{}' write failed ({} failures so far): {}",
                        self.inner.name,
                        failures + 1,
                        e
                    );
                }
            }
        }
    }

    pub fn flush(&self) -> Result<()> {
        self.inner.writer.lock().flush()?;
        Ok(())
    }

    pub fn metrics(&self) -> &SinkMetrics {
        &self.inner.metrics
    }

    pub fn pool(&self) -> &EncoderPool {
        &self.inner.pool
    }

    /// Whether both handles point at the same destination.
    pub fn same_as(&self, other: &Sink) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Default for Sink {
    fn default() -> Self {
        Self::discard()
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink")
            .field("name", &self.inner.name)
            .field("idle_encoders", &self.inner.pool.idle())
            .field("lines_written", &self.inner.metrics.lines_written())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_line_counts() {
        let out = MemoryWriter::new();
        let sink = Sink::new(out.clone());
        sink.write_line(b"{}\n");
        sink.write_line(b"{\"a\":1}\n");

        assert_eq!(out.contents(), "{}\n{\"a\":1}\n");
        assert_eq!(sink.metrics().lines_written(), 2);
        assert_eq!(sink.metrics().bytes_written(), 11);
    }

    #[test]
    fn test_write_errors_are_swallowed() {
        let sink = Sink::new(FailingWriter);
        sink.write_line(b"{}\n");
        sink.write_line(b"{}\n");
        assert_eq!(sink.metrics().write_errors(), 2);
        assert_eq!(sink.metrics().lines_written(), 0);
        assert!(sink.flush().is_ok());
    }

    #[test]
    fn test_clones_share_pool() {
        let sink = Sink::discard();
        let clone = sink.clone();
        drop(sink.acquire());
        assert_eq!(clone.pool().idle(), 1);
        assert!(sink.same_as(&clone));
        assert!(!sink.same_as(&Sink::discard()));
    }

    #[test]
    fn test_file_sink() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("app.log");

        let sink = Sink::file(&path)?;
        sink.write_line(b"{\"n\":1}\n");
        drop(sink);
        let sink = Sink::file(&path)?;
        sink.write_line(b"{\"n\":2}\n");

        let content = std::fs::read_to_string(&path)?;
        assert_eq!(content, "{\"n\":1}\n{\"n\":2}\n");
        Ok(())
    }

    #[test]
    fn test_file_sink_bad_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = Sink::file(dir.path().join("missing").join("app.log")).unwrap_err();
        assert!(matches!(err, LoggerError::IoOperation { .. }));
    }
}
