//! In-memory writer

use parking_lot::Mutex;
use std::io::{self, Write};
use std::sync::Arc;

/// A cloneable `Write` that collects everything into a shared buffer.
///
/// Useful for tests and for capturing output before shipping it elsewhere.
///
/// ```
/// use json_logger::{Logger, LogLevel, MemoryWriter, Sink};
///
/// let out = MemoryWriter::new();
/// let logger = Logger::new(Some(Sink::new(out.clone())), LogLevel::Info);
/// logger.info("hello");
/// assert_eq!(out.contents(), "{\"level\":\"info\",\"message\":\"hello\"}\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.buf.lock().clone()
    }

    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.lock().is_empty()
    }

    /// Return the buffered output and clear it.
    pub fn take(&self) -> String {
        let bytes = std::mem::take(&mut *self.buf.lock());
        String::from_utf8_lossy(&bytes).into_owned()
    }

    pub fn clear(&self) {
        self.buf.lock().clear();
    }
}

impl Write for MemoryWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
