//! Encoder pool
//!
//! Log calls borrow an [`Encoder`] for the duration of one entry and hand it
//! back when done, so steady-state logging does not allocate buffers. The free
//! list is a bounded crossbeam channel: borrowing and releasing are lock-free
//! and every borrow gets an encoder nobody else holds.

use super::encoder::Encoder;
use super::metrics::SinkMetrics;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// Number of idle encoders a pool keeps around.
pub const DEFAULT_POOL_SIZE: usize = 64;

/// Buffers that grew beyond this are dropped instead of pooled.
pub const MAX_POOLED_CAPACITY: usize = 64 * 1024;

#[derive(Debug)]
pub struct EncoderPool {
    free_tx: Sender<Encoder>,
    free_rx: Receiver<Encoder>,
    metrics: Arc<SinkMetrics>,
}

impl EncoderPool {
    pub fn new(size: usize) -> Self {
        Self::with_metrics(size, Arc::new(SinkMetrics::new()))
    }

    /// Create a pool that records allocations and reuses into `metrics`.
    pub fn with_metrics(size: usize, metrics: Arc<SinkMetrics>) -> Self {
        let (free_tx, free_rx) = bounded(size.max(1));
        Self {
            free_tx,
            free_rx,
            metrics,
        }
    }

    /// Borrow an encoder; it goes back to the pool when the guard drops.
    pub fn acquire(&self) -> PooledEncoder<'_> {
        let encoder = match self.free_rx.try_recv() {
            Ok(enc) => {
                self.metrics.record_encoder_reused();
                enc
            }
            Err(_) => {
                self.metrics.record_encoder_allocated();
                Encoder::new()
            }
        };
        PooledEncoder {
            encoder,
            pool: self,
        }
    }

    /// Return an encoder to the free list.
    fn release(&self, mut encoder: Encoder) {
        if encoder.capacity() > MAX_POOLED_CAPACITY {
            return;
        }
        encoder.reset();
        // Pool full: let this one go.
        let _ = self.free_tx.try_send(encoder);
    }

    /// Encoders currently idle in the pool.
    pub fn idle(&self) -> usize {
        self.free_rx.len()
    }

    pub fn metrics(&self) -> &SinkMetrics {
        &self.metrics
    }
}

impl Default for EncoderPool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_SIZE)
    }
}

/// An encoder on loan from an [`EncoderPool`].
#[derive(Debug)]
pub struct PooledEncoder<'a> {
    encoder: Encoder,
    pool: &'a EncoderPool,
}

impl Deref for PooledEncoder<'_> {
    type Target = Encoder;

    fn deref(&self) -> &Encoder {
        &self.encoder
    }
}

impl DerefMut for PooledEncoder<'_> {
    fn deref_mut(&mut self) -> &mut Encoder {
        &mut self.encoder
    }
}

impl Drop for PooledEncoder<'_> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.encoder));
    }
}
