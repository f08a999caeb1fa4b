//! # Buffer Pool
//!
//! Object pool of scratch buffers for the framing hot path, so that packing and
//! unpacking a packet does not allocate a fresh intermediate buffer per call.
//!
//! ## Guarantees
//! - A checked-out [`PooledBuffer`] is owned exclusively by its holder
//! - Buffers are cleared on checkout and on return
//! - Buffers go back to the pool when dropped, on success and error paths alike
//! - Acquire/release is thread-safe; callers never lock anything themselves
//!
//! ## Usage
//! ```rust
//! use mc_protocol::utils::buffer_pool::BufferPool;
//!
//! let pool = BufferPool::new(16);
//! let mut buffer = pool.acquire();
//! buffer.extend_from_slice(b"scratch");
//! drop(buffer); // back in the pool, cleared
//! assert_eq!(pool.available(), 16);
//! ```

use crate::config::PoolConfig;
use crate::error::constants::ERR_LOCK_POISONED;
use crate::error::{ProtocolError, Result};
use once_cell::sync::OnceCell;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Buffers that grew beyond this capacity are freed instead of pooled
pub const MAX_POOLED_BUFFER_SIZE: usize = 64 * 1024;

/// Default buffer capacity
pub const DEFAULT_BUFFER_CAPACITY: usize = 1024;

/// Default number of pre-allocated buffers
pub const DEFAULT_POOL_SIZE: usize = 32;

static SCRATCH_POOL: OnceCell<BufferPool> = OnceCell::new();

/// Shared pool used by the framing layer.
///
/// Initialized with defaults on first use unless [`init_scratch_pool`] ran earlier.
pub fn scratch_pool() -> &'static BufferPool {
    SCRATCH_POOL.get_or_init(BufferPool::default)
}

/// Configures the shared framing pool.
///
/// # Errors
/// Returns `ProtocolError::ConfigError` if the pool was already initialized,
/// either by an earlier call or by first use of [`scratch_pool`]
pub fn init_scratch_pool(config: &PoolConfig) -> Result<()> {
    SCRATCH_POOL
        .set(BufferPool::from_config(config))
        .map_err(|_| ProtocolError::ConfigError("Scratch buffer pool already initialized".into()))?;

    debug!(
        pool_size = config.pool_size,
        buffer_capacity = config.buffer_capacity,
        "Scratch buffer pool initialized"
    );
    Ok(())
}

type Shelf = Arc<Mutex<Vec<Vec<u8>>>>;

/// A pooled buffer that returns itself to the pool when dropped
pub struct PooledBuffer {
    buffer: Vec<u8>,
    shelf: Shelf,
    max_idle: usize,
    max_capacity: usize,
}

impl PooledBuffer {
    /// Get a mutable reference to the underlying buffer
    #[allow(clippy::should_implement_trait)]
    pub fn as_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buffer
    }

    /// Get an immutable reference to the underlying buffer
    #[allow(clippy::should_implement_trait)]
    pub fn as_ref(&self) -> &[u8] {
        &self.buffer
    }
}

impl Drop for PooledBuffer {
    fn drop(&mut self) {
        if self.buffer.capacity() > self.max_capacity {
            return;
        }
        self.buffer.clear();
        match self.shelf.lock() {
            Ok(mut shelf) => {
                if shelf.len() < self.max_idle {
                    shelf.push(std::mem::take(&mut self.buffer));
                }
            }
            Err(_) => warn!("{ERR_LOCK_POISONED}: dropping scratch buffer"),
        }
    }
}

impl std::ops::Deref for PooledBuffer {
    type Target = Vec<u8>;

    fn deref(&self) -> &Self::Target {
        &self.buffer
    }
}

impl std::ops::DerefMut for PooledBuffer {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.buffer
    }
}

/// Thread-safe pool of scratch buffers
pub struct BufferPool {
    shelf: Shelf,
    buffer_capacity: usize,
    max_idle: usize,
    max_capacity: usize,
}

impl BufferPool {
    /// Create a new buffer pool with `pool_size` pre-allocated buffers
    pub fn new(pool_size: usize) -> Self {
        Self::with_limits(pool_size, DEFAULT_BUFFER_CAPACITY, MAX_POOLED_BUFFER_SIZE)
    }

    /// Create a pool with explicit buffer capacity and retention ceiling.
    ///
    /// At most `pool_size` idle buffers are kept; buffers whose capacity exceeds
    /// `max_capacity` are freed on return.
    pub fn with_limits(pool_size: usize, buffer_capacity: usize, max_capacity: usize) -> Self {
        let shelf = (0..pool_size)
            .map(|_| Vec::with_capacity(buffer_capacity))
            .collect();

        Self {
            shelf: Arc::new(Mutex::new(shelf)),
            buffer_capacity,
            max_idle: pool_size,
            max_capacity,
        }
    }

    pub fn from_config(config: &PoolConfig) -> Self {
        Self::with_limits(
            config.pool_size,
            config.buffer_capacity,
            config.max_pooled_capacity,
        )
    }

    /// Acquire a cleared buffer from the pool (or allocate a new one if the pool is empty)
    pub fn acquire(&self) -> PooledBuffer {
        let pooled = match self.shelf.lock() {
            Ok(mut shelf) => shelf.pop(),
            Err(_) => {
                warn!("{ERR_LOCK_POISONED}: allocating unpooled scratch buffer");
                None
            }
        };

        let mut buffer = pooled.unwrap_or_else(|| Vec::with_capacity(self.buffer_capacity));
        buffer.clear();

        PooledBuffer {
            buffer,
            shelf: self.shelf.clone(),
            max_idle: self.max_idle,
            max_capacity: self.max_capacity,
        }
    }

    /// Get the current number of available buffers in the pool
    pub fn available(&self) -> usize {
        self.shelf.lock().map(|s| s.len()).unwrap_or(0)
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_SIZE)
    }
}

impl Clone for BufferPool {
    fn clone(&self) -> Self {
        Self {
            shelf: self.shelf.clone(),
            buffer_capacity: self.buffer_capacity,
            max_idle: self.max_idle,
            max_capacity: self.max_capacity,
        }
    }
}
