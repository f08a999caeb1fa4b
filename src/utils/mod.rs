//! # Utility Modules
//!
//! Supporting utilities for the codec hot path and its observability.
//!
//! ## Components
//! - **Buffer Pool**: scratch buffers reused across pack/unpack calls
//! - **Compression**: bounded zlib deflate/inflate
//! - **Logging**: tracing subscriber configuration
//! - **Metrics**: thread-safe framing counters
//!
//! ## Security
//! - Decompression bomb protection (2 MiB ceiling on inflated packets)
//! - Pooled buffers are cleared before every reuse

pub mod buffer_pool;
pub mod compression;
pub mod logging;
pub mod metrics;

pub use buffer_pool::{BufferPool, PooledBuffer};
