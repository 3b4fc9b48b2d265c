//! Reusable byte buffers sorted into power-of-two size classes.
//!
//! * [`BuffersPool`]: an explicit pool with [`acquire`](BuffersPool::acquire)
//!   and [`release`](BuffersPool::release)
//! * [`make`] / [`put`]: the same operations on a lazily created process-wide pool
//! * [`PoolConfig`]: bucket count and retention, loadable from TOML

#![warn(missing_docs)]

pub mod config;
pub mod pool;

use std::sync::OnceLock;

pub use config::{ConfigError, PoolConfig};
pub use pool::{BuffersPool, MAX_BUCKETS, bucket_for, bucket_size};

fn default_pool() -> &'static BuffersPool {
	static DEFAULT: OnceLock<BuffersPool> = OnceLock::new();
	DEFAULT.get_or_init(BuffersPool::new)
}

/// Returns a zeroed buffer of `size` bytes from the process-wide pool.
pub fn make(size: usize) -> Vec<u8> {
	default_pool().acquire(size)
}

/// Returns a buffer to the process-wide pool.
pub fn put(buf: Vec<u8>) {
	default_pool().release(buf);
}
