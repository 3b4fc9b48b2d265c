//! Bucketed buffer pool.

use parking_lot::Mutex;

use crate::config::PoolConfig;

/// Largest supported number of size classes.
pub const MAX_BUCKETS: usize = 32;

/// Smallest bucket whose buffers hold `len` bytes.
#[inline]
pub const fn bucket_for(len: usize) -> usize {
	if len == 0 {
		return 0;
	}
	(usize::BITS - (len - 1).leading_zeros()) as usize
}

/// Buffer capacity of bucket `n`.
#[inline]
pub const fn bucket_size(n: usize) -> usize {
	1 << n
}

/// Pool of byte buffers grouped by power-of-two capacity.
///
/// Every bucket has its own lock, so callers working on different sizes do
/// not contend.
#[derive(Debug)]
pub struct BuffersPool {
	buckets: Vec<Mutex<Vec<Vec<u8>>>>,
	retain: usize,
}

impl Default for BuffersPool {
	fn default() -> Self {
		Self::new()
	}
}

impl BuffersPool {
	/// Creates a pool with [`MAX_BUCKETS`] buckets.
	pub fn new() -> Self {
		Self::with_config(&PoolConfig::default())
	}

	/// Creates a pool sized by `config`.
	pub fn with_config(config: &PoolConfig) -> Self {
		let count = config.buckets.clamp(1, MAX_BUCKETS);
		Self {
			buckets: (0..count).map(|_| Mutex::new(Vec::new())).collect(),
			retain: config.retain_per_bucket,
		}
	}

	/// Number of size classes.
	pub fn buckets(&self) -> usize {
		self.buckets.len()
	}

	/// Returns a zeroed buffer with `len() == size`.
	///
	/// Capacity is the bucket size for `size`. Sizes beyond the largest
	/// bucket are allocated exactly and bypass the pool.
	pub fn acquire(&self, size: usize) -> Vec<u8> {
		let n = bucket_for(size);
		let Some(bucket) = self.buckets.get(n) else {
			tracing::trace!(size, "bytebuf.acquire.oversized");
			return vec![0; size];
		};

		let mut buf = bucket.lock().pop().unwrap_or_else(|| Vec::with_capacity(bucket_size(n)));
		buf.clear();
		buf.resize(size, 0);
		buf
	}

	/// Hands a buffer back for reuse.
	///
	/// The buffer is filed under the largest bucket its capacity covers, so
	/// a later [`acquire`](Self::acquire) never has to grow it. Buffers too
	/// small for bucket 0, beyond the largest bucket, or arriving at a full
	/// bucket are dropped.
	pub fn release(&self, buf: Vec<u8>) {
		let cap = buf.capacity();
		let mut n = bucket_for(cap);
		if n >= self.buckets.len() {
			tracing::trace!(cap, "bytebuf.release.oversized");
			return;
		}
		if cap < bucket_size(n) {
			if n == 0 {
				return;
			}
			n -= 1;
		}

		let mut bucket = self.buckets[n].lock();
		if bucket.len() < self.retain {
			bucket.push(buf);
		}
	}

	/// Number of idle buffers held in bucket `n`.
	pub fn idle(&self, n: usize) -> usize {
		self.buckets.get(n).map_or(0, |b| b.lock().len())
	}
}
