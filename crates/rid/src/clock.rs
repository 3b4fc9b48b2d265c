//! Shared source of fresh transaction identifiers.

use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::order::{Rid, Width};

/// Monotonic identifier clock that wraps to zero after `W::MAX`.
///
/// Clones share one sequence. The backing counter is 64 bits wide and is
/// truncated to `W` on read, so narrower widths wrap naturally.
#[derive(Debug)]
pub struct RidClock<W> {
	next: Arc<AtomicU64>,
	_width: PhantomData<fn() -> W>,
}

impl<W> Clone for RidClock<W> {
	fn clone(&self) -> Self {
		Self {
			next: Arc::clone(&self.next),
			_width: PhantomData,
		}
	}
}

impl<W: Width> Default for RidClock<W> {
	fn default() -> Self {
		Self::new()
	}
}

impl<W: Width> RidClock<W> {
	/// Creates a clock whose first identifier is 0.
	pub fn new() -> Self {
		Self::starting_at(W::default())
	}

	/// Creates a clock whose first identifier is `first`.
	pub fn starting_at(first: W) -> Self {
		Self {
			next: Arc::new(AtomicU64::new(first.to_u64())),
			_width: PhantomData,
		}
	}

	/// Returns the next identifier.
	#[allow(clippy::should_implement_trait, reason = "shared clock, not an iterator")]
	pub fn next(&self) -> Rid<W> {
		Rid(W::from_u64_wrapping(self.next.fetch_add(1, Ordering::AcqRel)))
	}

	/// Returns the identifier the next call to [`Self::next`] would hand out.
	pub fn peek(&self) -> Rid<W> {
		Rid(W::from_u64_wrapping(self.next.load(Ordering::Acquire)))
	}
}
