//! Circular ("wraparound") order over fixed-width counters.
//!
//! A counter that overflows restarts from zero, so plain numeric order stops
//! telling which identifier was issued first. The numeric range is split in
//! quarters: a value in the bottom quarter compared against one in the top
//! quarter is assumed to have wrapped forward past it. Everywhere else the
//! numeric order is kept.
//!
//! The answer is only meaningful while every identifier being compared lies
//! within half the numeric range of the others. Values outside that window
//! still compare without panicking, but the result says nothing about issue
//! order. Callers own that precondition.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

mod sealed {
	pub trait Sealed {}
}

/// Unsigned counter width usable as a transaction identifier.
pub trait Width: Copy + Eq + Ord + Default + fmt::Debug + fmt::Display + Send + Sync + 'static + sealed::Sealed {
	/// Largest representable value.
	const MAX: Self;
	/// Top of the bottom quarter, `MAX / 4`.
	const LOWER: Self;
	/// Bottom of the top quarter, `MAX / 4 * 3`.
	const UPPER: Self;

	/// Truncates a 64-bit counter value to this width.
	fn from_u64_wrapping(value: u64) -> Self;

	/// Widens to `u64` (for logging and counters).
	fn to_u64(self) -> u64;
}

macro_rules! impl_width {
	($($ty:ty),* $(,)?) => {$(
		impl sealed::Sealed for $ty {}

		impl Width for $ty {
			const MAX: Self = <$ty>::MAX;
			const LOWER: Self = <$ty>::MAX / 4;
			const UPPER: Self = <$ty>::MAX / 4 * 3;

			#[inline]
			fn from_u64_wrapping(value: u64) -> Self {
				value as $ty
			}

			#[inline]
			fn to_u64(self) -> u64 {
				self as u64
			}
		}
	)*};
}

impl_width!(u16, u32, u64);

/// Returns true when `i` comes before `j` in circular order.
///
/// When one value sits in the top quarter and the other in the bottom
/// quarter, the bottom one is taken to have wrapped and the numeric order is
/// reversed. Irreflexive: `precedes(i, i)` is always false.
#[inline]
#[must_use]
pub fn precedes<W: Width>(i: W, j: W) -> bool {
	let straddles = (i > W::UPPER && j < W::LOWER) || (i < W::LOWER && j > W::UPPER);
	if straddles { j < i } else { i < j }
}

/// Transaction identifier compared in wraparound order.
///
/// Deliberately not `Ord`: the relation is only consistent inside the
/// half-range window, so sorting arbitrary identifiers with it is unsound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Rid<W>(pub W);

/// 16-bit transaction identifier.
pub type Rid16 = Rid<u16>;
/// 32-bit transaction identifier.
pub type Rid32 = Rid<u32>;
/// 64-bit transaction identifier.
pub type Rid64 = Rid<u64>;

impl<W: Width> Rid<W> {
	/// Wraps a raw counter value.
	#[inline]
	pub const fn new(value: W) -> Self {
		Self(value)
	}

	/// Returns the raw counter value.
	#[inline]
	pub const fn get(self) -> W {
		self.0
	}

	/// Returns true when `self` was issued before `other`.
	#[inline]
	#[must_use]
	pub fn less(self, other: Self) -> bool {
		precedes(self.0, other.0)
	}

	/// Three-way comparison in wraparound order.
	pub fn wrap_cmp(self, other: Self) -> Ordering {
		if self.0 == other.0 {
			Ordering::Equal
		} else if self.less(other) {
			Ordering::Less
		} else {
			Ordering::Greater
		}
	}
}

impl<W: Width> From<W> for Rid<W> {
	fn from(value: W) -> Self {
		Self(value)
	}
}

impl<W: Width> fmt::Display for Rid<W> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.0, f)
	}
}
