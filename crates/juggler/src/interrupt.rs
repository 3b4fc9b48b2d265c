//! Preemption hook.

use whisper_rid::{Rid, Width};

/// Signals an owning transaction that it should give up its objects.
///
/// Called by [`crate::ObjectRegistry::take`] when a transaction that precedes
/// the current owner asks for the object. The owner is expected to wind down
/// and [`free`](crate::ObjectRegistry::free) what it holds. The return value
/// of the signal is never consulted.
///
/// # Re-entrancy
///
/// The hook runs synchronously **while the registry lock is held**. It must
/// not call any method of the registry that invoked it, directly or through
/// another thread it blocks on; doing so deadlocks. Formatting the registry
/// with `{:?}` is safe and prints `<locked>`. Hand the owner identifier
/// off (channel, flag, cancellation token) and return.
pub trait Interrupt<W: Width>: Send + Sync {
	/// Asks `owner` to abandon its claim.
	fn interrupt(&self, owner: Rid<W>);
}

impl<W, F> Interrupt<W> for F
where
	W: Width,
	F: Fn(Rid<W>) + Send + Sync,
{
	fn interrupt(&self, owner: Rid<W>) {
		self(owner)
	}
}

/// Hook that ignores every preemption request.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInterrupt;

impl<W: Width> Interrupt<W> for NoInterrupt {
	fn interrupt(&self, _owner: Rid<W>) {}
}
