//! The shared object table and its take/free protocol.

use std::fmt;
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};
use whisper_rid::{Rid, Width};

use crate::config::RegistryConfig;
use crate::error::Result;
use crate::interrupt::Interrupt;

mod table;

use table::{Removal, Table, TakeStep};

/// Point-in-time view of one live object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSnapshot<W> {
	/// Stable handle of the object.
	pub index: usize,
	/// Transaction holding the object, if any.
	pub owner: Option<Rid<W>>,
	/// Best-priority transaction blocked on the object, if any.
	pub waiter: Option<Rid<W>>,
}

struct RegistryInner<W> {
	interrupt: Box<dyn Interrupt<W>>,
	table: Mutex<Table<W>>,
	/// Broadcast on every successful take, free, and removal.
	changed: Condvar,
}

/// Thread-safe table of objects with preemptive, priority-ordered ownership.
///
/// Cloning yields another handle to the same table. One lock guards every
/// slot and the free list; [`take`](Self::take) is the only operation that
/// blocks.
pub struct ObjectRegistry<W = u32> {
	inner: Arc<RegistryInner<W>>,
}

impl<W> Clone for ObjectRegistry<W> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<W: Width> fmt::Debug for ObjectRegistry<W> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		// May run inside an interrupt hook, where the lock is already held.
		let Some(table) = self.inner.table.try_lock() else {
			return f.debug_struct("ObjectRegistry").field("table", &format_args!("<locked>")).finish();
		};
		f.debug_struct("ObjectRegistry").field("len", &table.len()).field("live", &table.live()).finish()
	}
}

impl<W: Width> ObjectRegistry<W> {
	/// Creates an empty registry with default settings.
	pub fn new(interrupt: impl Interrupt<W> + 'static) -> Self {
		Self::with_config(&RegistryConfig::default(), interrupt)
	}

	/// Creates an empty registry.
	pub fn with_config(config: &RegistryConfig, interrupt: impl Interrupt<W> + 'static) -> Self {
		Self {
			inner: Arc::new(RegistryInner {
				interrupt: Box::new(interrupt),
				table: Mutex::new(Table::with_capacity(config.initial_capacity)),
				changed: Condvar::new(),
			}),
		}
	}

	/// Creates a free object and returns its handle.
	///
	/// The most recently removed handle is reused when one is available.
	pub fn add(&self) -> usize {
		let index = self.inner.table.lock().add();
		tracing::trace!(index, "juggler.add");
		index
	}

	/// Removes an idle object.
	///
	/// Removing the last handle shrinks the table (together with any removed
	/// handles it exposes at the tail); any other handle is tombstoned and
	/// queued for reuse by [`add`](Self::add).
	///
	/// # Errors
	///
	/// [`NotFound`](crate::JugglerError::NotFound) for an unknown handle and
	/// [`DropTaken`](crate::JugglerError::DropTaken) while the object is
	/// owned or has a recorded waiter.
	pub fn remove(&self, index: usize) -> Result<()> {
		let removal = self.inner.table.lock().remove(index);
		match removal {
			Ok(Removal::Truncated(shrunk)) => {
				tracing::trace!(index, shrunk, "juggler.remove.truncate");
			}
			Ok(Removal::Tombstoned) => {
				tracing::trace!(index, "juggler.remove.tombstone");
			}
			Err(err) => {
				tracing::debug!(index, error = err.as_str(), "juggler.remove.rejected");
				return Err(err);
			}
		}
		self.inner.changed.notify_all();
		Ok(())
	}

	/// Takes exclusive ownership of an object for `txn`, blocking as needed.
	///
	/// * A free object is granted at once unless a transaction that precedes
	///   `txn` is recorded as its waiter.
	/// * Taking an object `txn` already owns succeeds immediately.
	/// * If the owner precedes `txn`, the caller waits for it to free.
	/// * Otherwise the owner is later than `txn`: it is sent one interrupt per
	///   ownership tenure and the caller waits for it to free.
	///
	/// Only the best-priority blocked transaction is remembered per object.
	/// Every wake re-runs the checks from scratch, including whether the
	/// object still exists. A parked take can only observe a removal in the
	/// window between a broadcast and reacquiring the lock, since an object
	/// with blocked takers is awaited and cannot be removed.
	///
	/// The [`Interrupt`] hook runs with the registry lock held.
	///
	/// # Errors
	///
	/// [`NotFound`](crate::JugglerError::NotFound) if the handle is unknown
	/// on entry or on any wake.
	pub fn take(&self, txn: Rid<W>, index: usize) -> Result<()> {
		let mut table = self.inner.table.lock();
		loop {
			let step = match table.try_take(txn, index) {
				Ok(step) => step,
				Err(err) => {
					tracing::trace!(index, txn = %txn, error = err.as_str(), "juggler.take.rejected");
					return Err(err);
				}
			};
			match step {
				TakeStep::Granted => {
					tracing::trace!(index, txn = %txn, "juggler.take.granted");
					self.inner.changed.notify_all();
					return Ok(());
				}
				TakeStep::Reentrant => return Ok(()),
				TakeStep::Wait => {
					tracing::trace!(index, txn = %txn, "juggler.take.wait");
				}
				TakeStep::Preempt(owner) => {
					tracing::debug!(index, txn = %txn, owner = %owner, "juggler.take.preempt");
					self.inner.interrupt.interrupt(owner);
				}
			}
			self.inner.changed.wait(&mut table);
		}
	}

	/// Releases an object owned by `txn` and wakes every blocked taker.
	///
	/// # Errors
	///
	/// [`NotFound`](crate::JugglerError::NotFound) for an unknown handle,
	/// [`NotTaken`](crate::JugglerError::NotTaken) if nobody owns it and
	/// [`WrongOwner`](crate::JugglerError::WrongOwner) if someone else does.
	pub fn free(&self, txn: Rid<W>, index: usize) -> Result<()> {
		if let Err(err) = self.inner.table.lock().free(txn, index) {
			tracing::debug!(index, txn = %txn, error = err.as_str(), "juggler.free.rejected");
			return Err(err);
		}
		tracing::trace!(index, txn = %txn, "juggler.free");
		self.inner.changed.notify_all();
		Ok(())
	}

	/// Returns the current state of a live object.
	pub fn slot(&self, index: usize) -> Option<SlotSnapshot<W>> {
		let table = self.inner.table.lock();
		let slot = table.slot(index).ok()?;
		Some(SlotSnapshot {
			index,
			owner: slot.owner,
			waiter: slot.waiter,
		})
	}

	/// Returns the table length, counting tombstoned handles.
	pub fn len(&self) -> usize {
		self.inner.table.lock().len()
	}

	/// Returns `true` if the table holds no handles at all.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Returns the number of live objects.
	pub fn live(&self) -> usize {
		self.inner.table.lock().live()
	}
}
