//! Slot table state. Callers provide all synchronization.

use whisper_rid::{Rid, Width};

use crate::error::{JugglerError, Result};

/// State of one arbitrable object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Slot<W> {
	pub(super) owner: Option<Rid<W>>,
	/// Best-priority transaction currently blocked on this slot.
	pub(super) waiter: Option<Rid<W>>,
	/// The current owner has already been sent an interrupt.
	pub(super) interrupted: bool,
	pub(super) deleted: bool,
}

impl<W: Width> Slot<W> {
	const fn vacant() -> Self {
		Self {
			owner: None,
			waiter: None,
			interrupted: false,
			deleted: false,
		}
	}

	/// Remembers `txn` as the waiter unless a better one is already recorded.
	fn record_waiter(&mut self, txn: Rid<W>) {
		match self.waiter {
			Some(current) if !txn.less(current) => {}
			_ => self.waiter = Some(txn),
		}
	}
}

/// What a take attempt decided under the lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TakeStep<W> {
	/// Ownership was granted to the caller.
	Granted,
	/// The caller already owns the slot.
	Reentrant,
	/// The caller must park and retry.
	Wait,
	/// The caller must interrupt this later owner, then park and retry.
	Preempt(Rid<W>),
}

/// How a removal changed the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Removal {
	/// The tail shrank by this many slots.
	Truncated(usize),
	/// The slot was tombstoned and queued for reuse.
	Tombstoned,
}

#[derive(Debug)]
pub(super) struct Table<W> {
	slots: Vec<Slot<W>>,
	/// Tombstoned indices, most recent last. May hold stale entries past the tail.
	frees: Vec<usize>,
}

impl<W: Width> Table<W> {
	pub(super) fn with_capacity(capacity: usize) -> Self {
		Self {
			slots: Vec::with_capacity(capacity),
			frees: Vec::new(),
		}
	}

	pub(super) fn len(&self) -> usize {
		self.slots.len()
	}

	pub(super) fn live(&self) -> usize {
		self.slots.iter().filter(|s| !s.deleted).count()
	}

	pub(super) fn add(&mut self) -> usize {
		while let Some(index) = self.frees.pop() {
			if let Some(slot) = self.slots.get_mut(index)
				&& slot.deleted
			{
				*slot = Slot::vacant();
				return index;
			}
		}
		self.slots.push(Slot::vacant());
		self.slots.len() - 1
	}

	pub(super) fn remove(&mut self, index: usize) -> Result<Removal> {
		let slot = self.slot(index)?;
		if slot.owner.is_some() || slot.waiter.is_some() {
			return Err(JugglerError::DropTaken);
		}

		if index + 1 < self.slots.len() {
			self.slots[index].deleted = true;
			self.frees.push(index);
			return Ok(Removal::Tombstoned);
		}

		let before = self.slots.len();
		self.slots.pop();
		while self.slots.last().is_some_and(|s| s.deleted) {
			self.slots.pop();
		}
		Ok(Removal::Truncated(before - self.slots.len()))
	}

	pub(super) fn try_take(&mut self, txn: Rid<W>, index: usize) -> Result<TakeStep<W>> {
		let slot = self.slot_mut(index)?;
		match slot.owner {
			None => {
				if let Some(waiter) = slot.waiter
					&& waiter.less(txn)
				{
					return Ok(TakeStep::Wait);
				}
				if slot.waiter == Some(txn) {
					slot.waiter = None;
				}
				slot.owner = Some(txn);
				slot.interrupted = false;
				Ok(TakeStep::Granted)
			}
			Some(owner) if owner == txn => Ok(TakeStep::Reentrant),
			Some(owner) => {
				slot.record_waiter(txn);
				if owner.less(txn) || slot.interrupted {
					Ok(TakeStep::Wait)
				} else {
					slot.interrupted = true;
					Ok(TakeStep::Preempt(owner))
				}
			}
		}
	}

	pub(super) fn free(&mut self, txn: Rid<W>, index: usize) -> Result<()> {
		let slot = self.slot_mut(index)?;
		match slot.owner {
			None => Err(JugglerError::NotTaken),
			Some(owner) if owner != txn => Err(JugglerError::WrongOwner),
			Some(_) => {
				slot.owner = None;
				slot.interrupted = false;
				Ok(())
			}
		}
	}

	pub(super) fn slot(&self, index: usize) -> Result<&Slot<W>> {
		match self.slots.get(index) {
			Some(slot) if !slot.deleted => Ok(slot),
			_ => Err(JugglerError::NotFound),
		}
	}

	fn slot_mut(&mut self, index: usize) -> Result<&mut Slot<W>> {
		match self.slots.get_mut(index) {
			Some(slot) if !slot.deleted => Ok(slot),
			_ => Err(JugglerError::NotFound),
		}
	}
}
