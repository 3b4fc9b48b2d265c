//! Multi-threaded take/free scenarios.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use whisper_juggler::{JugglerError, NoInterrupt, ObjectRegistry, Rid32};
use whisper_rid::RidClock;

fn init() {
	let _ = tracing_subscriber::fmt::try_init();
}

fn rid(v: u32) -> Rid32 {
	Rid32::new(v)
}

/// Polls `cond` until it holds or five seconds pass.
fn wait_until(what: &str, mut cond: impl FnMut() -> bool) {
	let deadline = Instant::now() + Duration::from_secs(5);
	while !cond() {
		assert!(Instant::now() < deadline, "timed out waiting for {what}");
		thread::sleep(Duration::from_millis(1));
	}
}

/// Registry whose interrupt hook records every preempted owner.
fn recording_registry() -> (ObjectRegistry<u32>, Arc<Mutex<Vec<Rid32>>>) {
	let calls = Arc::new(Mutex::new(Vec::new()));
	let sink = Arc::clone(&calls);
	let reg = ObjectRegistry::new(move |owner: Rid32| sink.lock().push(owner));
	(reg, calls)
}

#[test]
fn earlier_transaction_preempts_then_waits_for_free() {
	init();
	let (reg, calls) = recording_registry();
	let idx = reg.add();
	assert_eq!(idx, 0);
	reg.take(rid(100), idx).unwrap();

	let contender = {
		let reg = reg.clone();
		thread::spawn(move || reg.take(rid(50), idx))
	};

	wait_until("50 to be recorded as waiter", || reg.slot(idx).and_then(|s| s.waiter) == Some(rid(50)));
	thread::sleep(Duration::from_millis(20));
	assert!(!contender.is_finished(), "50 must block while 100 holds the object");
	assert_eq!(*calls.lock(), vec![rid(100)]);

	reg.free(rid(100), idx).unwrap();
	assert_eq!(contender.join().unwrap(), Ok(()));

	let slot = reg.slot(idx).unwrap();
	assert_eq!((slot.owner, slot.waiter), (Some(rid(50)), None));
	assert_eq!(*calls.lock(), vec![rid(100)], "owner interrupted exactly once");
}

#[test]
fn later_transaction_waits_without_interrupting() {
	init();
	let (reg, calls) = recording_registry();
	let idx = reg.add();
	reg.take(rid(100), idx).unwrap();

	let contender = {
		let reg = reg.clone();
		thread::spawn(move || reg.take(rid(200), idx))
	};

	wait_until("200 to be recorded as waiter", || reg.slot(idx).and_then(|s| s.waiter) == Some(rid(200)));
	thread::sleep(Duration::from_millis(20));
	assert!(!contender.is_finished());
	assert!(calls.lock().is_empty());

	reg.free(rid(100), idx).unwrap();
	assert_eq!(contender.join().unwrap(), Ok(()));
	assert_eq!(reg.slot(idx).unwrap().owner, Some(rid(200)));
}

#[test]
fn interrupt_hook_drives_owner_to_release() {
	init();
	let (tx, rx) = mpsc::channel::<Rid32>();
	let tx = Mutex::new(tx);
	let reg = ObjectRegistry::<u32>::new(move |owner: Rid32| {
		let _ = tx.lock().send(owner);
	});
	let idx = reg.add();
	reg.take(rid(500), idx).unwrap();

	// The owner releases only once it is told to.
	let owner = {
		let reg = reg.clone();
		thread::spawn(move || {
			let victim = rx.recv_timeout(Duration::from_secs(5)).expect("interrupt should arrive");
			assert_eq!(victim, rid(500));
			reg.free(victim, idx)
		})
	};

	reg.take(rid(10), idx).unwrap();
	assert_eq!(owner.join().unwrap(), Ok(()));
	assert_eq!(reg.slot(idx).unwrap().owner, Some(rid(10)));
}

#[test]
fn freed_object_goes_to_the_best_waiter() {
	init();
	let reg = ObjectRegistry::<u32>::new(NoInterrupt);
	let idx = reg.add();
	reg.take(rid(1), idx).unwrap();

	let order = Arc::new(Mutex::new(Vec::new()));
	let spawn_taker = |txn: u32| {
		let reg = reg.clone();
		let order = Arc::clone(&order);
		thread::spawn(move || {
			reg.take(rid(txn), idx).unwrap();
			order.lock().push(txn);
			reg.free(rid(txn), idx).unwrap();
		})
	};

	let late = spawn_taker(30);
	wait_until("30 waiting", || reg.slot(idx).and_then(|s| s.waiter) == Some(rid(30)));
	let early = spawn_taker(20);
	wait_until("20 waiting", || reg.slot(idx).and_then(|s| s.waiter) == Some(rid(20)));

	reg.free(rid(1), idx).unwrap();
	early.join().unwrap();
	late.join().unwrap();
	assert_eq!(*order.lock(), vec![20, 30]);
}

#[test]
fn awaited_object_cannot_be_removed() {
	init();
	let reg = ObjectRegistry::<u32>::new(NoInterrupt);
	let idx = reg.add();
	reg.take(rid(1), idx).unwrap();

	let contender = {
		let reg = reg.clone();
		thread::spawn(move || {
			reg.take(rid(2), idx)?;
			reg.free(rid(2), idx)
		})
	};
	wait_until("2 waiting", || reg.slot(idx).and_then(|s| s.waiter).is_some());

	assert_eq!(reg.remove(idx), Err(JugglerError::DropTaken));
	reg.free(rid(1), idx).unwrap();
	assert_eq!(contender.join().unwrap(), Ok(()));
	assert_eq!(reg.remove(idx), Ok(()));
	assert_eq!(reg.take(rid(3), idx), Err(JugglerError::NotFound));
}

#[test]
fn free_wakes_takers_of_other_objects_harmlessly() {
	init();
	let (reg, calls) = recording_registry();
	let a = reg.add();
	let b = reg.add();
	reg.take(rid(100), a).unwrap();
	reg.take(rid(7), b).unwrap();

	let contender = {
		let reg = reg.clone();
		thread::spawn(move || reg.take(rid(50), a))
	};
	wait_until("50 waiting on a", || reg.slot(a).and_then(|s| s.waiter) == Some(rid(50)));

	// Unrelated broadcasts must not repeat the interrupt.
	for _ in 0..5 {
		reg.free(rid(7), b).unwrap();
		reg.take(rid(7), b).unwrap();
	}
	thread::sleep(Duration::from_millis(20));
	assert_eq!(*calls.lock(), vec![rid(100)]);

	reg.free(rid(100), a).unwrap();
	assert_eq!(contender.join().unwrap(), Ok(()));
}

#[test]
fn stress_mutual_exclusion_across_wrap() {
	init();
	const THREADS: usize = 8;
	const ROUNDS: usize = 200;

	let reg = ObjectRegistry::<u32>::new(NoInterrupt);
	let slots: Vec<usize> = (0..3).map(|_| reg.add()).collect();
	let clock = RidClock::<u32>::starting_at(u32::MAX - 500);
	let inside: Arc<Vec<AtomicBool>> = Arc::new(slots.iter().map(|_| AtomicBool::new(false)).collect());
	let grants = Arc::new(AtomicUsize::new(0));

	let handles: Vec<_> = (0..THREADS)
		.map(|t| {
			let reg = reg.clone();
			let clock = clock.clone();
			let inside = Arc::clone(&inside);
			let grants = Arc::clone(&grants);
			let slots = slots.clone();
			thread::spawn(move || {
				for round in 0..ROUNDS {
					let idx = slots[(t + round) % slots.len()];
					let txn = clock.next();
					reg.take(txn, idx).unwrap();
					assert!(!inside[idx].swap(true, Ordering::SeqCst), "two owners inside object {idx}");
					grants.fetch_add(1, Ordering::SeqCst);
					inside[idx].store(false, Ordering::SeqCst);
					reg.free(txn, idx).unwrap();
				}
			})
		})
		.collect();

	for h in handles {
		h.join().unwrap();
	}
	assert_eq!(grants.load(Ordering::SeqCst), THREADS * ROUNDS);
	for idx in slots {
		let slot = reg.slot(idx).unwrap();
		assert_eq!((slot.owner, slot.waiter), (None, None));
	}
}
