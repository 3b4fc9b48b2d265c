//! Wraparound-safe transaction identifiers.
//!
//! Identifiers are fixed-width counters that keep a usable order after the
//! counter overflows and restarts from zero:
//! * [`Width`]: the supported counter widths (`u16`, `u32`, `u64`)
//! * [`Rid`]: an identifier compared in circular order via [`Rid::less`]
//! * [`RidClock`]: a shared, wrapping source of fresh identifiers

#![warn(missing_docs)]

pub mod clock;
pub mod order;

pub use clock::RidClock;
pub use order::{Rid, Rid16, Rid32, Rid64, Width, precedes};
