//! Object arbitration registry.
//!
//! A shared table of objects addressed by stable integer handles. Each object
//! is owned by at most one transaction at a time. Contention is settled by
//! transaction identifier in wraparound order ([`whisper_rid::Rid`]). A later
//! transaction waits for an earlier owner to free the object. An earlier
//! transaction signals a later owner through the [`Interrupt`] hook and then
//! waits for it to let go.
//!
//! * [`ObjectRegistry`]: the thread-safe table and its take/free protocol
//! * [`Interrupt`]: preemption hook supplied at construction
//! * [`RegistryConfig`]: construction-time tuning, loadable from TOML

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod interrupt;
pub mod registry;

pub use config::RegistryConfig;
pub use error::{ConfigError, JugglerError, Result};
pub use interrupt::{Interrupt, NoInterrupt};
pub use registry::{ObjectRegistry, SlotSnapshot};
pub use whisper_rid::{Rid, Rid16, Rid32, Rid64, Width};
