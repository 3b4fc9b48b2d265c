//! Pool sizing.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pool::MAX_BUCKETS;

/// Pool sizing knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolConfig {
	/// Number of size classes; bucket `n` holds `1 << n` byte buffers.
	/// Clamped to `1..=MAX_BUCKETS`.
	pub buckets: usize,
	/// Idle buffers kept per bucket; extra releases are dropped.
	pub retain_per_bucket: usize,
}

fn default_buckets() -> usize {
	MAX_BUCKETS
}

fn default_retain_per_bucket() -> usize {
	64
}

impl Default for PoolConfig {
	fn default() -> Self {
		Self {
			buckets: default_buckets(),
			retain_per_bucket: default_retain_per_bucket(),
		}
	}
}

impl PoolConfig {
	/// Parses a config from a TOML document. Missing keys take defaults.
	pub fn from_toml(src: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(src)?)
	}
}

/// Errors that can occur when loading a [`PoolConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
	/// The TOML document could not be parsed into a config.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),
}
