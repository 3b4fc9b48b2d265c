//! Construction-time settings for [`crate::ObjectRegistry`].

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Registry tuning knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
	/// Number of slots to reserve up front. Does not create any objects.
	pub initial_capacity: usize,
}

/// Returns the default number of pre-reserved slots.
fn default_initial_capacity() -> usize {
	64
}

impl Default for RegistryConfig {
	fn default() -> Self {
		Self {
			initial_capacity: default_initial_capacity(),
		}
	}
}

impl RegistryConfig {
	/// Parses a config from a TOML document. Missing keys take defaults.
	pub fn from_toml(src: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(src)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_document_uses_defaults() {
		assert_eq!(RegistryConfig::from_toml("").unwrap(), RegistryConfig::default());
	}

	#[test]
	fn reads_initial_capacity() {
		let cfg = RegistryConfig::from_toml("initial_capacity = 8").unwrap();
		assert_eq!(cfg.initial_capacity, 8);
	}

	#[test]
	fn rejects_unknown_keys() {
		assert!(matches!(RegistryConfig::from_toml("capacity = 8"), Err(ConfigError::Toml(_))));
	}
}
