//! Error types for registry operations and configuration.

use thiserror::Error;

/// Failures returned by [`crate::ObjectRegistry`] operations.
///
/// None of these are retried internally. Retrying a take is the caller's
/// call, expressed by invoking it again.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JugglerError {
	/// The index is out of range or refers to a removed object.
	#[error("juggler: not found")]
	NotFound,
	/// Removal was attempted while the object is owned or awaited.
	#[error("juggler: can't drop taken object")]
	DropTaken,
	/// Free was attempted on an object nobody owns.
	#[error("juggler: can't free not taken")]
	NotTaken,
	/// Free was attempted by a transaction other than the owner.
	#[error("juggler: wrong owner")]
	WrongOwner,
}

impl JugglerError {
	/// Short stable name for log fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::NotFound => "not_found",
			Self::DropTaken => "drop_taken",
			Self::NotTaken => "not_taken",
			Self::WrongOwner => "wrong_owner",
		}
	}
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, JugglerError>;

/// Errors that can occur when loading a [`crate::RegistryConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
	/// The TOML document could not be parsed into a config.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),
}
