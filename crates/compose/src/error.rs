//! Error types for framing.

use thiserror::Error;

/// Errors raised while composing or decomposing a frame.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ComposeError {
	/// A non-empty part name was added twice.
	#[error("part {0:?} already exists")]
	Duplicate(String),
	/// A part name does not fit the one-byte length prefix.
	#[error("part name is {0} bytes, at most 255 allowed")]
	NameTooLong(usize),
	/// A part body does not fit the four-byte length prefix.
	#[error("part data is {0} bytes, at most 4294967295 allowed")]
	DataTooLong(usize),
	/// The frame already holds `u16::MAX` parts.
	#[error("frame holds too many parts")]
	TooManyParts,
	/// The input is too short to hold even the part count.
	#[error("can't decode empty")]
	Empty,
	/// A length prefix points past the end of the input.
	#[error("frame truncated at byte {offset}: need {needed} more bytes")]
	Truncated {
		/// Offset of the field being read.
		offset: usize,
		/// Bytes missing to complete that field.
		needed: usize,
	},
	/// A part name is not valid UTF-8.
	#[error("part name at byte {0} is not UTF-8")]
	InvalidName(usize),
}

/// Result type for framing operations.
pub type Result<T> = std::result::Result<T, ComposeError>;
