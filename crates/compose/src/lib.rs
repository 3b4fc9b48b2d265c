//! Framed container of named binary parts.
//!
//! Layout, all integers little endian:
//!
//! ```text
//! u16 count
//! count times:
//!     u8  name length, then the UTF-8 name
//!     u32 data length, then the data
//! ```
//!
//! * [`Composer`]: builds a frame part by part and can be reused
//! * [`Decomposer`]: splits a frame into zero-copy [`Bytes`] parts
//! * [`encode`] / [`decode`]: one-shot helpers over lists of parts

#![warn(missing_docs)]

pub mod composer;
pub mod decomposer;
pub mod error;

use bytes::Bytes;
pub use composer::Composer;
pub use decomposer::Decomposer;
pub use error::{ComposeError, Result};

/// Encodes `parts` into a single frame.
pub fn encode<N, D>(parts: &[(N, D)]) -> Result<Bytes>
where
	N: AsRef<str>,
	D: AsRef<[u8]>,
{
	let mut composer = Composer::new();
	for (name, data) in parts {
		composer.add(name.as_ref(), data.as_ref())?;
	}
	Ok(composer.encode())
}

/// Decodes a frame into `(name, data)` pairs, in frame order.
pub fn decode(frame: Bytes) -> Result<Vec<(String, Bytes)>> {
	let mut decomposer = Decomposer::new();
	decomposer.decode(frame)?;
	Ok(decomposer.into_parts())
}
