//! Frame builder.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{ComposeError, Result};

const COUNT_LEN: usize = 2;

/// Incrementally builds a frame.
///
/// The part count is reserved up front and patched by [`encode`](Self::encode).
#[derive(Debug, Clone)]
pub struct Composer {
	names: Vec<String>,
	result: BytesMut,
}

impl Default for Composer {
	fn default() -> Self {
		Self::new()
	}
}

impl Composer {
	/// Creates an empty composer.
	pub fn new() -> Self {
		let mut result = BytesMut::with_capacity(64);
		result.put_u16_le(0);
		Self { names: Vec::new(), result }
	}

	/// Drops every added part, keeping the allocation.
	pub fn reset(&mut self) {
		self.names.clear();
		self.result.truncate(COUNT_LEN);
	}

	/// Number of parts added so far.
	pub fn len(&self) -> usize {
		self.names.len()
	}

	/// Returns `true` if no part has been added.
	pub fn is_empty(&self) -> bool {
		self.names.is_empty()
	}

	/// Appends a named part.
	///
	/// Non-empty names must be unique within the frame; the empty name may
	/// repeat.
	pub fn add(&mut self, name: &str, data: &[u8]) -> Result<()> {
		if !name.is_empty() && self.names.iter().any(|n| n == name) {
			return Err(ComposeError::Duplicate(name.to_owned()));
		}
		let name_len = u8::try_from(name.len()).map_err(|_| ComposeError::NameTooLong(name.len()))?;
		let data_len = u32::try_from(data.len()).map_err(|_| ComposeError::DataTooLong(data.len()))?;
		if self.names.len() >= usize::from(u16::MAX) {
			return Err(ComposeError::TooManyParts);
		}

		self.names.push(name.to_owned());
		self.result.reserve(1 + name.len() + 4 + data.len());
		self.result.put_u8(name_len);
		self.result.put_slice(name.as_bytes());
		self.result.put_u32_le(data_len);
		self.result.put_slice(data);
		Ok(())
	}

	/// Returns the finished frame.
	///
	/// The composer keeps its contents; call [`reset`](Self::reset) before
	/// building the next frame.
	pub fn encode(&mut self) -> Bytes {
		// `add` caps the part count at u16::MAX.
		let count = self.names.len() as u16;
		self.result[..COUNT_LEN].copy_from_slice(&count.to_le_bytes());
		tracing::trace!(parts = count, len = self.result.len(), "compose.encode");
		Bytes::copy_from_slice(&self.result)
	}
}
