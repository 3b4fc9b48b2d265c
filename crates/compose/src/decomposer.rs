//! Frame parser.
//!
//! Part names must be UTF-8, which is stricter than a raw-byte name field:
//! frames carrying binary names fail with [`ComposeError::InvalidName`].

use bytes::{Buf, Bytes};

use crate::error::{ComposeError, Result};

/// Splits a frame into its named parts.
///
/// Parts share the decoded frame's buffer, so they stay valid after the
/// caller drops its own handle to it. Reusing a decomposer keeps its
/// allocations.
#[derive(Debug, Clone, Default)]
pub struct Decomposer {
	names: Vec<String>,
	data: Vec<Bytes>,
}

impl Decomposer {
	/// Creates an empty decomposer.
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses `frame`, replacing any previously decoded parts.
	///
	/// On error the decomposer is left empty.
	pub fn decode(&mut self, frame: Bytes) -> Result<()> {
		self.names.clear();
		self.data.clear();
		let res = self.decode_into(frame);
		if res.is_err() {
			self.names.clear();
			self.data.clear();
		}
		res
	}

	fn decode_into(&mut self, mut frame: Bytes) -> Result<()> {
		let total = frame.len();
		if total < 2 {
			return Err(ComposeError::Empty);
		}
		let count = usize::from(frame.get_u16_le());
		self.names.reserve(count);
		self.data.reserve(count);

		for _ in 0..count {
			let name_len = usize::from(take(&mut frame, total, 1)?.get_u8());
			let offset = total - frame.len();
			let name = take(&mut frame, total, name_len)?;
			let name = std::str::from_utf8(&name).map_err(|_| ComposeError::InvalidName(offset))?.to_owned();
			let data_len = take(&mut frame, total, 4)?.get_u32_le() as usize;
			let data = take(&mut frame, total, data_len)?;
			self.names.push(name);
			self.data.push(data);
		}
		tracing::trace!(parts = count, len = total, "compose.decode");
		Ok(())
	}

	/// Number of decoded parts.
	pub fn count(&self) -> usize {
		self.names.len()
	}

	/// Returns part `i` as `(name, data)`.
	pub fn get(&self, i: usize) -> Option<(&str, &Bytes)> {
		Some((self.names.get(i)?.as_str(), self.data.get(i)?))
	}

	/// Returns the data of the first part called `name`.
	pub fn get_by_name(&self, name: &str) -> Option<&Bytes> {
		let i = self.names.iter().position(|n| n == name)?;
		self.data.get(i)
	}

	/// Iterates parts in frame order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Bytes)> {
		self.names.iter().map(String::as_str).zip(&self.data)
	}

	/// Consumes the decomposer, returning owned parts in frame order.
	pub fn into_parts(self) -> Vec<(String, Bytes)> {
		self.names.into_iter().zip(self.data).collect()
	}
}

/// Splits `len` bytes off the front of `frame`.
fn take(frame: &mut Bytes, total: usize, len: usize) -> Result<Bytes> {
	if frame.len() < len {
		return Err(ComposeError::Truncated {
			offset: total - frame.len(),
			needed: len - frame.len(),
		});
	}
	Ok(frame.split_to(len))
}
