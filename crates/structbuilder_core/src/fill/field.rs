use std::fmt;

use crate::fill::Slot;

/// Record type whose fields are filled by per-field queries.
///
/// Usually implemented through [`record!`](crate::record), but hand-written
/// impls work the same way.
pub trait Record: Default + 'static {
	/// Field descriptors in declaration order.
	const FIELDS: &'static [Field<Self>];
}

/// Descriptor for one field of `R`.
pub struct Field<R> {
	name: &'static str,
	query: Option<&'static str>,
	slot: fn(&mut R) -> Slot<'_>,
}

impl<R> Field<R> {
	/// Describe a field; `query` is `None` for fields the filler leaves alone.
	pub const fn new(name: &'static str, query: Option<&'static str>, slot: fn(&mut R) -> Slot<'_>) -> Self {
		Self { name, query, slot }
	}

	/// Rust field name.
	pub fn name(&self) -> &'static str {
		self.name
	}

	/// Declared query text.
	pub fn query(&self) -> Option<&'static str> {
		self.query
	}

	/// Borrow this field of `record`.
	pub fn slot<'r>(&self, record: &'r mut R) -> Slot<'r> {
		(self.slot)(record)
	}
}

impl<R> Clone for Field<R> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<R> Copy for Field<R> {}

impl<R> fmt::Debug for Field<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Field").field("name", &self.name).field("query", &self.query).finish()
	}
}
