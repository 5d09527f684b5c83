use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::BuildHasher;

use crate::fill::{Filler, Record, Result};
use crate::jq::{Map, Value};

/// Field kinds the filler distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
	/// UTF-8 string.
	String,
	/// Signed 64-bit integer.
	Int64,
	/// 64-bit float.
	Float64,
	/// Boolean.
	Bool,
	/// String-keyed map of arbitrary values.
	MapOfInterface,
	/// String-keyed map of nested records.
	MapOfRecord,
	/// Array-like field; declarable but not fillable.
	Sequence,
	/// Nested record outside a map; declarable but not fillable.
	Record,
}

impl fmt::Display for Kind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::String => "string",
			Self::Int64 => "int64",
			Self::Float64 => "float64",
			Self::Bool => "bool",
			Self::MapOfInterface => "map of interface",
			Self::MapOfRecord => "map of record",
			Self::Sequence => "sequence",
			Self::Record => "record",
		})
	}
}

/// Mutable view of one record field, tagged with its kind.
pub enum Slot<'a> {
	/// String field.
	String(&'a mut String),
	/// Integer field.
	Int64(&'a mut i64),
	/// Float field.
	Float64(&'a mut f64),
	/// Boolean field.
	Bool(&'a mut bool),
	/// Arbitrary JSON map field.
	MapOfInterface(&'a mut Map),
	/// Map of nested records.
	MapOfRecord(&'a mut dyn RecordMap),
	/// Field of a kind without a converter.
	Unsupported(Kind),
}

impl Slot<'_> {
	/// Kind of the underlying field.
	pub fn kind(&self) -> Kind {
		match self {
			Self::String(_) => Kind::String,
			Self::Int64(_) => Kind::Int64,
			Self::Float64(_) => Kind::Float64,
			Self::Bool(_) => Kind::Bool,
			Self::MapOfInterface(_) => Kind::MapOfInterface,
			Self::MapOfRecord(_) => Kind::MapOfRecord,
			Self::Unsupported(kind) => *kind,
		}
	}

	/// Render the field's current value for error messages.
	pub fn describe(&self) -> String {
		match self {
			Self::String(value) => format!("{value:?}"),
			Self::Int64(value) => value.to_string(),
			Self::Float64(value) => value.to_string(),
			Self::Bool(value) => value.to_string(),
			Self::MapOfInterface(map) => Value::object((**map).clone()).to_json(),
			Self::MapOfRecord(map) => format!("map with {} entries", map.entry_count()),
			Self::Unsupported(kind) => format!("<{kind}>"),
		}
	}
}

impl fmt::Debug for Slot<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Slot::{:?}({})", self.kind(), self.describe())
	}
}

/// Field types the filler can address; the slot variant decides the field's kind.
pub trait IntoSlot {
	/// Borrow the field as a typed slot.
	fn slot(&mut self) -> Slot<'_>;
}

impl IntoSlot for String {
	fn slot(&mut self) -> Slot<'_> {
		Slot::String(self)
	}
}

impl IntoSlot for i64 {
	fn slot(&mut self) -> Slot<'_> {
		Slot::Int64(self)
	}
}

impl IntoSlot for f64 {
	fn slot(&mut self) -> Slot<'_> {
		Slot::Float64(self)
	}
}

impl IntoSlot for bool {
	fn slot(&mut self) -> Slot<'_> {
		Slot::Bool(self)
	}
}

impl IntoSlot for Map {
	fn slot(&mut self) -> Slot<'_> {
		Slot::MapOfInterface(self)
	}
}

impl<R: Record> IntoSlot for BTreeMap<String, R> {
	fn slot(&mut self) -> Slot<'_> {
		Slot::MapOfRecord(self)
	}
}

impl<R: Record, S: BuildHasher + Default + 'static> IntoSlot for HashMap<String, R, S> {
	fn slot(&mut self) -> Slot<'_> {
		Slot::MapOfRecord(self)
	}
}

impl<T> IntoSlot for Vec<T> {
	fn slot(&mut self) -> Slot<'_> {
		Slot::Unsupported(Kind::Sequence)
	}
}

/// String-keyed map whose values are records filled from sub-documents.
pub trait RecordMap {
	/// Fill one fresh record per entry and replace the map once every entry succeeds.
	fn fill_entries(&mut self, field: &'static str, entries: &Map, filler: &Filler, depth: u32) -> Result<()>;

	/// Number of entries currently held.
	fn entry_count(&self) -> usize;
}

impl<R: Record> RecordMap for BTreeMap<String, R> {
	fn fill_entries(&mut self, field: &'static str, entries: &Map, filler: &Filler, depth: u32) -> Result<()> {
		let mut filled = BTreeMap::new();
		for (key, entry) in entries {
			filled.insert(key.clone(), filler.fill_entry::<R>(field, key, entry, depth)?);
		}
		*self = filled;
		Ok(())
	}

	fn entry_count(&self) -> usize {
		self.len()
	}
}

impl<R: Record, S: BuildHasher + Default> RecordMap for HashMap<String, R, S> {
	fn fill_entries(&mut self, field: &'static str, entries: &Map, filler: &Filler, depth: u32) -> Result<()> {
		let mut filled = HashMap::with_capacity_and_hasher(entries.len(), S::default());
		for (key, entry) in entries {
			filled.insert(key.clone(), filler.fill_entry::<R>(field, key, entry, depth)?);
		}
		*self = filled;
		Ok(())
	}

	fn entry_count(&self) -> usize {
		self.len()
	}
}
