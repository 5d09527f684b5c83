use std::rc::Rc;

use crate::fill::{FillError, Filler, Result, Slot};
use crate::jq::Value;

/// Write the first query output into `slot`; the value's shape must match the slot's kind.
pub(crate) fn write_slot(field: &'static str, slot: Slot<'_>, produced: Option<Value>, filler: &Filler, depth: u32) -> Result<()> {
	match (slot, produced) {
		(Slot::Unsupported(kind), _) => Err(FillError::UnsupportedKind { field, kind }),
		(Slot::String(target), Some(Value::String(text))) => {
			*target = text;
			Ok(())
		}
		// truncates toward zero and saturates at the i64 bounds
		(Slot::Int64(target), Some(Value::Number(number))) => {
			*target = number as i64;
			Ok(())
		}
		(Slot::Float64(target), Some(Value::Number(number))) => {
			*target = number;
			Ok(())
		}
		(Slot::Bool(target), Some(Value::Bool(flag))) => {
			*target = flag;
			Ok(())
		}
		(Slot::MapOfInterface(target), Some(Value::Object(map))) => {
			*target = Rc::unwrap_or_clone(map);
			Ok(())
		}
		(Slot::MapOfRecord(target), Some(Value::Object(map))) => target.fill_entries(field, &map, filler, depth),
		(slot, got) => Err(FillError::TypeMismatch {
			field,
			expected: slot.kind(),
			current: slot.describe(),
			got,
		}),
	}
}
