mod convert;
mod error;
mod field;
mod filler;
mod macros;
mod options;
mod slot;

/// Error and result aliases.
pub use error::{FillError, Result};
/// Record trait and per-field descriptors.
pub use field::{Field, Record};
/// Field walker and the default entry point.
pub use filler::{Filler, fill_out};
/// Runtime limits and query configuration.
pub use options::FillOptions;
/// Typed field access and kind inference.
pub use slot::{IntoSlot, Kind, RecordMap, Slot};
