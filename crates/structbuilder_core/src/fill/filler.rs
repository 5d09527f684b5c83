use crate::fill::convert::write_slot;
use crate::fill::{Field, FillError, FillOptions, Kind, Record, Result};
use crate::jq::Value;

/// Walks a record's field descriptors and writes each query's first output into its field.
#[derive(Debug, Clone, Default)]
pub struct Filler {
	options: FillOptions,
}

impl Filler {
	/// Filler with explicit options.
	pub fn new(options: FillOptions) -> Self {
		Self { options }
	}

	/// Populate `target` from `document`.
	///
	/// Fields are filled in declaration order and each write is final: on error
	/// the fields before the failing one keep their new values.
	pub fn fill<'r, R: Record>(&self, target: &'r mut R, document: &Value) -> Result<&'r mut R> {
		self.fill_at(target, document, 0)?;
		Ok(target)
	}

	fn fill_at<R: Record>(&self, target: &mut R, document: &Value, depth: u32) -> Result<()> {
		if depth >= self.options.max_depth {
			return Err(FillError::DepthExceeded {
				max_depth: self.options.max_depth,
			});
		}
		for field in R::FIELDS {
			self.fill_field(field, target, document, depth)?;
		}
		Ok(())
	}

	fn fill_field<R: Record>(&self, field: &Field<R>, target: &mut R, document: &Value, depth: u32) -> Result<()> {
		let name = field.name();
		let Some(text) = field.query() else {
			log::trace!("field {name}: no query, skipped");
			return Ok(());
		};

		let query = self
			.options
			.compiler
			.compile_text(text)
			.map_err(|source| FillError::QueryParse { field: name, query: text, source })?;

		let first = query
			.run_with(document.clone(), self.options.values.clone())
			.next()
			.transpose()
			.map_err(|source| FillError::QueryEvaluation { field: name, query: text, source })?;
		log::trace!("field {name}: {text:?} produced {}", first.as_ref().map_or("no value", Value::type_name));

		write_slot(name, field.slot(target), first, self, depth)
	}

	/// Fill a fresh `R` from one entry of a map-of-record field, one level deeper.
	pub(crate) fn fill_entry<R: Record>(&self, field: &'static str, key: &str, entry: &Value, depth: u32) -> Result<R> {
		let in_entry = |source: FillError| FillError::InEntry {
			field,
			key: key.to_owned(),
			source: Box::new(source),
		};

		if !matches!(entry, Value::Object(_)) {
			return Err(in_entry(FillError::TypeMismatch {
				field,
				expected: Kind::Record,
				current: "default record".to_owned(),
				got: Some(entry.clone()),
			}));
		}

		log::debug!("field {field}: filling entry {key:?}");
		let mut record = R::default();
		self.fill_at(&mut record, entry, depth + 1).map_err(in_entry)?;
		Ok(record)
	}
}

/// Populate `target` from `document` with default options.
pub fn fill_out<'r, R: Record>(target: &'r mut R, document: &Value) -> Result<&'r mut R> {
	Filler::default().fill(target, document)
}
