/// Declare a struct together with its [`Record`](crate::fill::Record) impl.
///
/// Each field may carry `=> "query"`; fields without one are left untouched
/// by the filler. The struct must implement `Default`, usually via derive.
///
/// ```
/// use std::collections::BTreeMap;
///
/// use structbuilder::fill::fill_out;
/// use structbuilder::jq::Value;
///
/// structbuilder::record! {
///     #[derive(Debug, Default)]
///     pub struct Stage {
///         pub status: String => ".status",
///         pub elapsed: i64 => ".updated_at - .created_at",
///         pub note: String,
///     }
/// }
///
/// structbuilder::record! {
///     #[derive(Debug, Default)]
///     pub struct Build {
///         pub stages: BTreeMap<String, Stage> => ".results",
///     }
/// }
///
/// let doc = Value::from(serde_json::json!({
///     "results": {"reimage": {"status": "ok", "created_at": 5, "updated_at": 9}}
/// }));
/// let mut build = Build::default();
/// fill_out(&mut build, &doc).unwrap();
/// assert_eq!(build.stages["reimage"].elapsed, 4);
/// ```
#[macro_export]
macro_rules! record {
	(@query) => {
		::core::option::Option::None
	};
	(@query $query:literal) => {
		::core::option::Option::Some($query)
	};
	(
		$(#[$attr:meta])*
		$vis:vis struct $name:ident {
			$(
				$(#[$field_attr:meta])*
				$field_vis:vis $field:ident : $ty:ty $(=> $query:literal)?
			),* $(,)?
		}
	) => {
		$(#[$attr])*
		$vis struct $name {
			$(
				$(#[$field_attr])*
				$field_vis $field: $ty,
			)*
		}

		impl $crate::fill::Record for $name {
			const FIELDS: &'static [$crate::fill::Field<Self>] = &[
				$(
					$crate::fill::Field::new(::core::stringify!($field), $crate::record!(@query $($query)?), {
						fn slot(record: &mut $name) -> $crate::fill::Slot<'_> {
							$crate::fill::IntoSlot::slot(&mut record.$field)
						}
						slot
					}),
				)*
			];
		}
	};
}
