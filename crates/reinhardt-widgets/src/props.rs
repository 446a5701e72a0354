//! Typed property decoding
//!
//! Server-rendered widgets carry their configuration as a JSON object in a
//! props attribute. This module turns that blob into checked, typed values
//! before any controller sees it.
//!
//! ## Architecture
//!
//! ```text
//! data-props="{...}" ──parse_props──► serde_json::Map ──► GridProps / FormProps
//!                          │                                    │
//!                          └── PropsError (not JSON, not object, invalid field)
//! ```

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::grid::SelectionMode;
use crate::validation::{RuleSpec, ValidationRule};

/// Default rows per page when props do not set one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Errors raised while decoding a props blob.
#[derive(Debug, Error)]
pub enum PropsError {
	/// The attribute is not valid JSON.
	#[error("props are not valid JSON: {0}")]
	Json(#[from] serde_json::Error),

	/// The attribute is JSON but not an object.
	#[error("props must be a JSON object, found {0}")]
	NotAnObject(&'static str),

	/// A field holds a value outside its allowed range.
	#[error("invalid prop `{field}`: {reason}")]
	Invalid {
		/// Prop name.
		field: &'static str,
		/// What was wrong.
		reason: String,
	},

	/// A serialized validation rule has an invalid pattern.
	#[error("invalid pattern rule for field `{field}`: {source}")]
	Rule {
		/// Form field the rule belongs to.
		field: String,
		/// Regex compilation error.
		source: regex::Error,
	},
}

/// Parses a props attribute into a JSON object.
///
/// A missing or blank attribute is an empty object.
///
/// # Errors
///
/// Returns [`PropsError::Json`] or [`PropsError::NotAnObject`].
pub fn parse_props(raw: Option<&str>) -> Result<Map<String, Value>, PropsError> {
	let Some(raw) = raw.filter(|raw| !raw.trim().is_empty()) else {
		return Ok(Map::new());
	};
	match serde_json::from_str(raw)? {
		Value::Object(map) => Ok(map),
		other => Err(PropsError::NotAnObject(json_type_name(&other))),
	}
}

fn json_type_name(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}

/// The closed set of widget type tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
	/// `grid`
	Grid,
	/// `form`
	Form,
	/// `modal` (reserved, no controller)
	Modal,
	/// `datepicker` (reserved, no controller)
	DatePicker,
}

impl ComponentKind {
	/// The type tag as written in markup.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Grid => "grid",
			Self::Form => "form",
			Self::Modal => "modal",
			Self::DatePicker => "datepicker",
		}
	}
}

impl std::fmt::Display for ComponentKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A type tag outside the known set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown component type `{0}`")]
pub struct UnknownComponentKind(pub String);

impl FromStr for ComponentKind {
	type Err = UnknownComponentKind;

	fn from_str(tag: &str) -> Result<Self, Self::Err> {
		match tag {
			"grid" => Ok(Self::Grid),
			"form" => Ok(Self::Form),
			"modal" => Ok(Self::Modal),
			"datepicker" => Ok(Self::DatePicker),
			other => Err(UnknownComponentKind(other.to_string())),
		}
	}
}

// ============================================================================
// Grid
// ============================================================================

/// Checked grid configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridProps {
	/// Rows per page (never zero).
	pub page_size: u32,
	/// Row selection mode.
	pub selection: SelectionMode,
}

impl Default for GridProps {
	fn default() -> Self {
		Self {
			page_size: DEFAULT_PAGE_SIZE,
			selection: SelectionMode::default(),
		}
	}
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawGridProps {
	#[serde(default)]
	page_size: Option<u32>,
	#[serde(default)]
	pagination: Option<RawPagination>,
	#[serde(default)]
	selection: Option<SelectionMode>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPagination {
	Enabled(#[allow(dead_code)] bool),
	Options {
		#[serde(default, rename = "pageSize")]
		page_size: Option<u32>,
	},
}

impl GridProps {
	/// Decodes grid props.
	///
	/// `pageSize` is read from the top level, falling back to
	/// `pagination.pageSize`, then to [`DEFAULT_PAGE_SIZE`].
	///
	/// # Errors
	///
	/// Returns [`PropsError::Json`] for mistyped fields and
	/// [`PropsError::Invalid`] for a zero page size.
	pub fn from_props(props: &Map<String, Value>) -> Result<Self, PropsError> {
		let raw: RawGridProps = serde_json::from_value(Value::Object(props.clone()))?;
		let nested = match raw.pagination {
			Some(RawPagination::Options { page_size }) => page_size,
			_ => None,
		};
		let page_size = raw.page_size.or(nested).unwrap_or(DEFAULT_PAGE_SIZE);
		if page_size == 0 {
			return Err(PropsError::Invalid {
				field: "pageSize",
				reason: "must be at least 1".to_string(),
			});
		}
		Ok(Self {
			page_size,
			selection: raw.selection.unwrap_or_default(),
		})
	}
}

// ============================================================================
// Form
// ============================================================================

/// Checked form configuration.
#[derive(Debug, Clone, Default)]
pub struct FormProps {
	/// Names of the fields validated on submit, in order.
	pub fields: Vec<String>,
	/// Fallback submission URL.
	pub action: Option<String>,
	/// Fallback HTTP method.
	pub method: Option<String>,
	/// Rules per field name.
	pub validation: BTreeMap<String, Vec<ValidationRule>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawField {
	Name(String),
	Definition { name: String },
}

#[derive(Deserialize)]
struct RawFormProps {
	#[serde(default)]
	fields: Vec<RawField>,
	#[serde(default)]
	action: Option<String>,
	#[serde(default)]
	method: Option<String>,
	#[serde(default)]
	validation: BTreeMap<String, Vec<RuleSpec>>,
}

impl FormProps {
	/// Decodes form props.
	///
	/// `fields` entries may be plain names or objects with a `name`.
	///
	/// # Errors
	///
	/// Returns [`PropsError::Json`] for mistyped fields and
	/// [`PropsError::Rule`] for a pattern that does not compile.
	pub fn from_props(props: &Map<String, Value>) -> Result<Self, PropsError> {
		let raw: RawFormProps = serde_json::from_value(Value::Object(props.clone()))?;
		let fields = raw
			.fields
			.into_iter()
			.map(|field| match field {
				RawField::Name(name) | RawField::Definition { name } => name,
			})
			.collect();

		let mut validation = BTreeMap::new();
		for (field, specs) in raw.validation {
			let rules = specs
				.into_iter()
				.map(ValidationRule::try_from)
				.collect::<Result<Vec<_>, _>>()
				.map_err(|source| PropsError::Rule {
					field: field.clone(),
					source,
				})?;
			validation.insert(field, rules);
		}

		Ok(Self {
			fields,
			action: raw.action.filter(|action| !action.is_empty()),
			method: raw.method.filter(|method| !method.is_empty()),
			validation,
		})
	}
}
