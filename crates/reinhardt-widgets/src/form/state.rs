//! Form state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::validation::FieldValue;

/// Field name to value.
pub type FieldValues = BTreeMap<String, FieldValue>;

/// Field name to error message; an empty message means the field is valid.
pub type FieldErrors = BTreeMap<String, String>;

/// Values, errors and flags of one form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
	/// Current values.
	pub values: FieldValues,
	/// Last validation result per field.
	pub errors: FieldErrors,
	/// Fields that lost focus at least once.
	pub touched: BTreeMap<String, bool>,
	/// True between submit start and settle.
	pub is_submitting: bool,
	/// Result of the last whole-form validation.
	pub is_valid: bool,
}

impl FormState {
	/// Fresh state holding `values`.
	pub fn new(values: FieldValues) -> Self {
		Self {
			values,
			errors: FieldErrors::new(),
			touched: BTreeMap::new(),
			is_submitting: false,
			is_valid: true,
		}
	}
}
