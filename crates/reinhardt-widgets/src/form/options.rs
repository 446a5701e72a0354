//! Caller-supplied form hooks and rules.

use std::collections::BTreeMap;
use std::future::Future;

use super::state::{FieldErrors, FieldValues};
use crate::callback::{AsyncCallback, BoxError, Callback};
use crate::validation::{FieldValue, ValidationRule};

/// Hooks and validation rules a page passes to a form before it hydrates.
///
/// Rules set here replace any rules the props carry for the same field.
#[derive(Debug, Clone, Default)]
pub struct FormOptions {
	/// Rules per field name.
	pub validation: BTreeMap<String, Vec<ValidationRule>>,
	/// Delivers the values instead of the default HTTP submission.
	pub on_submit: Option<AsyncCallback<FieldValues, ()>>,
	/// Called with all field errors when submission is blocked by validation.
	pub on_validation_error: Option<Callback<FieldErrors>>,
	/// Called with the field name and new value on every change.
	pub on_field_change: Option<Callback<(String, FieldValue)>>,
	/// Overrides the form's `action` for the default submission.
	pub submit_url: Option<String>,
}

impl FormOptions {
	/// Options with no hooks or rules.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends `rule` to the rules for `field`.
	pub fn rule(mut self, field: impl Into<String>, rule: ValidationRule) -> Self {
		self.validation.entry(field.into()).or_default().push(rule);
		self
	}

	/// Replaces the rules for `field`.
	pub fn rules(mut self, field: impl Into<String>, rules: Vec<ValidationRule>) -> Self {
		self.validation.insert(field.into(), rules);
		self
	}

	/// Sets [`on_submit`](Self::on_submit).
	pub fn on_submit<F, Fut, E>(mut self, f: F) -> Self
	where
		F: Fn(FieldValues) -> Fut + 'static,
		Fut: Future<Output = Result<(), E>> + 'static,
		E: Into<BoxError>,
	{
		self.on_submit = Some(AsyncCallback::new(f));
		self
	}

	/// Sets [`on_validation_error`](Self::on_validation_error).
	pub fn on_validation_error(mut self, f: impl Fn(FieldErrors) + 'static) -> Self {
		self.on_validation_error = Some(Callback::new(f));
		self
	}

	/// Sets [`on_field_change`](Self::on_field_change).
	pub fn on_field_change(mut self, f: impl Fn((String, FieldValue)) + 'static) -> Self {
		self.on_field_change = Some(Callback::new(f));
		self
	}

	/// Sets [`submit_url`](Self::submit_url).
	pub fn submit_url(mut self, url: impl Into<String>) -> Self {
		self.submit_url = Some(url.into());
		self
	}
}
