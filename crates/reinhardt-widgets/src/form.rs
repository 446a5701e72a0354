//! Form Controller
//!
//! Tracks field values, validates on every change and blur, and submits
//! either through a caller hook or as JSON over HTTP.
//!
//! ## Submit flow
//!
//! ```text
//! submit ──► already submitting? ──yes──► dropped
//!              │ no
//!              ▼
//!   is_submitting = true, button disabled + relabelled
//!              │
//!      validate_all ──fail──► restore, on_validation_error, form:validationError
//!              │ ok
//!              ▼
//!   on_submit(values) │ HTTP <method> <url> (JSON) │ nothing
//!              │
//!   ok ──► [form:submitSuccess] form:submit      err ──► form:submitError
//!              │
//!              ▼
//!   restore is_submitting and button (always)
//! ```
//!
//! ## DOM contract
//!
//! | Selector | Role |
//! |----------|------|
//! | `input[name]`, `textarea[name]`, `select[name]` | tracked controls |
//! | `[data-error="<name>"]` | receives the field's error text |
//! | `.ui-form__input--error` | set on a control with an error |
//! | `.ui-form__error` | error nodes cleared on reset |
//! | `.ui-form__submit` | disabled and relabelled while submitting |

mod options;
mod state;
mod submit;

pub use options::FormOptions;
pub use state::{FieldErrors, FieldValues, FormState};
pub use submit::SubmitError;

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use serde_json::{Value, json};

use crate::dom::{Element, Event, EventHandle};
use crate::hydration::Controller;
use crate::props::{ComponentKind, FormProps};
use crate::settings::HydrationSettings;
use crate::spawn::spawn_local;
use crate::validation::{FieldValue, ValidationRule, validate};
use crate::{debug_log, warn_log};

const CONTROL_SELECTOR: &str = "input, textarea, select";
const INPUT_ERROR_CLASS: &str = "ui-form__input--error";
const ORIGINAL_TEXT_ATTR: &str = "data-original-text";

/// Controller for one `data-component="form"` element.
pub struct FormController {
	this: Weak<FormController>,
	element: Element,
	props: FormProps,
	options: FormOptions,
	rules: BTreeMap<String, Vec<ValidationRule>>,
	state: RefCell<FormState>,
	submitting_label: String,
	base_url: Option<String>,
	listeners: RefCell<Vec<EventHandle>>,
}

impl std::fmt::Debug for FormController {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FormController")
			.field("element", &self.element)
			.field("fields", &self.props.fields)
			.field("state", &self.state.borrow())
			.finish()
	}
}

/// Restores `is_submitting` and the submit button when dropped.
struct SubmittingGuard<'a>(&'a FormController);

impl Drop for SubmittingGuard<'_> {
	fn drop(&mut self) {
		self.0.state.borrow_mut().is_submitting = false;
		self.0.set_submit_button(false);
	}
}

impl FormController {
	/// Creates a controller for `element` and captures the initial values.
	///
	/// Rules from `options` replace props-borne rules for the same field.
	pub fn new(
		element: Element,
		props: FormProps,
		options: FormOptions,
		settings: &HydrationSettings,
	) -> Rc<Self> {
		let mut rules = props.validation.clone();
		rules.extend(options.validation.clone());
		let values = read_values(&element);
		Rc::new_cyclic(|this| Self {
			this: this.clone(),
			element,
			props,
			options,
			rules,
			state: RefCell::new(FormState::new(values)),
			submitting_label: settings.submitting_label.clone(),
			base_url: settings.base_url.clone(),
			listeners: RefCell::new(Vec::new()),
		})
	}

	/// Decoded props.
	pub fn props(&self) -> &FormProps {
		&self.props
	}

	/// A copy of the full state.
	pub fn state(&self) -> FormState {
		self.state.borrow().clone()
	}

	/// A copy of the current values.
	pub fn values(&self) -> FieldValues {
		self.state.borrow().values.clone()
	}

	/// A copy of the current errors.
	pub fn errors(&self) -> FieldErrors {
		self.state.borrow().errors.clone()
	}

	/// Whether a submission is in flight.
	pub fn is_submitting(&self) -> bool {
		self.state.borrow().is_submitting
	}

	/// Validates every field listed in the props and returns the aggregate.
	pub fn is_valid(&self) -> bool {
		self.validate_all()
	}

	// ========================================================================
	// Values
	// ========================================================================

	/// Writes `values` into the state and the live controls.
	///
	/// A radio group checks the control whose value matches; a checkbox is
	/// checked when the value is truthy.
	pub fn set_values(&self, values: impl IntoIterator<Item = (String, FieldValue)>) {
		for (name, value) in values {
			let controls = self.controls_named(&name);
			match controls.first().map(Element::input_type).as_deref() {
				Some("radio") => {
					let wanted = value.as_text();
					for radio in &controls {
						radio.set_checked(radio.value() == wanted);
					}
				}
				Some("checkbox") => controls[0].set_checked(value.is_truthy()),
				Some(_) => controls[0].set_value(value.as_text()),
				None => {}
			}
			self.state.borrow_mut().values.insert(name, value);
		}
	}

	fn update_value(&self, name: &str, control: &Element) {
		let value = match control.input_type().as_str() {
			"checkbox" => FieldValue::Bool(control.checked()),
			_ => FieldValue::Text(control.value()),
		};
		self.state
			.borrow_mut()
			.values
			.insert(name.to_string(), value.clone());
		if let Some(on_field_change) = &self.options.on_field_change {
			on_field_change.call((name.to_string(), value.clone()));
		}
		self.emit("fieldChange", json!({ "name": name, "value": value }));
	}

	// ========================================================================
	// Validation
	// ========================================================================

	/// Validates one field and reflects the result into the DOM.
	///
	/// Configured rules run first; only when none fails is the control's
	/// native constraint message consulted.
	pub fn validate_field(&self, name: &str) -> bool {
		let value = self.state.borrow().values.get(name).cloned();
		let rules = self.rules.get(name).map(Vec::as_slice).unwrap_or_default();
		let error = match validate(rules, value.as_ref()) {
			Some(message) => message.to_string(),
			None => self
				.controls_named(name)
				.first()
				.map(Element::validation_message)
				.unwrap_or_default(),
		};
		self.show_field_error(name, &error);
		let valid = error.is_empty();
		self.state
			.borrow_mut()
			.errors
			.insert(name.to_string(), error);
		valid
	}

	/// Validates every field listed in the props, updating `is_valid`.
	pub fn validate_all(&self) -> bool {
		let mut valid = true;
		for name in &self.props.fields {
			valid &= self.validate_field(name);
		}
		self.state.borrow_mut().is_valid = valid;
		valid
	}

	fn show_field_error(&self, name: &str, error: &str) {
		let slot = self
			.element
			.find(|el| el.get_attribute("data-error").as_deref() == Some(name));
		if let Some(slot) = slot {
			slot.set_text_content(error);
		}
		if let Some(control) = self.controls_named(name).first() {
			control.toggle_class(INPUT_ERROR_CLASS, !error.is_empty());
		}
	}

	fn clear_all_errors(&self) {
		for slot in self.query_all(".ui-form__error") {
			slot.set_text_content("");
		}
		for control in self.query_all(&format!(".{}", INPUT_ERROR_CLASS)) {
			control.remove_class(INPUT_ERROR_CLASS);
		}
	}

	// ========================================================================
	// Submit and reset
	// ========================================================================

	/// Runs the submit flow. Failures are emitted as events, never returned.
	pub async fn submit(&self) {
		{
			let mut state = self.state.borrow_mut();
			if state.is_submitting {
				debug_log!("form {}: submit ignored, already submitting", self.id());
				return;
			}
			state.is_submitting = true;
		}
		self.set_submit_button(true);
		let guard = SubmittingGuard(self);

		if !self.validate_all() {
			drop(guard);
			let errors = self.errors();
			if let Some(on_validation_error) = &self.options.on_validation_error {
				on_validation_error.call(errors.clone());
			}
			self.emit("validationError", json!({ "errors": errors }));
			return;
		}

		let values = self.values();
		match self.deliver(values.clone()).await {
			Ok(result) => {
				if let Some(result) = result {
					self.emit("submitSuccess", json!({ "result": result }));
				}
				self.emit("submit", json!({ "values": values }));
			}
			Err(error) => {
				warn_log!("form {}: {}", self.id(), error);
				self.emit("submitError", json!({ "error": error.to_string() }));
			}
		}
		drop(guard);
	}

	/// Delivers `values` through the hook or over HTTP. Returns the decoded
	/// response body for HTTP submissions.
	async fn deliver(&self, values: FieldValues) -> Result<Option<Value>, SubmitError> {
		if let Some(on_submit) = &self.options.on_submit {
			on_submit
				.call(values)
				.await
				.map_err(|error| SubmitError::Callback(error.to_string()))?;
			return Ok(None);
		}
		let Some(raw_url) = self.submit_url() else {
			return Ok(None);
		};
		let url = submit::resolve_url(&raw_url, self.base_url.as_deref())?;
		let method = self.method();
		debug_log!("form {}: {} {}", self.id(), method, url);
		submit::submit_json(url, &method, &values).await.map(Some)
	}

	fn submit_url(&self) -> Option<String> {
		self.options
			.submit_url
			.clone()
			.or_else(|| self.element.get_attribute("action"))
			.or_else(|| self.props.action.clone())
			.filter(|url| !url.is_empty())
	}

	fn method(&self) -> String {
		self.element
			.get_attribute("method")
			.filter(|method| !method.is_empty())
			.or_else(|| self.props.method.clone())
			.unwrap_or_else(|| "POST".to_string())
	}

	fn set_submit_button(&self, loading: bool) {
		let Some(button) = self.query(".ui-form__submit") else {
			return;
		};
		button.set_disabled(loading);
		if loading {
			button.set_attribute(ORIGINAL_TEXT_ATTR, button.text_content());
			button.set_text_content(self.submitting_label.as_str());
		} else if let Some(original) = button.get_attribute(ORIGINAL_TEXT_ATTR) {
			button.set_text_content(original);
			button.remove_attribute(ORIGINAL_TEXT_ATTR);
		}
	}

	/// Re-reads values from the controls, clears errors, touched flags and
	/// error styling, and emits `form:reset`.
	///
	/// Runs automatically one tick after a native `reset` event.
	pub fn reset(&self) {
		let values = read_values(&self.element);
		{
			let mut state = self.state.borrow_mut();
			state.values = values;
			state.errors.clear();
			state.touched.clear();
		}
		self.clear_all_errors();
		self.emit("reset", json!({}));
	}

	// ========================================================================
	// DOM helpers
	// ========================================================================

	fn id(&self) -> String {
		self.element.id().unwrap_or_default()
	}

	fn query(&self, selector: &str) -> Option<Element> {
		self.element.query_selector(selector).ok().flatten()
	}

	fn query_all(&self, selector: &str) -> Vec<Element> {
		self.element.query_selector_all(selector).unwrap_or_default()
	}

	fn controls_named(&self, name: &str) -> Vec<Element> {
		named_controls(&self.element)
			.into_iter()
			.filter(|(control_name, _)| control_name == name)
			.map(|(_, control)| control)
			.collect()
	}

	fn emit(&self, name: &str, detail: Value) {
		self.element
			.dispatch_event(&Event::custom(format!("form:{}", name), detail));
	}

	// ========================================================================
	// Bindings
	// ========================================================================

	fn listen<F>(&self, target: &Element, event_type: &str, handler: F)
	where
		F: Fn(Rc<FormController>, &Event) + 'static,
	{
		let this = self.this.clone();
		let handle = target.add_event_listener(event_type, move |event| {
			if let Some(form) = this.upgrade() {
				handler(form, event);
			}
		});
		self.listeners.borrow_mut().push(handle);
	}

	fn bind_submit(&self) {
		self.listen(&self.element, "submit", |form, event| {
			event.prevent_default();
			spawn_local(async move { form.submit().await });
		});
	}

	fn bind_field_changes(&self) {
		for (name, control) in named_controls(&self.element) {
			let change_event = match control.input_type().as_str() {
				"checkbox" | "radio" | "select" => "change",
				_ => "input",
			};
			let field = name.clone();
			self.listen(&control, change_event, move |form, event| {
				if let Some(target) = event.current_target() {
					form.update_value(&field, &target);
					form.validate_field(&field);
				}
			});
			self.listen(&control, "blur", move |form, _| {
				form.state.borrow_mut().touched.insert(name.clone(), true);
				form.validate_field(&name);
			});
		}
	}

	fn bind_reset(&self) {
		self.listen(&self.element, "reset", |form, _| {
			spawn_local(async move { form.reset() });
		});
	}
}

impl Controller for FormController {
	fn init(&self) {
		self.bind_submit();
		self.bind_field_changes();
		self.bind_reset();
		self.emit("init", json!({ "state": self.state() }));
	}

	fn destroy(&self) {
		self.listeners.borrow_mut().clear();
		self.emit("destroy", json!({}));
	}

	fn element(&self) -> &Element {
		&self.element
	}

	fn kind(&self) -> ComponentKind {
		ComponentKind::Form
	}
}

/// Named form controls in document order.
fn named_controls(root: &Element) -> Vec<(String, Element)> {
	root.query_selector_all(CONTROL_SELECTOR)
		.unwrap_or_default()
		.into_iter()
		.filter_map(|control| control.name().map(|name| (name, control)))
		.collect()
}

/// Reads values from the DOM: checkbox state, the checked radio of a group,
/// and the value of every other control.
fn read_values(root: &Element) -> FieldValues {
	let mut values = FieldValues::new();
	for (name, control) in named_controls(root) {
		match control.input_type().as_str() {
			"checkbox" => {
				values.insert(name, FieldValue::Bool(control.checked()));
			}
			"radio" => {
				if control.checked() {
					values.insert(name, FieldValue::Text(control.value()));
				}
			}
			_ => {
				values.insert(name, FieldValue::Text(control.value()));
			}
		}
	}
	values
}
