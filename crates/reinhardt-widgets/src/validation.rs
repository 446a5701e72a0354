//! Validation Engine
//!
//! Evaluates a field value against an ordered rule list. Rules run in
//! declaration order and the first failing rule wins, so a field yields at
//! most one message per pass.
//!
//! ## Value coercion
//!
//! Text rules see a boolean as `"true"`/`"false"` and a missing value as
//! `""`. Numeric rules coerce like a browser `Number()` call: blank text is
//! `0`, a boolean is `0`/`1`, and anything unparsable (or a missing value) is
//! `NaN`, which never fails `min`/`max`.
//!
//! ## Example
//!
//! ```
//! use reinhardt_widgets::{FieldValue, ValidationRule, validate};
//!
//! let rules = vec![
//!     ValidationRule::required("Email is required"),
//!     ValidationRule::email("Enter a valid email"),
//! ];
//! let empty = FieldValue::from("");
//! assert_eq!(validate(&rules, Some(&empty)), Some("Email is required"));
//! assert_eq!(validate(&rules, Some(&FieldValue::from("a@b.co"))), None);
//! ```

use std::borrow::Cow;
use std::rc::Rc;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

/// A form field value: control text, or the checked state of a checkbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
	/// Checkbox state.
	Bool(bool),
	/// Text, select or radio value.
	Text(String),
}

impl FieldValue {
	/// The value as text.
	pub fn as_text(&self) -> Cow<'_, str> {
		match self {
			Self::Text(text) => Cow::Borrowed(text),
			Self::Bool(flag) => Cow::Owned(flag.to_string()),
		}
	}

	/// Numeric coercion; `NaN` when the text is not a number.
	pub fn to_number(&self) -> f64 {
		match self {
			Self::Bool(flag) => f64::from(u8::from(*flag)),
			Self::Text(text) => {
				let trimmed = text.trim();
				if trimmed.is_empty() {
					0.0
				} else {
					trimmed.parse().unwrap_or(f64::NAN)
				}
			}
		}
	}

	/// Truthiness: non-empty text or `true`.
	pub fn is_truthy(&self) -> bool {
		match self {
			Self::Bool(flag) => *flag,
			Self::Text(text) => !text.is_empty(),
		}
	}
}

impl From<&str> for FieldValue {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl From<String> for FieldValue {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl From<bool> for FieldValue {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl std::fmt::Display for FieldValue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.as_text())
	}
}

/// Predicate used by [`RuleKind::Custom`]; returns true when the value is valid.
pub type CustomCheck = Rc<dyn Fn(Option<&FieldValue>) -> bool>;

/// What a rule checks.
#[derive(Clone)]
pub enum RuleKind {
	/// Present, non-blank, and not `false`.
	Required,
	/// Empty, or shaped like `local@domain.tld`.
	Email,
	/// Numeric value at least this.
	Min(f64),
	/// Numeric value at most this.
	Max(f64),
	/// Text at least this many characters.
	MinLength(usize),
	/// Text at most this many characters.
	MaxLength(usize),
	/// Text contains a match (unanchored unless the expression anchors itself).
	Pattern(Regex),
	/// Caller-supplied predicate.
	Custom(CustomCheck),
}

impl std::fmt::Debug for RuleKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Required => f.write_str("Required"),
			Self::Email => f.write_str("Email"),
			Self::Min(value) => f.debug_tuple("Min").field(value).finish(),
			Self::Max(value) => f.debug_tuple("Max").field(value).finish(),
			Self::MinLength(value) => f.debug_tuple("MinLength").field(value).finish(),
			Self::MaxLength(value) => f.debug_tuple("MaxLength").field(value).finish(),
			Self::Pattern(regex) => f.debug_tuple("Pattern").field(&regex.as_str()).finish(),
			Self::Custom(_) => f.write_str("Custom(<function>)"),
		}
	}
}

/// A rule and the message reported when it fails.
#[derive(Debug, Clone)]
pub struct ValidationRule {
	/// The check.
	pub kind: RuleKind,
	/// User-facing error message.
	pub message: String,
}

impl ValidationRule {
	/// Creates a rule.
	pub fn new(kind: RuleKind, message: impl Into<String>) -> Self {
		Self {
			kind,
			message: message.into(),
		}
	}

	/// `required` rule.
	pub fn required(message: impl Into<String>) -> Self {
		Self::new(RuleKind::Required, message)
	}

	/// `email` rule.
	pub fn email(message: impl Into<String>) -> Self {
		Self::new(RuleKind::Email, message)
	}

	/// `min` rule.
	pub fn min(value: f64, message: impl Into<String>) -> Self {
		Self::new(RuleKind::Min(value), message)
	}

	/// `max` rule.
	pub fn max(value: f64, message: impl Into<String>) -> Self {
		Self::new(RuleKind::Max(value), message)
	}

	/// `minLength` rule.
	pub fn min_length(value: usize, message: impl Into<String>) -> Self {
		Self::new(RuleKind::MinLength(value), message)
	}

	/// `maxLength` rule.
	pub fn max_length(value: usize, message: impl Into<String>) -> Self {
		Self::new(RuleKind::MaxLength(value), message)
	}

	/// `pattern` rule.
	///
	/// # Errors
	///
	/// Returns the `regex` error if `expression` does not compile.
	pub fn pattern(expression: &str, message: impl Into<String>) -> Result<Self, regex::Error> {
		Ok(Self::new(RuleKind::Pattern(Regex::new(expression)?), message))
	}

	/// `custom` rule backed by `check`.
	pub fn custom<F>(check: F, message: impl Into<String>) -> Self
	where
		F: Fn(Option<&FieldValue>) -> bool + 'static,
	{
		Self::new(RuleKind::Custom(Rc::new(check)), message)
	}

	/// Returns true if `value` satisfies this rule.
	pub fn passes(&self, value: Option<&FieldValue>) -> bool {
		let text = || value.map(FieldValue::as_text).unwrap_or(Cow::Borrowed(""));
		let number = || value.map_or(f64::NAN, FieldValue::to_number);
		match &self.kind {
			RuleKind::Required => value.is_some_and(|v| v.is_truthy() && !v.as_text().trim().is_empty()),
			RuleKind::Email => {
				let text = text();
				text.is_empty() || is_email(&text)
			}
			RuleKind::Min(min) => {
				let number = number();
				number.is_nan() || number >= *min
			}
			RuleKind::Max(max) => {
				let number = number();
				number.is_nan() || number <= *max
			}
			RuleKind::MinLength(min) => text().chars().count() >= *min,
			RuleKind::MaxLength(max) => text().chars().count() <= *max,
			RuleKind::Pattern(regex) => regex.is_match(&text()),
			RuleKind::Custom(check) => check(value),
		}
	}
}

/// Runs `rules` in order and returns the first failing message.
pub fn validate<'a>(rules: &'a [ValidationRule], value: Option<&FieldValue>) -> Option<&'a str> {
	rules
		.iter()
		.find(|rule| !rule.passes(value))
		.map(|rule| rule.message.as_str())
}

fn is_email(value: &str) -> bool {
	static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
	EMAIL
		.get_or_init(|| Regex::new(EMAIL_PATTERN).ok())
		.as_ref()
		.is_some_and(|regex| regex.is_match(value))
}

/// Serialized form of a rule, as carried in form props.
///
/// `custom` has no serialized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum RuleSpec {
	/// See [`RuleKind::Required`].
	Required {
		/// Error message.
		message: String,
	},
	/// See [`RuleKind::Email`].
	Email {
		/// Error message.
		message: String,
	},
	/// See [`RuleKind::Min`].
	Min {
		/// Lower bound.
		value: f64,
		/// Error message.
		message: String,
	},
	/// See [`RuleKind::Max`].
	Max {
		/// Upper bound.
		value: f64,
		/// Error message.
		message: String,
	},
	/// See [`RuleKind::MinLength`].
	MinLength {
		/// Minimum character count.
		value: usize,
		/// Error message.
		message: String,
	},
	/// See [`RuleKind::MaxLength`].
	MaxLength {
		/// Maximum character count.
		value: usize,
		/// Error message.
		message: String,
	},
	/// See [`RuleKind::Pattern`].
	Pattern {
		/// Regular expression.
		value: String,
		/// Error message.
		message: String,
	},
}

impl TryFrom<RuleSpec> for ValidationRule {
	type Error = regex::Error;

	fn try_from(spec: RuleSpec) -> Result<Self, Self::Error> {
		Ok(match spec {
			RuleSpec::Required { message } => Self::required(message),
			RuleSpec::Email { message } => Self::email(message),
			RuleSpec::Min { value, message } => Self::min(value, message),
			RuleSpec::Max { value, message } => Self::max(value, message),
			RuleSpec::MinLength { value, message } => Self::min_length(value, message),
			RuleSpec::MaxLength { value, message } => Self::max_length(value, message),
			RuleSpec::Pattern { value, message } => Self::pattern(&value, message)?,
		})
	}
}
