//! Hydration settings.
//!
//! Attribute names and timings shared by the hydrator and the controllers it
//! creates. Every field has a default, so an empty JSON object is a valid
//! configuration.
//!
//! ```
//! use reinhardt_widgets::HydrationSettings;
//!
//! let settings = HydrationSettings::from_json(r#"{"searchDebounceMs": 150}"#).unwrap();
//! assert_eq!(settings.search_debounce_ms, 150);
//! assert_eq!(settings.component_attr, "data-component");
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default attribute carrying the component type tag.
pub const COMPONENT_ATTR: &str = "data-component";
/// Default attribute carrying the JSON props blob.
pub const PROPS_ATTR: &str = "data-props";
/// Default attribute set once an element has been hydrated.
pub const HYDRATED_ATTR: &str = "data-hydrated";
/// Default selector of the script element holding the id allow-list.
pub const MANIFEST_SELECTOR: &str = "script[data-hydrate-manifest]";

/// Configuration for a [`Hydrator`](crate::Hydrator) and its controllers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HydrationSettings {
	/// Attribute naming the component type.
	pub component_attr: String,
	/// Attribute holding the serialized props.
	pub props_attr: String,
	/// Idempotency marker attribute.
	pub hydrated_attr: String,
	/// Selector of the manifest script element.
	pub manifest_selector: String,
	/// Quiet period before a grid search becomes a filter.
	pub search_debounce_ms: u64,
	/// Submit button label while a submission is in flight.
	pub submitting_label: String,
	/// Base URL that relative submit URLs are joined to.
	pub base_url: Option<String>,
}

impl Default for HydrationSettings {
	fn default() -> Self {
		Self {
			component_attr: COMPONENT_ATTR.to_string(),
			props_attr: PROPS_ATTR.to_string(),
			hydrated_attr: HYDRATED_ATTR.to_string(),
			manifest_selector: MANIFEST_SELECTOR.to_string(),
			search_debounce_ms: 300,
			submitting_label: "Submitting...".to_string(),
			base_url: None,
		}
	}
}

impl HydrationSettings {
	/// Parses settings from JSON, filling missing keys with defaults.
	///
	/// # Errors
	///
	/// Returns the `serde_json` error for malformed JSON or mistyped values.
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}

	/// The search debounce as a [`Duration`].
	pub fn search_debounce(&self) -> Duration {
		Duration::from_millis(self.search_debounce_ms)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_empty_object_is_default() {
		assert_eq!(
			HydrationSettings::from_json("{}").unwrap(),
			HydrationSettings::default()
		);
	}

	#[rstest]
	fn test_overrides() {
		let settings = HydrationSettings::from_json(
			r#"{"componentAttr": "data-widget", "baseUrl": "https://example.com/app/", "submittingLabel": "Saving"}"#,
		)
		.unwrap();
		assert_eq!(settings.component_attr, "data-widget");
		assert_eq!(settings.base_url.as_deref(), Some("https://example.com/app/"));
		assert_eq!(settings.submitting_label, "Saving");
		assert_eq!(settings.props_attr, PROPS_ATTR);
		assert_eq!(settings.search_debounce(), Duration::from_millis(300));
	}

	#[rstest]
	fn test_mistyped_value_is_error() {
		assert!(HydrationSettings::from_json(r#"{"searchDebounceMs": "fast"}"#).is_err());
	}
}
