//! Selective hydration allow-list.

use serde::{Deserialize, Serialize};

use super::HydrationError;
use crate::dom::Document;

/// Element ids that [`Hydrator::hydrate_all`](super::Hydrator::hydrate_all)
/// is limited to. Without a manifest every marked element hydrates.
///
/// Pages usually embed it as a JSON array:
///
/// ```html
/// <script type="application/json" data-hydrate-manifest>["users", "signup"]</script>
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HydrationManifest(Vec<String>);

impl HydrationManifest {
	/// Creates a manifest from ids.
	pub fn new<I, S>(ids: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self(ids.into_iter().map(Into::into).collect())
	}

	/// Parses a JSON array of ids.
	///
	/// # Errors
	///
	/// Returns [`HydrationError::InvalidManifest`] for anything else.
	pub fn from_json(json: &str) -> Result<Self, HydrationError> {
		serde_json::from_str(json).map_err(|e| HydrationError::InvalidManifest(e.to_string()))
	}

	/// Reads the manifest from the first element matching `selector`.
	pub(crate) fn from_document(
		document: &Document,
		selector: &str,
	) -> Result<Option<Self>, HydrationError> {
		let script = document
			.query_selector(selector)
			.map_err(|e| HydrationError::InvalidManifest(e.to_string()))?;
		script
			.map(|script| Self::from_json(&script.text_content()))
			.transpose()
	}

	/// Whether `id` may hydrate.
	pub fn contains(&self, id: &str) -> bool {
		self.0.iter().any(|listed| listed == id)
	}

	/// The listed ids.
	pub fn ids(&self) -> &[String] {
		&self.0
	}

	/// Renders the manifest as a script element for server output.
	pub fn to_script_tag(&self) -> String {
		// `serde_json` never fails on a list of strings.
		let json = serde_json::to_string(&self.0).unwrap_or_else(|_| "[]".to_string());
		format!(
			r#"<script type="application/json" data-hydrate-manifest>{}</script>"#,
			json.replace("</", "<\\/")
		)
	}
}

impl<S: Into<String>> FromIterator<S> for HydrationManifest {
	fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
		Self::new(iter)
	}
}
