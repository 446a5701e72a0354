//! Hydration markers for server rendering.
//!
//! A server that renders a widget tags its root element with these
//! attributes so the client-side [`Hydrator`](super::Hydrator) can find it.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use crate::dom::escape_attribute;
use crate::props::ComponentKind;
use crate::settings::{COMPONENT_ATTR, HydrationSettings, PROPS_ATTR};

/// Global counter for generating unique element ids.
static MARKER_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generates a unique element id such as `grid-3`.
pub fn generate_id(kind: ComponentKind) -> String {
	let n = MARKER_COUNTER.fetch_add(1, Ordering::SeqCst);
	format!("{}-{}", kind, n)
}

/// The attributes that make a server-rendered element hydratable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HydrationMarker {
	/// Element id.
	pub id: String,
	/// Component type.
	pub kind: ComponentKind,
	/// Serialized props (JSON).
	pub props: Option<String>,
}

impl HydrationMarker {
	/// Creates a marker with a generated id.
	pub fn new(kind: ComponentKind) -> Self {
		Self {
			id: generate_id(kind),
			kind,
			props: None,
		}
	}

	/// Replaces the generated id.
	pub fn with_id(mut self, id: impl Into<String>) -> Self {
		self.id = id.into();
		self
	}

	/// Sets already-serialized props.
	pub fn with_props_json(mut self, props: impl Into<String>) -> Self {
		self.props = Some(props.into());
		self
	}

	/// Serializes `props` into the marker.
	///
	/// # Errors
	///
	/// Returns the `serde_json` error if `props` cannot be serialized.
	pub fn with_props<T: Serialize>(self, props: &T) -> Result<Self, serde_json::Error> {
		let json = serde_json::to_string(props)?;
		Ok(self.with_props_json(json))
	}

	/// Attributes using the default attribute names.
	pub fn to_attrs(&self) -> Vec<(String, String)> {
		self.attrs(COMPONENT_ATTR, PROPS_ATTR)
	}

	/// Attributes using the names configured in `settings`.
	pub fn to_attrs_for(&self, settings: &HydrationSettings) -> Vec<(String, String)> {
		self.attrs(&settings.component_attr, &settings.props_attr)
	}

	fn attrs(&self, component_attr: &str, props_attr: &str) -> Vec<(String, String)> {
		let mut attrs = vec![
			("id".to_string(), self.id.clone()),
			(component_attr.to_string(), self.kind.to_string()),
		];
		if let Some(ref props) = self.props {
			attrs.push((props_attr.to_string(), props.clone()));
		}
		attrs
	}

	/// The attributes as an escaped HTML attribute string.
	pub fn to_attr_string(&self) -> String {
		self.to_attrs()
			.iter()
			.map(|(k, v)| format!("{}=\"{}\"", k, escape_attribute(v)))
			.collect::<Vec<_>>()
			.join(" ")
	}
}
