//! The hydrator: discovery, construction and tracking of controllers.

use std::collections::{BTreeMap, HashMap};

use super::error::HydrationError;
use super::instance::{Controller, ControllerInstance, ControllerOptions};
use super::manifest::HydrationManifest;
use crate::dom::{Document, Element};
use crate::form::{FormController, FormOptions};
use crate::grid::{GridController, GridOptions};
use crate::props::{ComponentKind, FormProps, GridProps, PropsError, parse_props};
use crate::settings::HydrationSettings;
use crate::{debug_log, info_log, warn_log};

/// What to hydrate: an element id or the element itself.
#[derive(Debug, Clone)]
pub enum HydrationTarget {
	/// Look the element up by id.
	Id(String),
	/// Use this element.
	Element(Element),
}

impl From<&str> for HydrationTarget {
	fn from(id: &str) -> Self {
		Self::Id(id.to_string())
	}
}

impl From<String> for HydrationTarget {
	fn from(id: String) -> Self {
		Self::Id(id)
	}
}

impl From<Element> for HydrationTarget {
	fn from(element: Element) -> Self {
		Self::Element(element)
	}
}

impl From<&Element> for HydrationTarget {
	fn from(element: &Element) -> Self {
		Self::Element(element.clone())
	}
}

/// Owns every live controller of one document.
///
/// Construct it once at startup, [`configure`](Self::configure) the widgets
/// that need hooks, call [`hydrate_all`](Self::hydrate_all), and call
/// [`destroy_all`](Self::destroy_all) at teardown.
///
/// ```
/// use reinhardt_widgets::{Document, GridOptions, Hydrator};
///
/// let document = Document::parse(
///     r#"<div id="users" data-component="grid" data-props='{"pageSize": 5}'></div>"#,
/// );
/// let mut hydrator = Hydrator::new(document);
/// hydrator.configure("users", GridOptions::new());
///
/// let hydrated = hydrator.hydrate_all();
/// assert_eq!(hydrated.len(), 1);
/// assert_eq!(hydrator.grid("users").unwrap().props().page_size, 5);
/// ```
#[derive(Debug)]
pub struct Hydrator {
	document: Document,
	settings: HydrationSettings,
	tracked: BTreeMap<String, ControllerInstance>,
	options: HashMap<String, ControllerOptions>,
	manifest: Option<HydrationManifest>,
}

impl Hydrator {
	/// Creates a hydrator with default settings.
	pub fn new(document: Document) -> Self {
		Self::with_settings(document, HydrationSettings::default())
	}

	/// Creates a hydrator with custom settings.
	pub fn with_settings(document: Document, settings: HydrationSettings) -> Self {
		Self {
			document,
			settings,
			tracked: BTreeMap::new(),
			options: HashMap::new(),
			manifest: None,
		}
	}

	/// Current settings.
	pub fn settings(&self) -> &HydrationSettings {
		&self.settings
	}

	/// The document being hydrated.
	pub fn document(&self) -> &Document {
		&self.document
	}

	/// Registers options for the element with `id`, replacing earlier ones.
	///
	/// Options are read when that element hydrates; configuring an element
	/// that is already live has no effect until it is destroyed and hydrated
	/// again.
	pub fn configure(&mut self, id: impl Into<String>, options: impl Into<ControllerOptions>) {
		self.options.insert(id.into(), options.into());
	}

	/// Restricts [`hydrate_all`](Self::hydrate_all) to the listed ids.
	///
	/// Overrides any manifest embedded in the document.
	pub fn set_manifest(&mut self, manifest: Option<HydrationManifest>) {
		self.manifest = manifest;
	}

	/// Hydrates every marked element in document order.
	///
	/// Elements already hydrated, without an id, or left out of the manifest
	/// are skipped. A failing element is logged and skipped; it never stops
	/// the rest of the batch. Returns the controllers created by this call.
	pub fn hydrate_all(&mut self) -> Vec<ControllerInstance> {
		let manifest = self.effective_manifest();
		let selector = format!("[{}]", self.settings.component_attr);
		let candidates = match self.document.query_selector_all(&selector) {
			Ok(candidates) => candidates,
			Err(e) => {
				warn_log!("Hydration scan failed: {}", e);
				return Vec::new();
			}
		};

		let mut hydrated = Vec::new();
		for element in candidates {
			if self.is_marked_hydrated(&element) {
				continue;
			}
			let Some(id) = element.id() else {
				warn_log!(
					"Skipping <{}> marked for hydration without an id",
					element.tag_name()
				);
				continue;
			};
			if self.tracked.contains_key(&id) {
				continue;
			}
			if manifest.as_ref().is_some_and(|m| !m.contains(&id)) {
				continue;
			}
			if let Some(instance) = self.hydrate(element) {
				hydrated.push(instance);
			}
		}
		info_log!("Hydrated {} component(s)", hydrated.len());
		hydrated
	}

	/// Hydrates one element, logging a warning and returning `None` on
	/// failure. An element that is already live returns its existing
	/// controller with a warning.
	pub fn hydrate(&mut self, target: impl Into<HydrationTarget>) -> Option<ControllerInstance> {
		match self.try_hydrate(target) {
			Ok(instance) => Some(instance),
			Err(e) => {
				warn_log!("Hydration failed: {}", e);
				None
			}
		}
	}

	/// Hydrates one element.
	///
	/// # Errors
	///
	/// Returns a [`HydrationError`] when the element cannot be resolved, has
	/// no id, carries no or an unknown type tag, names a kind without a
	/// controller, or has props that fail to decode. Nothing is constructed
	/// or tracked in that case.
	pub fn try_hydrate(
		&mut self,
		target: impl Into<HydrationTarget>,
	) -> Result<ControllerInstance, HydrationError> {
		let element = self.resolve(target.into())?;
		let id = element.id().ok_or_else(|| HydrationError::MissingId {
			tag: element.tag_name(),
		})?;
		if let Some(existing) = self.tracked.get(&id) {
			warn_log!("#{} is already hydrated; returning the live controller", id);
			return Ok(existing.clone());
		}

		let tag = element
			.get_attribute(&self.settings.component_attr)
			.ok_or_else(|| HydrationError::MissingType(id.clone()))?;
		let kind: ComponentKind = tag.parse().map_err(|_| HydrationError::UnknownType {
			id: id.clone(),
			tag: tag.clone(),
		})?;

		let raw_props = element.get_attribute(&self.settings.props_attr);
		let invalid = |source: PropsError| HydrationError::InvalidProps {
			id: id.clone(),
			source,
		};
		let props = parse_props(raw_props.as_deref()).map_err(invalid)?;

		let instance = match kind {
			ComponentKind::Grid => {
				let props = GridProps::from_props(&props).map_err(invalid)?;
				let options = self.grid_options(&id);
				ControllerInstance::Grid(GridController::new(
					element.clone(),
					props,
					options,
					&self.settings,
				))
			}
			ComponentKind::Form => {
				let props = FormProps::from_props(&props).map_err(invalid)?;
				let options = self.form_options(&id);
				ControllerInstance::Form(FormController::new(
					element.clone(),
					props,
					options,
					&self.settings,
				))
			}
			ComponentKind::Modal | ComponentKind::DatePicker => {
				return Err(HydrationError::Unsupported { id, kind });
			}
		};

		instance.init();
		element.set_attribute(&self.settings.hydrated_attr, "true");
		debug_log!("Hydrated #{} as {}", id, kind);
		self.tracked.insert(id, instance.clone());
		Ok(instance)
	}

	/// The live controller for `id`.
	pub fn get(&self, id: &str) -> Option<&ControllerInstance> {
		self.tracked.get(id)
	}

	/// The live grid controller for `id`.
	pub fn grid(&self, id: &str) -> Option<&std::rc::Rc<GridController>> {
		self.get(id).and_then(ControllerInstance::as_grid)
	}

	/// The live form controller for `id`.
	pub fn form(&self, id: &str) -> Option<&std::rc::Rc<FormController>> {
		self.get(id).and_then(ControllerInstance::as_form)
	}

	/// Ids of the live controllers, sorted.
	pub fn ids(&self) -> impl Iterator<Item = &str> {
		self.tracked.keys().map(String::as_str)
	}

	/// Number of live controllers.
	pub fn len(&self) -> usize {
		self.tracked.len()
	}

	/// Returns true if nothing is hydrated.
	pub fn is_empty(&self) -> bool {
		self.tracked.is_empty()
	}

	/// Destroys the controller for `id` and clears the hydrated marker.
	///
	/// Unknown ids are ignored.
	pub fn destroy(&mut self, id: &str) {
		if let Some(instance) = self.tracked.remove(id) {
			instance.destroy();
			instance
				.element()
				.remove_attribute(&self.settings.hydrated_attr);
			debug_log!("Destroyed #{}", id);
		}
	}

	/// Destroys every live controller.
	pub fn destroy_all(&mut self) {
		let ids: Vec<String> = self.tracked.keys().cloned().collect();
		for id in ids {
			self.destroy(&id);
		}
	}

	// ========================================================================
	// Helpers
	// ========================================================================

	fn resolve(&self, target: HydrationTarget) -> Result<Element, HydrationError> {
		match target {
			HydrationTarget::Element(element) => Ok(element),
			HydrationTarget::Id(id) => self
				.document
				.get_element_by_id(&id)
				.ok_or(HydrationError::ElementNotFound(id)),
		}
	}

	fn is_marked_hydrated(&self, element: &Element) -> bool {
		element
			.get_attribute(&self.settings.hydrated_attr)
			.is_some_and(|value| value == "true")
	}

	/// The explicit manifest, else the one embedded in the document.
	fn effective_manifest(&self) -> Option<HydrationManifest> {
		if self.manifest.is_some() {
			return self.manifest.clone();
		}
		match HydrationManifest::from_document(&self.document, &self.settings.manifest_selector) {
			Ok(manifest) => manifest,
			Err(e) => {
				warn_log!("{}; hydrating every marked element", e);
				None
			}
		}
	}

	fn grid_options(&self, id: &str) -> GridOptions {
		match self.options.get(id) {
			Some(ControllerOptions::Grid(options)) => options.clone(),
			Some(other) => {
				warn_log!(
					"Options for #{} are for a {}, not a grid; using defaults",
					id,
					other.kind()
				);
				GridOptions::default()
			}
			None => GridOptions::default(),
		}
	}

	fn form_options(&self, id: &str) -> FormOptions {
		match self.options.get(id) {
			Some(ControllerOptions::Form(options)) => options.clone(),
			Some(other) => {
				warn_log!(
					"Options for #{} are for a {}, not a form; using defaults",
					id,
					other.kind()
				);
				FormOptions::default()
			}
			None => FormOptions::default(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::settings::HYDRATED_ATTR;
	use rstest::rstest;
	use std::cell::RefCell;
	use std::rc::Rc;

	const PAGE: &str = r#"
		<div id="users" data-component="grid" data-props='{"pageSize": 5}'></div>
		<form id="signup" data-component="form" data-props='{"fields": ["email"]}'>
			<input name="email" value="">
		</form>
		<div id="dialog" data-component="modal"></div>
		<div id="broken" data-component="grid" data-props="{not json"></div>
		<div id="mystery" data-component="carousel"></div>
		<div data-component="grid"></div>
	"#;

	#[rstest]
	fn test_hydrate_is_idempotent() {
		let mut hydrator = Hydrator::new(Document::parse(PAGE));
		let first = hydrator.hydrate("users").unwrap();
		let second = hydrator.hydrate("users").unwrap();
		assert!(first.ptr_eq(&second));
		assert_eq!(hydrator.len(), 1);
	}

	#[rstest]
	fn test_hydrate_marks_element() {
		let document = Document::parse(PAGE);
		let mut hydrator = Hydrator::new(document.clone());
		hydrator.hydrate("signup").unwrap();
		let form = document.get_element_by_id("signup").unwrap();
		assert_eq!(form.get_attribute(HYDRATED_ATTR).as_deref(), Some("true"));
	}

	#[rstest]
	#[case("missing", "Element not found")]
	#[case("dialog", "No controller")]
	#[case("broken", "Invalid props")]
	#[case("mystery", "Unknown component type")]
	fn test_try_hydrate_errors(#[case] id: &str, #[case] prefix: &str) {
		let mut hydrator = Hydrator::new(Document::parse(PAGE));
		let error = hydrator.try_hydrate(id).unwrap_err();
		assert!(error.to_string().starts_with(prefix), "{}", error);
		assert!(hydrator.hydrate(id).is_none());
		assert!(hydrator.is_empty());
	}

	#[rstest]
	fn test_missing_id() {
		let document = Document::parse(PAGE);
		let anonymous = document
			.query_selector("div:not([id])[data-component]")
			.unwrap()
			.unwrap();
		let mut hydrator = Hydrator::new(document);
		assert!(matches!(
			hydrator.try_hydrate(&anonymous),
			Err(HydrationError::MissingId { .. })
		));
	}

	#[rstest]
	fn test_hydrate_all_isolates_failures() {
		let mut hydrator = Hydrator::new(Document::parse(PAGE));
		let hydrated = hydrator.hydrate_all();
		assert_eq!(hydrated.len(), 2);
		assert_eq!(hydrator.ids().collect::<Vec<_>>(), ["signup", "users"]);
		assert!(hydrated[0].as_grid().is_some());
		assert!(hydrated[1].as_form().is_some());
		assert!(hydrator.hydrate_all().is_empty());
	}

	#[rstest]
	fn test_manifest_restricts_hydrate_all() {
		let mut hydrator = Hydrator::new(Document::parse(PAGE));
		hydrator.set_manifest(Some(HydrationManifest::new(["signup"])));
		hydrator.hydrate_all();
		assert!(hydrator.form("signup").is_some());
		assert!(hydrator.get("users").is_none());
	}

	#[rstest]
	fn test_configured_options_reach_controller() {
		let seen = Rc::new(RefCell::new(Vec::new()));
		let sink = seen.clone();
		let mut hydrator = Hydrator::new(Document::parse(PAGE));
		hydrator.configure(
			"users",
			GridOptions::new().on_selection_change(move |rows: Vec<String>| {
				sink.borrow_mut().push(rows.len());
			}),
		);
		let grid = hydrator.hydrate("users").unwrap();
		grid.as_grid().unwrap().select_all(true);
		assert_eq!(*seen.borrow(), vec![0]);
	}

	#[rstest]
	fn test_mismatched_options_fall_back() {
		let mut hydrator = Hydrator::new(Document::parse(PAGE));
		hydrator.configure("users", FormOptions::new());
		assert!(hydrator.grid_options("users").fetch_data.is_none());
		assert!(hydrator.hydrate("users").is_some());
	}

	#[rstest]
	fn test_destroy_allows_rehydration() {
		let document = Document::parse(PAGE);
		let mut hydrator = Hydrator::new(document.clone());
		let first = hydrator.hydrate("users").unwrap();
		hydrator.destroy("users");
		hydrator.destroy("users");
		assert!(hydrator.get("users").is_none());
		let element = document.get_element_by_id("users").unwrap();
		assert!(!element.has_attribute(HYDRATED_ATTR));

		let second = hydrator.hydrate("users").unwrap();
		assert!(!first.ptr_eq(&second));
	}

	#[rstest]
	fn test_destroy_all() {
		let mut hydrator = Hydrator::new(Document::parse(PAGE));
		hydrator.hydrate_all();
		hydrator.destroy_all();
		assert!(hydrator.is_empty());
	}
}
