//! Element handles and the node tree.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use super::DomError;
use super::document::{Document, DocumentInner};
use super::event::{Event, EventHandle, Listener};
use super::parser;
use super::selector::{NODE_INDEX_ATTR, SelectorList};

/// Elements that never have children or an end tag.
const VOID_ELEMENTS: &[&str] = &[
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
	"wbr",
];

/// Elements whose text content is serialized without escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

const VALUE_MISSING: &str = "Please fill out this field.";
const TYPE_MISMATCH_EMAIL: &str = "Please enter an email address.";
const TYPE_MISMATCH_NUMBER: &str = "Please enter a number.";
const PATTERN_MISMATCH: &str = "Please match the requested format.";

/// Global counter for listener ids.
static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

/// A child node: either an element or a run of text.
#[derive(Debug, Clone)]
pub(crate) enum Node {
	Element(Element),
	Text(String),
}

struct ListenerEntry {
	id: u64,
	event_type: String,
	listener: Listener,
}

pub(crate) struct ElementData {
	tag: String,
	attributes: Vec<(String, String)>,
	children: Vec<Node>,
	parent: Weak<RefCell<ElementData>>,
	owner: Weak<DocumentInner>,
	listeners: Vec<ListenerEntry>,
	/// Value typed by the user or set programmatically; `None` means "default".
	dirty_value: Option<String>,
	/// Checkedness set by the user or programmatically; `None` means "default".
	dirty_checked: Option<bool>,
	custom_validity: String,
}

impl ElementData {
	pub(crate) fn remove_listener(&mut self, id: u64) {
		self.listeners.retain(|entry| entry.id != id);
	}
}

/// A handle to an element in the tree.
///
/// Cloning is cheap; clones refer to the same element and compare equal.
#[derive(Clone)]
pub struct Element {
	inner: Rc<RefCell<ElementData>>,
}

impl PartialEq for Element {
	fn eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.inner, &other.inner)
	}
}

impl Eq for Element {}

impl std::fmt::Debug for Element {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let data = self.inner.borrow();
		write!(f, "<{}", data.tag)?;
		for (name, value) in &data.attributes {
			write!(f, " {}=\"{}\"", name, value)?;
		}
		write!(f, ">")
	}
}

impl Element {
	/// Creates a detached element.
	pub fn new(tag: &str) -> Self {
		Self::with_owner(tag, Weak::new())
	}

	pub(crate) fn with_owner(tag: &str, owner: Weak<DocumentInner>) -> Self {
		Self {
			inner: Rc::new(RefCell::new(ElementData {
				tag: tag.to_ascii_lowercase(),
				attributes: Vec::new(),
				children: Vec::new(),
				parent: Weak::new(),
				owner,
				listeners: Vec::new(),
				dirty_value: None,
				dirty_checked: None,
				custom_validity: String::new(),
			})),
		}
	}

	/// Lowercase tag name.
	pub fn tag_name(&self) -> String {
		self.inner.borrow().tag.clone()
	}

	/// The `id` attribute, if present and non-empty.
	pub fn id(&self) -> Option<String> {
		self.get_attribute("id").filter(|id| !id.is_empty())
	}

	/// The `name` attribute, if present and non-empty.
	pub fn name(&self) -> Option<String> {
		self.get_attribute("name").filter(|name| !name.is_empty())
	}

	// ------------------------------------------------------------------
	// Attributes and classes
	// ------------------------------------------------------------------

	/// Returns an attribute value.
	pub fn get_attribute(&self, name: &str) -> Option<String> {
		let name = name.to_ascii_lowercase();
		self.inner
			.borrow()
			.attributes
			.iter()
			.find(|(key, _)| *key == name)
			.map(|(_, value)| value.clone())
	}

	/// Returns true if the attribute is present.
	pub fn has_attribute(&self, name: &str) -> bool {
		self.get_attribute(name).is_some()
	}

	/// Sets an attribute, replacing any previous value.
	pub fn set_attribute(&self, name: &str, value: impl Into<String>) {
		let name = name.to_ascii_lowercase();
		let value = value.into();
		let mut data = self.inner.borrow_mut();
		match data.attributes.iter_mut().find(|(key, _)| *key == name) {
			Some(entry) => entry.1 = value,
			None => data.attributes.push((name, value)),
		}
	}

	/// Removes an attribute.
	pub fn remove_attribute(&self, name: &str) {
		let name = name.to_ascii_lowercase();
		self.inner
			.borrow_mut()
			.attributes
			.retain(|(key, _)| *key != name);
	}

	/// Attribute name/value pairs in source order.
	pub fn attributes(&self) -> Vec<(String, String)> {
		self.inner.borrow().attributes.clone()
	}

	fn class_list(&self) -> Vec<String> {
		self.get_attribute("class")
			.map(|classes| classes.split_whitespace().map(str::to_string).collect())
			.unwrap_or_default()
	}

	/// Returns true if `class` is in the class list.
	pub fn has_class(&self, class: &str) -> bool {
		self.class_list().iter().any(|c| c == class)
	}

	/// Adds `class` to the class list.
	pub fn add_class(&self, class: &str) {
		let mut classes = self.class_list();
		if !classes.iter().any(|c| c == class) {
			classes.push(class.to_string());
			self.set_attribute("class", classes.join(" "));
		}
	}

	/// Removes `class` from the class list.
	pub fn remove_class(&self, class: &str) {
		let classes = self.class_list();
		if classes.iter().any(|c| c == class) {
			let kept: Vec<_> = classes.into_iter().filter(|c| c != class).collect();
			self.set_attribute("class", kept.join(" "));
		}
	}

	/// Adds `class` when `force` is true, removes it otherwise.
	pub fn toggle_class(&self, class: &str, force: bool) {
		if force {
			self.add_class(class);
		} else {
			self.remove_class(class);
		}
	}

	// ------------------------------------------------------------------
	// Tree structure
	// ------------------------------------------------------------------

	/// The parent element.
	pub fn parent(&self) -> Option<Element> {
		self.inner
			.borrow()
			.parent
			.upgrade()
			.map(|inner| Element { inner })
	}

	/// Child elements (text nodes excluded).
	pub fn children(&self) -> Vec<Element> {
		self.inner
			.borrow()
			.children
			.iter()
			.filter_map(|node| match node {
				Node::Element(element) => Some(element.clone()),
				Node::Text(_) => None,
			})
			.collect()
	}

	/// All descendant elements in document order, excluding `self`.
	pub fn descendants(&self) -> Vec<Element> {
		let mut out = Vec::new();
		self.collect_descendants(&mut out);
		out
	}

	fn collect_descendants(&self, out: &mut Vec<Element>) {
		for child in self.children() {
			out.push(child.clone());
			child.collect_descendants(out);
		}
	}

	/// Returns true if `other` is `self` or one of its descendants.
	pub fn contains(&self, other: &Element) -> bool {
		let mut current = Some(other.clone());
		while let Some(element) = current {
			if element == *self {
				return true;
			}
			current = element.parent();
		}
		false
	}

	/// Appends `child`, detaching it from its previous parent first.
	///
	/// Appending an ancestor of `self` is ignored.
	pub fn append_child(&self, child: &Element) {
		if child.contains(self) {
			return;
		}
		child.remove();
		child.inner.borrow_mut().parent = Rc::downgrade(&self.inner);
		let owner = self.inner.borrow().owner.clone();
		child.adopt(&owner);
		self.inner
			.borrow_mut()
			.children
			.push(Node::Element(child.clone()));
	}

	/// Appends a text node.
	pub fn append_text(&self, text: impl Into<String>) {
		self.inner
			.borrow_mut()
			.children
			.push(Node::Text(text.into()));
	}

	/// Detaches `self` from its parent.
	pub fn remove(&self) {
		if let Some(parent) = self.parent() {
			parent
				.inner
				.borrow_mut()
				.children
				.retain(|node| !matches!(node, Node::Element(element) if element == self));
		}
		self.inner.borrow_mut().parent = Weak::new();
	}

	fn adopt(&self, owner: &Weak<DocumentInner>) {
		let children = self.children();
		self.inner.borrow_mut().owner = owner.clone();
		for child in children {
			child.adopt(owner);
		}
	}

	fn clear_children(&self) {
		let old = std::mem::take(&mut self.inner.borrow_mut().children);
		for node in old {
			if let Node::Element(element) = node {
				element.inner.borrow_mut().parent = Weak::new();
			}
		}
	}

	/// The document this element belongs to, if any.
	pub fn owner_document(&self) -> Option<Document> {
		self.inner
			.borrow()
			.owner
			.upgrade()
			.map(Document::from_inner)
	}

	// ------------------------------------------------------------------
	// Text and markup
	// ------------------------------------------------------------------

	/// Concatenated text of all descendant text nodes.
	pub fn text_content(&self) -> String {
		let mut out = String::new();
		self.collect_text(&mut out);
		out
	}

	fn collect_text(&self, out: &mut String) {
		let children = self.inner.borrow().children.clone();
		for node in children {
			match node {
				Node::Text(text) => out.push_str(&text),
				Node::Element(element) => element.collect_text(out),
			}
		}
	}

	/// Replaces all children with a single text node.
	pub fn set_text_content(&self, text: impl Into<String>) {
		let text = text.into();
		self.clear_children();
		if !text.is_empty() {
			self.append_text(text);
		}
	}

	/// Serializes the children of this element.
	pub fn inner_html(&self) -> String {
		let mut out = String::new();
		self.write_inner(&mut out, None);
		out
	}

	/// Serializes this element and its children.
	pub fn outer_html(&self) -> String {
		let mut out = String::new();
		self.write_outer(&mut out, None);
		out
	}

	/// Serializes with a snapshot index on every element, returning the
	/// markup and the elements in index order.
	pub(crate) fn serialize_indexed(&self, include_self: bool) -> (String, Vec<Element>) {
		let mut out = String::new();
		let mut nodes = Vec::new();
		if include_self {
			self.write_outer(&mut out, Some(&mut nodes));
		} else {
			self.write_inner(&mut out, Some(&mut nodes));
		}
		(out, nodes)
	}

	fn write_inner(&self, out: &mut String, mut index: Option<&mut Vec<Element>>) {
		let raw = RAW_TEXT_ELEMENTS.contains(&self.tag_name().as_str());
		let children = self.inner.borrow().children.clone();
		for node in children {
			match node {
				Node::Text(text) if raw => out.push_str(&text),
				Node::Text(text) => out.push_str(&escape_text(&text)),
				Node::Element(element) => element.write_outer(out, index.as_deref_mut()),
			}
		}
	}

	fn write_outer(&self, out: &mut String, mut index: Option<&mut Vec<Element>>) {
		let tag = self.tag_name();
		out.push('<');
		out.push_str(&tag);
		for (name, value) in self.attributes() {
			out.push_str(&format!(" {}=\"{}\"", name, escape_attribute(&value)));
		}
		if let Some(nodes) = index.as_deref_mut() {
			out.push_str(&format!(" {}=\"{}\"", NODE_INDEX_ATTR, nodes.len()));
			nodes.push(self.clone());
		}
		out.push('>');
		if !VOID_ELEMENTS.contains(&tag.as_str()) {
			self.write_inner(out, index);
			out.push_str(&format!("</{}>", tag));
		}
	}

	/// Replaces all children with the parsed `markup`.
	pub fn set_inner_html(&self, markup: &str) {
		self.clear_children();
		parser::parse_into(self, markup);
	}

	// ------------------------------------------------------------------
	// Queries
	// ------------------------------------------------------------------

	/// Tests `self` against a selector.
	///
	/// # Errors
	///
	/// Returns [`DomError::InvalidSelector`] if `selector` cannot be parsed.
	pub fn matches(&self, selector: &str) -> Result<bool, DomError> {
		Ok(SelectorList::parse(selector)?.matches(self))
	}

	/// The nearest inclusive ancestor matching `selector`.
	///
	/// # Errors
	///
	/// Returns [`DomError::InvalidSelector`] if `selector` cannot be parsed.
	pub fn closest(&self, selector: &str) -> Result<Option<Element>, DomError> {
		let matched = SelectorList::parse(selector)?.select_in_tree(self);
		let mut current = Some(self.clone());
		while let Some(element) = current {
			if matched.contains(&element) {
				return Ok(Some(element));
			}
			current = element.parent();
		}
		Ok(None)
	}

	/// The first descendant matching `selector`.
	///
	/// # Errors
	///
	/// Returns [`DomError::InvalidSelector`] if `selector` cannot be parsed.
	pub fn query_selector(&self, selector: &str) -> Result<Option<Element>, DomError> {
		Ok(self.query_selector_all(selector)?.into_iter().next())
	}

	/// All descendants matching `selector`, in document order.
	///
	/// Selectors are evaluated against the whole tree, so ancestors outside
	/// `self` still take part in combinators.
	///
	/// # Errors
	///
	/// Returns [`DomError::InvalidSelector`] if `selector` cannot be parsed.
	pub fn query_selector_all(&self, selector: &str) -> Result<Vec<Element>, DomError> {
		let matched = SelectorList::parse(selector)?.select_in_tree(self);
		Ok(matched
			.into_iter()
			.filter(|element| element != self && self.contains(element))
			.collect())
	}

	/// The first descendant satisfying `predicate`.
	pub fn find(&self, predicate: impl Fn(&Element) -> bool) -> Option<Element> {
		self.descendants().into_iter().find(|element| predicate(element))
	}

	// ------------------------------------------------------------------
	// Form controls
	// ------------------------------------------------------------------

	/// Returns true for `input`, `select` and `textarea`.
	pub fn is_form_control(&self) -> bool {
		matches!(self.tag_name().as_str(), "input" | "select" | "textarea")
	}

	/// The control type: the lowercase `type` attribute of an input
	/// (default `"text"`), or the tag name for other elements.
	pub fn input_type(&self) -> String {
		let tag = self.tag_name();
		if tag == "input" {
			self.get_attribute("type")
				.map(|ty| ty.to_ascii_lowercase())
				.filter(|ty| !ty.is_empty())
				.unwrap_or_else(|| "text".to_string())
		} else {
			tag
		}
	}

	/// The current control value.
	pub fn value(&self) -> String {
		if let Some(value) = self.inner.borrow().dirty_value.clone() {
			return value;
		}
		match self.tag_name().as_str() {
			"textarea" => self.text_content(),
			"select" => self.default_select_value(),
			"option" => self
				.get_attribute("value")
				.unwrap_or_else(|| self.text_content().trim().to_string()),
			"input" if matches!(self.input_type().as_str(), "checkbox" | "radio") => {
				self.get_attribute("value").unwrap_or_else(|| "on".to_string())
			}
			_ => self.get_attribute("value").unwrap_or_default(),
		}
	}

	fn default_select_value(&self) -> String {
		let options: Vec<Element> = self
			.descendants()
			.into_iter()
			.filter(|element| element.tag_name() == "option")
			.collect();
		options
			.iter()
			.find(|option| option.has_attribute("selected"))
			.or_else(|| options.first())
			.map(Element::value)
			.unwrap_or_default()
	}

	/// Sets the current control value.
	pub fn set_value(&self, value: impl Into<String>) {
		self.inner.borrow_mut().dirty_value = Some(value.into());
	}

	/// Current checkedness of a checkbox or radio button.
	pub fn checked(&self) -> bool {
		let dirty = self.inner.borrow().dirty_checked;
		dirty.unwrap_or_else(|| self.has_attribute("checked"))
	}

	/// Sets checkedness. Checking a radio button unchecks the rest of its group.
	pub fn set_checked(&self, checked: bool) {
		self.inner.borrow_mut().dirty_checked = Some(checked);
		if checked && self.input_type() == "radio" {
			for other in self.radio_group() {
				if other != *self {
					other.inner.borrow_mut().dirty_checked = Some(false);
				}
			}
		}
	}

	/// Whether the `disabled` attribute is present.
	pub fn disabled(&self) -> bool {
		self.has_attribute("disabled")
	}

	/// Adds or removes the `disabled` attribute.
	pub fn set_disabled(&self, disabled: bool) {
		if disabled {
			self.set_attribute("disabled", "");
		} else {
			self.remove_attribute("disabled");
		}
	}

	fn closest_form(&self) -> Option<Element> {
		let mut current = Some(self.clone());
		while let Some(element) = current {
			if element.tag_name() == "form" {
				return Some(element);
			}
			current = element.parent();
		}
		None
	}

	pub(crate) fn tree_root(&self) -> Element {
		let mut root = self.clone();
		while let Some(parent) = root.parent() {
			root = parent;
		}
		root
	}

	/// Radio buttons sharing this control's name within its form (or tree).
	fn radio_group(&self) -> Vec<Element> {
		let Some(name) = self.name() else {
			return vec![self.clone()];
		};
		let scope = self.closest_form().unwrap_or_else(|| self.tree_root());
		scope
			.descendants()
			.into_iter()
			.filter(|element| {
				element.tag_name() == "input"
					&& element.input_type() == "radio"
					&& element.name().as_deref() == Some(name.as_str())
			})
			.collect()
	}

	/// Sets a custom validity message; an empty string clears it.
	pub fn set_custom_validity(&self, message: impl Into<String>) {
		self.inner.borrow_mut().custom_validity = message.into();
	}

	/// The constraint-validation message, empty when the control is valid.
	pub fn validation_message(&self) -> String {
		if !self.is_form_control() || self.disabled() {
			return String::new();
		}
		let custom = self.inner.borrow().custom_validity.clone();
		if !custom.is_empty() {
			return custom;
		}

		let ty = self.input_type();
		let value = self.value();
		if self.has_attribute("required") {
			let missing = match ty.as_str() {
				"checkbox" => !self.checked(),
				"radio" => !self.radio_group().iter().any(Element::checked),
				_ => value.is_empty(),
			};
			if missing {
				return VALUE_MISSING.to_string();
			}
		}
		if value.is_empty() || matches!(ty.as_str(), "checkbox" | "radio") {
			return String::new();
		}

		match ty.as_str() {
			"email" if !is_simple_address(&value) => return TYPE_MISMATCH_EMAIL.to_string(),
			"number" => match value.trim().parse::<f64>() {
				Err(_) => return TYPE_MISMATCH_NUMBER.to_string(),
				Ok(number) => {
					let bound = |name: &str| {
						self.get_attribute(name)
							.and_then(|raw| raw.trim().parse::<f64>().ok())
					};
					if let Some(min) = bound("min").filter(|min| number < *min) {
						return format!("Value must be greater than or equal to {}.", min);
					}
					if let Some(max) = bound("max").filter(|max| number > *max) {
						return format!("Value must be less than or equal to {}.", max);
					}
				}
			},
			_ => {}
		}

		if let Some(pattern) = self.get_attribute("pattern") {
			// An attribute that does not compile imposes no constraint.
			if let Ok(regex) = regex::Regex::new(&format!("^(?:{})$", pattern)) {
				if !regex.is_match(&value) {
					return PATTERN_MISMATCH.to_string();
				}
			}
		}
		String::new()
	}

	/// Returns true if the control satisfies its constraints.
	pub fn check_validity(&self) -> bool {
		self.validation_message().is_empty()
	}

	/// Dispatches a cancelable `reset` event and, unless it was cancelled,
	/// restores every descendant control to its default state.
	pub fn reset(&self) {
		if !self.dispatch_event(&Event::bubbling("reset")) {
			return;
		}
		for element in self.descendants() {
			let mut data = element.inner.borrow_mut();
			data.dirty_value = None;
			data.dirty_checked = None;
		}
	}

	/// Dispatches a cancelable `submit` event; returns false if a listener
	/// prevented native submission.
	pub fn request_submit(&self) -> bool {
		self.dispatch_event(&Event::bubbling("submit"))
	}

	// ------------------------------------------------------------------
	// Focus
	// ------------------------------------------------------------------

	/// Moves document focus to this element.
	pub fn focus(&self) {
		if let Some(document) = self.owner_document() {
			match document.active_element() {
				Some(active) if active == *self => return,
				Some(active) => active.blur(),
				None => {}
			}
			document.set_active_element(Some(self.clone()));
		}
		self.dispatch_event(&Event::new("focus"));
	}

	/// Removes focus from this element and dispatches `blur`.
	pub fn blur(&self) {
		if let Some(document) = self.owner_document() {
			if document.active_element().as_ref() == Some(self) {
				document.set_active_element(None);
			}
		}
		self.dispatch_event(&Event::new("blur"));
	}

	// ------------------------------------------------------------------
	// Events
	// ------------------------------------------------------------------

	/// Registers `listener` for `event_type`.
	///
	/// The listener stays attached while the returned [`EventHandle`] lives.
	pub fn add_event_listener<F>(&self, event_type: &str, listener: F) -> EventHandle
	where
		F: Fn(&Event) + 'static,
	{
		let id = NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed);
		self.inner.borrow_mut().listeners.push(ListenerEntry {
			id,
			event_type: event_type.to_string(),
			listener: Rc::new(listener),
		});
		EventHandle::new(Rc::downgrade(&self.inner), id)
	}

	/// Number of listeners currently attached to this element.
	pub fn listener_count(&self) -> usize {
		self.inner.borrow().listeners.len()
	}

	fn listeners_for(&self, event_type: &str) -> Vec<Listener> {
		self.inner
			.borrow()
			.listeners
			.iter()
			.filter(|entry| entry.event_type == event_type)
			.map(|entry| Rc::clone(&entry.listener))
			.collect()
	}

	/// Dispatches `event` at this element, then at its ancestors if the
	/// event bubbles. Returns false if the default action was prevented.
	pub fn dispatch_event(&self, event: &Event) -> bool {
		event.set_target(self);
		let mut current = Some(self.clone());
		while let Some(element) = current {
			event.set_current_target(Some(&element));
			for listener in element.listeners_for(event.event_type()) {
				listener(event);
			}
			if !event.bubbles() || event.propagation_stopped() {
				break;
			}
			current = element.parent();
		}
		event.set_current_target(None);
		!event.default_prevented()
	}
}

/// `local@domain` with no whitespace, as browsers check `type=email`.
fn is_simple_address(value: &str) -> bool {
	match value.split_once('@') {
		Some((local, domain)) => {
			!local.is_empty()
				&& !domain.is_empty()
				&& !domain.contains('@')
				&& !value.chars().any(char::is_whitespace)
		}
		None => false,
	}
}

fn escape_text(text: &str) -> String {
	text.replace('&', "&amp;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
}

/// Escapes a string for use in a double-quoted attribute value.
pub(crate) fn escape_attribute(value: &str) -> String {
	value
		.replace('&', "&amp;")
		.replace('"', "&quot;")
		.replace('<', "&lt;")
		.replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::cell::Cell;

	#[rstest]
	fn test_class_list_manipulation() {
		let el = Element::new("div");
		el.add_class("a");
		el.add_class("b");
		el.add_class("a");
		assert_eq!(el.get_attribute("class").as_deref(), Some("a b"));
		el.toggle_class("a", false);
		assert!(!el.has_class("a"));
		assert!(el.has_class("b"));
	}

	#[rstest]
	fn test_inner_html_round_trip() {
		let el = Element::new("tbody");
		el.set_inner_html(r#"<tr data-row-key="7"><td>a &amp; b</td></tr>"#);
		assert_eq!(
			el.inner_html(),
			r#"<tr data-row-key="7"><td>a &amp; b</td></tr>"#
		);
		assert_eq!(el.text_content(), "a & b");
	}

	#[rstest]
	fn test_named_references_round_trip() {
		let el = Element::new("tbody");
		el.set_inner_html("<tr><td>Zo&euml; &hellip; &copy;</td></tr>");
		assert_eq!(el.text_content(), "Zoë … ©");
		assert_eq!(el.inner_html(), "<tr><td>Zoë … ©</td></tr>");

		let copy = Element::new("tbody");
		copy.set_inner_html(&el.inner_html());
		assert_eq!(copy.inner_html(), el.inner_html());
	}

	#[rstest]
	fn test_set_inner_html_detaches_old_children() {
		let el = Element::new("div");
		el.set_inner_html("<span>old</span>");
		let old = el.children()[0].clone();
		el.set_inner_html("<em>new</em>");
		assert!(old.parent().is_none());
		assert_eq!(el.children()[0].tag_name(), "em");
	}

	#[rstest]
	#[case(r#"<input name="a" value="x">"#, "x")]
	#[case(r#"<textarea name="a">hello</textarea>"#, "hello")]
	#[case(r#"<select name="a"><option value="1">One</option><option value="2" selected>Two</option></select>"#, "2")]
	#[case(r#"<select name="a"><option>First</option></select>"#, "First")]
	#[case(r#"<input type="checkbox" name="a">"#, "on")]
	fn test_default_values(#[case] markup: &str, #[case] expected: &str) {
		let container = Element::new("form");
		container.set_inner_html(markup);
		assert_eq!(container.children()[0].value(), expected);
	}

	#[rstest]
	fn test_reset_restores_defaults() {
		let form = Element::new("form");
		form.set_inner_html(r#"<input name="a" value="x"><input type="checkbox" name="b" checked>"#);
		let inputs = form.children();
		inputs[0].set_value("changed");
		inputs[1].set_checked(false);
		form.reset();
		assert_eq!(inputs[0].value(), "x");
		assert!(inputs[1].checked());
	}

	#[rstest]
	fn test_reset_cancelled_keeps_values() {
		let form = Element::new("form");
		form.set_inner_html(r#"<input name="a" value="x">"#);
		let _handle = form.add_event_listener("reset", |event| event.prevent_default());
		form.children()[0].set_value("changed");
		form.reset();
		assert_eq!(form.children()[0].value(), "changed");
	}

	#[rstest]
	fn test_radio_group_exclusive() {
		let form = Element::new("form");
		form.set_inner_html(
			r#"<input type="radio" name="c" value="r" checked><input type="radio" name="c" value="g">"#,
		);
		let radios = form.children();
		radios[1].set_checked(true);
		assert!(!radios[0].checked());
		assert!(radios[1].checked());
	}

	#[rstest]
	#[case(r#"<input name="a" required>"#, VALUE_MISSING)]
	#[case(r#"<input type="checkbox" name="a" required>"#, VALUE_MISSING)]
	#[case(r#"<input type="email" name="a" value="nope">"#, TYPE_MISMATCH_EMAIL)]
	#[case(r#"<input type="email" name="a" value="a@b">"#, "")]
	#[case(r#"<input name="a" pattern="[0-9]+" value="12a">"#, PATTERN_MISMATCH)]
	#[case(r#"<input name="a" pattern="[0-9]+" value="12">"#, "")]
	#[case(r#"<input type="number" name="a" min="5" value="3">"#, "Value must be greater than or equal to 5.")]
	#[case(r#"<input type="number" name="a" value="abc">"#, TYPE_MISMATCH_NUMBER)]
	#[case(r#"<input name="a" required disabled>"#, "")]
	fn test_validation_message(#[case] markup: &str, #[case] expected: &str) {
		let form = Element::new("form");
		form.set_inner_html(markup);
		assert_eq!(form.children()[0].validation_message(), expected);
	}

	#[rstest]
	fn test_custom_validity_wins() {
		let input = Element::new("input");
		input.set_custom_validity("Taken");
		assert_eq!(input.validation_message(), "Taken");
		input.set_custom_validity("");
		assert!(input.check_validity());
	}

	#[rstest]
	fn test_event_bubbles_to_ancestors() {
		let root = Element::new("div");
		root.set_inner_html("<p><span></span></p>");
		let span = root.query_selector("span").unwrap().unwrap();
		let hits = Rc::new(Cell::new(0));
		let counter = Rc::clone(&hits);
		let _handle = root.add_event_listener("ping", move |event| {
			assert_eq!(event.target().unwrap().tag_name(), "span");
			counter.set(counter.get() + 1);
		});
		span.dispatch_event(&Event::bubbling("ping"));
		span.dispatch_event(&Event::new("ping"));
		assert_eq!(hits.get(), 1);
	}

	#[rstest]
	fn test_stop_propagation() {
		let root = Element::new("div");
		root.set_inner_html("<p></p>");
		let p = root.children()[0].clone();
		let hits = Rc::new(Cell::new(0));
		let counter = Rc::clone(&hits);
		let _outer = root.add_event_listener("ping", move |_| counter.set(counter.get() + 1));
		let _inner = p.add_event_listener("ping", |event| event.stop_propagation());
		p.dispatch_event(&Event::bubbling("ping"));
		assert_eq!(hits.get(), 0);
	}

	#[rstest]
	fn test_dropping_handle_detaches_listener() {
		let el = Element::new("button");
		let hits = Rc::new(Cell::new(0));
		let counter = Rc::clone(&hits);
		let handle = el.add_event_listener("click", move |_| counter.set(counter.get() + 1));
		el.dispatch_event(&Event::bubbling("click"));
		handle.remove();
		el.dispatch_event(&Event::bubbling("click"));
		assert_eq!(hits.get(), 1);
		assert_eq!(el.listener_count(), 0);
	}

	#[rstest]
	fn test_append_ancestor_is_ignored() {
		let outer = Element::new("div");
		let inner = Element::new("span");
		outer.append_child(&inner);
		inner.append_child(&outer);
		assert!(outer.parent().is_none());
		assert_eq!(inner.parent(), Some(outer));
	}
}
