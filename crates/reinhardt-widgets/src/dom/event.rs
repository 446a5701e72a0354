//! DOM events and listener handles.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use super::element::{Element, ElementData};

/// Type alias for listener functions stored on an element.
pub(crate) type Listener = Rc<dyn Fn(&Event) + 'static>;

/// An event dispatched through the element tree.
///
/// Native events (`click`, `input`, `submit`, ...) carry no detail; widget
/// events such as `grid:sort` carry a JSON `detail` payload.
pub struct Event {
	event_type: String,
	bubbles: bool,
	cancelable: bool,
	detail: serde_json::Value,
	key: Option<String>,
	target: RefCell<Option<Element>>,
	current_target: RefCell<Option<Element>>,
	default_prevented: Cell<bool>,
	propagation_stopped: Cell<bool>,
}

impl Event {
	/// Creates a non-bubbling, cancelable event.
	pub fn new(event_type: impl Into<String>) -> Self {
		Self {
			event_type: event_type.into(),
			bubbles: false,
			cancelable: true,
			detail: serde_json::Value::Null,
			key: None,
			target: RefCell::new(None),
			current_target: RefCell::new(None),
			default_prevented: Cell::new(false),
			propagation_stopped: Cell::new(false),
		}
	}

	/// Creates a bubbling, cancelable event.
	pub fn bubbling(event_type: impl Into<String>) -> Self {
		Self::new(event_type).with_bubbles(true)
	}

	/// Creates a bubbling custom event carrying `detail`.
	pub fn custom(event_type: impl Into<String>, detail: serde_json::Value) -> Self {
		Self {
			detail,
			..Self::bubbling(event_type)
		}
	}

	/// Creates a bubbling keyboard event for `key` (e.g. `"ArrowDown"`).
	pub fn keyboard(event_type: impl Into<String>, key: impl Into<String>) -> Self {
		Self {
			key: Some(key.into()),
			..Self::bubbling(event_type)
		}
	}

	/// Sets whether the event bubbles.
	pub fn with_bubbles(mut self, bubbles: bool) -> Self {
		self.bubbles = bubbles;
		self
	}

	/// Sets whether the default action can be prevented.
	pub fn with_cancelable(mut self, cancelable: bool) -> Self {
		self.cancelable = cancelable;
		self
	}

	/// The event type, e.g. `"click"` or `"form:submit"`.
	pub fn event_type(&self) -> &str {
		&self.event_type
	}

	/// Whether the event propagates to ancestors.
	pub fn bubbles(&self) -> bool {
		self.bubbles
	}

	/// The custom payload (`Null` for native events).
	pub fn detail(&self) -> &serde_json::Value {
		&self.detail
	}

	/// The key of a keyboard event.
	pub fn key(&self) -> Option<&str> {
		self.key.as_deref()
	}

	/// The element the event was dispatched on.
	pub fn target(&self) -> Option<Element> {
		self.target.borrow().clone()
	}

	/// The element whose listener is currently running.
	pub fn current_target(&self) -> Option<Element> {
		self.current_target.borrow().clone()
	}

	/// Cancels the default action, if the event is cancelable.
	pub fn prevent_default(&self) {
		if self.cancelable {
			self.default_prevented.set(true);
		}
	}

	/// Whether [`prevent_default`](Self::prevent_default) took effect.
	pub fn default_prevented(&self) -> bool {
		self.default_prevented.get()
	}

	/// Stops propagation to further ancestors.
	pub fn stop_propagation(&self) {
		self.propagation_stopped.set(true);
	}

	pub(crate) fn propagation_stopped(&self) -> bool {
		self.propagation_stopped.get()
	}

	pub(crate) fn set_target(&self, target: &Element) {
		*self.target.borrow_mut() = Some(target.clone());
	}

	pub(crate) fn set_current_target(&self, current: Option<&Element>) {
		*self.current_target.borrow_mut() = current.cloned();
	}
}

impl std::fmt::Debug for Event {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Event")
			.field("event_type", &self.event_type)
			.field("bubbles", &self.bubbles)
			.field("detail", &self.detail)
			.field("key", &self.key)
			.field("default_prevented", &self.default_prevented.get())
			.finish()
	}
}

/// Disposer for a listener added with [`Element::add_event_listener`].
///
/// The listener is detached when the handle is removed or dropped. Keep the
/// handle alive for as long as the listener should fire.
#[must_use = "dropping an EventHandle detaches its listener"]
pub struct EventHandle {
	element: Weak<RefCell<ElementData>>,
	id: u64,
}

impl EventHandle {
	pub(crate) fn new(element: Weak<RefCell<ElementData>>, id: u64) -> Self {
		Self { element, id }
	}

	/// Detaches the listener now.
	pub fn remove(self) {
		drop(self);
	}
}

impl Drop for EventHandle {
	fn drop(&mut self) {
		if let Some(element) = self.element.upgrade() {
			if let Ok(mut data) = element.try_borrow_mut() {
				data.remove_listener(self.id);
			}
		}
	}
}

impl std::fmt::Debug for EventHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EventHandle").field("id", &self.id).finish()
	}
}
