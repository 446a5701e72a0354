//! Document root and focus tracking.

use std::cell::RefCell;
use std::rc::Rc;

use super::DomError;
use super::element::Element;

pub(crate) struct DocumentInner {
	root: Element,
	body: Element,
	active: RefCell<Option<Element>>,
}

/// An owned element tree with `<html>` and `<body>` roots.
///
/// `Document` is a cheap handle; clones share the same tree.
#[derive(Clone)]
pub struct Document {
	inner: Rc<DocumentInner>,
}

impl std::fmt::Debug for Document {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Document")
			.field("body", &self.inner.body)
			.finish()
	}
}

impl Default for Document {
	fn default() -> Self {
		Self::new()
	}
}

impl Document {
	/// Creates an empty document.
	pub fn new() -> Self {
		let inner = Rc::new_cyclic(|weak| {
			let root = Element::with_owner("html", weak.clone());
			let body = Element::with_owner("body", weak.clone());
			root.append_child(&body);
			DocumentInner {
				root,
				body,
				active: RefCell::new(None),
			}
		});
		Self { inner }
	}

	/// Creates a document whose body holds the parsed `markup`.
	pub fn parse(markup: &str) -> Self {
		let document = Self::new();
		document.body().set_inner_html(markup);
		document
	}

	pub(crate) fn from_inner(inner: Rc<DocumentInner>) -> Self {
		Self { inner }
	}

	/// The `<html>` element.
	pub fn document_element(&self) -> Element {
		self.inner.root.clone()
	}

	/// The `<body>` element.
	pub fn body(&self) -> Element {
		self.inner.body.clone()
	}

	/// Creates an element owned by this document but not yet attached.
	pub fn create_element(&self, tag: &str) -> Element {
		Element::with_owner(tag, Rc::downgrade(&self.inner))
	}

	/// Looks up an attached element by its `id` attribute.
	pub fn get_element_by_id(&self, id: &str) -> Option<Element> {
		self.inner
			.root
			.find(|element| element.get_attribute("id").as_deref() == Some(id))
	}

	/// The first element matching `selector`.
	///
	/// # Errors
	///
	/// Returns [`DomError::InvalidSelector`] if `selector` cannot be parsed.
	pub fn query_selector(&self, selector: &str) -> Result<Option<Element>, DomError> {
		self.inner.root.query_selector(selector)
	}

	/// All elements matching `selector`, in document order.
	///
	/// # Errors
	///
	/// Returns [`DomError::InvalidSelector`] if `selector` cannot be parsed.
	pub fn query_selector_all(&self, selector: &str) -> Result<Vec<Element>, DomError> {
		self.inner.root.query_selector_all(selector)
	}

	/// The focused element, if any.
	pub fn active_element(&self) -> Option<Element> {
		self.inner.active.borrow().clone()
	}

	pub(crate) fn set_active_element(&self, element: Option<Element>) {
		*self.inner.active.borrow_mut() = element;
	}
}
