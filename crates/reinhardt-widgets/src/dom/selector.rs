//! CSS selector matching through `scraper`.
//!
//! The retained tree is serialized with an index on every element, reparsed
//! with html5ever, and the selector runs against that copy. Matches map back
//! to retained elements through their index, so the full selector grammar
//! `scraper` supports is available.

use scraper::{ElementRef, Selector};

use super::DomError;
use super::element::Element;
use super::parser;

/// Carries an element's position in the serialized snapshot.
pub(crate) const NODE_INDEX_ATTR: &str = "data-reinhardt-node";

/// A parsed, comma-separated selector list.
#[derive(Debug, Clone)]
pub struct SelectorList(Selector);

impl SelectorList {
	/// Parses a selector list.
	///
	/// # Errors
	///
	/// Returns [`DomError::InvalidSelector`] for malformed syntax.
	pub fn parse(source: &str) -> Result<Self, DomError> {
		Selector::parse(source)
			.map(Self)
			.map_err(|error| DomError::InvalidSelector {
				selector: source.to_string(),
				reason: error.to_string(),
			})
	}

	/// Returns true if any selector in the list matches `element`.
	pub fn matches(&self, element: &Element) -> bool {
		self.select_in_tree(element).contains(element)
	}

	/// Every element in `element`'s tree matching the list, in document order.
	pub(crate) fn select_in_tree(&self, element: &Element) -> Vec<Element> {
		let (context, markup, nodes) = snapshot(element);
		let html = parser::parse_in_context(context, &markup);
		let mut indices: Vec<usize> = html
			.root_element()
			.descendants()
			.filter_map(ElementRef::wrap)
			.filter(|candidate| self.0.matches(candidate))
			.filter_map(|candidate| candidate.value().attr(NODE_INDEX_ATTR)?.parse().ok())
			.collect();
		indices.sort_unstable();
		indices.dedup();
		indices
			.into_iter()
			.filter_map(|index| nodes.get(index).cloned())
			.collect()
	}
}

/// Serializes the whole tree `element` lives in.
///
/// A document is captured from its body, so `<html>` and `<body>` never
/// match. A detached tree is captured from its root, wrapped in whatever
/// context its root tag needs.
fn snapshot(element: &Element) -> (&'static str, String, Vec<Element>) {
	let top = element.tree_root();
	match top.owner_document() {
		Some(document) if document.document_element() == top => {
			let (markup, nodes) = document.body().serialize_indexed(false);
			("body", markup, nodes)
		}
		_ => {
			let (markup, nodes) = top.serialize_indexed(true);
			(parser::context_for(&top.tag_name()), markup, nodes)
		}
	}
}
