//! Headless DOM
//!
//! Widget controllers never talk to a browser directly. They operate on this
//! retained element tree, which models the parts of the DOM that hydration
//! needs: attributes and classes, text and markup, form-control state,
//! constraint validation, focus, and bubbling events.
//!
//! ## Architecture
//!
//! ```text
//! Document ──owns──► <html> ──► <body> ──► ... server-rendered markup
//!    ▲                                      │
//!    └──────────── weak owner link ─────────┘
//! ```
//!
//! Element handles are reference counted and compare by identity, so a
//! controller can keep its root element and hand clones to listeners.
//! Parent and owner links are weak; dropping the [`Document`] releases the tree.
//!
//! Markup is parsed and selectors are matched by `scraper`, so character
//! references, implied tags and selector syntax behave as in a browser.

mod document;
mod element;
mod event;
mod parser;
mod selector;

pub use document::Document;
pub use element::Element;
pub(crate) use element::escape_attribute;
pub use event::{Event, EventHandle};
pub use selector::SelectorList;

/// Errors raised by DOM queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
	/// The selector could not be parsed.
	#[error("invalid selector `{selector}`: {reason}")]
	InvalidSelector {
		/// The offending selector text.
		selector: String,
		/// What the parser expected.
		reason: String,
	},
}
