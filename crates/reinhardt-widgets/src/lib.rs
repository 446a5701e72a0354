//! Reinhardt Widgets - Hydration of Server-Rendered Widgets
//!
//! Revives server-rendered data grids and forms into stateful controllers
//! without a client framework. Each controller owns one root element,
//! mutates it imperatively and reports outward through bubbling custom
//! events plus the hooks configured for it.
//!
//! ## Architecture
//!
//! - [`hydration`]: the [`Hydrator`] registry, markers and manifest
//! - [`grid`]: pagination, sorting, filtering, selection, search debounce
//! - [`form`](mod@form): values, validation, submission, reset
//! - [`validation`]: ordered, short-circuiting field rules
//! - [`props`]: typed decoding of the serialized props blob
//! - [`dom`]: the headless element tree controllers run against
//! - [`settings`]: attribute names and timings
//!
//! ## Example
//!
//! ```
//! use reinhardt_widgets::{Document, FormOptions, Hydrator, ValidationRule};
//!
//! let document = Document::parse(r#"
//!     <form id="signup" data-component="form" data-props='{"fields": ["email"]}'>
//!         <input name="email" value="">
//!         <span class="ui-form__error" data-error="email"></span>
//!     </form>
//! "#);
//!
//! let mut hydrator = Hydrator::new(document);
//! hydrator.configure(
//!     "signup",
//!     FormOptions::new().rules("email", vec![
//!         ValidationRule::required("Email is required"),
//!         ValidationRule::email("Enter a valid email"),
//!     ]),
//! );
//! hydrator.hydrate_all();
//!
//! let form = hydrator.form("signup").unwrap();
//! assert!(!form.validate_all());
//! assert_eq!(form.errors()["email"], "Email is required");
//! ```
//!
//! ## Events
//!
//! Grids emit `grid:<name>` and forms `form:<name>` events from their root
//! element, each with a JSON `detail`:
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use reinhardt_widgets::{Document, Hydrator};
//!
//! let document = Document::parse(
//!     r#"<div id="users" data-component="grid"></div>"#,
//! );
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = seen.clone();
//! let _handle = document.body().add_event_listener("grid:init", move |event| {
//!     sink.borrow_mut().push(event.detail().clone());
//! });
//!
//! Hydrator::new(document).hydrate("users");
//! assert_eq!(seen.borrow()[0]["state"]["currentPage"], 1);
//! ```

#![warn(missing_docs)]

pub mod callback;
pub mod dom;
pub mod form;
pub mod grid;
pub mod hydration;
pub mod logging;
pub mod props;
pub mod settings;
pub mod spawn;
pub mod validation;

pub use callback::{AsyncCallback, BoxError, Callback};
pub use dom::{Document, DomError, Element, Event, EventHandle};
pub use form::{
	FieldErrors, FieldValues, FormController, FormOptions, FormState, SubmitError,
};
pub use grid::{
	FetchError, GridController, GridOptions, GridState, SelectionMode, SortDirection,
};
pub use hydration::{
	Controller, ControllerInstance, ControllerOptions, HydrationError, HydrationManifest,
	HydrationMarker, HydrationTarget, Hydrator,
};
pub use props::{ComponentKind, FormProps, GridProps, PropsError, UnknownComponentKind};
pub use settings::HydrationSettings;
pub use validation::{FieldValue, RuleKind, RuleSpec, ValidationRule, validate};
