//! Hydration Registry
//!
//! Finds server-rendered widget markup, builds the matching controller for
//! each element and tracks it by element id.
//!
//! ## Architecture
//!
//! ```text
//! Document ──scan [data-component]──► Hydrator::hydrate_all
//!                                        │   (manifest filter, document order)
//!                                        ▼
//!                                  Hydrator::try_hydrate
//!                                        │
//!     type tag ──► ComponentKind ────────┤
//!     data-props ──► GridProps/FormProps ┤
//!     configure(id, options) ────────────┤
//!                                        ▼
//!                        ControllerInstance::{Grid, Form}
//!                                        │ init()
//!                                        ▼
//!                          tracked[id], data-hydrated="true"
//! ```
//!
//! Failures are per element: [`Hydrator::hydrate`] logs a warning and returns
//! `None`, so one broken widget never blocks the rest of the page.
//!
//! ## Server side
//!
//! [`HydrationMarker`] produces the attributes a server writes on a widget's
//! root element, and [`HydrationManifest::to_script_tag`] the optional
//! allow-list.

mod error;
mod instance;
mod manifest;
mod markers;
mod registry;

pub use error::HydrationError;
pub use instance::{Controller, ControllerInstance, ControllerOptions};
pub use manifest::HydrationManifest;
pub use markers::{HydrationMarker, generate_id};
pub use registry::{HydrationTarget, Hydrator};
