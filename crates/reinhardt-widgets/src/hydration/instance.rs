//! Live controller instances.

use std::rc::Rc;

use crate::dom::Element;
use crate::form::{FormController, FormOptions};
use crate::grid::{GridController, GridOptions};
use crate::props::ComponentKind;

/// Lifecycle shared by every widget controller.
///
/// A controller owns exactly one root element. `init` binds its listeners and
/// emits `<kind>:init`; `destroy` detaches every listener it bound and emits
/// `<kind>:destroy`.
pub trait Controller {
	/// Binds DOM listeners and emits the `init` event.
	fn init(&self);
	/// Detaches DOM listeners, cancels pending work and emits `destroy`.
	fn destroy(&self);
	/// The root element.
	fn element(&self) -> &Element;
	/// The component kind.
	fn kind(&self) -> ComponentKind;
}

/// A hydrated controller.
///
/// Cloning shares the controller.
#[derive(Debug, Clone)]
pub enum ControllerInstance {
	/// A grid.
	Grid(Rc<GridController>),
	/// A form.
	Form(Rc<FormController>),
}

impl ControllerInstance {
	fn controller(&self) -> &dyn Controller {
		match self {
			Self::Grid(grid) => &**grid,
			Self::Form(form) => &**form,
		}
	}

	/// The grid controller, if this is a grid.
	pub fn as_grid(&self) -> Option<&Rc<GridController>> {
		match self {
			Self::Grid(grid) => Some(grid),
			Self::Form(_) => None,
		}
	}

	/// The form controller, if this is a form.
	pub fn as_form(&self) -> Option<&Rc<FormController>> {
		match self {
			Self::Form(form) => Some(form),
			Self::Grid(_) => None,
		}
	}

	/// Returns true if both handles refer to the same controller.
	pub fn ptr_eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Grid(a), Self::Grid(b)) => Rc::ptr_eq(a, b),
			(Self::Form(a), Self::Form(b)) => Rc::ptr_eq(a, b),
			_ => false,
		}
	}
}

impl Controller for ControllerInstance {
	fn init(&self) {
		self.controller().init();
	}

	fn destroy(&self) {
		self.controller().destroy();
	}

	fn element(&self) -> &Element {
		self.controller().element()
	}

	fn kind(&self) -> ComponentKind {
		self.controller().kind()
	}
}

/// Options registered for one element id before it hydrates.
#[derive(Debug, Clone)]
pub enum ControllerOptions {
	/// Grid hooks.
	Grid(GridOptions),
	/// Form hooks and rules.
	Form(FormOptions),
}

impl ControllerOptions {
	/// The kind these options are meant for.
	pub fn kind(&self) -> ComponentKind {
		match self {
			Self::Grid(_) => ComponentKind::Grid,
			Self::Form(_) => ComponentKind::Form,
		}
	}
}

impl From<GridOptions> for ControllerOptions {
	fn from(options: GridOptions) -> Self {
		Self::Grid(options)
	}
}

impl From<FormOptions> for ControllerOptions {
	fn from(options: FormOptions) -> Self {
		Self::Form(options)
	}
}
