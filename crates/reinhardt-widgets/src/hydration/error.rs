//! Hydration errors.

use crate::props::{ComponentKind, PropsError};

/// Why a single element could not be hydrated.
///
/// [`Hydrator::hydrate`](super::Hydrator::hydrate) logs these as warnings;
/// [`Hydrator::try_hydrate`](super::Hydrator::try_hydrate) returns them.
#[derive(Debug)]
pub enum HydrationError {
	/// No element has the requested id.
	ElementNotFound(String),
	/// The element has no `id`, so it cannot be tracked.
	MissingId {
		/// Tag name of the element.
		tag: String,
	},
	/// The element carries no component type attribute.
	MissingType(String),
	/// The type tag is not one of the known kinds.
	UnknownType {
		/// Element id.
		id: String,
		/// The unrecognized tag.
		tag: String,
	},
	/// The kind is known but has no controller.
	Unsupported {
		/// Element id.
		id: String,
		/// The reserved kind.
		kind: ComponentKind,
	},
	/// The props blob failed to decode.
	InvalidProps {
		/// Element id.
		id: String,
		/// Decoding error.
		source: PropsError,
	},
	/// The manifest is not a JSON array of ids.
	InvalidManifest(String),
}

impl std::fmt::Display for HydrationError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::ElementNotFound(id) => write!(f, "Element not found: {}", id),
			Self::MissingId { tag } => write!(f, "Cannot hydrate <{}> without an id", tag),
			Self::MissingType(id) => write!(f, "Missing component type on #{}", id),
			Self::UnknownType { id, tag } => {
				write!(f, "Unknown component type `{}` on #{}", tag, id)
			}
			Self::Unsupported { id, kind } => {
				write!(f, "No controller for component type `{}` on #{}", kind, id)
			}
			Self::InvalidProps { id, source } => write!(f, "Invalid props on #{}: {}", id, source),
			Self::InvalidManifest(msg) => write!(f, "Invalid hydration manifest: {}", msg),
		}
	}
}

impl std::error::Error for HydrationError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::InvalidProps { source, .. } => Some(source),
			_ => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::error::Error;

	#[rstest]
	fn test_display_messages() {
		let error = HydrationError::UnknownType {
			id: "w".into(),
			tag: "carousel".into(),
		};
		assert_eq!(error.to_string(), "Unknown component type `carousel` on #w");
		let error = HydrationError::Unsupported {
			id: "m".into(),
			kind: ComponentKind::Modal,
		};
		assert_eq!(error.to_string(), "No controller for component type `modal` on #m");
	}

	#[rstest]
	fn test_invalid_props_exposes_source() {
		let error = HydrationError::InvalidProps {
			id: "g".into(),
			source: PropsError::NotAnObject("an array"),
		};
		assert!(error.source().is_some());
		assert!(error.to_string().starts_with("Invalid props on #g"));
	}
}
