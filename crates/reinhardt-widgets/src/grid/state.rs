//! Grid state types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sort order of the active sort field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
	/// Ascending.
	#[default]
	Asc,
	/// Descending.
	Desc,
}

impl SortDirection {
	/// The opposite direction.
	pub fn flipped(self) -> Self {
		match self {
			Self::Asc => Self::Desc,
			Self::Desc => Self::Asc,
		}
	}

	/// `"asc"` or `"desc"`, as rendered in `data-sort`.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Asc => "asc",
			Self::Desc => "desc",
		}
	}
}

impl std::fmt::Display for SortDirection {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// How rows may be selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
	/// Selection is disabled.
	None,
	/// At most one row.
	Single,
	/// Any number of rows on the current page.
	#[default]
	Multiple,
}

/// Snapshot of a grid's pagination, sort, filter and selection state.
///
/// Serialized in camelCase; this is the payload handed to the fetch callback
/// and carried by `grid:init` and `grid:refresh`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridState {
	/// 1-based page index.
	pub current_page: u32,
	/// Rows per page.
	pub page_size: u32,
	/// Active sort field.
	pub sort_field: Option<String>,
	/// Direction of the active sort.
	pub sort_direction: SortDirection,
	/// Active filters.
	pub filters: BTreeMap<String, serde_json::Value>,
	/// Selected row keys, in selection order.
	pub selected_rows: Vec<String>,
}

impl GridState {
	/// Initial state: page 1, unsorted, unfiltered, nothing selected.
	pub fn new(page_size: u32) -> Self {
		Self {
			current_page: 1,
			page_size,
			sort_field: None,
			sort_direction: SortDirection::Asc,
			filters: BTreeMap::new(),
			selected_rows: Vec::new(),
		}
	}
}
