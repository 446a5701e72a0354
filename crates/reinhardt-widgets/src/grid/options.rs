//! Caller-supplied grid hooks.

use std::collections::BTreeMap;
use std::future::Future;

use super::state::{GridState, SortDirection};
use crate::callback::{AsyncCallback, BoxError, Callback};

/// Hooks a page passes to a grid before it hydrates.
///
/// Every hook is optional. The matching `grid:*` event fires whether or not
/// a hook is set.
///
/// ```ignore
/// let options = GridOptions::new()
///     .on_page_change(|page| info_log!("page {}", page))
///     .fetch_data(|state: GridState| async move {
///         api::render_rows(&state).await
///     });
/// hydrator.configure("users", options);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GridOptions {
	/// Called after the sort field or direction changes.
	pub on_sort: Option<Callback<(String, SortDirection)>>,
	/// Called after the current page changes.
	pub on_page_change: Option<Callback<u32>>,
	/// Called with the selected row keys after every selection change.
	pub on_selection_change: Option<Callback<Vec<String>>>,
	/// Called with the merged filters after a filter change.
	pub on_filter: Option<Callback<BTreeMap<String, serde_json::Value>>>,
	/// Returns replacement markup for the grid body.
	pub fetch_data: Option<AsyncCallback<GridState, String>>,
}

impl GridOptions {
	/// Options with no hooks.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets [`on_sort`](Self::on_sort).
	pub fn on_sort(mut self, f: impl Fn((String, SortDirection)) + 'static) -> Self {
		self.on_sort = Some(Callback::new(f));
		self
	}

	/// Sets [`on_page_change`](Self::on_page_change).
	pub fn on_page_change(mut self, f: impl Fn(u32) + 'static) -> Self {
		self.on_page_change = Some(Callback::new(f));
		self
	}

	/// Sets [`on_selection_change`](Self::on_selection_change).
	pub fn on_selection_change(mut self, f: impl Fn(Vec<String>) + 'static) -> Self {
		self.on_selection_change = Some(Callback::new(f));
		self
	}

	/// Sets [`on_filter`](Self::on_filter).
	pub fn on_filter(
		mut self,
		f: impl Fn(BTreeMap<String, serde_json::Value>) + 'static,
	) -> Self {
		self.on_filter = Some(Callback::new(f));
		self
	}

	/// Sets [`fetch_data`](Self::fetch_data).
	pub fn fetch_data<F, Fut, E>(mut self, f: F) -> Self
	where
		F: Fn(GridState) -> Fut + 'static,
		Fut: Future<Output = Result<String, E>> + 'static,
		E: Into<BoxError>,
	{
		self.fetch_data = Some(AsyncCallback::new(f));
		self
	}
}
