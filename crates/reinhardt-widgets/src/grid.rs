//! Grid Controller
//!
//! Revives a server-rendered data grid: header sorting, pagination buttons,
//! row selection, a debounced search box, keyboard row navigation, and body
//! replacement through a caller-supplied fetch hook.
//!
//! ## Architecture
//!
//! ```text
//! DOM event ──► listener ──► GridController method ──► GridState (RefCell)
//!                                   │                        │
//!                                   │                        ▼
//!                                   │                 apply_*_view (state → DOM)
//!                                   ▼
//!                   hook (GridOptions) + `grid:<name>` CustomEvent
//!                                   │
//!                                   ▼
//!                   refresh() ──► fetch_data(state) ──► .ui-grid__body innerHTML
//! ```
//!
//! The rendered tree is a projection of [`GridState`]; the controller never
//! reads state back from the DOM except the server-rendered page total.
//!
//! ## DOM contract
//!
//! | Selector | Role |
//! |----------|------|
//! | `.ui-grid__header--sortable[data-field]` | click sorts by `data-field` |
//! | `.ui-grid__sort-icon` | `data-sort` = `none` / `asc` / `desc` |
//! | `[data-action=first\|prev\|next\|last]` | pagination buttons |
//! | `[data-page-current]`, `[data-page-total]` | page counters |
//! | `.ui-grid__checkbox-all` | select-all checkbox |
//! | `.ui-grid__row[data-row-key]` | a data row (`.ui-grid__row--empty` excluded) |
//! | `[data-action="select-row"]`, `.ui-grid__checkbox` | row checkbox |
//! | `.ui-grid__search` | search input, filters on `search` |
//! | `.ui-grid__body` | replaced on refresh |

mod options;
mod state;

pub use options::GridOptions;
pub use state::{GridState, SelectionMode, SortDirection};

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};
use std::time::Duration;

use futures::future::{AbortHandle, abortable};
use serde_json::{Value, json};
use thiserror::Error;

use crate::dom::{Element, Event, EventHandle};
use crate::hydration::Controller;
use crate::props::{ComponentKind, GridProps};
use crate::settings::HydrationSettings;
use crate::spawn::{sleep, spawn_local};
use crate::{debug_log, warn_log};

const ROW_SELECTOR: &str = ".ui-grid__row:not(.ui-grid__row--empty)";
const LOADING_CLASS: &str = "ui-grid--loading";
const SELECTED_CLASS: &str = "ui-grid__row--selected";

/// The fetch hook failed; the grid body was left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("grid data fetch failed: {0}")]
pub struct FetchError(pub String);

/// Controller for one `data-component="grid"` element.
pub struct GridController {
	this: Weak<GridController>,
	element: Element,
	props: GridProps,
	options: GridOptions,
	state: RefCell<GridState>,
	loading: Cell<bool>,
	refresh_queued: Cell<bool>,
	search_debounce: Duration,
	pending_search: RefCell<Option<AbortHandle>>,
	listeners: RefCell<Vec<EventHandle>>,
}

impl std::fmt::Debug for GridController {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("GridController")
			.field("element", &self.element)
			.field("props", &self.props)
			.field("state", &self.state.borrow())
			.field("loading", &self.loading.get())
			.finish()
	}
}

/// Clears the loading flag and class when the fetch settles or is dropped.
struct LoadingGuard<'a>(&'a GridController);

impl<'a> LoadingGuard<'a> {
	fn start(grid: &'a GridController) -> Self {
		grid.loading.set(true);
		grid.element.add_class(LOADING_CLASS);
		Self(grid)
	}
}

impl Drop for LoadingGuard<'_> {
	fn drop(&mut self) {
		self.0.loading.set(false);
		self.0.element.remove_class(LOADING_CLASS);
	}
}

impl GridController {
	/// Creates a controller for `element`. Call [`init`](Controller::init) to
	/// bind it to the DOM.
	pub fn new(
		element: Element,
		props: GridProps,
		options: GridOptions,
		settings: &HydrationSettings,
	) -> Rc<Self> {
		Rc::new_cyclic(|this| Self {
			this: this.clone(),
			element,
			state: RefCell::new(GridState::new(props.page_size)),
			props,
			options,
			loading: Cell::new(false),
			refresh_queued: Cell::new(false),
			search_debounce: settings.search_debounce(),
			pending_search: RefCell::new(None),
			listeners: RefCell::new(Vec::new()),
		})
	}

	/// Decoded props.
	pub fn props(&self) -> &GridProps {
		&self.props
	}

	/// A copy of the current state.
	pub fn state(&self) -> GridState {
		self.state.borrow().clone()
	}

	/// A copy of the selected row keys.
	pub fn selected_rows(&self) -> Vec<String> {
		self.state.borrow().selected_rows.clone()
	}

	/// Whether a fetch is in flight.
	pub fn is_loading(&self) -> bool {
		self.loading.get()
	}

	/// Page count rendered in `[data-page-total]`; 1 when absent or invalid.
	pub fn total_pages(&self) -> u32 {
		self.query("[data-page-total]")
			.and_then(|total| total.text_content().trim().parse::<u32>().ok())
			.filter(|total| *total >= 1)
			.unwrap_or(1)
	}

	// ========================================================================
	// Operations
	// ========================================================================

	/// Sorts by `field`, flipping the direction if it is already the sort field.
	///
	/// The current page is kept.
	pub async fn sort(&self, field: &str) {
		let direction = {
			let mut state = self.state.borrow_mut();
			if state.sort_field.as_deref() == Some(field) {
				state.sort_direction = state.sort_direction.flipped();
			} else {
				state.sort_field = Some(field.to_string());
				state.sort_direction = SortDirection::Asc;
			}
			state.sort_direction
		};
		self.apply_sort_view();
		if let Some(on_sort) = &self.options.on_sort {
			on_sort.call((field.to_string(), direction));
		}
		self.emit("sort", json!({ "field": field, "direction": direction }));
		self.refresh().await;
	}

	/// Moves to `page`, clamped into `[1, total_pages]`. Nothing happens when
	/// the clamped page is the current one.
	pub async fn go_to_page(&self, page: u32) {
		let page = page.clamp(1, self.total_pages());
		{
			let mut state = self.state.borrow_mut();
			if state.current_page == page {
				return;
			}
			state.current_page = page;
		}
		self.apply_pagination_view();
		if let Some(on_page_change) = &self.options.on_page_change {
			on_page_change.call(page);
		}
		self.emit("pageChange", json!({ "page": page }));
		self.refresh().await;
	}

	/// Merges `filters` into the active filters and returns to page 1.
	pub async fn filter(&self, filters: BTreeMap<String, Value>) {
		let merged = {
			let mut state = self.state.borrow_mut();
			state.filters.extend(filters);
			state.current_page = 1;
			state.filters.clone()
		};
		self.apply_pagination_view();
		if let Some(on_filter) = &self.options.on_filter {
			on_filter.call(merged.clone());
		}
		self.emit("filter", json!({ "filters": merged }));
		self.refresh().await;
	}

	/// Re-fetches the body through the fetch hook, if one is configured, and
	/// emits `grid:refresh`.
	///
	/// A refresh requested while a fetch is in flight returns at once and
	/// queues one more fetch; the in-flight call runs it with the latest
	/// state once its own fetch settles, so the body always ends up matching
	/// the state. A failed fetch leaves the body alone and emits
	/// `grid:refreshError` instead.
	pub async fn refresh(&self) {
		if self.loading.get() {
			self.refresh_queued.set(true);
			debug_log!("grid {}: refresh queued behind in-flight fetch", self.id());
			return;
		}
		if let Some(fetch_data) = self.options.fetch_data.clone() {
			loop {
				self.refresh_queued.set(false);
				let result = {
					let _loading = LoadingGuard::start(self);
					fetch_data.call(self.state()).await
				};
				let queued = self.refresh_queued.replace(false);
				match result {
					Ok(markup) => self.replace_body(&markup),
					Err(error) => {
						let error = FetchError(error.to_string());
						warn_log!("grid {}: {}", self.id(), error);
						if !queued {
							self.emit("refreshError", json!({ "error": error.to_string() }));
							return;
						}
					}
				}
				if !queued {
					break;
				}
			}
		}
		self.emit("refresh", json!({ "state": self.state() }));
	}

	/// Selects (or clears) every rendered row. Selection is page-scoped: the
	/// result contains only keys on the current page.
	///
	/// No-op when selection is disabled, and for `checked == true` in single
	/// mode; the checkboxes are redrawn from the current selection either way.
	pub fn select_all(&self, checked: bool) {
		let ignored = match self.props.selection {
			SelectionMode::None => true,
			SelectionMode::Single => checked,
			SelectionMode::Multiple => false,
		};
		if ignored {
			// Undo whatever the user ticked.
			self.apply_selection_view();
			return;
		}
		let selected = if checked {
			self.rendered_keys()
		} else {
			Vec::new()
		};
		self.state.borrow_mut().selected_rows = selected;
		self.apply_selection_view();
		self.notify_selection();
	}

	/// Toggles the row with `key`. In single mode selecting a row clears the
	/// others. Keys not rendered on the current page are ignored.
	pub fn toggle_row_selection(&self, key: &str) {
		if self.props.selection == SelectionMode::None {
			self.apply_selection_view();
			return;
		}
		if !self.rendered_keys().iter().any(|rendered| rendered == key) {
			debug_log!("grid {}: row `{}` is not rendered", self.id(), key);
			return;
		}
		{
			let mut state = self.state.borrow_mut();
			let selected = &mut state.selected_rows;
			match selected.iter().position(|k| k == key) {
				Some(index) => {
					selected.remove(index);
				}
				None if self.props.selection == SelectionMode::Single => {
					*selected = vec![key.to_string()];
				}
				None => selected.push(key.to_string()),
			}
		}
		self.apply_selection_view();
		self.notify_selection();
	}

	fn notify_selection(&self) {
		let selected = self.selected_rows();
		if let Some(on_selection_change) = &self.options.on_selection_change {
			on_selection_change.call(selected.clone());
		}
		self.emit("selectionChange", json!({ "selected": selected }));
	}

	// ========================================================================
	// State → view
	// ========================================================================

	/// Projects the whole state onto the DOM.
	fn apply_view(&self) {
		self.apply_sort_view();
		self.apply_pagination_view();
		self.apply_selection_view();
	}

	fn apply_sort_view(&self) {
		for icon in self.query_all(".ui-grid__sort-icon") {
			icon.set_attribute("data-sort", "none");
		}
		let state = self.state.borrow();
		let Some(field) = state.sort_field.as_deref() else {
			return;
		};
		for header in self.query_all("[data-field]") {
			if header.get_attribute("data-field").as_deref() == Some(field) {
				if let Ok(Some(icon)) = header.query_selector(".ui-grid__sort-icon") {
					icon.set_attribute("data-sort", state.sort_direction.as_str());
				}
			}
		}
	}

	fn apply_pagination_view(&self) {
		let current = self.state.borrow().current_page;
		let total = self.total_pages();
		if let Some(label) = self.query("[data-page-current]") {
			label.set_text_content(current.to_string());
		}
		for (action, disabled) in [
			("first", current <= 1),
			("prev", current <= 1),
			("next", current >= total),
			("last", current >= total),
		] {
			if let Some(button) = self.action_button(action) {
				button.set_disabled(disabled);
			}
		}
	}

	fn apply_selection_view(&self) {
		let selected = self.selected_rows();
		let mut keyed_rows = 0;
		let mut all_selected = true;
		for row in self.rows() {
			let is_selected = row
				.get_attribute("data-row-key")
				.is_some_and(|key| selected.contains(&key));
			if row.has_attribute("data-row-key") {
				keyed_rows += 1;
				all_selected &= is_selected;
			}
			row.toggle_class(SELECTED_CLASS, is_selected);
			if let Ok(Some(checkbox)) = row.query_selector(".ui-grid__checkbox, [data-action=\"select-row\"]") {
				checkbox.set_checked(is_selected);
			}
		}
		if let Some(select_all) = self.query(".ui-grid__checkbox-all") {
			select_all.set_checked(keyed_rows > 0 && all_selected);
		}
	}

	fn replace_body(&self, markup: &str) {
		if let Some(body) = self.query(".ui-grid__body") {
			body.set_inner_html(markup);
		}
		self.make_rows_focusable();

		// Selection stays a subset of the rendered keys.
		let rendered = self.rendered_keys();
		let pruned = {
			let mut state = self.state.borrow_mut();
			let before = state.selected_rows.len();
			state.selected_rows.retain(|key| rendered.contains(key));
			state.selected_rows.len() != before
		};
		self.apply_selection_view();
		if pruned {
			self.notify_selection();
		}
	}

	fn make_rows_focusable(&self) {
		for row in self.query_all(".ui-grid__row") {
			row.set_attribute("tabindex", "0");
		}
	}

	// ========================================================================
	// DOM helpers
	// ========================================================================

	fn id(&self) -> String {
		self.element.id().unwrap_or_default()
	}

	fn query(&self, selector: &str) -> Option<Element> {
		self.element.query_selector(selector).ok().flatten()
	}

	fn query_all(&self, selector: &str) -> Vec<Element> {
		self.element.query_selector_all(selector).unwrap_or_default()
	}

	fn action_button(&self, action: &str) -> Option<Element> {
		self.element
			.find(|el| el.get_attribute("data-action").as_deref() == Some(action))
	}

	fn rows(&self) -> Vec<Element> {
		self.query_all(ROW_SELECTOR)
	}

	fn rendered_keys(&self) -> Vec<String> {
		self.rows()
			.iter()
			.filter_map(|row| row.get_attribute("data-row-key"))
			.collect()
	}

	fn emit(&self, name: &str, detail: Value) {
		self.element
			.dispatch_event(&Event::custom(format!("grid:{}", name), detail));
	}

	// ========================================================================
	// Bindings
	// ========================================================================

	fn listen<F>(&self, target: &Element, event_type: &str, handler: F)
	where
		F: Fn(Rc<GridController>, &Event) + 'static,
	{
		let this = self.this.clone();
		let handle = target.add_event_listener(event_type, move |event| {
			if let Some(grid) = this.upgrade() {
				handler(grid, event);
			}
		});
		self.listeners.borrow_mut().push(handle);
	}

	fn bind_sorting(&self) {
		for header in self.query_all(".ui-grid__header--sortable") {
			self.listen(&header, "click", |grid, event| {
				let field = event
					.current_target()
					.and_then(|header| header.get_attribute("data-field"));
				if let Some(field) = field {
					spawn_local(async move { grid.sort(&field).await });
				}
			});
		}
	}

	fn bind_pagination(&self) {
		for action in ["first", "prev", "next", "last"] {
			let Some(button) = self.action_button(action) else {
				continue;
			};
			self.listen(&button, "click", move |grid, _| {
				let current = grid.state.borrow().current_page;
				let page = match action {
					"first" => 1,
					"prev" => current.saturating_sub(1),
					"next" => current.saturating_add(1),
					_ => grid.total_pages(),
				};
				spawn_local(async move { grid.go_to_page(page).await });
			});
		}
	}

	fn bind_selection(&self) {
		if let Some(select_all) = self.query(".ui-grid__checkbox-all") {
			self.listen(&select_all, "change", |grid, event| {
				if let Some(target) = event.target() {
					grid.select_all(target.checked());
				}
			});
		}
		self.listen(&self.element, "change", |grid, event| {
			let Some(target) = event.target() else {
				return;
			};
			if !target.matches("[data-action=\"select-row\"]").unwrap_or(false) {
				return;
			}
			let key = target
				.closest(".ui-grid__row")
				.ok()
				.flatten()
				.and_then(|row| row.get_attribute("data-row-key"));
			if let Some(key) = key {
				grid.toggle_row_selection(&key);
			}
		});
	}

	fn bind_search(&self) {
		if let Some(search) = self.query(".ui-grid__search") {
			self.listen(&search, "input", |grid, event| {
				if let Some(target) = event.target() {
					grid.schedule_search(target.value());
				}
			});
		}
	}

	/// Restarts the debounce timer; the filter runs once the input is quiet.
	fn schedule_search(&self, value: String) {
		self.cancel_pending_search();
		let (quiet, handle) = abortable(sleep(self.search_debounce));
		*self.pending_search.borrow_mut() = Some(handle);
		let this = self.this.clone();
		spawn_local(async move {
			if quiet.await.is_err() {
				return;
			}
			let Some(grid) = this.upgrade() else {
				return;
			};
			grid.pending_search.borrow_mut().take();
			let filters = BTreeMap::from([("search".to_string(), Value::String(value))]);
			grid.filter(filters).await;
		});
	}

	fn cancel_pending_search(&self) {
		if let Some(handle) = self.pending_search.borrow_mut().take() {
			handle.abort();
		}
	}

	fn bind_keyboard(&self) {
		self.listen(&self.element, "keydown", |grid, event| {
			let step: isize = match event.key() {
				Some("ArrowDown") => 1,
				Some("ArrowUp") => -1,
				_ => return,
			};
			let focused = grid
				.element
				.owner_document()
				.and_then(|document| document.active_element())
				.or_else(|| event.target())
				.and_then(|active| active.closest(".ui-grid__row").ok().flatten());
			let Some(focused) = focused else {
				return;
			};
			let rows = grid.rows();
			let Some(index) = rows.iter().position(|row| *row == focused) else {
				return;
			};
			let next = index.checked_add_signed(step).and_then(|next| rows.get(next));
			if let Some(next) = next {
				event.prevent_default();
				next.focus();
			}
		});
	}
}

impl Controller for GridController {
	fn init(&self) {
		self.bind_sorting();
		self.bind_pagination();
		self.bind_selection();
		self.bind_search();
		self.bind_keyboard();
		self.make_rows_focusable();
		self.apply_view();
		self.emit("init", json!({ "state": self.state() }));
	}

	fn destroy(&self) {
		self.cancel_pending_search();
		self.refresh_queued.set(false);
		self.listeners.borrow_mut().clear();
		self.emit("destroy", json!({}));
	}

	fn element(&self) -> &Element {
		&self.element
	}

	fn kind(&self) -> ComponentKind {
		ComponentKind::Grid
	}
}
