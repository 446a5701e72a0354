//! Fixture loading and event capture utilities
//!
//! # Example
//!
//! ```rust,ignore
//! let document = load_document("users_grid.html");
//! let events = EventLog::listen(&document.body(), "grid:sort");
//! ```

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use reinhardt_widgets::{Document, Element, EventHandle};
use serde_json::Value;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

/// Base path for fixtures
fn fixtures_dir() -> PathBuf {
	PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// Loads a fixture file as a string
///
/// # Panics
///
/// Panics if the file cannot be read
pub fn load_fixture(path: &str) -> String {
	let full_path = fixtures_dir().join(path);
	std::fs::read_to_string(&full_path)
		.unwrap_or_else(|e| panic!("Failed to load fixture at {:?}: {}", full_path.display(), e))
}

/// Parses a fixture into a document
pub fn load_document(path: &str) -> Document {
	Document::parse(&load_fixture(path))
}

/// Looks up an element that the fixture is known to contain
pub fn element(document: &Document, selector: &str) -> Element {
	document
		.query_selector(selector)
		.unwrap()
		.unwrap_or_else(|| panic!("fixture has no element matching `{}`", selector))
}

/// Records the `detail` of every event of one type reaching `target`
pub struct EventLog {
	details: Rc<RefCell<Vec<Value>>>,
	_handle: EventHandle,
}

impl EventLog {
	pub fn listen(target: &Element, event_type: &str) -> Self {
		let details = Rc::new(RefCell::new(Vec::new()));
		let sink = Rc::clone(&details);
		let handle = target.add_event_listener(event_type, move |event| {
			sink.borrow_mut().push(event.detail().clone());
		});
		Self {
			details,
			_handle: handle,
		}
	}

	pub fn details(&self) -> Vec<Value> {
		self.details.borrow().clone()
	}

	pub fn len(&self) -> usize {
		self.details.borrow().len()
	}

	pub fn last(&self) -> Option<Value> {
		self.details.borrow().last().cloned()
	}
}

/// Lets tasks spawned on the current `LocalSet` run to their next await point
pub async fn settle() {
	for _ in 0..16 {
		tokio::task::yield_now().await;
	}
}

/// Log lines captured while a [`LogCapture`] guard is alive, formatted as
/// `[LEVEL] message`.
pub type CapturedLogs = Arc<Mutex<Vec<String>>>;

/// A tracing layer that captures log messages to a Vec<String>
struct LogCapture {
	logs: CapturedLogs,
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for LogCapture {
	fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
		struct MessageVisitor {
			message: String,
		}

		impl tracing::field::Visit for MessageVisitor {
			fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
				if field.name() == "message" {
					self.message = format!("{:?}", value);
				}
			}
		}

		let mut visitor = MessageVisitor {
			message: String::new(),
		};
		event.record(&mut visitor);
		self.logs
			.lock()
			.unwrap()
			.push(format!("[{}] {}", event.metadata().level(), visitor.message));
	}
}

/// Captures log output on the current thread until the guard drops.
pub fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
	let logs = CapturedLogs::default();
	let guard = tracing_subscriber::registry()
		.with(LogCapture { logs: logs.clone() })
		.set_default();
	(logs, guard)
}
