//! Logging abstraction layer for reinhardt-widgets
//!
//! Thin macros over `tracing`, so controllers log the same way whatever
//! subscriber the host installs. Level filtering belongs to that subscriber.
//!
//! ## Macro Overview
//!
//! | Macro | Emits | Used for |
//! |-------|-------|----------|
//! | `debug_log!` | `tracing::debug!` | hydration and teardown traces |
//! | `info_log!` | `tracing::info!` | bulk hydration summaries |
//! | `warn_log!` | `tracing::warn!` | isolated failures |
//! | `error_log!` | `tracing::error!` | failures with no caller to report to |
//!
//! ## Example
//!
//! ```ignore
//! use reinhardt_widgets::{debug_log, warn_log};
//!
//! debug_log!("hydrated {} as {}", id, kind);
//! warn_log!("grid {}: fetch failed: {}", id, error);
//! ```

/// Logs a debug message.
#[macro_export]
macro_rules! debug_log {
	($($arg:tt)*) => {{
		tracing::debug!($($arg)*);
	}};
}

/// Logs an info message.
#[macro_export]
macro_rules! info_log {
	($($arg:tt)*) => {{
		tracing::info!($($arg)*);
	}};
}

/// Logs a warning message.
///
/// Used for isolated failures: a widget that could not hydrate, a fetch or
/// submit callback that failed.
#[macro_export]
macro_rules! warn_log {
	($($arg:tt)*) => {{
		tracing::warn!($($arg)*);
	}};
}

/// Logs an error message.
#[macro_export]
macro_rules! error_log {
	($($arg:tt)*) => {{
		tracing::error!($($arg)*);
	}};
}

#[cfg(test)]
mod tests {
	use rstest::rstest;
	use crate::{debug_log, error_log, info_log, warn_log};

	#[rstest]
	fn test_logging_macros_compile() {
		debug_log!("Debug message: {}", 42);
		info_log!("Info message: {}", "test");
		warn_log!("Warning message: {:?}", vec![1, 2, 3]);
		error_log!("Error message: {}", "error");
	}

	#[rstest]
	fn test_logging_macros_no_args() {
		debug_log!("Simple debug");
		info_log!("Simple info");
		warn_log!("Simple warning");
		error_log!("Simple error");
	}
}
