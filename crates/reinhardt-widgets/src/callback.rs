//! Callback types for caller-supplied hooks.
//!
//! Controllers run on a single thread, so both wrappers hold an `Rc` and do
//! not require `Send + Sync`.
//!
//! ## Features
//!
//! - **Callback<Args, Ret>**: a cloneable wrapper for synchronous hooks
//!   (`on_sort`, `on_field_change`, ...)
//! - **AsyncCallback<Args, T>**: a cloneable wrapper for fallible async hooks
//!   (grid data fetch, form submission)
//!
//! ## Example
//!
//! ```ignore
//! use reinhardt_widgets::{AsyncCallback, Callback};
//!
//! let on_sort = Callback::new(|(field, direction)| {
//!     info_log!("sorted by {} {:?}", field, direction);
//! });
//!
//! let fetch = AsyncCallback::new(|state: GridState| async move {
//!     let html = client.get_rows(&state).await?;
//!     Ok::<_, MyError>(html)
//! });
//! ```

use std::future::Future;
use std::rc::Rc;

use futures::future::{FutureExt, LocalBoxFuture};

/// Boxed error returned by async callbacks.
pub type BoxError = Box<dyn std::error::Error + 'static>;

/// A type-safe, cloneable callback wrapper.
pub struct Callback<Args, Ret = ()> {
	inner: Rc<dyn Fn(Args) -> Ret + 'static>,
}

impl<Args, Ret> Callback<Args, Ret> {
	/// Creates a new Callback from a function or closure.
	pub fn new<F>(f: F) -> Self
	where
		F: Fn(Args) -> Ret + 'static,
	{
		Self { inner: Rc::new(f) }
	}

	/// Calls the callback with the given arguments.
	pub fn call(&self, args: Args) -> Ret {
		(self.inner)(args)
	}
}

impl<Args, Ret> Clone for Callback<Args, Ret> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<Args, Ret> std::fmt::Debug for Callback<Args, Ret> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Callback")
			.field("inner", &"<function>")
			.finish()
	}
}

type AsyncFn<Args, T> = dyn Fn(Args) -> LocalBoxFuture<'static, Result<T, BoxError>> + 'static;

/// A cloneable wrapper for a fallible asynchronous hook.
///
/// The closure returns any future resolving to `Result<T, E>` where `E`
/// converts into [`BoxError`]; errors are boxed on the way out.
pub struct AsyncCallback<Args, T> {
	inner: Rc<AsyncFn<Args, T>>,
}

impl<Args, T: 'static> AsyncCallback<Args, T> {
	/// Wraps an async closure.
	pub fn new<F, Fut, E>(f: F) -> Self
	where
		F: Fn(Args) -> Fut + 'static,
		Fut: Future<Output = Result<T, E>> + 'static,
		E: Into<BoxError>,
	{
		Self {
			inner: Rc::new(move |args| f(args).map(|result| result.map_err(Into::into)).boxed_local()),
		}
	}

	/// Invokes the hook.
	pub fn call(&self, args: Args) -> LocalBoxFuture<'static, Result<T, BoxError>> {
		(self.inner)(args)
	}
}

impl<Args, T> Clone for AsyncCallback<Args, T> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<Args, T> std::fmt::Debug for AsyncCallback<Args, T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("AsyncCallback")
			.field("inner", &"<async function>")
			.finish()
	}
}
