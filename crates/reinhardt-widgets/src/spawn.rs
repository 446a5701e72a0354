//! Single-threaded task spawning and timers.
//!
//! Controllers live on one thread and hold `Rc` state, so every background
//! task they start is a local (non-`Send`) future. Such tasks must be spawned
//! from inside a [`tokio::task::LocalSet`].

use std::future::Future;
use std::time::Duration;

/// Spawns a local future on the current event loop.
///
/// # Panics
///
/// Panics if called outside a `tokio::task::LocalSet`.
pub fn spawn_local<F>(future: F)
where
	F: Future<Output = ()> + 'static,
{
	drop(tokio::task::spawn_local(future));
}

/// Resolves after `duration`.
pub async fn sleep(duration: Duration) {
	tokio::time::sleep(duration).await;
}
