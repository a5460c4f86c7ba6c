use std::{io, time::Duration};

use futures::{
  executor::ThreadPool,
  future::{self, FutureExt},
};
use once_cell::sync::OnceCell;

use super::{Scheduler, TaskHandle};

static DEFAULT_POOL: OnceCell<ThreadPool> = OnceCell::new();

/// Runs work on a `futures` thread pool.
///
/// Delays are awaited on the pool with `futures-time` when the `timer` feature
/// is enabled, otherwise the pool thread sleeps. Cancelling a task that has
/// not started aborts its future.
#[derive(Clone, Debug)]
pub struct ThreadPoolScheduler {
  pool: ThreadPool,
}

impl ThreadPoolScheduler {
  /// A scheduler on a fresh pool.
  pub fn new() -> io::Result<Self> { Ok(Self::from_pool(ThreadPool::new()?)) }

  pub fn from_pool(pool: ThreadPool) -> Self { ThreadPoolScheduler { pool } }

  /// A scheduler on the process-wide pool, created on first use.
  pub fn default_pool() -> io::Result<Self> {
    DEFAULT_POOL.get_or_try_init(ThreadPool::new).map(|pool| Self::from_pool(pool.clone()))
  }
}

async fn sleep(delay: Duration) {
  #[cfg(feature = "timer")]
  futures_time::task::sleep(delay.into()).await;
  #[cfg(not(feature = "timer"))]
  std::thread::sleep(delay);
}

impl Scheduler for ThreadPoolScheduler {
  fn schedule<S, W>(&self, work: W, delay: Option<Duration>, state: S) -> TaskHandle
  where
    S: Send + 'static,
    W: FnOnce(S) + Send + 'static,
  {
    let handle = TaskHandle::default();
    let c_handle = handle.clone();
    let (fut, abort) = future::abortable(async move {
      if let Some(delay) = delay.filter(|d| !d.is_zero()) {
        sleep(delay).await;
      }
      c_handle.run(work, state);
    });
    handle.set_abort_handle(abort);
    self.pool.spawn_ok(fut.map(|_| ()));
    handle
  }
}
