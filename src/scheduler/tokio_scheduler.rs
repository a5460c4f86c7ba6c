use std::time::Duration;

use tokio::runtime::Handle;

use super::{Scheduler, TaskHandle};

/// Runs work as tasks on a tokio runtime.
#[derive(Clone, Debug)]
pub struct TokioScheduler {
  handle: Handle,
}

impl TokioScheduler {
  pub fn new(handle: Handle) -> Self { TokioScheduler { handle } }

  /// A scheduler on the runtime the caller is running in, `None` outside of a
  /// runtime.
  pub fn try_current() -> Option<Self> { Handle::try_current().ok().map(Self::new) }
}

impl Scheduler for TokioScheduler {
  fn schedule<S, W>(&self, work: W, delay: Option<Duration>, state: S) -> TaskHandle
  where
    S: Send + 'static,
    W: FnOnce(S) + Send + 'static,
  {
    let handle = TaskHandle::default();
    let c_handle = handle.clone();
    let (fut, abort) = futures::future::abortable(async move {
      if let Some(delay) = delay.filter(|d| !d.is_zero()) {
        tokio::time::sleep(delay).await;
      }
      c_handle.run(work, state);
    });
    handle.set_abort_handle(abort);
    self.handle.spawn(fut);
    handle
  }
}
