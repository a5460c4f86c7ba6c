use super::{Scheduler, TaskHandle};
use std::time::Duration;

/// Runs every piece of work right away on the calling thread.
///
/// A non-zero delay blocks the calling thread for that long first. This is
/// the default scheduler wherever one is optional.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImmediateScheduler;

impl Scheduler for ImmediateScheduler {
  fn schedule<S, W>(&self, work: W, delay: Option<Duration>, state: S) -> TaskHandle
  where
    S: Send + 'static,
    W: FnOnce(S) + Send + 'static,
  {
    if let Some(delay) = delay.filter(|d| !d.is_zero()) {
      std::thread::sleep(delay);
    }
    let handle = TaskHandle::default();
    handle.run(work, state);
    handle
  }
}
