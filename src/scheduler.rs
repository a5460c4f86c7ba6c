//! Scheduling of work items.
//!
//! A [`Scheduler`] decides when and where a unit of work runs. Every call to
//! [`Scheduler::schedule`] returns a [`TaskHandle`] that can cancel the work
//! until it starts.
//!
//! Available schedulers:
//!
//! - [`ImmediateScheduler`]: runs the work inline on the calling thread.
//! - [`QueueScheduler`]: queues the work on virtual time, nothing runs until the
//!   queue is flushed or time is advanced.
//! - [`ThreadPoolScheduler`] (feature `futures-scheduler`): runs the work on a
//!   `futures` thread pool.
//! - [`TokioScheduler`] (feature `tokio-scheduler`): runs the work on a tokio
//!   runtime.

use std::{
  sync::{
    atomic::{AtomicU8, Ordering},
    Arc, Mutex, PoisonError,
  },
  time::Duration,
};

use futures::future::AbortHandle;

use crate::subscription::SubscriptionLike;

mod immediate;
pub use immediate::ImmediateScheduler;
mod queue_scheduler;
pub use queue_scheduler::QueueScheduler;
#[cfg(feature = "futures-scheduler")]
mod thread_pool_scheduler;
#[cfg(feature = "futures-scheduler")]
pub use thread_pool_scheduler::ThreadPoolScheduler;
#[cfg(feature = "tokio-scheduler")]
mod tokio_scheduler;
#[cfg(feature = "tokio-scheduler")]
pub use tokio_scheduler::TokioScheduler;

/// A Scheduler is an object to order task and schedule their execution.
///
/// `work` receives `state` when it runs. It may capture a clone of the
/// scheduler and schedule again, which is how multi stage work is expressed.
pub trait Scheduler: Clone + Send + Sync + 'static {
  fn schedule<S, W>(&self, work: W, delay: Option<Duration>, state: S) -> TaskHandle
  where
    S: Send + 'static,
    W: FnOnce(S) + Send + 'static;
}

const PENDING: u8 = 0;
const RUNNING: u8 = 1;
const FINISHED: u8 = 2;
const CANCELLED: u8 = 3;

/// Handle to a scheduled unit of work.
///
/// Cancelling is idempotent and only has an effect while the work has not
/// started. The handle can be cancelled from any thread.
#[derive(Clone, Default)]
pub struct TaskHandle(Arc<HandleInner>);

#[derive(Default)]
struct HandleInner {
  state: AtomicU8,
  abort: Mutex<Option<AbortHandle>>,
}

impl TaskHandle {
  /// A handle for work that already ran.
  pub fn finished() -> Self {
    let handle = TaskHandle::default();
    handle.0.state.store(FINISHED, Ordering::Release);
    handle
  }

  /// Prevent the work from starting. No effect once it started.
  pub fn cancel(&self) {
    let cancelled = self
      .0
      .state
      .compare_exchange(PENDING, CANCELLED, Ordering::AcqRel, Ordering::Acquire)
      .is_ok();
    if cancelled {
      tracing::trace!("scheduled task cancelled");
      let abort = self.0.abort.lock().unwrap_or_else(PoisonError::into_inner).take();
      if let Some(abort) = abort {
        abort.abort();
      }
    }
  }

  #[inline]
  pub fn is_cancelled(&self) -> bool { self.0.state.load(Ordering::Acquire) == CANCELLED }

  #[inline]
  pub fn is_finished(&self) -> bool { self.0.state.load(Ordering::Acquire) == FINISHED }

  /// Runs `work` unless the handle was cancelled or already started.
  /// Returns whether the work ran.
  pub(crate) fn run<S, W: FnOnce(S)>(&self, work: W, state: S) -> bool {
    let started = self
      .0
      .state
      .compare_exchange(PENDING, RUNNING, Ordering::AcqRel, Ordering::Acquire)
      .is_ok();
    if started {
      work(state);
      self.0.state.store(FINISHED, Ordering::Release);
    }
    started
  }

  /// Remember the abort handle of the future driving this task, aborting it
  /// right away if the task is already cancelled.
  pub(crate) fn set_abort_handle(&self, abort: AbortHandle) {
    let mut slot = self.0.abort.lock().unwrap_or_else(PoisonError::into_inner);
    if self.is_cancelled() {
      abort.abort();
    } else {
      *slot = Some(abort);
    }
  }
}

impl SubscriptionLike for TaskHandle {
  #[inline]
  fn unsubscribe(&mut self) { self.cancel() }

  #[inline]
  fn is_closed(&self) -> bool {
    let state = self.0.state.load(Ordering::Acquire);
    state == FINISHED || state == CANCELLED
  }
}

impl std::fmt::Debug for TaskHandle {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let state = match self.0.state.load(Ordering::Acquire) {
      PENDING => "pending",
      RUNNING => "running",
      FINISHED => "finished",
      _ => "cancelled",
    };
    f.debug_tuple("TaskHandle").field(&state).finish()
  }
}
