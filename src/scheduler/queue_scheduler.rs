//! A scheduler that defers work onto a shared queue driven by virtual time.
//!
//! Nothing runs when work is scheduled. The owner of the queue decides when
//! work runs by calling [`QueueScheduler::flush`],
//! [`QueueScheduler::advance_by`] or [`QueueScheduler::run_all`]. Because time
//! is virtual, tests built on it are fully deterministic.
//!
//! ```
//! use rxcore::scheduler::{QueueScheduler, Scheduler};
//! use std::time::Duration;
//!
//! let scheduler = QueueScheduler::default();
//! scheduler.schedule(|v| println!("{}", v), Some(Duration::from_millis(10)), 1);
//! assert_eq!(scheduler.pending_count(), 1);
//!
//! scheduler.advance_by(Duration::from_millis(10));
//! assert_eq!(scheduler.pending_count(), 0);
//! ```

use std::{cmp::Ordering, collections::BinaryHeap, time::Duration};

use super::{Scheduler, TaskHandle};
use crate::rc::{MutArc, RcDeref, RcDerefMut};

struct QueueState {
  now: Duration,
  next_id: usize,
  queue: BinaryHeap<QueuedTask>,
}

struct QueuedTask {
  due: Duration,
  id: usize,
  run: Box<dyn FnOnce() + Send>,
  handle: TaskHandle,
}

impl PartialEq for QueuedTask {
  fn eq(&self, other: &Self) -> bool { self.due == other.due && self.id == other.id }
}

impl Eq for QueuedTask {}

impl PartialOrd for QueuedTask {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for QueuedTask {
  fn cmp(&self, other: &Self) -> Ordering {
    // Min-heap: earlier times first, then FIFO by id
    other.due.cmp(&self.due).then_with(|| other.id.cmp(&self.id))
  }
}

/// Deferred scheduler on virtual time. Clones share the same queue.
#[derive(Clone)]
pub struct QueueScheduler(MutArc<QueueState>);

impl Default for QueueScheduler {
  fn default() -> Self {
    QueueScheduler(MutArc::own(QueueState {
      now: Duration::ZERO,
      next_id: 0,
      queue: BinaryHeap::new(),
    }))
  }
}

impl QueueScheduler {
  /// Current virtual time.
  #[inline]
  pub fn now(&self) -> Duration { self.0.rc_deref().now }

  /// Number of queued tasks, cancelled ones included until they are dropped.
  #[inline]
  pub fn pending_count(&self) -> usize { self.0.rc_deref().queue.len() }

  /// Run every task due at the current virtual time, including tasks that
  /// become due while flushing.
  pub fn flush(&self) {
    let now = self.now();
    self.run_until(now);
  }

  /// Move virtual time forward by `duration`, running due tasks in order of
  /// their due time.
  pub fn advance_by(&self, duration: Duration) {
    let target = self.now() + duration;
    self.run_until(target);
  }

  /// Run every queued task, jumping virtual time forward as needed.
  pub fn run_all(&self) {
    while let Some(task) = self.pop_due(None) {
      Self::run_task(task);
    }
  }

  fn run_until(&self, target: Duration) {
    while let Some(task) = self.pop_due(Some(target)) {
      Self::run_task(task);
    }
    let mut state = self.0.rc_deref_mut();
    if state.now < target {
      state.now = target;
    }
  }

  fn pop_due(&self, limit: Option<Duration>) -> Option<QueuedTask> {
    let mut state = self.0.rc_deref_mut();
    let due = state.queue.peek()?.due;
    if limit.map_or(false, |limit| due > limit) {
      return None;
    }
    let task = state.queue.pop()?;
    if state.now < task.due {
      state.now = task.due;
    }
    Some(task)
  }

  // runs outside the queue lock, the task may schedule more work
  fn run_task(task: QueuedTask) {
    let QueuedTask { run, handle, .. } = task;
    if !handle.run(|run: Box<dyn FnOnce() + Send>| run(), run) {
      tracing::trace!("skipping cancelled queued task");
    }
  }
}

impl Scheduler for QueueScheduler {
  fn schedule<S, W>(&self, work: W, delay: Option<Duration>, state: S) -> TaskHandle
  where
    S: Send + 'static,
    W: FnOnce(S) + Send + 'static,
  {
    let handle = TaskHandle::default();
    let mut inner = self.0.rc_deref_mut();
    let id = inner.next_id;
    inner.next_id += 1;
    let due = inner.now + delay.unwrap_or_default();
    inner.queue.push(QueuedTask {
      due,
      id,
      run: Box::new(move || work(state)),
      handle: handle.clone(),
    });
    tracing::trace!(id, ?due, "task queued");
    handle
  }
}
