//! A subject that only emits the last value, and only once its source
//! completes.

use crate::{
  prelude::*,
  rc::{MutArc, RcDeref, RcDerefMut},
  subject::Subscribers,
};

enum Status<Err> {
  Pending,
  Completed,
  Errored(Err),
}

struct AsyncState<Item, Err> {
  value: Option<Item>,
  status: Status<Err>,
  observers: Subscribers<Subscriber<Item, Err>>,
}

/// Emits the last value pushed into it, followed by completion, to every
/// observer once it completes. If it errors instead, every observer gets the
/// error and no value.
///
/// Observers subscribing after termination get the same replay synchronously
/// while subscribing. Clones share the same state.
///
/// ```
/// use rxcore::prelude::*;
/// use std::sync::{Arc, Mutex};
///
/// let mut subject = AsyncSubject::<i32, ()>::default();
/// let seen = Arc::new(Mutex::new(vec![]));
/// let c_seen = seen.clone();
/// subject.subscribe(move |v| c_seen.lock().unwrap().push(v));
///
/// subject.next(1);
/// subject.next(2);
/// assert!(seen.lock().unwrap().is_empty());
///
/// subject.complete();
/// assert_eq!(*seen.lock().unwrap(), vec![2]);
/// ```
pub struct AsyncSubject<Item, Err>(MutArc<AsyncState<Item, Err>>);

impl<Item, Err> Default for AsyncSubject<Item, Err> {
  fn default() -> Self {
    AsyncSubject(MutArc::own(AsyncState {
      value: None,
      status: Status::Pending,
      observers: Subscribers::default(),
    }))
  }
}

impl<Item, Err> Clone for AsyncSubject<Item, Err> {
  #[inline]
  fn clone(&self) -> Self { AsyncSubject(self.0.clone()) }
}

impl<Item, Err> AsyncSubject<Item, Err> {
  /// Whether a terminal event was received.
  #[inline]
  pub fn is_stopped(&self) -> bool { !matches!(self.0.rc_deref().status, Status::Pending) }

  /// Whether a value is buffered for replay.
  #[inline]
  pub fn has_value(&self) -> bool { self.0.rc_deref().value.is_some() }

  /// Number of observers waiting for the terminal event.
  #[inline]
  pub fn subscriber_count(&self) -> usize { self.0.rc_deref().observers.len() }
}

impl<Item, Err> Observer<Item, Err> for AsyncSubject<Item, Err>
where
  Item: Clone,
  Err: Clone,
{
  fn next(&mut self, value: Item) {
    let mut state = self.0.rc_deref_mut();
    if let Status::Pending = state.status {
      state.value = Some(value);
    }
  }

  fn error(&mut self, err: Err) {
    let observers = {
      let mut state = self.0.rc_deref_mut();
      if !matches!(state.status, Status::Pending) {
        return;
      }
      state.status = Status::Errored(err.clone());
      state.observers.drain()
    };
    tracing::trace!(observers = observers.len(), "async subject errored");
    observers.broadcast_error(err);
  }

  fn complete(&mut self) {
    let (observers, value) = {
      let mut state = self.0.rc_deref_mut();
      if !matches!(state.status, Status::Pending) {
        return;
      }
      state.status = Status::Completed;
      (state.observers.drain(), state.value.clone())
    };
    tracing::trace!(
      observers = observers.len(),
      has_value = value.is_some(),
      "async subject completed"
    );
    observers.broadcast_complete(value);
  }

  #[inline]
  fn is_closed(&self) -> bool { self.is_stopped() }
}

enum Replay<Item, Err> {
  Value(Option<Item>),
  Error(Err),
}

impl<Item, Err> ObservableLike<Item, Err> for AsyncSubject<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  fn actual_subscribe(&self, mut subscriber: Subscriber<Item, Err>) {
    if Observer::is_closed(&subscriber) {
      return;
    }
    let mut state = self.0.rc_deref_mut();
    if let Status::Pending = state.status {
      let id = state.observers.add(subscriber.clone());
      drop(state);
      let weak = self.0.downgrade();
      subscriber.add_teardown(move || {
        if let Some(subject) = weak.upgrade() {
          subject.rc_deref_mut().observers.remove(id);
        }
      });
      return;
    }
    let replay = match &state.status {
      Status::Errored(err) => Replay::Error(err.clone()),
      _ => Replay::Value(state.value.clone()),
    };
    drop(state);
    match replay {
      Replay::Value(value) => {
        if let Some(value) = value {
          subscriber.next(value);
        }
        subscriber.complete();
      }
      Replay::Error(err) => subscriber.error(err),
    }
  }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  type Log = Arc<Mutex<Vec<String>>>;

  fn observe(subject: &AsyncSubject<i32, String>, name: &'static str, log: &Log) -> Subscription {
    let (c_next, c_err, c_complete) = (log.clone(), log.clone(), log.clone());
    subject.subscribe_all(
      move |v| c_next.lock().unwrap().push(format!("{} next {}", name, v)),
      move |e| c_err.lock().unwrap().push(format!("{} error {}", name, e)),
      move || c_complete.lock().unwrap().push(format!("{} complete", name)),
    )
  }

  #[test]
  fn emits_last_value_on_complete() {
    let log = Log::default();
    let mut subject = AsyncSubject::default();
    observe(&subject, "a", &log);
    observe(&subject, "b", &log);

    subject.next(1);
    subject.next(2);
    assert!(log.lock().unwrap().is_empty());
    assert!(subject.has_value());

    subject.complete();
    assert_eq!(*log.lock().unwrap(), vec!["a next 2", "a complete", "b next 2", "b complete"]);
    assert_eq!(subject.subscriber_count(), 0);
  }

  #[test]
  fn replays_after_complete() {
    let log = Log::default();
    let mut subject = AsyncSubject::default();
    subject.next(7);
    subject.complete();
    subject.next(8);

    observe(&subject, "late", &log);
    assert_eq!(*log.lock().unwrap(), vec!["late next 7", "late complete"]);
  }

  #[test]
  fn complete_without_value() {
    let log = Log::default();
    let mut subject = AsyncSubject::default();
    observe(&subject, "a", &log);
    subject.complete();
    observe(&subject, "b", &log);

    assert_eq!(*log.lock().unwrap(), vec!["a complete", "b complete"]);
    assert!(!subject.has_value());
  }

  #[test]
  fn error_to_present_and_future() {
    let log = Log::default();
    let mut subject = AsyncSubject::default();
    observe(&subject, "a", &log);
    subject.next(1);
    subject.error("boom".to_string());
    subject.complete();
    observe(&subject, "b", &log);

    assert_eq!(*log.lock().unwrap(), vec!["a error boom", "b error boom"]);
    assert!(subject.is_stopped());
  }

  #[test]
  fn unsubscribed_observer_is_removed() {
    let log = Log::default();
    let mut subject = AsyncSubject::default();
    let mut a = observe(&subject, "a", &log);
    observe(&subject, "b", &log);
    assert_eq!(subject.subscriber_count(), 2);

    a.unsubscribe();
    assert_eq!(subject.subscriber_count(), 1);
    a.unsubscribe();

    subject.next(3);
    subject.complete();
    assert_eq!(*log.lock().unwrap(), vec!["b next 3", "b complete"]);
  }

  #[test]
  fn subscribe_from_inside_callback() {
    let log = Log::default();
    let mut subject = AsyncSubject::<i32, String>::default();
    let c_subject = subject.clone();
    let c_log = log.clone();
    subject.subscribe(move |_| {
      observe(&c_subject, "inner", &c_log);
    });

    subject.next(5);
    subject.complete();
    assert_eq!(*log.lock().unwrap(), vec!["inner next 5", "inner complete"]);
  }
}
