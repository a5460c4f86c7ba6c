//! Observer trait and implementations
//!
//! The Observer trait defines the consumer of data in the reactive pattern.
//! It provides three methods: next (for values), error (for errors), and
//! complete (for stream completion).

use crate::config;
use std::fmt::Debug;

/// Observer trait: The consumer of data in reactive programming
///
/// An Observer receives values, errors, and completion notifications from
/// an Observable. A well behaved source never calls any method after `error`
/// or `complete`; [`Subscriber`](crate::subscriber::Subscriber) enforces that
/// for every observer it wraps.
pub trait Observer<Item, Err> {
  fn next(&mut self, value: Item);

  fn error(&mut self, err: Err);

  fn complete(&mut self);

  /// Returns `true` if the observer will not accept more values.
  #[inline]
  fn is_closed(&self) -> bool { false }
}

/// Boxed observer as stored by subscribers and subjects.
pub type BoxedObserver<Item, Err> = Box<dyn Observer<Item, Err> + Send>;

impl<Item, Err, O> Observer<Item, Err> for Box<O>
where
  O: Observer<Item, Err> + ?Sized,
{
  #[inline]
  fn next(&mut self, value: Item) { (**self).next(value) }

  #[inline]
  fn error(&mut self, err: Err) { (**self).error(err) }

  #[inline]
  fn complete(&mut self) { (**self).complete() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).is_closed() }
}

/// Observer built from optional closures.
///
/// A missing `next` or `complete` handler ignores the event. A missing `error`
/// handler forwards the error to
/// [`config::report_unhandled_error`](crate::config::report_unhandled_error),
/// so faults are never swallowed without a trace.
pub struct ObserverAll<N, E, C> {
  next: Option<N>,
  error: Option<E>,
  complete: Option<C>,
}

impl<N, E, C> ObserverAll<N, E, C> {
  #[inline]
  pub fn new(next: Option<N>, error: Option<E>, complete: Option<C>) -> Self {
    ObserverAll { next, error, complete }
  }
}

impl<Item, Err, N, E, C> Observer<Item, Err> for ObserverAll<N, E, C>
where
  N: FnMut(Item),
  E: FnOnce(Err),
  C: FnOnce(),
  Err: Debug,
{
  #[inline]
  fn next(&mut self, value: Item) {
    if let Some(next) = self.next.as_mut() {
      next(value)
    }
  }

  fn error(&mut self, err: Err) {
    match self.error.take() {
      Some(error) => error(err),
      None => config::report_unhandled_error(&err),
    }
  }

  #[inline]
  fn complete(&mut self) {
    if let Some(complete) = self.complete.take() {
      complete()
    }
  }
}

/// Placeholder type for an absent `error` handler.
pub type NoError<Err> = fn(Err);
/// Placeholder type for an absent `complete` handler.
pub type NoComplete = fn();
