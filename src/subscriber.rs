use crate::{
  observer::{BoxedObserver, Observer},
  rc::{MutArc, RcDerefMut},
  subscription::{Subscription, SubscriptionLike},
};

/// Implements the Observer trait and Subscription trait. While the Observer is
/// the public API for consuming the values of an Observable, all Observers get
/// converted to a Subscriber, in order to provide Subscription capabilities.
///
/// Once the subscriber is closed (after `error`, after `complete`, or after an
/// external `unsubscribe`) every further event is silently ignored.
///
/// Cloning yields another handle to the same subscriber, so a producer can
/// move it into asynchronous work.
pub struct Subscriber<Item, Err> {
  observer: MutArc<Option<BoxedObserver<Item, Err>>>,
  subscription: Subscription,
}

impl<Item, Err> Subscriber<Item, Err> {
  pub fn new<O>(observer: O) -> Self
  where
    O: Observer<Item, Err> + Send + 'static,
  {
    let observer: BoxedObserver<Item, Err> = Box::new(observer);
    Subscriber { observer: MutArc::own(Some(observer)), subscription: Subscription::default() }
  }

  /// Creates a subscriber for `observer` whose subscription is owned by this
  /// one: unsubscribing `self` also unsubscribes the returned subscriber.
  pub fn chain<Item2, Err2, O>(&self, observer: O) -> Subscriber<Item2, Err2>
  where
    O: Observer<Item2, Err2> + Send + 'static,
  {
    let subscriber = Subscriber::new(observer);
    self.subscription.add(subscriber.subscription.clone());
    subscriber
  }

  #[inline]
  pub fn subscription(&self) -> &Subscription { &self.subscription }

  /// Take ownership of a teardown, released when this subscriber closes.
  #[inline]
  pub fn add<S: SubscriptionLike + Send + 'static>(&self, subscription: S) {
    self.subscription.add(subscription)
  }

  #[inline]
  pub fn add_teardown<F: FnOnce() + Send + 'static>(&self, f: F) {
    self.subscription.add_teardown(f)
  }

  fn take_observer(&self) -> Option<BoxedObserver<Item, Err>> {
    if self.subscription.is_closed() {
      None
    } else {
      self.observer.rc_deref_mut().take()
    }
  }
}

impl<Item, Err> Clone for Subscriber<Item, Err> {
  fn clone(&self) -> Self {
    Subscriber { observer: self.observer.clone(), subscription: self.subscription.clone() }
  }
}

impl<Item, Err> Observer<Item, Err> for Subscriber<Item, Err> {
  fn next(&mut self, value: Item) {
    if !self.subscription.is_closed() {
      if let Some(observer) = self.observer.rc_deref_mut().as_mut() {
        observer.next(value)
      }
    }
  }

  fn error(&mut self, err: Err) {
    if let Some(mut observer) = self.take_observer() {
      observer.error(err);
      self.subscription.unsubscribe();
    }
  }

  fn complete(&mut self) {
    if let Some(mut observer) = self.take_observer() {
      observer.complete();
      self.subscription.unsubscribe();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.subscription.is_closed() }
}

impl<Item, Err> SubscriptionLike for Subscriber<Item, Err> {
  #[inline]
  fn unsubscribe(&mut self) { self.subscription.unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { self.subscription.is_closed() }
}
