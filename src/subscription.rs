use crate::rc::{MutArc, RcDeref, RcDerefMut};
use smallvec::SmallVec;
use std::{
  fmt::{Debug, Formatter},
  mem,
};

/// Subscription returns from `Observable.subscribe(Subscriber)` to allow
/// unsubscribing.
pub trait SubscriptionLike {
  /// This allows deregistering a stream before it has finished receiving all
  /// events (i.e. before onCompleted is called).
  fn unsubscribe(&mut self);

  fn is_closed(&self) -> bool;
}

type Teardown = Box<dyn SubscriptionLike + Send>;

/// A live subscribe relationship that owns child teardowns.
///
/// Cloning yields another handle to the same subscription. Unsubscribing is
/// idempotent and unsubscribes every owned child exactly once.
#[derive(Clone, Default)]
pub struct Subscription(MutArc<Inner>);

#[derive(Default)]
struct Inner {
  closed: bool,
  teardown: SmallVec<[Teardown; 1]>,
}

impl Subscription {
  /// Take ownership of `subscription`, unsubscribing it when this one is
  /// unsubscribed. If this subscription is already closed, `subscription` is
  /// unsubscribed immediately.
  pub fn add<S: SubscriptionLike + Send + 'static>(&self, subscription: S) {
    let mut v: Teardown = Box::new(subscription);
    {
      let mut inner = self.0.rc_deref_mut();
      if !inner.closed {
        inner.teardown.retain(|v| !v.is_closed());
        inner.teardown.push(v);
        return;
      }
    }
    v.unsubscribe();
  }

  /// Register a closure to run on unsubscribe.
  #[inline]
  pub fn add_teardown<F: FnOnce() + Send + 'static>(&self, f: F) {
    self.add(ClosureSubscription::new(f))
  }

  #[inline]
  pub fn teardown_size(&self) -> usize { self.0.rc_deref().teardown.len() }

  /// Activates "RAII" behavior for this subscription. That means
  /// `unsubscribe()` will be called automatically as soon as the returned
  /// value goes out of scope.
  ///
  /// **Attention:** If you don't assign the return value to a variable,
  /// `unsubscribe()` is called immediately, which is probably not what you
  /// want!
  #[inline]
  pub fn unsubscribe_when_dropped(self) -> SubscriptionGuard<Self> { SubscriptionGuard(self) }
}

impl SubscriptionLike for Subscription {
  fn unsubscribe(&mut self) {
    // children run outside the lock, they may reach back into this subscription
    let teardown = {
      let mut inner = self.0.rc_deref_mut();
      if inner.closed {
        return;
      }
      inner.closed = true;
      mem::take(&mut inner.teardown)
    };
    for mut v in teardown {
      v.unsubscribe();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.rc_deref().closed }
}

impl Debug for Subscription {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let inner = self.0.rc_deref();
    f.debug_struct("Subscription")
      .field("closed", &inner.closed)
      .field("teardown_count", &inner.teardown.len())
      .finish()
  }
}

/// Runs a closure once, on the first `unsubscribe`.
pub struct ClosureSubscription<F>(Option<F>);

impl<F: FnOnce()> ClosureSubscription<F> {
  #[inline]
  pub fn new(f: F) -> Self { Self(Some(f)) }
}

impl<F: FnOnce()> SubscriptionLike for ClosureSubscription<F> {
  #[inline]
  fn unsubscribe(&mut self) {
    if let Some(f) = self.0.take() {
      f()
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.0.is_none() }
}

impl<T: ?Sized> SubscriptionLike for Box<T>
where
  T: SubscriptionLike,
{
  #[inline]
  fn unsubscribe(&mut self) { (**self).unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).is_closed() }
}

/// An RAII implementation of a "scoped subscribed" of a subscription.
/// When this structure is dropped (falls out of scope), the subscription will
/// be unsubscribed.
///
/// If you want to drop it immediately, wrap it in its own scope
#[derive(Debug)]
#[must_use]
pub struct SubscriptionGuard<T: SubscriptionLike>(pub(crate) T);

impl<T: SubscriptionLike> Drop for SubscriptionGuard<T> {
  #[inline]
  fn drop(&mut self) { self.0.unsubscribe() }
}

#[cfg(test)]
mod test {
  use super::*;
  use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
  };

  fn counter() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
    let hits = Arc::new(AtomicUsize::new(0));
    let c_hits = hits.clone();
    (hits, move || {
      c_hits.fetch_add(1, Ordering::SeqCst);
    })
  }

  #[test]
  fn add_children() {
    let parent = Subscription::default();
    parent.add(Subscription::default());
    parent.add(Subscription::default());
    parent.add(Subscription::default());
    assert_eq!(parent.teardown_size(), 3);
  }

  #[test]
  fn closed_children_are_pruned() {
    let parent = Subscription::default();
    let mut child = Subscription::default();
    parent.add(child.clone());
    child.unsubscribe();
    parent.add(Subscription::default());
    assert_eq!(parent.teardown_size(), 1);
  }

  #[test]
  fn unsubscribe_cascades_once() {
    let (hits, f) = counter();
    let mut parent = Subscription::default();
    let child = Subscription::default();
    child.add_teardown(f);
    parent.add(child.clone());

    parent.unsubscribe();
    parent.unsubscribe();
    assert!(parent.is_closed());
    assert!(child.is_closed());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn add_to_closed_unsubscribes_immediately() {
    let (hits, f) = counter();
    let mut parent = Subscription::default();
    parent.unsubscribe();
    parent.add_teardown(f);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(parent.teardown_size(), 0);
  }

  #[test]
  fn teardown_may_reenter_parent() {
    let parent = Subscription::default();
    let c_parent = parent.clone();
    parent.add_teardown(move || {
      let mut p = c_parent.clone();
      p.unsubscribe();
      assert!(p.is_closed());
    });
    parent.clone().unsubscribe();
    assert!(parent.is_closed());
  }

  #[test]
  fn guard_unsubscribes_on_drop() {
    let (hits, f) = counter();
    let subscription = Subscription::default();
    subscription.add_teardown(f);
    {
      let _guard = subscription.clone().unsubscribe_when_dropped();
    }
    assert!(subscription.is_closed());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
  }
}
