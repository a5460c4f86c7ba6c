use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

/// Shared read access through a reference-counted pointer.
pub trait RcDeref {
  type Target<'a>
  where
    Self: 'a;
  #[allow(clippy::needless_lifetimes)]
  fn rc_deref<'a>(&'a self) -> Self::Target<'a>;
}

/// Shared write access through a reference-counted pointer.
pub trait RcDerefMut {
  type Target<'a>
  where
    Self: 'a;
  #[allow(clippy::needless_lifetimes)]
  fn rc_deref_mut<'a>(&'a self) -> Self::Target<'a>;
}

/// `Arc<Mutex<T>>` with poison recovery: a poisoned lock hands back the inner
/// value instead of failing.
#[derive(Default)]
pub struct MutArc<T>(Arc<Mutex<T>>);

/// Weak counterpart of [`MutArc`], used by teardowns that must not keep the
/// owner alive.
pub struct WeakMutArc<T>(Weak<Mutex<T>>);

impl<T> MutArc<T> {
  pub fn own(t: T) -> Self { Self(Arc::new(Mutex::new(t))) }

  #[inline]
  pub fn downgrade(&self) -> WeakMutArc<T> { WeakMutArc(Arc::downgrade(&self.0)) }
}

impl<T> WeakMutArc<T> {
  #[inline]
  pub fn upgrade(&self) -> Option<MutArc<T>> { self.0.upgrade().map(MutArc) }
}

impl<T> RcDeref for MutArc<T> {
  type Target<'a>
    = MutexGuard<'a, T>
  where
    Self: 'a;

  #[inline]
  #[allow(clippy::needless_lifetimes)]
  fn rc_deref<'a>(&'a self) -> Self::Target<'a> {
    self.0.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl<T> RcDerefMut for MutArc<T> {
  type Target<'a>
    = MutexGuard<'a, T>
  where
    Self: 'a;

  #[inline]
  #[allow(clippy::needless_lifetimes)]
  fn rc_deref_mut<'a>(&'a self) -> Self::Target<'a> {
    self.0.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

impl<T> Clone for MutArc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<T> Clone for WeakMutArc<T> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}
