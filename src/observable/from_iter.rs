use crate::prelude::*;
use std::convert::Infallible;

/// Creates an observable that produces values from an iterator.
///
/// Completes when all elements have been emitted, or stops early once the
/// subscriber is closed. Never emits an error.
///
/// # Examples
///
/// ```
/// use rxcore::prelude::*;
///
/// observable::from_iter(0..10)
///   .subscribe(|v| {println!("{},", v)});
/// ```
pub fn from_iter<Iter>(iter: Iter) -> ObservableIter<Iter>
where
  Iter: IntoIterator + Clone,
{
  ObservableIter(iter)
}

#[derive(Clone)]
pub struct ObservableIter<Iter>(Iter);

impl<Iter> ObservableLike<Iter::Item, Infallible> for ObservableIter<Iter>
where
  Iter: IntoIterator + Clone,
{
  fn actual_subscribe(&self, mut subscriber: Subscriber<Iter::Item, Infallible>) {
    for v in self.0.clone() {
      if Observer::is_closed(&subscriber) {
        return;
      }
      subscriber.next(v);
    }
    subscriber.complete();
  }
}
