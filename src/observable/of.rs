use crate::prelude::*;
use std::convert::Infallible;

/// Creates an observable producing multiple values.
///
/// Completes immediately after emitting the values given. Never emits an error.
///
/// # Examples
///
/// ```
/// use rxcore::prelude::*;
/// use rxcore::of_sequence;
///
/// of_sequence!(1, 2, 3)
///   .subscribe(|v| {println!("{},", v)});
///
/// // print log:
/// // 1
/// // 2
/// // 3
/// ```
#[macro_export]
macro_rules! of_sequence {
  ( $( $item:expr ),* ) => {
    $crate::observable::Observable::<_, ::std::convert::Infallible>::create(move |mut s| {
      $(
        $crate::observer::Observer::next(&mut s, $item);
      )*
      $crate::observer::Observer::complete(&mut s);
    })
  };
}

/// Creates an observable producing a single value.
///
/// Completes immediately after emitting the value given. Never emits an error.
///
/// # Arguments
///
/// * `v` - A value to emits.
///
/// # Examples
///
/// ```
/// use rxcore::prelude::*;
///
/// observable::of(123)
///   .subscribe(|v| {println!("{},", v)});
/// ```
pub fn of<Item>(v: Item) -> OfObservable<Item> { OfObservable(v) }

#[derive(Clone)]
pub struct OfObservable<Item>(Item);

impl<Item: Clone> ObservableLike<Item, Infallible> for OfObservable<Item> {
  fn actual_subscribe(&self, mut subscriber: Subscriber<Item, Infallible>) {
    subscriber.next(self.0.clone());
    subscriber.complete();
  }
}
