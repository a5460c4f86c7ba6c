use crate::prelude::*;
use std::convert::Infallible;

/// Creates an observable that emits no items, just terminates with an error.
///
/// # Arguments
///
/// * `e` - An error to emit and terminate with
pub fn throw_err<Item, Err>(e: Err) -> Observable<Item, Err>
where
  Item: 'static,
  Err: Clone + Send + Sync + 'static,
{
  Observable::create(move |mut subscriber| subscriber.error(e.clone()))
}

/// Creates an observable that produces no values.
///
/// Completes immediately. Never emits an error.
///
/// # Examples
/// ```
/// use rxcore::prelude::*;
///
/// observable::empty()
///   .subscribe(|v: i32| {println!("{},", v)});
///
/// // Result: no thing printed
/// ```
pub fn empty<Item: 'static>() -> Observable<Item, Infallible> {
  Observable::create(|mut subscriber| subscriber.complete())
}

/// Creates an observable that never emits anything.
///
/// Neither emits a value, nor completes, nor emits an error.
pub fn never<Item: 'static>() -> Observable<Item, Infallible> { Observable::create(|_| {}) }
