use crate::prelude::*;
use std::{fmt::Debug, sync::Arc};

mod of;
pub use of::*;
mod from_iter;
pub use from_iter::*;
mod trivial;
pub use trivial::*;
pub mod bind_callback;
pub use bind_callback::*;

type Producer<Item, Err> = Arc<dyn Fn(Subscriber<Item, Err>) + Send + Sync>;

/// A representation of any set of values over any amount of time. This is the
/// most basic building block of the crate.
///
/// An `Observable` is cold: every subscribe runs the producer again with a
/// fresh [`Subscriber`]. Cloning is cheap and shares the producer.
pub struct Observable<Item, Err> {
  producer: Producer<Item, Err>,
}

impl<Item, Err> Observable<Item, Err> {
  /// param `producer`: the function that is called when the Observable is
  /// subscribed to. This function is given a Subscriber, to which new values
  /// can be `next`ed, or an `error` method can be called to raise an error, or
  /// `complete` can be called to notify of a successful completion.
  ///
  /// ```
  /// use rxcore::prelude::*;
  /// use std::convert::Infallible;
  ///
  /// let source = Observable::<_, Infallible>::create(|mut subscriber| {
  ///   subscriber.next(1);
  ///   subscriber.next(2);
  ///   subscriber.complete();
  /// });
  /// source.subscribe(|v| println!("{}", v));
  /// ```
  pub fn create<F>(producer: F) -> Self
  where
    F: Fn(Subscriber<Item, Err>) + Send + Sync + 'static,
  {
    Observable { producer: Arc::new(producer) }
  }
}

impl<Item, Err> Clone for Observable<Item, Err> {
  fn clone(&self) -> Self { Observable { producer: self.producer.clone() } }
}

/// Anything that can be subscribed to with a [`Subscriber`].
pub trait ObservableLike<Item, Err> {
  /// Connect `subscriber` to this source. Events are pushed into the
  /// subscriber, which may be closed at any time by its owner.
  fn actual_subscribe(&self, subscriber: Subscriber<Item, Err>);
}

impl<Item, Err> ObservableLike<Item, Err> for Observable<Item, Err> {
  #[inline]
  fn actual_subscribe(&self, subscriber: Subscriber<Item, Err>) { (self.producer)(subscriber) }
}

/// The subscribe family, available on every [`ObservableLike`].
pub trait ObservableExt<Item, Err>: ObservableLike<Item, Err> {
  /// Invokes an execution of an Observable and registers Observer handlers for
  /// notifications it will emit.
  fn subscribe<N>(&self, next: N) -> Subscription
  where
    N: FnMut(Item) + Send + 'static,
    Err: Debug + 'static,
    Item: 'static,
  {
    self.subscribe_with(ObserverAll::new(Some(next), None::<NoError<Err>>, None::<NoComplete>))
  }

  fn subscribe_err<N, E>(&self, next: N, error: E) -> Subscription
  where
    N: FnMut(Item) + Send + 'static,
    E: FnOnce(Err) + Send + 'static,
    Err: Debug + 'static,
    Item: 'static,
  {
    self.subscribe_with(ObserverAll::new(Some(next), Some(error), None::<NoComplete>))
  }

  fn subscribe_complete<N, C>(&self, next: N, complete: C) -> Subscription
  where
    N: FnMut(Item) + Send + 'static,
    C: FnOnce() + Send + 'static,
    Err: Debug + 'static,
    Item: 'static,
  {
    self.subscribe_with(ObserverAll::new(Some(next), None::<NoError<Err>>, Some(complete)))
  }

  fn subscribe_all<N, E, C>(&self, next: N, error: E, complete: C) -> Subscription
  where
    N: FnMut(Item) + Send + 'static,
    E: FnOnce(Err) + Send + 'static,
    C: FnOnce() + Send + 'static,
    Err: Debug + 'static,
    Item: 'static,
  {
    self.subscribe_with(ObserverAll::new(Some(next), Some(error), Some(complete)))
  }

  /// Subscribe an arbitrary observer. The returned subscription closes the
  /// subscriber created for it.
  fn subscribe_with<O>(&self, observer: O) -> Subscription
  where
    O: Observer<Item, Err> + Send + 'static,
  {
    let subscriber = Subscriber::new(observer);
    let subscription = subscriber.subscription().clone();
    self.actual_subscribe(subscriber);
    subscription
  }

  /// Erase the concrete source type.
  fn into_observable(self) -> Observable<Item, Err>
  where
    Self: Sized + Send + Sync + 'static,
    Item: 'static,
    Err: 'static,
  {
    Observable::create(move |subscriber| self.actual_subscribe(subscriber))
  }
}

impl<Item, Err, T> ObservableExt<Item, Err> for T where T: ObservableLike<Item, Err> {}
