use crate::{
  error::{capture, Fault, SingleError},
  prelude::*,
};

/// Decides which source elements qualify for [`Single`].
///
/// Receives the element, its 1-based position and the source observable.
pub trait SinglePredicate<Item, Err>: Clone + Send + 'static {
  fn test(
    &mut self,
    item: &Item,
    index: usize,
    source: &Observable<Item, Err>,
  ) -> Result<bool, Err>;
}

/// Every element qualifies.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPredicate;

impl<Item, Err> SinglePredicate<Item, Err> for NoPredicate {
  #[inline]
  fn test(&mut self, _: &Item, _: usize, _: &Observable<Item, Err>) -> Result<bool, Err> {
    Ok(true)
  }
}

/// An infallible predicate closure.
#[derive(Clone)]
pub struct ByPredicate<P>(P);

impl<Item, Err, P> SinglePredicate<Item, Err> for ByPredicate<P>
where
  P: FnMut(&Item, usize, &Observable<Item, Err>) -> bool + Clone + Send + 'static,
{
  #[inline]
  fn test(
    &mut self,
    item: &Item,
    index: usize,
    source: &Observable<Item, Err>,
  ) -> Result<bool, Err> {
    Ok((self.0)(item, index, source))
  }
}

/// A predicate closure that may fail, its error terminates the stream.
#[derive(Clone)]
pub struct TryByPredicate<P>(P);

impl<Item, Err, P> SinglePredicate<Item, Err> for TryByPredicate<P>
where
  P: FnMut(&Item, usize, &Observable<Item, Err>) -> Result<bool, Err> + Clone + Send + 'static,
{
  #[inline]
  fn test(
    &mut self,
    item: &Item,
    index: usize,
    source: &Observable<Item, Err>,
  ) -> Result<bool, Err> {
    (self.0)(item, index, source)
  }
}

/// Emits the single element of the source that satisfies a predicate.
///
/// When the source completes:
/// - with exactly one qualifying element, emits `Some(element)` and completes;
/// - with elements of which none qualifies, emits `None` and completes;
/// - without any element, errors with [`SingleError::Empty`].
///
/// A second qualifying element errors with [`SingleError::MoreThanOne`] right
/// away and unsubscribes the source. Source errors arrive as
/// [`SingleError::Upstream`]. A panicking predicate fails with
/// [`SingleError::PredicatePanicked`] and also unsubscribes the source.
///
/// ```
/// use rxcore::{error::SingleError, prelude::*};
/// use std::sync::{Arc, Mutex};
///
/// let result = Arc::new(Mutex::new(None));
/// let c_result = result.clone();
/// observable::from_iter(1..=5)
///   .single_by(|v, _, _| *v == 3)
///   .subscribe(move |v| *c_result.lock().unwrap() = v);
/// assert_eq!(*result.lock().unwrap(), Some(3));
/// ```
pub trait Single<Item, Err>: ObservableLike<Item, Err> + Sized {
  fn single(self) -> SingleOp<Self, NoPredicate> {
    SingleOp { source: self, predicate: NoPredicate }
  }

  fn single_by<P>(self, predicate: P) -> SingleOp<Self, ByPredicate<P>>
  where
    P: FnMut(&Item, usize, &Observable<Item, Err>) -> bool + Clone + Send + 'static,
  {
    SingleOp { source: self, predicate: ByPredicate(predicate) }
  }

  fn try_single_by<P>(self, predicate: P) -> SingleOp<Self, TryByPredicate<P>>
  where
    P: FnMut(&Item, usize, &Observable<Item, Err>) -> Result<bool, Err> + Clone + Send + 'static,
  {
    SingleOp { source: self, predicate: TryByPredicate(predicate) }
  }
}

impl<Item, Err, O> Single<Item, Err> for O where O: ObservableLike<Item, Err> {}

#[derive(Clone)]
pub struct SingleOp<S, P> {
  source: S,
  predicate: P,
}

impl<Item, Err, S, P> ObservableLike<Option<Item>, SingleError<Err>> for SingleOp<S, P>
where
  S: ObservableLike<Item, Err> + Clone + Send + Sync + 'static,
  P: SinglePredicate<Item, Err>,
  Item: Send + 'static,
  Err: Send + 'static,
{
  fn actual_subscribe(&self, downstream: Subscriber<Option<Item>, SingleError<Err>>) {
    let observer = SingleObserver {
      downstream: downstream.clone(),
      predicate: self.predicate.clone(),
      source: self.source.clone().into_observable(),
      index: 0,
      found: None,
    };
    self.source.actual_subscribe(downstream.chain(observer));
  }
}

pub struct SingleObserver<Item, Err, P> {
  downstream: Subscriber<Option<Item>, SingleError<Err>>,
  predicate: P,
  source: Observable<Item, Err>,
  index: usize,
  found: Option<Item>,
}

impl<Item, Err, P> Observer<Item, Err> for SingleObserver<Item, Err, P>
where
  P: SinglePredicate<Item, Err>,
{
  fn next(&mut self, value: Item) {
    self.index += 1;
    let (predicate, index, source) = (&mut self.predicate, self.index, &self.source);
    match capture(|| predicate.test(&value, index, source)) {
      Ok(false) => {}
      Ok(true) if self.found.is_some() => self.downstream.error(SingleError::MoreThanOne),
      Ok(true) => self.found = Some(value),
      Err(Fault::Raised(err)) => self.downstream.error(SingleError::Upstream(err)),
      Err(Fault::Panicked(msg)) => self.downstream.error(SingleError::PredicatePanicked(msg)),
    }
  }

  #[inline]
  fn error(&mut self, err: Err) { self.downstream.error(SingleError::Upstream(err)) }

  fn complete(&mut self) {
    if self.index == 0 {
      self.downstream.error(SingleError::Empty);
    } else {
      self.downstream.next(self.found.take());
      self.downstream.complete();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { Observer::is_closed(&self.downstream) }
}
