//! Turn a callback style function into an observable.
//!
//! A bound function takes its leading arguments plus a trailing [`Callback`]
//! and reports its result by calling that callback once. Binding it yields a
//! [`BindCallback`] builder; every [`BindCallback::call`] produces a
//! [`BoundCallbackObservable`] that runs the function on its first dispatched
//! subscription, then replays the single result to every subscriber through
//! an [`AsyncSubject`].
//!
//! ```
//! use rxcore::prelude::*;
//! use std::sync::{Arc, Mutex};
//!
//! fn add(args: (i32, i32), cb: Callback<(i32,)>) { cb.call((args.0 + args.1,)) }
//!
//! let sum = Arc::new(Mutex::new(0));
//! let c_sum = sum.clone();
//! observable::bind_callback(add)
//!   .call((1, 2))
//!   .subscribe(move |v| *c_sum.lock().unwrap() = v);
//! assert_eq!(*sum.lock().unwrap(), 3);
//! ```

use std::{convert::Infallible, sync::Arc};

use once_cell::sync::OnceCell;

use crate::{
  error::{capture, Fault},
  prelude::*,
  rc::{MutArc, RcDerefMut},
};

/// The values a callback is called with, and what is emitted for them when no
/// selector is configured.
///
/// `()` emits `()`, a one element tuple emits the element itself, larger
/// tuples are emitted unchanged.
pub trait CallbackArgs {
  type Output;
  fn into_output(self) -> Self::Output;
}

impl CallbackArgs for () {
  type Output = ();
  #[inline]
  fn into_output(self) {}
}

impl<A> CallbackArgs for (A,) {
  type Output = A;
  #[inline]
  fn into_output(self) -> A { self.0 }
}

macro_rules! tuple_callback_args {
  ($($name:ident),+) => {
    impl<$($name),+> CallbackArgs for ($($name,)+) {
      type Output = Self;
      #[inline]
      fn into_output(self) -> Self { self }
    }
  };
}

tuple_callback_args!(A, B);
tuple_callback_args!(A, B, C);
tuple_callback_args!(A, B, C, D);
tuple_callback_args!(A, B, C, D, E);
tuple_callback_args!(A, B, C, D, E, F);

/// The trailing callback handed to a bound function.
///
/// `call` consumes it, so a result is reported at most once. Dropping it
/// without calling leaves the observable pending forever.
pub struct Callback<CbArgs> {
  deliver: Box<dyn FnOnce(CbArgs) + Send>,
}

impl<CbArgs> Callback<CbArgs> {
  #[inline]
  pub fn call(self, args: CbArgs) { (self.deliver)(args) }
}

type BoundFn<Args, CbArgs, E> = Arc<dyn Fn(Args, Callback<CbArgs>) -> Result<(), E> + Send + Sync>;
type Selector<CbArgs, Item, E> = Arc<dyn Fn(CbArgs) -> Result<Item, E> + Send + Sync>;

/// Builder for observables bound to a callback style function.
///
/// Cloning is cheap, every [`call`](BindCallback::call) creates an independent
/// observable with its own cached result.
pub struct BindCallback<Args, CbArgs, Item, E, Sch = ImmediateScheduler> {
  func: BoundFn<Args, CbArgs, E>,
  selector: Selector<CbArgs, Item, E>,
  scheduler: Sch,
}

impl<Args, CbArgs, Item, E, Sch: Clone> Clone for BindCallback<Args, CbArgs, Item, E, Sch> {
  fn clone(&self) -> Self {
    BindCallback {
      func: self.func.clone(),
      selector: self.selector.clone(),
      scheduler: self.scheduler.clone(),
    }
  }
}

/// Bind an infallible callback style function.
pub fn bind_callback<Args, CbArgs, F>(
  func: F,
) -> BindCallback<Args, CbArgs, CbArgs::Output, Infallible>
where
  F: Fn(Args, Callback<CbArgs>) + Send + Sync + 'static,
  Args: 'static,
  CbArgs: CallbackArgs + 'static,
{
  try_bind_callback(move |args, callback| {
    func(args, callback);
    Ok(())
  })
}

/// Bind a callback style function that may fail before it ever calls back.
/// Its error is emitted as [`Fault::Raised`].
pub fn try_bind_callback<Args, CbArgs, E, F>(
  func: F,
) -> BindCallback<Args, CbArgs, CbArgs::Output, E>
where
  F: Fn(Args, Callback<CbArgs>) -> Result<(), E> + Send + Sync + 'static,
  Args: 'static,
  CbArgs: CallbackArgs + 'static,
  E: 'static,
{
  BindCallback {
    func: Arc::new(func),
    selector: Arc::new(|cb_args: CbArgs| Ok(cb_args.into_output())),
    scheduler: ImmediateScheduler,
  }
}

/// Bind a callback style method; `context` is the receiver of every
/// invocation.
pub fn bind_method<Ctx, Args, CbArgs, F>(
  context: Ctx,
  func: F,
) -> BindCallback<Args, CbArgs, CbArgs::Output, Infallible>
where
  Ctx: Send + Sync + 'static,
  F: Fn(&Ctx, Args, Callback<CbArgs>) + Send + Sync + 'static,
  Args: 'static,
  CbArgs: CallbackArgs + 'static,
{
  bind_callback(move |args, callback| func(&context, args, callback))
}

impl<Args, CbArgs, Item, E, Sch> BindCallback<Args, CbArgs, Item, E, Sch>
where
  Args: 'static,
  CbArgs: 'static,
  Item: 'static,
  E: 'static,
  Sch: 'static,
{
  /// Map the callback arguments to the emitted value.
  pub fn selector<Item2, F>(self, f: F) -> BindCallback<Args, CbArgs, Item2, E, Sch>
  where
    F: Fn(CbArgs) -> Item2 + Send + Sync + 'static,
    Item2: 'static,
  {
    self.try_selector(move |cb_args| Ok(f(cb_args)))
  }

  /// Map the callback arguments to the emitted value or to an error.
  pub fn try_selector<Item2, F>(self, f: F) -> BindCallback<Args, CbArgs, Item2, E, Sch>
  where
    F: Fn(CbArgs) -> Result<Item2, E> + Send + Sync + 'static,
  {
    BindCallback { func: self.func, selector: Arc::new(f), scheduler: self.scheduler }
  }

  /// Run dispatch and result delivery on `scheduler`.
  pub fn scheduler<Sch2>(self, scheduler: Sch2) -> BindCallback<Args, CbArgs, Item, E, Sch2>
  where
    Sch2: Scheduler,
  {
    BindCallback { func: self.func, selector: self.selector, scheduler }
  }
}

impl<Args, CbArgs, Item, Sch> BindCallback<Args, CbArgs, Item, Infallible, Sch>
where
  Args: 'static,
  CbArgs: 'static,
  Item: 'static,
  Sch: 'static,
{
  /// Widen the error type of an infallible binding, so a fallible selector
  /// can be attached.
  pub fn fallible<E: 'static>(self) -> BindCallback<Args, CbArgs, Item, E, Sch> {
    let (func, selector) = (self.func, self.selector);
    BindCallback {
      func: Arc::new(move |args, callback| func(args, callback).map_err(|never| match never {})),
      selector: Arc::new(move |cb_args| selector(cb_args).map_err(|never| match never {})),
      scheduler: self.scheduler,
    }
  }
}

impl<Args, CbArgs, Item, E, Sch> BindCallback<Args, CbArgs, Item, E, Sch>
where
  Args: Send + 'static,
  CbArgs: Send + 'static,
  Item: Clone + Send + 'static,
  E: Clone + Send + 'static,
  Sch: Scheduler,
{
  /// Create an observable for `args`. Nothing runs until it is subscribed.
  pub fn call(&self, args: Args) -> BoundCallbackObservable<Item, E, Sch> {
    let func = self.func.clone();
    let selector = self.selector.clone();
    let scheduler = self.scheduler.clone();
    let invoke = move |mut subject: AsyncSubject<Item, Fault<E>>| {
      let c_subject = subject.clone();
      let callback = Callback {
        deliver: Box::new(move |cb_args: CbArgs| {
          let result = capture(|| selector(cb_args));
          scheduler.schedule(deliver, None, (c_subject, result));
        }),
      };
      if let Err(fault) = capture(|| func(args, callback)) {
        tracing::debug!(panicked = fault.is_panic(), "bound function failed");
        subject.error(fault);
      }
    };
    let invoke: Invoke<Item, E> = Box::new(invoke);
    BoundCallbackObservable {
      inner: Arc::new(Bound { subject: OnceCell::new(), invoke: MutArc::own(Some(invoke)) }),
      scheduler: self.scheduler.clone(),
    }
  }
}

fn deliver<Item, E>(
  (mut subject, result): (AsyncSubject<Item, Fault<E>>, Result<Item, Fault<E>>),
) where
  Item: Clone,
  E: Clone,
{
  match result {
    Ok(value) => {
      subject.next(value);
      subject.complete();
    }
    Err(fault) => subject.error(fault),
  }
}

type Invoke<Item, E> = Box<dyn FnOnce(AsyncSubject<Item, Fault<E>>) + Send>;

struct Bound<Item, E> {
  subject: OnceCell<AsyncSubject<Item, Fault<E>>>,
  invoke: MutArc<Option<Invoke<Item, E>>>,
}

impl<Item, E> Bound<Item, E> {
  /// The cached subject, invoking the bound function when it is created.
  fn subject(&self) -> AsyncSubject<Item, Fault<E>> {
    let mut created = false;
    let subject = self
      .subject
      .get_or_init(|| {
        created = true;
        AsyncSubject::default()
      })
      .clone();
    if created {
      let invoke = self.invoke.rc_deref_mut().take();
      if let Some(invoke) = invoke {
        tracing::debug!("invoking bound function");
        invoke(subject.clone());
      }
    }
    subject
  }
}

/// Observable over the single result of a bound function.
///
/// The function runs once, on the first subscription that is dispatched; its
/// result is cached and replayed to every subscriber. Clones share the cache.
/// Errors are [`Fault`]s: a returned error or a panic of the function or of
/// the selector.
pub struct BoundCallbackObservable<Item, E, Sch = ImmediateScheduler> {
  inner: Arc<Bound<Item, E>>,
  scheduler: Sch,
}

impl<Item, E, Sch: Clone> Clone for BoundCallbackObservable<Item, E, Sch> {
  fn clone(&self) -> Self {
    BoundCallbackObservable { inner: self.inner.clone(), scheduler: self.scheduler.clone() }
  }
}

impl<Item, E, Sch> BoundCallbackObservable<Item, E, Sch> {
  /// Whether the bound function was already invoked.
  #[inline]
  pub fn is_invoked(&self) -> bool { self.inner.subject.get().is_some() }
}

impl<Item, E, Sch> ObservableLike<Item, Fault<E>> for BoundCallbackObservable<Item, E, Sch>
where
  Item: Clone + Send + 'static,
  E: Clone + Send + 'static,
  Sch: Scheduler,
{
  fn actual_subscribe(&self, subscriber: Subscriber<Item, Fault<E>>) {
    let handle = self.scheduler.schedule(
      |(inner, subscriber): (Arc<Bound<Item, E>>, Subscriber<Item, Fault<E>>)| {
        inner.subject().actual_subscribe(subscriber)
      },
      None,
      (self.inner.clone(), subscriber.clone()),
    );
    subscriber.add(handle);
  }
}
