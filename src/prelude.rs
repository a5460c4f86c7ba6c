//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

pub use crate::{
  error::{Fault, SingleError},
  observable,
  observable::{
    BindCallback, BoundCallbackObservable, Callback, CallbackArgs, Observable, ObservableExt,
    ObservableLike,
  },
  observer::{NoComplete, NoError, Observer, ObserverAll},
  ops::Single,
  scheduler::{ImmediateScheduler, QueueScheduler, Scheduler, TaskHandle},
  subject::AsyncSubject,
  subscriber::Subscriber,
  subscription::{ClosureSubscription, Subscription, SubscriptionGuard, SubscriptionLike},
};

#[cfg(feature = "futures-scheduler")]
pub use crate::scheduler::ThreadPoolScheduler;
#[cfg(feature = "tokio-scheduler")]
pub use crate::scheduler::TokioScheduler;
