//! # rxcore: a minimal reactive-stream engine
//!
//! Lazy, push based sequences ([`Observable`]) with a replaying multicast
//! subject ([`AsyncSubject`]), pluggable scheduling ([`Scheduler`]), panic
//! free error propagation ([`Fault`]) and an adapter that turns callback
//! style functions into observables ([`bind_callback`]).
//!
//! ## Quick Start
//!
//! ```rust
//! use rxcore::prelude::*;
//!
//! observable::from_iter(1..=5)
//!   .single_by(|v, _, _| v % 5 == 0)
//!   .subscribe(|v| println!("Value: {:?}", v));
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Observable`] | A cold source, its producer runs on every subscribe |
//! | [`Observer`] | Consumes `next`, `error`, and `complete` events |
//! | [`Subscription`] | Handle to cancel an active subscription |
//! | [`AsyncSubject`] | Emits the last value to everyone once it completes |
//! | [`Scheduler`] | Decides when and where work runs |
//!
//! ## Feature Flags
//!
//! - **`futures-scheduler`** (default): [`ThreadPoolScheduler`] on a `futures`
//!   thread pool
//! - **`timer`** (default): delays on the thread pool are awaited with
//!   `futures-time` instead of blocking a pool thread
//! - **`tokio-scheduler`**: `TokioScheduler` on a tokio runtime
//!
//! ## Unhandled errors
//!
//! An error that reaches an observer without an error handler is reported
//! through [`config::report_unhandled_error`], which logs with `tracing` unless
//! a hook was installed with [`config::set_unhandled_error_hook`].
//!
//! [`Observable`]: observable::Observable
//! [`Observer`]: observer::Observer
//! [`Subscription`]: subscription::Subscription
//! [`AsyncSubject`]: subject::AsyncSubject
//! [`Scheduler`]: scheduler::Scheduler
//! [`Fault`]: error::Fault
//! [`bind_callback`]: observable::bind_callback()
//! [`ThreadPoolScheduler`]: scheduler::ThreadPoolScheduler
#[cfg(test)]
#[macro_use]
extern crate bencher;

pub mod config;
pub mod error;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod rc;
pub mod scheduler;
pub mod subject;
pub mod subscriber;
pub mod subscription;

// Re-export the prelude module
pub use prelude::*;

#[cfg(doctest)]
mod __markdown_doctests {
  mod readme {
    #![doc = include_str!("../README.md")]
  }
}
