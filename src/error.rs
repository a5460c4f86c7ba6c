//! Error values of the engine.
//!
//! Faults raised by user code (a returned `Err` or a panic) are turned into
//! plain values by [`capture`], so every failure travels through the observer
//! error channel instead of unwinding through the caller.

use std::{
  any::Any,
  panic::{self, AssertUnwindSafe},
};

/// A fault captured from user code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Fault<E> {
  /// The user code returned an error.
  #[error("{0}")]
  Raised(E),
  /// The user code panicked, carrying the panic message.
  #[error("panicked: {0}")]
  Panicked(String),
}

impl<E> Fault<E> {
  #[inline]
  pub fn is_panic(&self) -> bool { matches!(self, Fault::Panicked(_)) }

  /// The error returned by user code, `None` if it panicked.
  pub fn into_raised(self) -> Option<E> {
    match self {
      Fault::Raised(e) => Some(e),
      Fault::Panicked(_) => None,
    }
  }

  /// Converts the raised error, keeping panics as they are.
  pub fn map_raised<F, E2>(self, f: F) -> Fault<E2>
  where
    F: FnOnce(E) -> E2,
  {
    match self {
      Fault::Raised(e) => Fault::Raised(f(e)),
      Fault::Panicked(msg) => Fault::Panicked(msg),
    }
  }
}

/// Errors produced by the `single` operator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SingleError<E> {
  /// The source completed without emitting anything.
  #[error("no elements in sequence")]
  Empty,
  /// More than one element satisfied the predicate.
  #[error("sequence contains more than one element")]
  MoreThanOne,
  /// An error from the source or from the predicate.
  #[error("{0}")]
  Upstream(E),
  /// The predicate panicked, carrying the panic message.
  #[error("predicate panicked: {0}")]
  PredicatePanicked(String),
}

/// Runs `f`, turning a returned error or a panic into a [`Fault`].
///
/// ```
/// use rxcore::error::{capture, Fault};
///
/// let ok: Result<i32, Fault<&str>> = capture(|| Ok(1));
/// assert_eq!(ok, Ok(1));
///
/// let raised: Result<i32, Fault<&str>> = capture(|| Err("boom"));
/// assert_eq!(raised, Err(Fault::Raised("boom")));
/// ```
pub fn capture<T, E, F>(f: F) -> Result<T, Fault<E>>
where
  F: FnOnce() -> Result<T, E>,
{
  match panic::catch_unwind(AssertUnwindSafe(f)) {
    Ok(Ok(v)) => Ok(v),
    Ok(Err(e)) => Err(Fault::Raised(e)),
    Err(payload) => Err(Fault::Panicked(panic_message(payload))),
  }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
  match payload.downcast::<&'static str>() {
    Ok(msg) => (*msg).to_string(),
    Err(payload) => match payload.downcast::<String>() {
      Ok(msg) => *msg,
      Err(_) => "unknown panic payload".to_string(),
    },
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn passes_success_through() {
    assert_eq!(capture::<_, (), _>(|| Ok("value")), Ok("value"));
  }

  #[test]
  fn captures_raised_error() {
    let r: Result<(), _> = capture(|| Err(42));
    assert_eq!(r, Err(Fault::Raised(42)));
    assert_eq!(r.unwrap_err().into_raised(), Some(42));
  }

  #[test]
  fn captures_panic_message() {
    let r: Result<(), Fault<()>> = capture(|| panic!("exploded"));
    let fault = r.unwrap_err();
    assert!(fault.is_panic());
    assert_eq!(fault, Fault::Panicked("exploded".to_string()));

    let r: Result<(), Fault<()>> = capture(|| panic!("{} items", 3));
    assert_eq!(r.unwrap_err(), Fault::Panicked("3 items".to_string()));
  }

  #[test]
  fn nested_captures_are_independent() {
    let outer: Result<i32, Fault<&str>> = capture(|| {
      let inner: Result<i32, Fault<&str>> = capture(|| Err("inner"));
      assert_eq!(inner, Err(Fault::Raised("inner")));
      Ok(7)
    });
    assert_eq!(outer, Ok(7));
  }

  #[test]
  fn display() {
    assert_eq!(SingleError::<&str>::Empty.to_string(), "no elements in sequence");
    assert_eq!(
      SingleError::<&str>::MoreThanOne.to_string(),
      "sequence contains more than one element"
    );
    assert_eq!(SingleError::Upstream("io").to_string(), "io");
    assert_eq!(
      SingleError::<&str>::PredicatePanicked("x".into()).to_string(),
      "predicate panicked: x"
    );
    assert_eq!(Fault::<&str>::Panicked("x".into()).to_string(), "panicked: x");
    assert_eq!(Fault::Raised(5).map_raised(|v| v * 2), Fault::Raised(10));
  }
}
