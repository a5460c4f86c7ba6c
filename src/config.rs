//! Process-wide configuration.
//!
//! Currently a single knob: what happens to an error that reaches an observer
//! without an error handler. By default it is logged with
//! [`tracing::error!`]; tests and applications can install their own hook.

use std::{
  fmt::Debug,
  sync::{Arc, PoisonError, RwLock},
};

use once_cell::sync::Lazy;

/// Receives errors delivered to observers that registered no error handler.
pub type UnhandledErrorHook = Arc<dyn Fn(&dyn Debug) + Send + Sync>;

static UNHANDLED_ERROR_HOOK: Lazy<RwLock<Option<UnhandledErrorHook>>> =
  Lazy::new(|| RwLock::new(None));

/// Install `hook` as the unhandled error reporter, replacing the previous one.
pub fn set_unhandled_error_hook<F>(hook: F)
where
  F: Fn(&dyn Debug) + Send + Sync + 'static,
{
  *UNHANDLED_ERROR_HOOK.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(hook));
}

/// Restore the default reporter, which logs through `tracing`.
pub fn reset_unhandled_error_hook() {
  *UNHANDLED_ERROR_HOOK.write().unwrap_or_else(PoisonError::into_inner) = None;
}

/// Report an error nobody handled.
pub fn report_unhandled_error(err: &dyn Debug) {
  let hook = UNHANDLED_ERROR_HOOK.read().unwrap_or_else(PoisonError::into_inner).clone();
  match hook {
    Some(hook) => hook(err),
    None => tracing::error!(error = ?err, "unhandled error delivered to an observer"),
  }
}
