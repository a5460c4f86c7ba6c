//! The unhandled error hook is process wide, so it lives in its own test
//! binary.

use std::sync::{Arc, Mutex};

use rxcore::{config, prelude::*};

#[test]
fn errors_without_handler_reach_hook() {
  let reported = Arc::new(Mutex::new(vec![]));
  let c_reported = reported.clone();
  config::set_unhandled_error_hook(move |err| {
    c_reported.lock().unwrap().push(format!("{:?}", err));
  });

  observable::throw_err::<i32, _>("lost").subscribe(|_| {});
  observable::bind_callback(|_: (), _: Callback<(i32,)>| panic!("crashed"))
    .call(())
    .subscribe(|_| {});
  observable::empty::<i32>().single().subscribe(|_| {});

  config::reset_unhandled_error_hook();
  assert_eq!(*reported.lock().unwrap(), vec!["\"lost\"", "Panicked(\"crashed\")", "Empty"]);
}
