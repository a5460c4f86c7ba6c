//! Integration tests for callback binding across schedulers and threads.

use std::{
  sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Barrier, Mutex,
  },
  thread,
  time::Duration,
};

use futures::{channel::mpsc, executor::block_on, StreamExt};
use rxcore::prelude::*;

#[test]
fn concurrent_subscribers_invoke_once() {
  let calls = Arc::new(AtomicUsize::new(0));
  let c_calls = calls.clone();
  let source = observable::bind_callback(move |x: i32, cb: Callback<(i32,)>| {
    c_calls.fetch_add(1, Ordering::SeqCst);
    // widen the race window
    thread::sleep(Duration::from_millis(5));
    cb.call((x + 1,))
  })
  .call(41);

  let threads = 8;
  let barrier = Arc::new(Barrier::new(threads));
  let values = Arc::new(Mutex::new(vec![]));
  let handles: Vec<_> = (0..threads)
    .map(|_| {
      let (source, barrier, values) = (source.clone(), barrier.clone(), values.clone());
      thread::spawn(move || {
        barrier.wait();
        source.subscribe(move |v| values.lock().unwrap().push(v));
      })
    })
    .collect();
  for h in handles {
    h.join().unwrap();
  }

  assert_eq!(calls.load(Ordering::SeqCst), 1);
  assert_eq!(*values.lock().unwrap(), vec![42; threads]);
}

#[cfg(feature = "futures-scheduler")]
#[test]
fn thread_pool_delivery() {
  let scheduler = ThreadPoolScheduler::default_pool().unwrap();
  let calls = Arc::new(AtomicUsize::new(0));
  let c_calls = calls.clone();
  let source = observable::bind_callback(move |(a, b): (i32, i32), cb: Callback<(i32, i32)>| {
    c_calls.fetch_add(1, Ordering::SeqCst);
    // report from another thread, as an I/O completion would
    thread::spawn(move || cb.call((a, b)));
  })
  .selector(|(a, b)| a + b)
  .scheduler(scheduler)
  .call((20, 22));

  let (tx, rx) = mpsc::unbounded();
  for _ in 0..3 {
    let tx = tx.clone();
    source.subscribe(move |v| tx.unbounded_send(v).unwrap());
  }
  drop(tx);

  let received: Vec<i32> = block_on(rx.take(3).collect());
  assert_eq!(received, vec![42, 42, 42]);
  assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn late_subscriber_gets_replay() {
  let source =
    observable::bind_callback(|_: (), cb: Callback<(&'static str,)>| cb.call(("done",))).call(());
  source.subscribe(|_| {});

  let late = Arc::new(Mutex::new(vec![]));
  let (c_next, c_complete) = (late.clone(), late.clone());
  source.subscribe_complete(
    move |v| c_next.lock().unwrap().push(v.to_string()),
    move || c_complete.lock().unwrap().push("complete".to_string()),
  );
  assert_eq!(*late.lock().unwrap(), vec!["done", "complete"]);
}

#[test]
fn pending_callback_keeps_stream_open() {
  let source = observable::bind_callback(|_: (), _cb: Callback<()>| {}).call(());
  let subscription = source.subscribe(|_| panic!("no value expected"));
  assert!(!subscription.is_closed());
  assert!(source.is_invoked());
}

#[test]
fn queue_scheduler_delivery_is_deferred() {
  let scheduler = QueueScheduler::default();
  let slot: Arc<Mutex<Option<Callback<(i32,)>>>> = Arc::new(Mutex::new(None));
  let c_slot = slot.clone();
  let source = observable::bind_callback(move |_: (), cb: Callback<(i32,)>| {
    *c_slot.lock().unwrap() = Some(cb);
  })
  .scheduler(scheduler.clone())
  .call(());

  let values = Arc::new(Mutex::new(vec![]));
  let c_values = values.clone();
  source.subscribe(move |v| c_values.lock().unwrap().push(v));
  scheduler.flush();

  let cb = slot.lock().unwrap().take().unwrap();
  cb.call((3,));
  // delivery itself goes through the scheduler
  assert!(values.lock().unwrap().is_empty());
  assert_eq!(scheduler.pending_count(), 1);

  scheduler.flush();
  assert_eq!(*values.lock().unwrap(), vec![3]);
}

#[test]
fn unsubscribe_is_idempotent() {
  let source = observable::bind_callback(|_: (), _cb: Callback<()>| {}).call(());
  let mut subscription = source.subscribe(|_| {});
  subscription.unsubscribe();
  subscription.unsubscribe();
  assert!(subscription.is_closed());
}
