//! AsyncSubject shared across threads.

use std::{
  sync::{Arc, Mutex},
  thread,
};

use rxcore::prelude::*;

#[test]
fn subscribe_and_complete_from_different_threads() {
  let subject = AsyncSubject::<usize, ()>::default();
  let values = Arc::new(Mutex::new(vec![]));

  let subscribers: Vec<_> = (0..4)
    .map(|_| {
      let (subject, values) = (subject.clone(), values.clone());
      thread::spawn(move || {
        subject.subscribe(move |v| values.lock().unwrap().push(v));
      })
    })
    .collect();

  let mut producer = subject.clone();
  let producer = thread::spawn(move || {
    for i in 0..100 {
      producer.next(i);
    }
    producer.complete();
  });

  for h in subscribers {
    h.join().unwrap();
  }
  producer.join().unwrap();

  // early or late, every observer sees exactly the last value
  assert_eq!(*values.lock().unwrap(), vec![99; 4]);
  assert!(subject.is_stopped());
  assert_eq!(subject.subscriber_count(), 0);
}

#[test]
fn subject_as_observer_of_a_source() {
  let subject = AsyncSubject::<i32, std::convert::Infallible>::default();
  observable::from_iter(1..=3).subscribe_with(subject.clone());

  let value = Arc::new(Mutex::new(None));
  let c_value = value.clone();
  subject.subscribe(move |v| *c_value.lock().unwrap() = Some(v));
  assert_eq!(*value.lock().unwrap(), Some(3));
}
