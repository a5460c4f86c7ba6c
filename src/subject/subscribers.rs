use crate::observer::Observer;
use smallvec::SmallVec;

/// Ordered, id keyed list of the observers subscribed to a subject.
///
/// Ids are never reused, so a stale id held by a teardown can not remove a
/// later observer. Broadcasting consumes a drained list, which lets the owner
/// release its lock before any observer runs.
pub struct Subscribers<Ob> {
  next_id: usize,
  items: SmallVec<[(usize, Ob); 2]>,
}

impl<Ob> Default for Subscribers<Ob> {
  fn default() -> Self { Self { next_id: 0, items: SmallVec::new() } }
}

impl<Ob> Subscribers<Ob> {
  /// Add an observer and return its unique ID.
  #[inline]
  pub fn add(&mut self, observer: Ob) -> usize {
    let id = self.next_id;
    self.next_id += 1;
    self.items.push((id, observer));
    id
  }

  /// Remove an observer by ID.
  pub fn remove(&mut self, id: usize) -> Option<Ob> {
    self.items.iter().position(|(i, _)| *i == id).map(|pos| self.items.remove(pos).1)
  }

  #[inline]
  pub fn len(&self) -> usize { self.items.len() }

  #[inline]
  pub fn is_empty(&self) -> bool { self.items.is_empty() }

  /// Move every observer out, keeping the id counter.
  pub fn drain(&mut self) -> Subscribers<Ob> {
    Subscribers { next_id: self.next_id, items: std::mem::take(&mut self.items) }
  }
}

impl<Ob> Subscribers<Ob> {
  /// Deliver `value` (when present) then completion to every observer, in
  /// subscription order.
  ///
  /// The value is cloned for all observers except the last one, which
  /// receives the moved value.
  pub(crate) fn broadcast_complete<Item, Err>(self, value: Option<Item>)
  where
    Ob: Observer<Item, Err>,
    Item: Clone,
  {
    let mut value = value;
    let mut iter = self.items.into_iter().peekable();
    while let Some((_, mut observer)) = iter.next() {
      let v = if iter.peek().is_some() { value.clone() } else { value.take() };
      if let Some(v) = v {
        observer.next(v);
      }
      observer.complete();
    }
  }

  /// Deliver `err` to every observer, in subscription order.
  pub(crate) fn broadcast_error<Item, Err>(self, err: Err)
  where
    Ob: Observer<Item, Err>,
    Err: Clone,
  {
    let mut iter = self.items.into_iter().peekable();
    while let Some((_, mut observer)) = iter.next() {
      if iter.peek().is_some() {
        observer.error(err.clone());
      } else {
        observer.error(err);
        break;
      }
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[derive(Default)]
  struct Log(Vec<String>);

  struct Probe<'a>(&'a str, std::rc::Rc<std::cell::RefCell<Log>>);

  impl Observer<i32, &'static str> for Probe<'_> {
    fn next(&mut self, value: i32) {
      self.1.borrow_mut().0.push(format!("{} next {}", self.0, value))
    }

    fn error(&mut self, err: &'static str) {
      self.1.borrow_mut().0.push(format!("{} error {}", self.0, err))
    }

    fn complete(&mut self) { self.1.borrow_mut().0.push(format!("{} complete", self.0)) }
  }

  #[test]
  fn ids_are_not_reused() {
    let mut subs = Subscribers::default();
    let a = subs.add(());
    assert!(subs.remove(a).is_some());
    let b = subs.add(());
    assert_ne!(a, b);
    assert!(subs.remove(a).is_none());
    assert_eq!(subs.len(), 1);
    assert!(subs.remove(b).is_some());
  }

  #[test]
  fn drain_keeps_id_counter() {
    let mut subs = Subscribers::default();
    let a = subs.add(());
    let drained = subs.drain();
    assert_eq!(drained.len(), 1);
    assert!(subs.is_empty());
    assert_ne!(subs.add(()), a);
  }

  #[test]
  fn complete_in_order_with_value() {
    let log = std::rc::Rc::new(std::cell::RefCell::new(Log::default()));
    let mut subs = Subscribers::default();
    subs.add(Probe("a", log.clone()));
    subs.add(Probe("b", log.clone()));

    subs.drain().broadcast_complete(Some(5));
    assert_eq!(log.borrow().0, vec!["a next 5", "a complete", "b next 5", "b complete"]);
  }

  #[test]
  fn complete_without_value() {
    let log = std::rc::Rc::new(std::cell::RefCell::new(Log::default()));
    let mut subs = Subscribers::default();
    subs.add(Probe("a", log.clone()));

    subs.drain().broadcast_complete::<i32, &'static str>(None);
    assert_eq!(log.borrow().0, vec!["a complete"]);
  }

  #[test]
  fn error_to_all() {
    let log = std::rc::Rc::new(std::cell::RefCell::new(Log::default()));
    let mut subs = Subscribers::default();
    subs.add(Probe("a", log.clone()));
    subs.add(Probe("b", log.clone()));

    subs.drain().broadcast_error::<i32, _>("boom");
    assert_eq!(log.borrow().0, vec!["a error boom", "b error boom"]);
  }
}
