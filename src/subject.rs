//! Subjects are both an observer and an observable, multicasting what they
//! receive to every observer subscribed to them.

mod subscribers;
pub use subscribers::Subscribers;
pub mod async_subject;
pub use async_subject::AsyncSubject;
