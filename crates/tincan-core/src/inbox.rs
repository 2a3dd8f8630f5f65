//! Delivery queue between the network task and the presentation layer.
//!
//! [`Inbox`] pairs a locked FIFO of received text chunks with a wakeup
//! signal. The read loop pushes from the network task; the presentation
//! event loop awaits [`Inbox::notified`] and then drains on its own
//! context, so network code never touches presentation state.
//!
//! Wakeups may coalesce: several pushes can land before the consumer runs.
//! That is fine because the consumer drains until empty, and the notify
//! primitive stores a permit, so a push with no waiter still wakes the next
//! wait.

use std::{
    collections::VecDeque,
    sync::{Mutex, MutexGuard, PoisonError},
};

use tokio::sync::{Notify, futures::Notified};

/// Thread-safe FIFO of received text chunks plus a consumer wakeup.
///
/// Producers only append. The presentation layer is the sole consumer and
/// always sees chunks in receipt order.
#[derive(Debug, Default)]
pub struct Inbox {
    queue: Mutex<VecDeque<String>>,
    notify: Notify,
}

impl Inbox {
    /// Create an empty inbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk and wake the consumer.
    pub fn push(&self, chunk: String) {
        self.lock().push_back(chunk);
        self.notify.notify_one();
    }

    /// Atomically remove and return all queued chunks in receipt order.
    #[must_use]
    pub fn drain_all(&self) -> Vec<String> {
        self.lock().drain(..).collect()
    }

    /// Number of chunks currently queued.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when no chunks are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Wait until a push signals new data.
    ///
    /// Completes at least once per push, but wakeups coalesce; consumers
    /// must drain until empty after each completion.
    pub fn notified(&self) -> Notified<'_> {
        self.notify.notified()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<String>> {
        // Poisoning only means a producer panicked mid-push; the queue
        // itself is still coherent, so take the guard anyway.
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::timeout;

    use super::*;

    const WAIT: Duration = Duration::from_secs(1);

    #[test]
    fn drains_in_receipt_order() {
        let inbox = Inbox::new();
        inbox.push("first".to_owned());
        inbox.push("second".to_owned());
        inbox.push("third".to_owned());

        assert_eq!(inbox.len(), 3);
        assert_eq!(inbox.drain_all(), vec!["first", "second", "third"]);
        assert!(inbox.is_empty());
    }

    #[test]
    fn drain_on_empty_returns_nothing() {
        let inbox = Inbox::new();
        assert!(inbox.drain_all().is_empty());
    }

    #[tokio::test]
    async fn push_wakes_a_waiting_consumer() {
        let inbox = Inbox::new();
        let notified = inbox.notified();
        inbox.push("hello".to_owned());

        timeout(WAIT, notified).await.expect("wakeup after push");
        assert_eq!(inbox.drain_all(), vec!["hello"]);
    }

    #[tokio::test]
    async fn push_before_wait_is_not_lost() {
        let inbox = Inbox::new();
        inbox.push("early".to_owned());

        // The permit from the earlier push must complete this wait.
        timeout(WAIT, inbox.notified()).await.expect("stored permit");
        assert_eq!(inbox.drain_all(), vec!["early"]);
    }

    #[tokio::test]
    async fn coalesced_wakeups_still_deliver_everything() {
        let inbox = Inbox::new();
        inbox.push("a".to_owned());
        inbox.push("b".to_owned());
        inbox.push("c".to_owned());

        timeout(WAIT, inbox.notified()).await.expect("wakeup");
        assert_eq!(inbox.drain_all(), vec!["a", "b", "c"]);
    }

    #[test]
    fn queue_is_reusable_after_drain() {
        let inbox = Inbox::new();
        inbox.push("one".to_owned());
        assert_eq!(inbox.drain_all(), vec!["one"]);

        inbox.push("two".to_owned());
        assert_eq!(inbox.drain_all(), vec!["two"]);
    }
}
