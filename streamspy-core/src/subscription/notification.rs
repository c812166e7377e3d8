//! Notification Stack
//!
//! The notification stack records which notifications are in flight on the
//! current synchronous call chain. The host brackets every subscribe and
//! every delivered value with a before/after hook pair; the graph builder
//! pushes on the "before" hook and pops on the "after" hook.
//!
//! # Why a stack
//!
//! The host library never tells us who caused a subscription. Reading the
//! stack at subscribe time answers that: the entry on top is whatever
//! synchronous work was running when the new subscription started.
//!
//! Nesting is usually shallow, so the entries live inline in a `SmallVec`
//! and only spill to the heap for deep operator chains.

use serde::Serialize;
use smallvec::SmallVec;

use super::SubscriptionRef;
use crate::error::{Error, Result};

/// The kind of notification an entry brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// A subscription's subscribe logic is running.
    Subscribe,

    /// A value is being delivered to a subscription.
    Next,
}

/// An entry on the notification stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notification {
    /// What is in flight.
    pub kind: NotificationKind,
    /// The subscription it is in flight for.
    pub subscription: SubscriptionRef,
}

/// LIFO record of in-flight notifications.
#[derive(Debug, Default)]
pub struct NotificationStack {
    entries: SmallVec<[Notification; 16]>,
}

impl NotificationStack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self {
            entries: SmallVec::new(),
        }
    }

    /// Push a notification onto the top of the stack.
    pub fn push(&mut self, kind: NotificationKind, subscription: SubscriptionRef) {
        tracing::trace!(?kind, %subscription, depth = self.entries.len(), "push notification");
        self.entries.push(Notification { kind, subscription });
    }

    /// Remove the top entry.
    ///
    /// Popping an empty stack means a before/after hook pair was broken,
    /// so it is reported as [`Error::StackUnderflow`].
    pub fn pop(&mut self, hook: &'static str) -> Result<Notification> {
        let popped = self.entries.pop().ok_or(Error::StackUnderflow { hook })?;
        tracing::trace!(kind = ?popped.kind, subscription = %popped.subscription, "pop notification");
        Ok(popped)
    }

    /// Kind of the top entry, if any.
    pub fn peek_kind(&self) -> Option<NotificationKind> {
        self.entries.last().map(|entry| entry.kind)
    }

    /// Subscription of the top entry, if any.
    pub fn peek_ref(&self) -> Option<SubscriptionRef> {
        self.entries.last().map(|entry| entry.subscription)
    }

    /// Scan from the top for the nearest subscribe entry and return its ref.
    pub fn find_last_subscribe_ref(&self) -> Option<SubscriptionRef> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.kind == NotificationKind::Subscribe)
            .map(|entry| entry.subscription)
    }

    /// Number of in-flight notifications.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is in flight.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries from bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_peek() {
        let mut stack = NotificationStack::new();
        let a = SubscriptionRef::new();

        assert!(stack.is_empty());
        assert!(stack.peek_kind().is_none());
        assert!(stack.peek_ref().is_none());

        stack.push(NotificationKind::Next, a);

        assert_eq!(stack.len(), 1);
        assert_eq!(stack.peek_kind(), Some(NotificationKind::Next));
        assert_eq!(stack.peek_ref(), Some(a));
    }

    #[test]
    fn pop_is_lifo() {
        let mut stack = NotificationStack::new();
        let a = SubscriptionRef::new();
        let b = SubscriptionRef::new();

        stack.push(NotificationKind::Subscribe, a);
        stack.push(NotificationKind::Next, b);

        let top = stack.pop("test").unwrap();
        assert_eq!(top.subscription, b);
        assert_eq!(top.kind, NotificationKind::Next);
        assert_eq!(stack.peek_ref(), Some(a));

        stack.pop("test").unwrap();
        assert!(stack.is_empty());
    }

    #[test]
    fn pop_on_empty_underflows() {
        let mut stack = NotificationStack::new();
        let err = stack.pop("after_next").unwrap_err();
        assert!(matches!(err, Error::StackUnderflow { hook: "after_next" }));
    }

    #[test]
    fn find_last_subscribe_skips_next_entries() {
        let mut stack = NotificationStack::new();
        let outer = SubscriptionRef::new();
        let inner = SubscriptionRef::new();
        let emitting = SubscriptionRef::new();

        assert!(stack.find_last_subscribe_ref().is_none());

        stack.push(NotificationKind::Subscribe, outer);
        stack.push(NotificationKind::Subscribe, inner);
        stack.push(NotificationKind::Next, emitting);

        assert_eq!(stack.find_last_subscribe_ref(), Some(inner));
    }

    #[test]
    fn find_last_subscribe_with_only_next_entries() {
        let mut stack = NotificationStack::new();
        stack.push(NotificationKind::Next, SubscriptionRef::new());
        stack.push(NotificationKind::Next, SubscriptionRef::new());

        assert!(stack.find_last_subscribe_ref().is_none());
    }

    #[test]
    fn deep_nesting_spills_to_heap() {
        let mut stack = NotificationStack::new();
        let refs: Vec<_> = (0..40).map(|_| SubscriptionRef::new()).collect();
        for r in &refs {
            stack.push(NotificationKind::Subscribe, *r);
        }

        assert_eq!(stack.len(), 40);
        assert_eq!(stack.iter().next().map(|n| n.subscription), Some(refs[0]));
        assert_eq!(stack.peek_ref(), Some(refs[39]));
    }
}
