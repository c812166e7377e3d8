//! Error types for the subscription graph.
//!
//! Every error here signals a broken hook-dispatch contract or a bad
//! configuration. None of them are recoverable: once a hook returns an
//! error the graph should be considered unreliable.

use thiserror::Error;

use crate::subscription::{NotificationKind, SubscriptionRef};

/// Errors raised by the graph builder and its collaborators.
#[derive(Debug, Error)]
pub enum Error {
    #[error("graph record already exists for subscription {0}")]
    DuplicateRecord(SubscriptionRef),

    #[error("notification stack underflow in {hook}")]
    StackUnderflow {
        hook: &'static str,
    },

    #[error("unbalanced notification in {hook}: expected {expected:?} for {subscription}, found {found:?} for {found_subscription}")]
    UnbalancedNotification {
        hook: &'static str,
        expected: NotificationKind,
        subscription: SubscriptionRef,
        found: NotificationKind,
        found_subscription: SubscriptionRef,
    },

    #[error("destination {destination} of subscription {subscription} has no graph record")]
    MissingDestinationRecord {
        destination: SubscriptionRef,
        subscription: SubscriptionRef,
    },

    #[error("no tokio runtime available to schedule flushes")]
    NoRuntime,

    #[error("invalid graph configuration: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
