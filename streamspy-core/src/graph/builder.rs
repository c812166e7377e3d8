//! Graph Builder
//!
//! The graph builder is a plugin that reconstructs which subscription
//! caused which, using nothing but the order of lifecycle hooks.
//!
//! # How It Works
//!
//! 1. `before_subscribe` creates a record for the new subscription and
//!    reads the notification stack as it was before this subscribe:
//!    a. If a value is being delivered on top, the new subscription is a
//!       merge child of the emitting subscription.
//!    b. Otherwise the nearest subscribe entry is its destination and it
//!       becomes a source child.
//!    c. With neither, it is a root.
//!    Only then is the subscribe pushed, so a subscription never parents
//!    itself.
//!
//! 2. `before_next`/`after_next` and `after_subscribe` keep the stack
//!    balanced.
//!
//! 3. `after_unsubscribe` schedules the subscription's removal from its
//!    destination's lists once the retention period has passed. Until then
//!    the edge stays visible to inspectors.
//!
//! # Thread Safety
//!
//! Hooks must be serialized by the host. Deferred flushes may run on another
//! thread, so the record table is a `DashMap` shared with them through a
//! weak handle.

use std::any::Any;
use std::sync::{Arc, Weak};

use dashmap::DashMap;
use parking_lot::Mutex;

use super::record::{ChildKind, GraphRecord};
use super::scheduler::{FlushScheduler, TokioScheduler};
use super::snapshot::{GraphSnapshot, SnapshotEntry};
use crate::config::{GraphConfig, KEEP_FOREVER};
use crate::error::{Error, Result};
use crate::subscription::{NotificationKind, NotificationStack, Plugin, SubscriptionRef};

type RecordTable = DashMap<SubscriptionRef, GraphRecord>;

/// Builds the subscription graph from lifecycle hooks.
pub struct GraphBuilder {
    config: GraphConfig,

    /// Side table from subscription identity to its record.
    /// Records are never removed from it.
    records: Arc<RecordTable>,

    /// In-flight notifications. Owned by this builder alone.
    notifications: Mutex<NotificationStack>,

    scheduler: Arc<dyn FlushScheduler>,
}

impl GraphBuilder {
    /// Create a builder that defers flushes through `scheduler`.
    pub fn new(config: GraphConfig, scheduler: Arc<dyn FlushScheduler>) -> Self {
        Self {
            config,
            records: Arc::new(DashMap::new()),
            notifications: Mutex::new(NotificationStack::new()),
            scheduler,
        }
    }

    /// Create a builder that defers flushes on the current tokio runtime.
    pub fn with_tokio(config: GraphConfig) -> Result<Self> {
        let scheduler = TokioScheduler::current()?;
        Ok(Self::new(config, Arc::new(scheduler)))
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Copy of the record for `subscription`, if it was ever subscribed.
    pub fn graph_ref(&self, subscription: SubscriptionRef) -> Option<GraphRecord> {
        self.records.get(&subscription).map(|record| record.value().clone())
    }

    /// Borrow the live record for `subscription` for the duration of `f`.
    ///
    /// `f` must not call back into the builder.
    pub fn with_graph_ref<R>(
        &self,
        subscription: SubscriptionRef,
        f: impl FnOnce(&GraphRecord) -> R,
    ) -> Option<R> {
        self.records.get(&subscription).map(|record| f(record.value()))
    }

    /// Copy every record.
    pub fn snapshot(&self) -> GraphSnapshot {
        let entries = self
            .records
            .iter()
            .map(|entry| SnapshotEntry {
                subscription: *entry.key(),
                record: entry.value().clone(),
            })
            .collect();
        GraphSnapshot::from_entries(entries)
    }

    /// Number of subscriptions that have a record.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Number of notifications currently in flight.
    ///
    /// Zero whenever no subscribe or delivery is running.
    pub fn in_flight(&self) -> usize {
        self.notifications.lock().len()
    }

    fn attach(&self, subscription: SubscriptionRef) -> Result<()> {
        if self.records.contains_key(&subscription) {
            tracing::warn!(%subscription, "subscription subscribed twice");
            return Err(Error::DuplicateRecord(subscription));
        }

        let mut notifications = self.notifications.lock();

        let record = match classify(&notifications) {
            None => {
                tracing::debug!(%subscription, "attached root");
                GraphRecord::root()
            }
            Some((destination, kind)) => {
                let Some(mut destination_record) = self.records.get_mut(&destination) else {
                    tracing::warn!(%subscription, %destination, "destination has no graph record");
                    return Err(Error::MissingDestinationRecord {
                        destination,
                        subscription,
                    });
                };
                destination_record.add_child(kind, subscription);
                let root = destination_record.root_destination();
                // Release the shard before inserting into the table again.
                drop(destination_record);

                tracing::debug!(%subscription, %destination, ?kind, "attached child");
                GraphRecord::child_of(destination, root)
            }
        };

        self.records.insert(subscription, record);
        notifications.push(NotificationKind::Subscribe, subscription);
        Ok(())
    }

    /// Pop the stack and check the entry belongs to the calling hook.
    fn pop_matching(
        &self,
        hook: &'static str,
        expected: NotificationKind,
        subscription: SubscriptionRef,
    ) -> Result<()> {
        let popped = match self.notifications.lock().pop(hook) {
            Ok(popped) => popped,
            Err(err) => {
                tracing::warn!(%subscription, hook, "notification stack underflow");
                return Err(err);
            }
        };

        if popped.kind != expected || popped.subscription != subscription {
            tracing::warn!(
                %subscription,
                hook,
                found = %popped.subscription,
                "notification hooks out of order"
            );
            return Err(Error::UnbalancedNotification {
                hook,
                expected,
                subscription,
                found: popped.kind,
                found_subscription: popped.subscription,
            });
        }
        Ok(())
    }

    fn schedule_flush(&self, destination: SubscriptionRef, subscription: SubscriptionRef) {
        let kept = self.config.kept_duration;

        if kept.is_zero() {
            flush(&self.records, destination, subscription);
        } else if kept == KEEP_FOREVER {
            tracing::trace!(%subscription, %destination, "edge kept forever");
        } else {
            let records: Weak<RecordTable> = Arc::downgrade(&self.records);
            self.scheduler.schedule(
                kept,
                Box::new(move || {
                    if let Some(records) = records.upgrade() {
                        flush(&records, destination, subscription);
                    }
                }),
            );
            tracing::trace!(%subscription, %destination, ?kept, "flush scheduled");
        }
    }
}

/// Decide the destination of a subscribe from the stack beneath it.
fn classify(notifications: &NotificationStack) -> Option<(SubscriptionRef, ChildKind)> {
    match (notifications.peek_kind(), notifications.peek_ref()) {
        (Some(NotificationKind::Next), Some(emitting)) => Some((emitting, ChildKind::Merge)),
        _ => notifications
            .find_last_subscribe_ref()
            .map(|subscribing| (subscribing, ChildKind::Source)),
    }
}

/// Detach `subscription` from its destination's lists.
///
/// The destination record is looked up now rather than when the flush was
/// scheduled. Finding nothing to remove is not an error.
fn flush(records: &RecordTable, destination: SubscriptionRef, subscription: SubscriptionRef) {
    match records.get_mut(&destination) {
        Some(mut record) => match record.flush_child(subscription) {
            Some(kind) => tracing::debug!(%subscription, %destination, ?kind, "flushed edge"),
            None => tracing::trace!(%subscription, %destination, "edge already flushed"),
        },
        None => tracing::trace!(%subscription, %destination, "destination record gone"),
    }
}

impl Plugin for GraphBuilder {
    fn before_subscribe(&self, subscription: SubscriptionRef) -> Result<()> {
        self.attach(subscription)
    }

    fn after_subscribe(&self, subscription: SubscriptionRef) -> Result<()> {
        self.pop_matching("after_subscribe", NotificationKind::Subscribe, subscription)
    }

    fn before_next(&self, subscription: SubscriptionRef, _value: &dyn Any) -> Result<()> {
        self.notifications
            .lock()
            .push(NotificationKind::Next, subscription);
        Ok(())
    }

    fn after_next(&self, subscription: SubscriptionRef, _value: &dyn Any) -> Result<()> {
        self.pop_matching("after_next", NotificationKind::Next, subscription)
    }

    fn after_unsubscribe(&self, subscription: SubscriptionRef) -> Result<()> {
        let destination = self
            .records
            .get(&subscription)
            .and_then(|record| record.destination());

        if let Some(destination) = destination {
            self.schedule_flush(destination, subscription);
        }
        Ok(())
    }
}
