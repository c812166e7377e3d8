//! Point-in-time copies of the graph for inspectors.

use serde::Serialize;

use super::record::GraphRecord;
use crate::subscription::SubscriptionRef;

/// One subscription and its record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotEntry {
    pub subscription: SubscriptionRef,
    #[serde(flatten)]
    pub record: GraphRecord,
}

/// A copy of every record, ordered by subscription ref.
///
/// The live graph keeps changing as hooks and flushes run; a snapshot does
/// not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GraphSnapshot {
    entries: Vec<SnapshotEntry>,
}

impl GraphSnapshot {
    pub(crate) fn from_entries(mut entries: Vec<SnapshotEntry>) -> Self {
        entries.sort_by_key(|entry| entry.subscription);
        Self { entries }
    }

    /// Record of `subscription` at the time of the snapshot.
    pub fn get(&self, subscription: SubscriptionRef) -> Option<&GraphRecord> {
        self.entries
            .binary_search_by_key(&subscription, |entry| entry.subscription)
            .ok()
            .map(|index| &self.entries[index].record)
    }

    /// Subscriptions with no destination.
    pub fn roots(&self) -> impl Iterator<Item = SubscriptionRef> + '_ {
        self.entries
            .iter()
            .filter(|entry| entry.record.is_root())
            .map(|entry| entry.subscription)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SnapshotEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
