//! Graph Records
//!
//! This module defines the per-subscription record that places a
//! subscription in the graph.

use serde::Serialize;

use crate::subscription::SubscriptionRef;

/// How a child subscription relates to its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChildKind {
    /// Created by direct synchronous chaining inside the destination's
    /// subscribe logic.
    Source,

    /// Created while a value was being delivered to the destination, the
    /// signature of a flattening operator.
    Merge,
}

/// The position of one subscription in the graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphRecord {
    /// The subscription that caused this one to be created.
    /// Unset for roots. Never changes after creation.
    destination: Option<SubscriptionRef>,

    /// The top-most ancestor, resolved once at creation.
    root_destination: Option<SubscriptionRef>,

    /// Children created by direct chaining, in subscribe order.
    sources: Vec<SubscriptionRef>,

    /// Number of entries ever removed from `sources`.
    sources_flushed: usize,

    /// Children created during value delivery, in subscribe order.
    merges: Vec<SubscriptionRef>,

    /// Number of entries ever removed from `merges`.
    merges_flushed: usize,
}

impl GraphRecord {
    /// Create a record for a root subscription.
    pub fn root() -> Self {
        Self::default()
    }

    /// Create a record for a child of `destination`.
    ///
    /// `destination_root` is the destination's own `root_destination`.
    pub fn child_of(destination: SubscriptionRef, destination_root: Option<SubscriptionRef>) -> Self {
        Self {
            destination: Some(destination),
            root_destination: Some(destination_root.unwrap_or(destination)),
            ..Self::default()
        }
    }

    pub fn destination(&self) -> Option<SubscriptionRef> {
        self.destination
    }

    pub fn root_destination(&self) -> Option<SubscriptionRef> {
        self.root_destination
    }

    pub fn is_root(&self) -> bool {
        self.destination.is_none()
    }

    pub fn sources(&self) -> &[SubscriptionRef] {
        &self.sources
    }

    pub fn sources_flushed(&self) -> usize {
        self.sources_flushed
    }

    pub fn merges(&self) -> &[SubscriptionRef] {
        &self.merges
    }

    pub fn merges_flushed(&self) -> usize {
        self.merges_flushed
    }

    /// Which list `child` currently sits in, if any.
    pub fn child_kind(&self, child: SubscriptionRef) -> Option<ChildKind> {
        if self.sources.contains(&child) {
            Some(ChildKind::Source)
        } else if self.merges.contains(&child) {
            Some(ChildKind::Merge)
        } else {
            None
        }
    }

    /// Append a child to the list matching `kind`.
    pub(crate) fn add_child(&mut self, kind: ChildKind, child: SubscriptionRef) {
        debug_assert!(
            self.child_kind(child).is_none(),
            "{child} attached to the same destination twice"
        );
        match kind {
            ChildKind::Source => self.sources.push(child),
            ChildKind::Merge => self.merges.push(child),
        }
    }

    /// Remove `child` from this record's lists.
    ///
    /// Both lists are checked independently and each removal bumps its own
    /// flush counter. Returns the list the child was found in, or `None`
    /// when it was already gone.
    pub fn flush_child(&mut self, child: SubscriptionRef) -> Option<ChildKind> {
        let mut flushed = None;

        if let Some(index) = self.merges.iter().position(|m| *m == child) {
            self.merges.remove(index);
            self.merges_flushed += 1;
            flushed = Some(ChildKind::Merge);
        }

        if let Some(index) = self.sources.iter().position(|s| *s == child) {
            self.sources.remove(index);
            self.sources_flushed += 1;
            flushed = Some(ChildKind::Source);
        }

        flushed
    }
}
