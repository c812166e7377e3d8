//! Subscription identity.
//!
//! A `SubscriptionRef` stands in for one live subscription of the host
//! stream library. The graph never looks inside it; it is only used as a
//! map key and compared for identity.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Opaque identity of one subscription instance.
///
/// Refs minted with [`SubscriptionRef::new`] are unique for the lifetime of
/// the process. Hosts that already carry their own identifiers can adopt
/// them with `From<u64>` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionRef(u64);

impl SubscriptionRef {
    /// Generate a new unique subscription ref.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw identifier.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for SubscriptionRef {
    fn default() -> Self {
        Self::new()
    }
}

impl From<u64> for SubscriptionRef {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for SubscriptionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
