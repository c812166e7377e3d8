//! Subscription Graph
//!
//! This module maintains the graph of which subscription caused which.
//!
//! # Overview
//!
//! The graph is a forest. Every subscription gets a `GraphRecord` when it
//! subscribes:
//!
//! - Roots are subscriptions started outside any other notification.
//! - Source children were subscribed synchronously inside their
//!   destination's subscribe logic (operator chaining).
//! - Merge children were subscribed while a value was being delivered to
//!   their destination (flattening operators).
//!
//! # Retention
//!
//! When a child unsubscribes it is not removed from its destination right
//! away. The removal ("flush") runs after the configured kept duration so
//! inspectors can still see recently finished subscriptions. Records
//! themselves are never deleted.

mod record;
mod builder;
mod scheduler;
mod snapshot;

pub use record::{ChildKind, GraphRecord};
pub use builder::GraphBuilder;
pub use scheduler::{FlushScheduler, FlushTask, ManualScheduler, TokioScheduler};
pub use snapshot::{GraphSnapshot, SnapshotEntry};
