//! Streamspy Core
//!
//! This crate builds a live graph of stream subscriptions for the streamspy
//! debugger. It is driven by lifecycle hooks from the host stream library
//! and answers, for every subscription:
//!
//! - which subscription caused it to be created (its destination)
//! - the top-most ancestor of that chain (its root destination)
//! - which children it created by chaining (sources) or while delivering
//!   values (merges)
//!
//! Children of finished subscriptions are flushed from the graph after a
//! configurable retention period, so recently completed work stays
//! inspectable without the graph growing without bound.
//!
//! # Architecture
//!
//! - `subscription`: subscription identities, the notification stack and
//!   the plugin hook interface
//! - `graph`: graph records, the graph builder and flush scheduling
//! - `config`: retention configuration
//! - `error`: error types
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use streamspy_core::config::GraphConfig;
//! use streamspy_core::graph::{GraphBuilder, ManualScheduler};
//! use streamspy_core::subscription::{Plugin, SubscriptionRef};
//!
//! let scheduler = Arc::new(ManualScheduler::new());
//! let config = GraphConfig::new().with_kept_duration(Duration::from_millis(100));
//! let graph = GraphBuilder::new(config, scheduler.clone());
//!
//! let root = SubscriptionRef::new();
//! let source = SubscriptionRef::new();
//!
//! graph.before_subscribe(root)?;
//! graph.before_subscribe(source)?;
//! graph.after_subscribe(source)?;
//! graph.after_subscribe(root)?;
//!
//! assert_eq!(graph.graph_ref(root).unwrap().sources(), &[source]);
//!
//! graph.after_unsubscribe(source)?;
//! scheduler.advance(Duration::from_millis(100));
//!
//! assert!(graph.graph_ref(root).unwrap().sources().is_empty());
//! # Ok::<(), streamspy_core::error::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod subscription;

pub use config::GraphConfig;
pub use error::{Error, Result};
pub use graph::{GraphBuilder, GraphRecord};
pub use subscription::{Plugin, SubscriptionRef};
