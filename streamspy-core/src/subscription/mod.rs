//! Subscription Lifecycle
//!
//! Types describing what the host stream library tells us about its
//! subscriptions: their identities, the notifications currently in flight,
//! and the hook interface the host dispatcher drives.
//!
//! # Concepts
//!
//! ## Subscription refs
//!
//! A `SubscriptionRef` is an opaque identity for one subscription. Nothing
//! here reads its contents.
//!
//! ## Notifications
//!
//! A notification is either a subscribe or a delivered value (`next`).
//! While one is running, further subscribes may happen synchronously
//! inside it. The `NotificationStack` mirrors that nesting.
//!
//! ## Plugins
//!
//! A `Plugin` receives before/after hooks for every notification. The graph
//! builder is one such plugin.

mod reference;
mod notification;
mod plugin;

pub use reference::SubscriptionRef;
pub use notification::{Notification, NotificationKind, NotificationStack};
pub use plugin::Plugin;
