//! Plugin Hooks
//!
//! The host dispatcher calls these hooks around every lifecycle event of a
//! subscription. Hooks come in before/after pairs that bracket exactly one
//! synchronous operation, and `after_unsubscribe` fires exactly once per
//! subscription.
//!
//! Every hook has a no-op default so a plugin only implements the events it
//! cares about.

use std::any::Any;

use super::SubscriptionRef;
use crate::error::Result;

/// Lifecycle hooks invoked by the host dispatcher.
///
/// Delivered values and errors are passed as `&dyn Any`; plugins that do
/// not inspect them can ignore the argument.
pub trait Plugin: Send + Sync {
    /// A subscription is about to run its subscribe logic.
    fn before_subscribe(&self, _subscription: SubscriptionRef) -> Result<()> {
        Ok(())
    }

    /// The subscribe logic started by `before_subscribe` returned.
    fn after_subscribe(&self, _subscription: SubscriptionRef) -> Result<()> {
        Ok(())
    }

    /// A value is about to be delivered to a subscription.
    fn before_next(&self, _subscription: SubscriptionRef, _value: &dyn Any) -> Result<()> {
        Ok(())
    }

    /// Delivery of the value announced by `before_next` finished.
    fn after_next(&self, _subscription: SubscriptionRef, _value: &dyn Any) -> Result<()> {
        Ok(())
    }

    fn before_complete(&self, _subscription: SubscriptionRef) -> Result<()> {
        Ok(())
    }

    fn after_complete(&self, _subscription: SubscriptionRef) -> Result<()> {
        Ok(())
    }

    fn before_error(&self, _subscription: SubscriptionRef, _error: &dyn Any) -> Result<()> {
        Ok(())
    }

    fn after_error(&self, _subscription: SubscriptionRef, _error: &dyn Any) -> Result<()> {
        Ok(())
    }

    fn before_unsubscribe(&self, _subscription: SubscriptionRef) -> Result<()> {
        Ok(())
    }

    /// The subscription was torn down. Fires once per subscription.
    fn after_unsubscribe(&self, _subscription: SubscriptionRef) -> Result<()> {
        Ok(())
    }
}
