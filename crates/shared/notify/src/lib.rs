//! Meridian Notification Sinks
//!
//! Implementations of the `NotificationSink` port:
//!
//! - `EventBus`: per-kind subscriber lists, synchronous delivery in
//!   registration order, configurable failure handling
//! - `LoggingSink`: one log record per event
//! - `NullSink`: discards everything

mod bus;
mod logging;

pub use bus::{DeliveryPolicy, EventBus, Handler, SubscriptionId};
pub use logging::{LoggingSink, NullSink};

// Re-export the trait from ports for convenience
pub use meridian_ports::{NotificationSink, SinkError};
