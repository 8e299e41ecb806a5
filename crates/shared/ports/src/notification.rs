use meridian_core::MarketEvent;

use crate::error::SinkError;

/// Port for lifecycle and trade notifications
///
/// Delivery is synchronous and runs on the caller's stack. An error returned
/// here aborts the operation that raised the event.
pub trait NotificationSink {
    /// Deliver one event
    fn notify(&mut self, event: &MarketEvent<'_>) -> Result<(), SinkError>;
}

impl<S: NotificationSink + ?Sized> NotificationSink for &mut S {
    fn notify(&mut self, event: &MarketEvent<'_>) -> Result<(), SinkError> {
        (**self).notify(event)
    }
}

impl<S: NotificationSink + ?Sized> NotificationSink for Box<S> {
    fn notify(&mut self, event: &MarketEvent<'_>) -> Result<(), SinkError> {
        (**self).notify(event)
    }
}
