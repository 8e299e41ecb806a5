use log::{debug, info};
use meridian_core::MarketEvent;
use meridian_ports::{NotificationSink, SinkError};

/// Sink that renders every event as a log record
///
/// Arrivals, listings and trades go to `info`, amount and status changes
/// to `debug`. Never fails.
#[derive(Debug, Default)]
pub struct LoggingSink;

impl LoggingSink {
    pub fn new() -> Self {
        Self
    }
}

impl NotificationSink for LoggingSink {
    fn notify(&mut self, event: &MarketEvent<'_>) -> Result<(), SinkError> {
        match *event {
            MarketEvent::NewOrder { order } => {
                info!(
                    "New Order {} created: {} {} offered, {} {} desired @ {:.4} ({:.4})",
                    order.id(),
                    order.amount_for_sale(),
                    order.currency_for_sale(),
                    order.amount_desired(),
                    order.currency_desired(),
                    order.unit_price(),
                    order.unit_price_inverse()
                );
            }
            MarketEvent::PendingAmountUpdate {
                order,
                new_amount_for_sale,
                new_amount_desired,
            } => {
                debug!(
                    "Updating Order {}: {} => {} {} offered, {} => {} {} desired",
                    order.id(),
                    order.amount_for_sale(),
                    new_amount_for_sale,
                    order.currency_for_sale(),
                    order.amount_desired(),
                    new_amount_desired,
                    order.currency_desired()
                );
            }
            MarketEvent::UpdatedOrder { order, .. } => {
                debug!(
                    "{} {}: {}/{} {}",
                    order.id(),
                    order.status(),
                    order.received_amount(),
                    order.initial_amount_desired(),
                    order.currency_desired()
                );
            }
            MarketEvent::StatusUpdate { order, status } => {
                debug!("Set status of Order {}: {}", order.id(), status);
            }
            MarketEvent::OrderArrival { order } => {
                info!("{} enqueued", order.id());
            }
            MarketEvent::Trade {
                resting,
                incoming,
                to_resting,
                to_incoming,
            } => {
                info!(
                    "Executed {}, {}: {} {} traded for {} {} @ {:.4}",
                    incoming.id(),
                    resting.id(),
                    to_incoming,
                    incoming.currency_desired(),
                    to_resting,
                    resting.currency_desired(),
                    to_resting as f64 / to_incoming as f64
                );
            }
            MarketEvent::Listing { order } => {
                info!("{} added to the orderbook", order.id());
            }
            MarketEvent::Delisting { order } => {
                info!("{} removed from the orderbook", order.id());
            }
        }

        Ok(())
    }
}

/// Sink that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&mut self, _event: &MarketEvent<'_>) -> Result<(), SinkError> {
        Ok(())
    }
}
