use std::sync::Arc;

use log::debug;
use meridian_core::{
    Amount, AmountUpdate, Currency, MarketEvent, Order, OrderIdSequence, OrderRequest,
    OrderStatus,
};
use meridian_ports::{Clock, MatchingResult, NotificationSink};
use rust_decimal::Decimal;

/// Order mutations that report to a notification sink
///
/// Every mutation is checked before its first event fires, so an invalid
/// request leaves both the order and the sink untouched.
pub trait OrderLifecycle {
    /// Receive `amount_received` of the desired currency in exchange for
    /// `amount_spent` of the currency for sale, returning the updated order
    fn update_order<S>(
        &mut self,
        amount_received: Amount,
        amount_spent: Amount,
        sink: &mut S,
    ) -> MatchingResult<&Self>
    where
        S: NotificationSink + ?Sized;

    /// Apply an update planned with `Order::plan_update`
    fn commit_update<S>(&mut self, update: &AmountUpdate, sink: &mut S) -> MatchingResult<()>
    where
        S: NotificationSink + ?Sized;

    /// Move to `status`, returning whether anything changed
    fn set_status<S>(&mut self, status: OrderStatus, sink: &mut S) -> MatchingResult<bool>
    where
        S: NotificationSink + ?Sized;
}

impl OrderLifecycle for Order {
    fn update_order<S>(
        &mut self,
        amount_received: Amount,
        amount_spent: Amount,
        sink: &mut S,
    ) -> MatchingResult<&Self>
    where
        S: NotificationSink + ?Sized,
    {
        let update = self.plan_update(amount_received, amount_spent)?;
        self.commit_update(&update, sink)?;
        Ok(self)
    }

    fn commit_update<S>(&mut self, update: &AmountUpdate, sink: &mut S) -> MatchingResult<()>
    where
        S: NotificationSink + ?Sized,
    {
        self.check_transition(update.resulting_status())?;

        sink.notify(&MarketEvent::PendingAmountUpdate {
            order: self,
            new_amount_for_sale: update.new_amount_for_sale,
            new_amount_desired: update.new_amount_desired,
        })?;

        self.apply_update(update)?;
        self.set_status(update.resulting_status(), sink)?;

        sink.notify(&MarketEvent::UpdatedOrder {
            order: self,
            amount_received: update.amount_received,
            amount_spent: update.amount_spent,
        })?;

        Ok(())
    }

    fn set_status<S>(&mut self, status: OrderStatus, sink: &mut S) -> MatchingResult<bool>
    where
        S: NotificationSink + ?Sized,
    {
        if self.status() == status {
            return Ok(false);
        }

        self.check_transition(status)?;
        sink.notify(&MarketEvent::StatusUpdate {
            order: self,
            status,
        })?;

        Ok(self.transition(status)?)
    }
}

/// Builds validated orders with engine-assigned ids and timestamps
///
/// Ids come from a shared sequence and are only drawn once the request has
/// passed validation.
#[derive(Clone)]
pub struct OrderFactory {
    ids: Arc<OrderIdSequence>,
    clock: Arc<dyn Clock>,
}

impl OrderFactory {
    pub fn new(ids: Arc<OrderIdSequence>, clock: Arc<dyn Clock>) -> Self {
        Self { ids, clock }
    }

    pub fn ids(&self) -> &Arc<OrderIdSequence> {
        &self.ids
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    /// Validate the request and build a `New` order, firing `NewOrder`
    pub fn create<S>(&self, request: OrderRequest, sink: &mut S) -> MatchingResult<Order>
    where
        S: NotificationSink + ?Sized,
    {
        let request = request.validate()?;
        let timestamp = match request.timestamp() {
            Some(timestamp) => timestamp,
            None => self.clock.now(),
        };

        let order = Order::new(self.ids.next_id(), timestamp, request);
        debug!("Created order {}", order);

        sink.notify(&MarketEvent::NewOrder { order: &order })?;
        Ok(order)
    }

    /// Sell `amount_for_sale` at `price` units of the desired currency each
    pub fn create_sell_order<S>(
        &self,
        amount_for_sale: Decimal,
        price: Decimal,
        currency_for_sale: impl Into<Currency>,
        currency_desired: impl Into<Currency>,
        sink: &mut S,
    ) -> MatchingResult<Order>
    where
        S: NotificationSink + ?Sized,
    {
        let request = OrderRequest::sell(amount_for_sale, price, currency_for_sale, currency_desired)?;
        self.create(request, sink)
    }

    /// Buy `amount_desired` at `price` units of the currency for sale each
    pub fn create_buy_order<S>(
        &self,
        amount_desired: Decimal,
        price: Decimal,
        currency_desired: impl Into<Currency>,
        currency_for_sale: impl Into<Currency>,
        sink: &mut S,
    ) -> MatchingResult<Order>
    where
        S: NotificationSink + ?Sized,
    {
        let request = OrderRequest::buy(amount_desired, price, currency_desired, currency_for_sale)?;
        self.create(request, sink)
    }
}

impl std::fmt::Debug for OrderFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderFactory")
            .field("next_id", &self.ids.peek())
            .field("clock", &self.clock.name())
            .finish()
    }
}
