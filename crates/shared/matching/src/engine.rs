use std::sync::Arc;

use log::debug;
use meridian_clock::SequenceClock;
use meridian_core::{
    Currency, MarketEvent, Order, OrderError, OrderId, OrderIdSequence, OrderRequest, OrderStatus,
    Trade,
};
use meridian_notify::EventBus;
use meridian_ports::{BookError, Clock, MatchPolicy, MatchingResult, NotificationSink};
use rust_decimal::Decimal;

use crate::lifecycle::{OrderFactory, OrderLifecycle};
use crate::orderbook::Orderbook;
use crate::policy::AllowAll;
use crate::price_time::compute_traded_amounts;

/// Collaborators injected into a `MatchingEngine`
#[derive(Clone)]
pub struct EngineConfig {
    /// Source of order ids. Share one sequence between engines to keep ids
    /// unique across them.
    pub ids: Arc<OrderIdSequence>,
    /// Timestamp source for requests that carry none
    pub clock: Arc<dyn Clock>,
    pub policy: Arc<dyn MatchPolicy>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ids: Arc::new(OrderIdSequence::new()),
            clock: Arc::new(SequenceClock::new()),
            policy: Arc::new(AllowAll),
        }
    }
}

impl std::fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineConfig")
            .field("next_id", &self.ids.peek())
            .field("clock", &self.clock.name())
            .field("policy", &self.policy.name())
            .finish()
    }
}

/// Outcome of submitting one order
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    /// Final state of the submitted order: filled, or resting in the book
    pub order: Order,
    /// Executions in the order they happened
    pub trades: Vec<Trade>,
}

/// Price-time priority matching engine
///
/// An incoming order is executed against the cheapest compatible resting
/// order, oldest first among equal prices. Trades execute at the resting
/// order's price. A partially filled incoming order is processed again until
/// it is either filled or no compatible order is left, in which case it
/// rests in the book.
///
/// Every step reports to the engine's `NotificationSink`. With the default
/// delivery policy a failing subscriber aborts the step that fired it.
pub struct MatchingEngine<S: NotificationSink = EventBus> {
    book: Orderbook,
    factory: OrderFactory,
    policy: Arc<dyn MatchPolicy>,
    sink: S,
    trades_executed: u64,
}

impl Default for MatchingEngine<EventBus> {
    fn default() -> Self {
        Self::new(EventBus::new())
    }
}

impl<S: NotificationSink> MatchingEngine<S> {
    pub fn new(sink: S) -> Self {
        Self::with_config(sink, EngineConfig::default())
    }

    pub fn with_config(sink: S, config: EngineConfig) -> Self {
        Self {
            book: Orderbook::new(),
            factory: OrderFactory::new(config.ids, config.clock),
            policy: config.policy,
            sink,
            trades_executed: 0,
        }
    }

    /// Build a new order with the next id, firing `NewOrder`
    pub fn create_order(&mut self, request: OrderRequest) -> MatchingResult<Order> {
        self.factory.create(request, &mut self.sink)
    }

    pub fn create_sell_order(
        &mut self,
        amount_for_sale: Decimal,
        price: Decimal,
        currency_for_sale: impl Into<Currency>,
        currency_desired: impl Into<Currency>,
    ) -> MatchingResult<Order> {
        self.factory.create_sell_order(
            amount_for_sale,
            price,
            currency_for_sale,
            currency_desired,
            &mut self.sink,
        )
    }

    pub fn create_buy_order(
        &mut self,
        amount_desired: Decimal,
        price: Decimal,
        currency_desired: impl Into<Currency>,
        currency_for_sale: impl Into<Currency>,
    ) -> MatchingResult<Order> {
        self.factory.create_buy_order(
            amount_desired,
            price,
            currency_desired,
            currency_for_sale,
            &mut self.sink,
        )
    }

    /// Match `order` against the book and list whatever is left
    ///
    /// Returns the order's final state.
    pub fn add_order(&mut self, order: Order) -> MatchingResult<Order> {
        self.submit(order).map(|submission| submission.order)
    }

    /// Like `add_order`, also returning the trades that were executed
    ///
    /// Only open orders that are not already listed are accepted. Anything
    /// else is refused before `OrderArrival` fires.
    pub fn submit(&mut self, order: Order) -> MatchingResult<Submission> {
        if order.status().is_terminal() {
            return Err(OrderError::InvalidOrder(format!(
                "order {} is {} and can't be submitted",
                order.id(),
                order.status()
            ))
            .into());
        }
        if self.book.contains(order.id()) {
            return Err(BookError::DuplicateListing(order.id()).into());
        }

        let mut trades = Vec::new();
        let mut incoming = order;

        // Each execution strictly reduces the amount desired, so this ends
        // after at most one pass per resting order.
        loop {
            self.sink
                .notify(&MarketEvent::OrderArrival { order: &incoming })?;
            debug!("Order arrival: {}", incoming);

            let Some(resting_id) = self.find_best_match(&incoming).map(Order::id) else {
                debug!("No match for {}, listing", incoming.id());
                let listed = incoming.clone();
                self.book.list(incoming, &mut self.sink)?;
                return Ok(Submission {
                    order: listed,
                    trades,
                });
            };

            let trade = self.execute_orders(resting_id, &mut incoming)?;
            trades.push(trade);

            if incoming.status() == OrderStatus::Filled {
                return Ok(Submission {
                    order: incoming,
                    trades,
                });
            }
        }
    }

    /// Best resting counter-order for `incoming`, if any
    pub fn find_best_match(&self, incoming: &Order) -> Option<&Order> {
        self.book
            .orders_for(incoming.currency_desired(), incoming.currency_for_sale())
            .find(|resting| resting.matches_with(incoming) && self.policy.permits(resting, incoming))
    }

    /// Execute `incoming` against the listed order `resting_id`
    ///
    /// Both updates are planned and checked before the `Trade` event fires,
    /// so a failed post-condition leaves both orders and the book untouched.
    fn execute_orders(&mut self, resting_id: OrderId, incoming: &mut Order) -> MatchingResult<Trade> {
        let resting = self
            .book
            .get(resting_id)
            .ok_or(BookError::NotFound(resting_id))?;

        let amounts = compute_traded_amounts(resting, incoming)?;

        let resting_update = resting.plan_update(amounts.to_resting, amounts.to_incoming)?;
        let incoming_update = incoming.plan_update(amounts.to_incoming, amounts.to_resting)?;
        resting.check_transition(resting_update.resulting_status())?;
        incoming.check_transition(incoming_update.resulting_status())?;

        self.sink.notify(&MarketEvent::Trade {
            resting,
            incoming: &*incoming,
            to_resting: amounts.to_resting,
            to_incoming: amounts.to_incoming,
        })?;

        let trade = Trade::new(
            self.trades_executed,
            resting,
            incoming,
            amounts.to_resting,
            amounts.to_incoming,
        );

        let sink = &mut self.sink;
        self.book
            .update_listed(resting_id, |order| order.commit_update(&resting_update, sink))?;

        if resting_update.resulting_status() == OrderStatus::Filled {
            self.book.delist(resting_id, &mut self.sink)?;
        }

        incoming.commit_update(&incoming_update, &mut self.sink)?;

        // Counted once both sides are committed
        self.trades_executed += 1;
        debug!(
            "Trade #{}: {} {} to {}, {} {} to {}",
            trade.sequence,
            trade.amount_to_resting,
            trade.currency_to_resting,
            resting_id,
            trade.amount_to_incoming,
            trade.currency_to_incoming,
            incoming.id()
        );

        Ok(trade)
    }

    pub fn orderbook(&self) -> &Orderbook {
        &self.book
    }

    pub fn policy(&self) -> &dyn MatchPolicy {
        self.policy.as_ref()
    }

    pub fn factory(&self) -> &OrderFactory {
        &self.factory
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Number of trades executed since the engine was created
    pub fn trades_executed(&self) -> u64 {
        self.trades_executed
    }
}

impl<S: NotificationSink> std::fmt::Debug for MatchingEngine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchingEngine")
            .field("book", &self.book)
            .field("factory", &self.factory)
            .field("policy", &self.policy.name())
            .field("trades_executed", &self.trades_executed)
            .finish()
    }
}
