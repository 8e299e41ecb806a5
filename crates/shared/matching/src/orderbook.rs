use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use meridian_core::{CurrencyPair, MarketEvent, Order, OrderId, Price, Timestamp};
use meridian_ports::{BookError, MatchingResult, NotificationSink};

/// Priority key for the per-pair index
///
/// Cheapest unit price first, then oldest timestamp, then lowest id, so two
/// distinct orders never compare equal.
#[derive(Debug, Clone, Copy)]
struct PriorityKey {
    price: Price,
    timestamp: Timestamp,
    id: OrderId,
}

impl PriorityKey {
    fn of(order: &Order) -> Self {
        PriorityKey {
            price: order.unit_price(),
            timestamp: order.timestamp(),
            id: order.id(),
        }
    }
}

impl Ord for PriorityKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.price
            .total_cmp(&other.price)
            .then_with(|| self.timestamp.cmp(&other.timestamp))
            .then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for PriorityKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for PriorityKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PriorityKey {}

/// Open orders, indexed by directed currency pair in priority order
///
/// The book owns its orders. Listed orders are only mutated through
/// `update_listed`, which keeps the index in sync with the order's price.
#[derive(Default)]
pub struct Orderbook {
    orders: HashMap<OrderId, Order>,
    index: BTreeMap<CurrencyPair, BTreeSet<PriorityKey>>,
}

impl std::fmt::Debug for Orderbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orderbook")
            .field("order_count", &self.orders.len())
            .field("pair_count", &self.index.len())
            .finish()
    }
}

impl Orderbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an order to the book
    ///
    /// `Listing` fires before the insert, so a failing subscriber leaves the
    /// book untouched.
    pub fn list<S>(&mut self, order: Order, sink: &mut S) -> MatchingResult<()>
    where
        S: NotificationSink + ?Sized,
    {
        let id = order.id();
        if self.orders.contains_key(&id) {
            return Err(BookError::DuplicateListing(id).into());
        }

        sink.notify(&MarketEvent::Listing { order: &order })?;

        self.index
            .entry(order.pair())
            .or_default()
            .insert(PriorityKey::of(&order));
        self.orders.insert(id, order);
        Ok(())
    }

    /// Remove an order from the book and hand it back
    pub fn delist<S>(&mut self, id: OrderId, sink: &mut S) -> MatchingResult<Order>
    where
        S: NotificationSink + ?Sized,
    {
        let order = self.orders.get(&id).ok_or(BookError::NotFound(id))?;

        sink.notify(&MarketEvent::Delisting { order })?;

        let pair = order.pair();
        let key = PriorityKey::of(order);
        if let Some(keys) = self.index.get_mut(&pair) {
            keys.remove(&key);
            if keys.is_empty() {
                self.index.remove(&pair);
            }
        }

        self.orders.remove(&id).ok_or(BookError::NotFound(id).into())
    }

    /// Mutate a listed order in place and re-key it
    ///
    /// The index is refreshed even if `f` fails halfway, so it always
    /// reflects the order's current price.
    pub fn update_listed<F, R>(&mut self, id: OrderId, f: F) -> MatchingResult<R>
    where
        F: FnOnce(&mut Order) -> MatchingResult<R>,
    {
        let order = self.orders.get_mut(&id).ok_or(BookError::NotFound(id))?;
        let old_key = PriorityKey::of(order);

        let result = f(order);

        let new_key = PriorityKey::of(order);
        if old_key != new_key
            && let Some(keys) = self.index.get_mut(&order.pair())
        {
            keys.remove(&old_key);
            keys.insert(new_key);
        }

        result
    }

    /// Listed orders selling `currency_for_sale` for `currency_desired`,
    /// cheapest first, then oldest, then lowest id
    pub fn orders_for<'a>(
        &'a self,
        currency_for_sale: &str,
        currency_desired: &str,
    ) -> impl Iterator<Item = &'a Order> + 'a {
        let pair = CurrencyPair::new(currency_for_sale, currency_desired);

        self.index
            .get(&pair)
            .into_iter()
            .flat_map(|keys| keys.iter())
            .filter_map(move |key| self.orders.get(&key.id))
    }

    /// All listed orders, grouped by pair, each group in priority order
    pub fn open_orders(&self) -> impl Iterator<Item = &Order> + '_ {
        self.index
            .values()
            .flat_map(|keys| keys.iter())
            .filter_map(move |key| self.orders.get(&key.id))
    }

    /// Pairs with at least one listed order
    pub fn pairs(&self) -> impl Iterator<Item = &CurrencyPair> + '_ {
        self.index.keys()
    }

    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(&id)
    }

    pub fn contains(&self, id: OrderId) -> bool {
        self.orders.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
