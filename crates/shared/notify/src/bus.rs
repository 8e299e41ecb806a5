use log::warn;
use meridian_core::{EventKind, MarketEvent};
use meridian_ports::{NotificationSink, SinkError};
use serde::{Deserialize, Serialize};

/// Callback invoked for every matching event
pub type Handler = Box<dyn FnMut(&MarketEvent<'_>) -> Result<(), SinkError> + Send>;

/// What happens when a subscriber fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeliveryPolicy {
    /// Stop at the first failing subscriber and abort the triggering operation
    #[default]
    Propagate,
    /// Log the failure and keep delivering; the triggering operation proceeds
    Isolate,
}

/// Handle returned by `subscribe`, used to unsubscribe later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Subscription {
    id: SubscriptionId,
    /// `None` subscribes to every kind
    kind: Option<EventKind>,
    handler: Handler,
}

/// Synchronous event bus with per-kind subscribers
///
/// Handlers run on the caller's stack, in registration order. Handlers for
/// other kinds are skipped.
pub struct EventBus {
    subscriptions: Vec<Subscription>,
    next_id: u64,
    delivery: DeliveryPolicy,
}

impl EventBus {
    /// Create an empty bus that propagates subscriber failures
    pub fn new() -> Self {
        Self::with_delivery(DeliveryPolicy::default())
    }

    pub fn with_delivery(delivery: DeliveryPolicy) -> Self {
        Self {
            subscriptions: Vec::new(),
            next_id: 0,
            delivery,
        }
    }

    pub fn delivery(&self) -> DeliveryPolicy {
        self.delivery
    }

    pub fn set_delivery(&mut self, delivery: DeliveryPolicy) {
        self.delivery = delivery;
    }

    /// Subscribe a handler to one kind of event
    pub fn subscribe<F>(&mut self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&MarketEvent<'_>) -> Result<(), SinkError> + Send + 'static,
    {
        self.push(Some(kind), Box::new(handler))
    }

    /// Subscribe a handler to every kind of event
    pub fn subscribe_all<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&MarketEvent<'_>) -> Result<(), SinkError> + Send + 'static,
    {
        self.push(None, Box::new(handler))
    }

    /// Forward every event to another sink
    pub fn attach<S>(&mut self, mut sink: S) -> SubscriptionId
    where
        S: NotificationSink + Send + 'static,
    {
        self.subscribe_all(move |event| sink.notify(event))
    }

    /// Remove a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    /// Number of active subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Drop all subscriptions
    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }

    fn push(&mut self, kind: Option<EventKind>, handler: Handler) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription { id, kind, handler });
        id
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriptions", &self.subscriptions.len())
            .field("delivery", &self.delivery)
            .finish()
    }
}

impl NotificationSink for EventBus {
    fn notify(&mut self, event: &MarketEvent<'_>) -> Result<(), SinkError> {
        let kind = event.kind();

        for subscription in &mut self.subscriptions {
            if subscription.kind.is_some_and(|k| k != kind) {
                continue;
            }

            if let Err(err) = (subscription.handler)(event) {
                match self.delivery {
                    DeliveryPolicy::Propagate => return Err(err),
                    DeliveryPolicy::Isolate => {
                        warn!(
                            "Subscriber {:?} failed on {} for order {}: {}",
                            subscription.id,
                            kind,
                            event.order().id(),
                            err.reason
                        );
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_core::{Order, OrderId, OrderRequest};
    use rust_decimal_macros::dec;
    use std::sync::{Arc, Mutex};

    fn test_order() -> Order {
        let request = OrderRequest::new("MSC", dec!(10), "BTC", dec!(2))
            .validate()
            .unwrap();
        Order::new(OrderId(1), 1, request)
    }

    fn recorder(log: &Arc<Mutex<Vec<String>>>, tag: &'static str) -> Handler {
        let log = Arc::clone(log);
        Box::new(move |event: &MarketEvent<'_>| {
            log.lock().unwrap().push(format!("{}:{}", tag, event.kind()));
            Ok(())
        })
    }

    #[test]
    fn test_handlers_run_in_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();
        bus.subscribe(EventKind::Listing, recorder(&log, "a"));
        bus.subscribe_all(recorder(&log, "b"));
        bus.subscribe(EventKind::Listing, recorder(&log, "c"));

        let order = test_order();
        bus.notify(&MarketEvent::Listing { order: &order }).unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["a:listing", "b:listing", "c:listing"]
        );
    }

    #[test]
    fn test_handlers_only_see_their_kind() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();
        bus.subscribe(EventKind::Delisting, recorder(&log, "d"));

        let order = test_order();
        bus.notify(&MarketEvent::Listing { order: &order }).unwrap();
        bus.notify(&MarketEvent::Delisting { order: &order }).unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["d:delisting"]);
    }

    #[test]
    fn test_unsubscribe() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();
        let id = bus.subscribe_all(recorder(&log, "x"));

        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert_eq!(bus.subscriber_count(), 0);

        let order = test_order();
        bus.notify(&MarketEvent::NewOrder { order: &order }).unwrap();
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_propagate_stops_at_first_failure() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();
        bus.subscribe_all(|event| Err(SinkError::new(event.kind(), "boom")));
        bus.subscribe_all(recorder(&log, "after"));

        let order = test_order();
        let err = bus
            .notify(&MarketEvent::OrderArrival { order: &order })
            .unwrap_err();

        assert_eq!(err.kind, EventKind::OrderArrival);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_isolate_keeps_delivering() {
        let _ = env_logger::try_init();

        let log = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::with_delivery(DeliveryPolicy::Isolate);
        bus.subscribe_all(|event| Err(SinkError::new(event.kind(), "boom")));
        bus.subscribe_all(recorder(&log, "after"));

        let order = test_order();
        bus.notify(&MarketEvent::OrderArrival { order: &order })
            .unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["after:order_arrival"]);
    }

    #[test]
    fn test_delivery_policy_from_config() {
        let policy: DeliveryPolicy = serde_json::from_str("\"isolate\"").unwrap();
        assert_eq!(policy, DeliveryPolicy::Isolate);
    }
}
