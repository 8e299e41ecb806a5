use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entities::{Order, OrderStatus};
use crate::values::Amount;

/// Lifecycle and trade events raised while orders are created, matched and listed
///
/// Events borrow the orders they describe; sinks that need to keep data
/// around copy what they need.
#[derive(Debug, Clone, Copy)]
pub enum MarketEvent<'a> {
    /// A new order was constructed
    NewOrder { order: &'a Order },
    /// An order's amounts are about to change
    PendingAmountUpdate {
        order: &'a Order,
        new_amount_for_sale: Amount,
        new_amount_desired: Amount,
    },
    /// An order's amounts and status were updated after a trade
    UpdatedOrder {
        order: &'a Order,
        amount_received: Amount,
        amount_spent: Amount,
    },
    /// An order's status is about to change to `status`
    StatusUpdate {
        order: &'a Order,
        status: OrderStatus,
    },
    /// An order entered the engine (also raised when a remainder is re-processed)
    OrderArrival { order: &'a Order },
    /// A resting and an incoming order are about to be executed against each other
    Trade {
        resting: &'a Order,
        incoming: &'a Order,
        to_resting: Amount,
        to_incoming: Amount,
    },
    /// An order was added to the book
    Listing { order: &'a Order },
    /// An order was removed from the book
    Delisting { order: &'a Order },
}

impl MarketEvent<'_> {
    pub fn kind(&self) -> EventKind {
        match self {
            MarketEvent::NewOrder { .. } => EventKind::NewOrder,
            MarketEvent::PendingAmountUpdate { .. } => EventKind::PendingAmountUpdate,
            MarketEvent::UpdatedOrder { .. } => EventKind::UpdatedOrder,
            MarketEvent::StatusUpdate { .. } => EventKind::StatusUpdate,
            MarketEvent::OrderArrival { .. } => EventKind::OrderArrival,
            MarketEvent::Trade { .. } => EventKind::Trade,
            MarketEvent::Listing { .. } => EventKind::Listing,
            MarketEvent::Delisting { .. } => EventKind::Delisting,
        }
    }

    /// The order the event is about. For trades this is the incoming order.
    pub fn order(&self) -> &Order {
        match self {
            MarketEvent::NewOrder { order }
            | MarketEvent::PendingAmountUpdate { order, .. }
            | MarketEvent::UpdatedOrder { order, .. }
            | MarketEvent::StatusUpdate { order, .. }
            | MarketEvent::OrderArrival { order }
            | MarketEvent::Listing { order }
            | MarketEvent::Delisting { order } => order,
            MarketEvent::Trade { incoming, .. } => incoming,
        }
    }
}

/// Event kinds, used to subscribe to a subset of events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventKind {
    NewOrder,
    PendingAmountUpdate,
    UpdatedOrder,
    StatusUpdate,
    OrderArrival,
    Trade,
    Listing,
    Delisting,
}

impl EventKind {
    pub const ALL: [EventKind; 8] = [
        EventKind::NewOrder,
        EventKind::PendingAmountUpdate,
        EventKind::UpdatedOrder,
        EventKind::StatusUpdate,
        EventKind::OrderArrival,
        EventKind::Trade,
        EventKind::Listing,
        EventKind::Delisting,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::NewOrder => "new_order",
            EventKind::PendingAmountUpdate => "pending_amount_update",
            EventKind::UpdatedOrder => "updated_order",
            EventKind::StatusUpdate => "status_update",
            EventKind::OrderArrival => "order_arrival",
            EventKind::Trade => "trade",
            EventKind::Listing => "listing",
            EventKind::Delisting => "delisting",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
