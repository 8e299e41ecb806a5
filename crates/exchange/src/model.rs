// Re-export domain types from meridian-core
pub use meridian_core::{
    Amount, COIN, Currency, CurrencyPair, Order, OrderId, OrderRequest, OrderStatus, Trade,
};

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::error::Result;

/// Commands served one at a time by the exchange task
#[derive(Debug)]
pub enum ExchangeCommand {
    /// Create an order from the request and match it
    SubmitOrder {
        request: OrderRequest,
        response: oneshot::Sender<Result<SubmitOrderResponse>>,
    },

    /// Resting orders for one directed pair, in priority order
    OpenOrders {
        pair: CurrencyPair,
        response: oneshot::Sender<Vec<Order>>,
    },

    /// Get service statistics
    Stats {
        response: oneshot::Sender<ExchangeStats>,
    },

    /// Stop serving commands
    Shutdown,
}

/// Response from submitting an order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitOrderResponse {
    /// Final state of the order: filled, or resting in the book
    pub order: Order,
    pub trades: Vec<Trade>,
}

impl SubmitOrderResponse {
    pub fn is_resting(&self) -> bool {
        !self.order.status().is_terminal()
    }
}

/// Statistics for the exchange
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeStats {
    pub name: String,
    pub orders_received: u64,
    pub orders_rejected: u64,
    pub trades_executed: u64,
    pub open_orders: usize,
}
