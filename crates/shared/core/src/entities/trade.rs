use serde::{Deserialize, Serialize};

use super::{Order, OrderId};
use crate::values::{Amount, Currency, Price};

/// One execution between a resting order and an incoming order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Position of this trade in the engine's execution sequence
    pub sequence: u64,
    pub resting_order_id: OrderId,
    pub incoming_order_id: OrderId,
    /// Currency the resting order receives (the incoming order's sale currency)
    pub currency_to_resting: Currency,
    pub amount_to_resting: Amount,
    /// Currency the incoming order receives (the resting order's sale currency)
    pub currency_to_incoming: Currency,
    pub amount_to_incoming: Amount,
}

impl Trade {
    pub fn new(
        sequence: u64,
        resting: &Order,
        incoming: &Order,
        amount_to_resting: Amount,
        amount_to_incoming: Amount,
    ) -> Self {
        Self {
            sequence,
            resting_order_id: resting.id(),
            incoming_order_id: incoming.id(),
            currency_to_resting: resting.currency_desired().to_string(),
            amount_to_resting,
            currency_to_incoming: resting.currency_for_sale().to_string(),
            amount_to_incoming,
        }
    }

    /// Realized price in the resting order's terms (received per unit given)
    pub fn price(&self) -> Price {
        self.amount_to_resting as f64 / self.amount_to_incoming as f64
    }

    /// Realized price in the incoming order's terms
    pub fn inverse_price(&self) -> Price {
        self.amount_to_incoming as f64 / self.amount_to_resting as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::OrderRequest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_trade_prices() {
        let resting = Order::new(
            OrderId(0),
            0,
            OrderRequest::new("Indiv2", dec!(20), "Indiv1", dec!(10))
                .validate()
                .unwrap(),
        );
        let incoming = Order::new(
            OrderId(1),
            1,
            OrderRequest::new("Indiv1", dec!(12), "Indiv2", dec!(17))
                .validate()
                .unwrap(),
        );

        let trade = Trade::new(0, &resting, &incoming, 9, 17);

        assert_eq!(trade.currency_to_resting, "Indiv1");
        assert_eq!(trade.currency_to_incoming, "Indiv2");
        assert_eq!(trade.price(), 9.0 / 17.0);
        assert_eq!(trade.inverse_price(), 17.0 / 9.0);
    }
}
