use meridian_core::{Amount, Order, OrderError, OrderResult, mul_div_ceil};

/// Amounts exchanged by one execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeAmounts {
    /// Paid by the incoming order, in the resting order's desired currency
    pub to_resting: Amount,
    /// Paid by the resting order, in the incoming order's desired currency
    pub to_incoming: Amount,
}

impl TradeAmounts {
    /// Realized price in the resting order's terms
    pub fn price(&self) -> f64 {
        self.to_resting as f64 / self.to_incoming as f64
    }

    /// Realized price in the incoming order's terms
    pub fn inverse_price(&self) -> f64 {
        self.to_incoming as f64 / self.to_resting as f64
    }
}

/// Compute what a resting and an incoming order exchange
///
/// The trade executes at the resting order's limit price: the incoming
/// order receives as much as it wants, up to everything the resting order
/// offers, and pays that amount times the resting price rounded up. The
/// product is rounded on the integer amounts, so no floating point noise
/// can make the payment exceed what the resting order still desires.
pub fn compute_traded_amounts(resting: &Order, incoming: &Order) -> OrderResult<TradeAmounts> {
    for order in [resting, incoming] {
        if order.amount_for_sale() == 0 || order.amount_desired() == 0 {
            return Err(OrderError::IntegrityViolation {
                order_id: order.id(),
                reason: format!("order {} has nothing left to trade", order),
            });
        }
    }

    let to_incoming = incoming.amount_desired().min(resting.amount_for_sale());
    // ceil(to_incoming * resting price); at most the resting amount desired
    // because to_incoming never exceeds the resting amount for sale
    let to_resting = mul_div_ceil(
        to_incoming,
        resting.amount_desired(),
        resting.amount_for_sale(),
    )
    .ok_or_else(|| OrderError::IntegrityViolation {
        order_id: resting.id(),
        reason: "traded amount overflows".to_string(),
    })?;

    let amounts = TradeAmounts {
        to_resting,
        to_incoming,
    };
    let realized = amounts.price();

    if !resting.would_accept(realized) {
        return Err(OrderError::PriceToleranceExceeded {
            order_id: resting.id(),
            realized,
            limit: resting.unit_price(),
        });
    }

    let realized_inverse = amounts.inverse_price();
    if !incoming.would_accept(realized_inverse) {
        return Err(OrderError::PriceToleranceExceeded {
            order_id: incoming.id(),
            realized: realized_inverse,
            limit: incoming.unit_price(),
        });
    }

    Ok(amounts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::order;
    use rust_decimal_macros::dec;

    #[test]
    fn test_partial_fill_of_resting_order() {
        let resting = order(0, "Indiv2", dec!(20), "Indiv1", dec!(10));
        let incoming = order(1, "Indiv1", dec!(12), "Indiv2", dec!(17));

        let amounts = compute_traded_amounts(&resting, &incoming).unwrap();

        assert_eq!(amounts.to_incoming, 17);
        assert_eq!(amounts.to_resting, 9);
    }

    #[test]
    fn test_incoming_takes_whole_resting_order() {
        let resting = order(0, "MSC", dec!(100), "BTC", dec!(20));
        let incoming = order(1, "BTC", dec!(50), "MSC", dec!(200));

        let amounts = compute_traded_amounts(&resting, &incoming).unwrap();

        assert_eq!(amounts.to_incoming, 100);
        assert_eq!(amounts.to_resting, 20);
        assert!(amounts.to_incoming <= resting.amount_for_sale());
        assert!(amounts.to_resting <= incoming.amount_for_sale());
    }

    #[test]
    fn test_payment_never_exceeds_resting_desire() {
        let resting = order(0, "MSC", dec!(1500000000), "BTC", dec!(323250000));
        let incoming = order(1, "BTC", dec!(500000000), "MSC", dec!(2000000000));

        let amounts = compute_traded_amounts(&resting, &incoming).unwrap();

        assert_eq!(amounts.to_incoming, 1_500_000_000);
        assert_eq!(amounts.to_resting, 323_250_000);
    }

    #[test]
    fn test_incompatible_prices_rejected() {
        // Resting wants 2 per unit, incoming only pays 0.5
        let resting = order(0, "A", dec!(10), "B", dec!(20));
        let incoming = order(1, "B", dec!(5), "A", dec!(10));

        let err = compute_traded_amounts(&resting, &incoming).unwrap_err();
        assert!(matches!(
            err,
            OrderError::PriceToleranceExceeded { order_id, .. } if order_id == incoming.id()
        ));
    }
}
