use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::{CurrencyPair, OrderId, OrderStatus};
use crate::error::{OrderError, OrderResult};
use crate::values::{Amount, Currency, Price, Timestamp, mul_div_ceil};

/// Raw order input, before validation and rounding
///
/// Amounts may carry fractions. The amount for sale is rounded down (a
/// fractional unit can't be sold) and the desired amount is rounded up, so
/// rounding never costs the counter-party part of what it receives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub currency_for_sale: Currency,
    pub amount_for_sale: Decimal,
    pub currency_desired: Currency,
    pub amount_desired: Decimal,
    /// Priority marker. Assigned from the engine clock when absent.
    #[serde(default)]
    pub timestamp: Option<Timestamp>,
    /// Owner address, only consulted by self-trade prevention
    #[serde(default)]
    pub owner: Option<String>,
}

impl OrderRequest {
    pub fn new(
        currency_for_sale: impl Into<Currency>,
        amount_for_sale: Decimal,
        currency_desired: impl Into<Currency>,
        amount_desired: Decimal,
    ) -> Self {
        Self {
            currency_for_sale: currency_for_sale.into(),
            amount_for_sale,
            currency_desired: currency_desired.into(),
            amount_desired,
            timestamp: None,
            owner: None,
        }
    }

    /// Sell order helper. The price is nominated in the currency desired.
    pub fn sell(
        amount_for_sale: Decimal,
        price: Decimal,
        currency_for_sale: impl Into<Currency>,
        currency_desired: impl Into<Currency>,
    ) -> OrderResult<Self> {
        let amount_desired = amount_for_sale
            .checked_mul(price)
            .ok_or_else(|| OrderError::InvalidOrder("amount desired overflows".to_string()))?;

        Ok(Self::new(
            currency_for_sale,
            amount_for_sale.floor(),
            currency_desired,
            amount_desired,
        ))
    }

    /// Buy order helper. The price is nominated in the currency for sale.
    pub fn buy(
        amount_desired: Decimal,
        price: Decimal,
        currency_desired: impl Into<Currency>,
        currency_for_sale: impl Into<Currency>,
    ) -> OrderResult<Self> {
        let amount_for_sale = amount_desired
            .checked_mul(price)
            .ok_or_else(|| OrderError::InvalidOrder("amount for sale overflows".to_string()))?;

        Ok(Self::new(
            currency_for_sale,
            amount_for_sale.floor(),
            currency_desired,
            amount_desired,
        ))
    }

    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Round and check the request. Nothing is allocated on failure.
    pub fn validate(self) -> OrderResult<ValidOrderRequest> {
        if self.currency_for_sale.is_empty() || self.currency_desired.is_empty() {
            return Err(OrderError::InvalidOrder(
                "currency symbols must not be empty".to_string(),
            ));
        }

        if self.currency_for_sale == self.currency_desired {
            return Err(OrderError::InvalidOrder(format!(
                "currency for sale and currency desired are both {}",
                self.currency_for_sale
            )));
        }

        let amount_for_sale = whole_units(self.amount_for_sale.floor())
            .filter(|amount| *amount > 0)
            .ok_or_else(|| {
                OrderError::InvalidOrder(format!(
                    "amount for sale {} is not a positive whole amount",
                    self.amount_for_sale
                ))
            })?;

        let amount_desired = whole_units(self.amount_desired.ceil())
            .filter(|amount| *amount > 0)
            .ok_or_else(|| {
                OrderError::InvalidOrder(format!(
                    "amount desired {} is not a positive amount",
                    self.amount_desired
                ))
            })?;

        Ok(ValidOrderRequest {
            currency_for_sale: self.currency_for_sale,
            amount_for_sale,
            currency_desired: self.currency_desired,
            amount_desired,
            timestamp: self.timestamp,
            owner: self.owner,
        })
    }
}

fn whole_units(amount: Decimal) -> Option<Amount> {
    amount.to_u64()
}

/// Request that passed validation, amounts already rounded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidOrderRequest {
    currency_for_sale: Currency,
    amount_for_sale: Amount,
    currency_desired: Currency,
    amount_desired: Amount,
    timestamp: Option<Timestamp>,
    owner: Option<String>,
}

impl ValidOrderRequest {
    pub fn timestamp(&self) -> Option<Timestamp> {
        self.timestamp
    }

    pub fn amount_for_sale(&self) -> Amount {
        self.amount_for_sale
    }

    pub fn amount_desired(&self) -> Amount {
        self.amount_desired
    }
}

/// Result of planning an amount update, checked but not yet applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountUpdate {
    pub order_id: OrderId,
    pub amount_received: Amount,
    pub amount_spent: Amount,
    previous_for_sale: Amount,
    previous_desired: Amount,
    pub new_amount_for_sale: Amount,
    pub new_amount_desired: Amount,
}

impl AmountUpdate {
    /// Status the order ends up in once the update is applied
    pub fn resulting_status(&self) -> OrderStatus {
        if self.new_amount_desired > 0 {
            OrderStatus::PartiallyFilled
        } else {
            OrderStatus::Filled
        }
    }
}

/// An offer to exchange an amount of one currency for an amount of another
///
/// The ratio desired / for sale is the worst rate the owner accepts. Amounts
/// only ever shrink, and the ratio stays within one rounding unit of its
/// original value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    timestamp: Timestamp,
    status: OrderStatus,
    currency_for_sale: Currency,
    currency_desired: Currency,
    amount_for_sale: Amount,
    amount_desired: Amount,
    initial_amount_for_sale: Amount,
    initial_amount_desired: Amount,
    owner: Option<String>,
}

impl Order {
    /// Build a new order from a validated request
    pub fn new(id: OrderId, timestamp: Timestamp, request: ValidOrderRequest) -> Self {
        Self {
            id,
            timestamp: request.timestamp.unwrap_or(timestamp),
            status: OrderStatus::New,
            currency_for_sale: request.currency_for_sale,
            currency_desired: request.currency_desired,
            amount_for_sale: request.amount_for_sale,
            amount_desired: request.amount_desired,
            initial_amount_for_sale: request.amount_for_sale,
            initial_amount_desired: request.amount_desired,
            owner: request.owner,
        }
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn currency_for_sale(&self) -> &str {
        &self.currency_for_sale
    }

    pub fn currency_desired(&self) -> &str {
        &self.currency_desired
    }

    pub fn pair(&self) -> CurrencyPair {
        CurrencyPair::new(self.currency_for_sale.clone(), self.currency_desired.clone())
    }

    pub fn amount_for_sale(&self) -> Amount {
        self.amount_for_sale
    }

    pub fn amount_desired(&self) -> Amount {
        self.amount_desired
    }

    pub fn initial_amount_for_sale(&self) -> Amount {
        self.initial_amount_for_sale
    }

    pub fn initial_amount_desired(&self) -> Amount {
        self.initial_amount_desired
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Amount of the desired currency received so far
    pub fn received_amount(&self) -> Amount {
        self.initial_amount_desired - self.amount_desired
    }

    /// Amount of the currency for sale given away so far
    pub fn spent_amount(&self) -> Amount {
        self.initial_amount_for_sale - self.amount_for_sale
    }

    /// Share of the initially desired amount already received, in [0, 1]
    pub fn fill_ratio(&self) -> f64 {
        self.received_amount() as f64 / self.initial_amount_desired as f64
    }

    /// Limit price: desired per unit for sale, infinite once nothing is left to sell
    pub fn unit_price(&self) -> Price {
        if self.amount_for_sale > 0 {
            self.amount_desired as f64 / self.amount_for_sale as f64
        } else {
            f64::INFINITY
        }
    }

    /// Units for sale per unit desired, NaN once nothing is desired
    pub fn unit_price_inverse(&self) -> Price {
        if self.amount_desired > 0 {
            self.amount_for_sale as f64 / self.amount_desired as f64
        } else {
            f64::NAN
        }
    }

    /// Accept any proposed price at or above the own limit
    pub fn would_accept(&self, proposed: Price) -> bool {
        self.unit_price() <= proposed
    }

    /// Can this (resting) order trade with `incoming`?
    ///
    /// Checks mirrored currencies, price compatibility and that this order
    /// is still open. Owner-based checks are left to the engine's policy.
    pub fn matches_with(&self, incoming: &Order) -> bool {
        self.currency_for_sale == incoming.currency_desired
            && self.currency_desired == incoming.currency_for_sale
            && self.would_accept(incoming.unit_price_inverse())
            && !self.status.is_terminal()
    }

    /// Compute the amounts after receiving `amount_received` and spending
    /// `amount_spent`, without touching the order.
    ///
    /// The new amount for sale is derived from the remaining desired amount
    /// at the current limit price, rounded up, and must not exceed what is
    /// actually left after spending. The rounding is done on the integer
    /// amounts, so the limit price itself never drifts by more than one unit.
    pub fn plan_update(
        &self,
        amount_received: Amount,
        amount_spent: Amount,
    ) -> OrderResult<AmountUpdate> {
        if self.status.is_terminal() {
            return Err(OrderError::integrity(
                self.id,
                format!("order is {} and can't be updated", self.status),
            ));
        }

        if amount_received == 0 || amount_spent == 0 {
            return Err(OrderError::integrity(
                self.id,
                format!(
                    "received {} and spent {} must both be positive",
                    amount_received, amount_spent
                ),
            ));
        }

        let new_amount_desired = self
            .amount_desired
            .checked_sub(amount_received)
            .ok_or_else(|| {
                OrderError::integrity(
                    self.id,
                    format!(
                        "received {} exceeds desired {}",
                        amount_received, self.amount_desired
                    ),
                )
            })?;

        let remaining = self
            .amount_for_sale
            .checked_sub(amount_spent)
            .ok_or_else(|| {
                OrderError::integrity(
                    self.id,
                    format!(
                        "spent {} exceeds amount for sale {}",
                        amount_spent, self.amount_for_sale
                    ),
                )
            })?;

        // ceil(new desired / unit price), on the exact ratio
        let new_amount_for_sale =
            mul_div_ceil(new_amount_desired, self.amount_for_sale, self.amount_desired)
                .ok_or_else(|| {
                    OrderError::integrity(self.id, "order has no amount desired to price against")
                })?;

        if new_amount_for_sale > remaining {
            return Err(OrderError::integrity(
                self.id,
                format!(
                    "updated amount for sale {} exceeds remaining {}",
                    new_amount_for_sale, remaining
                ),
            ));
        }

        Ok(AmountUpdate {
            order_id: self.id,
            amount_received,
            amount_spent,
            previous_for_sale: self.amount_for_sale,
            previous_desired: self.amount_desired,
            new_amount_for_sale,
            new_amount_desired,
        })
    }

    /// Apply a planned update to both amounts at once
    ///
    /// Rejected if the plan was made for another order or for a different state.
    pub fn apply_update(&mut self, update: &AmountUpdate) -> OrderResult<()> {
        if update.order_id != self.id
            || update.previous_for_sale != self.amount_for_sale
            || update.previous_desired != self.amount_desired
        {
            return Err(OrderError::integrity(
                self.id,
                "amount update was planned against a different state",
            ));
        }

        if self.status.is_terminal() {
            return Err(OrderError::integrity(
                self.id,
                format!("order is {} and can't be updated", self.status),
            ));
        }

        self.amount_for_sale = update.new_amount_for_sale;
        self.amount_desired = update.new_amount_desired;
        Ok(())
    }

    /// Move to `next` if the state machine allows it
    ///
    /// Returns whether the status changed.
    pub fn transition(&mut self, next: OrderStatus) -> OrderResult<bool> {
        if self.status == next {
            return Ok(false);
        }

        self.check_transition(next)?;
        self.status = next;
        Ok(true)
    }

    pub fn check_transition(&self, next: OrderStatus) -> OrderResult<()> {
        if self.status.can_transition_to(next) {
            Ok(())
        } else {
            Err(OrderError::InvalidStatusTransition {
                order_id: self.id,
                from: self.status,
                to: next,
            })
        }
    }
}

impl std::fmt::Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} offered, {} {} desired @ {:.4} ({})",
            self.id,
            self.amount_for_sale,
            self.currency_for_sale,
            self.amount_desired,
            self.currency_desired,
            self.unit_price(),
            self.status
        )
    }
}
