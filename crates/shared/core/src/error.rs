use thiserror::Error;

use crate::entities::{OrderId, OrderStatus};
use crate::values::Price;

/// Failures raised by order construction and order state changes
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderError {
    /// Malformed construction input. No order was created.
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    /// An internal post-condition failed. Signals a defect in the matching
    /// logic, never a transient condition.
    #[error("Integrity violation on order {order_id}: {reason}")]
    IntegrityViolation { order_id: OrderId, reason: String },

    /// The realized trade price falls outside one side's limit
    #[error("Price tolerance exceeded on order {order_id}: realized {realized} vs limit {limit}")]
    PriceToleranceExceeded {
        order_id: OrderId,
        realized: Price,
        limit: Price,
    },

    #[error("Invalid status transition for order {order_id}: {from} -> {to}")]
    InvalidStatusTransition {
        order_id: OrderId,
        from: OrderStatus,
        to: OrderStatus,
    },
}

impl OrderError {
    pub(crate) fn integrity(order_id: OrderId, reason: impl Into<String>) -> Self {
        OrderError::IntegrityViolation {
            order_id,
            reason: reason.into(),
        }
    }

    /// Returns true if the error signals broken matching logic rather than bad input
    pub fn is_integrity_violation(&self) -> bool {
        !matches!(self, OrderError::InvalidOrder(_))
    }
}

pub type OrderResult<T> = std::result::Result<T, OrderError>;
