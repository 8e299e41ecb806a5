use meridian_core::{EventKind, OrderError, OrderId};
use thiserror::Error;

/// Orderbook operations on an order not in, or already in, the book
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookError {
    #[error("Order {0} is not listed")]
    NotFound(OrderId),

    #[error("Order {0} is already listed")]
    DuplicateListing(OrderId),
}

/// A subscriber refused an event
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Subscriber failed on {kind} event: {reason}")]
pub struct SinkError {
    pub kind: EventKind,
    pub reason: String,
}

impl SinkError {
    pub fn new(kind: EventKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }
}

/// Domain-level errors for matching operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchingError {
    #[error(transparent)]
    Order(#[from] OrderError),

    #[error(transparent)]
    Book(#[from] BookError),

    #[error(transparent)]
    Notification(#[from] SinkError),
}

impl MatchingError {
    /// Integrity failures mean the matching logic itself is broken.
    /// Callers should not retry them.
    pub fn is_fatal(&self) -> bool {
        match self {
            MatchingError::Order(err) => err.is_integrity_violation(),
            MatchingError::Book(_) | MatchingError::Notification(_) => false,
        }
    }
}

pub type MatchingResult<T> = std::result::Result<T, MatchingError>;
