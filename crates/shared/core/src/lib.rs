//! Meridian Core Domain
//!
//! Pure domain types for the Meridian matching engine.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod error;
pub mod events;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{
    AmountUpdate, CurrencyPair, Order, OrderId, OrderIdSequence, OrderRequest, OrderStatus, Trade,
    ValidOrderRequest,
};
pub use error::{OrderError, OrderResult};
pub use events::{EventKind, MarketEvent};
pub use values::{Amount, COIN, Currency, Price, Timestamp, mul_div_ceil};
