//! Meridian Exchange
//!
//! Runs one matching engine behind a tokio command queue. Any number of
//! `ExchangeHandle` clones may submit concurrently; the queue serializes
//! them, so each order is matched against a book no other order is
//! touching at the same time.

// Application layer
pub mod application;

// Cross-cutting concerns
pub mod config;
pub mod error;
pub mod model;

// Re-export main types for convenience
pub use application::{Exchange, ExchangeHandle};
pub use config::{ConfigError, ExchangeConfig, MatchPolicyKind, SeedOrderConfig};
pub use error::{ExchangeError, Result};
pub use model::{ExchangeStats, SubmitOrderResponse};
