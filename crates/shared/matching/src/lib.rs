//! Meridian Matching
//!
//! Orderbook, trade computation and the price-time matching engine.
//! Everything here is synchronous; callers needing concurrency go through
//! the exchange service, which serializes access to one engine.

mod engine;
mod lifecycle;
mod orderbook;
mod policy;
mod price_time;

pub use engine::{EngineConfig, MatchingEngine, Submission};
pub use lifecycle::{OrderFactory, OrderLifecycle};
pub use orderbook::Orderbook;
pub use policy::{AllowAll, PreventSelfTrade, create_match_policy};
pub use price_time::{TradeAmounts, compute_traded_amounts};

// Re-export the ports for convenience
pub use meridian_ports::{
    BookError, Clock, MatchPolicy, MatchingError, MatchingResult, NotificationSink, SinkError,
};
