//! Meridian Ports
//!
//! Port definitions (traits) for the Meridian matching engine.
//! These define the boundaries between domain logic and infrastructure.

mod clock;
mod error;
mod notification;
mod policy;

pub use clock::Clock;
pub use error::{BookError, MatchingError, MatchingResult, SinkError};
pub use notification::NotificationSink;
pub use policy::MatchPolicy;
