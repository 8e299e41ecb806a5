//! Meridian Clock Infrastructure
//!
//! Priority marker sources for order timestamps:
//!
//! - `SystemClock`: wall-clock milliseconds, for live order flow
//! - `SequenceClock`: arrival counter, for tests and replays
//!
//! ## Usage
//!
//! ```ignore
//! use meridian_clock::{ClockKind, create_clock};
//!
//! let clock = create_clock(ClockKind::Sequence);
//! let first = clock.now();
//! assert!(clock.now() > first);
//! ```

mod sequence;
mod system;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use sequence::SequenceClock;
pub use system::SystemClock;

// Re-export the Clock trait for convenience
pub use meridian_ports::Clock;

/// Selects a clock implementation from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClockKind {
    /// Wall-clock milliseconds
    System,
    /// Arrival counter starting at zero
    #[default]
    Sequence,
}

/// Factory function to create clocks by kind
pub fn create_clock(kind: ClockKind) -> Arc<dyn Clock> {
    match kind {
        ClockKind::System => Arc::new(SystemClock::new()),
        ClockKind::Sequence => Arc::new(SequenceClock::new()),
    }
}
