use chrono::Utc;
use meridian_core::Timestamp;
use meridian_ports::Clock;

/// Real system clock for production use
///
/// Returns wall-clock milliseconds since the Unix epoch. Orders submitted
/// within the same millisecond share a timestamp and fall back to id order.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl SystemClock {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Utc::now().timestamp_millis()
    }

    fn name(&self) -> &str {
        "SystemClock"
    }
}
