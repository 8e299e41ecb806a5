use std::sync::atomic::{AtomicI64, Ordering};

use meridian_core::Timestamp;
use meridian_ports::Clock;

/// Arrival counter used as a priority marker
///
/// Every call to `now` returns a new, strictly larger value, so orders are
/// prioritized by the order in which they were stamped. Deterministic, which
/// makes it the default for tests and replays.
#[derive(Debug)]
pub struct SequenceClock {
    next: AtomicI64,
}

impl SequenceClock {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(first: Timestamp) -> Self {
        Self {
            next: AtomicI64::new(first),
        }
    }
}

impl Default for SequenceClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SequenceClock {
    fn now(&self) -> Timestamp {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    fn name(&self) -> &str {
        "SequenceClock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_clock_ticks_once_per_call() {
        let clock = SequenceClock::starting_at(100);

        assert_eq!(clock.now(), 100);
        assert_eq!(clock.now(), 101);
        assert_eq!(clock.now(), 102);
    }
}
