use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Unique, strictly increasing identifier for an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderId(pub u64);

impl OrderId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ID {}]", self.0)
    }
}

impl From<u64> for OrderId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Allocator for order ids
///
/// Each value is handed out exactly once, even when the sequence is shared
/// between threads. Gaps are acceptable, duplicates are not.
#[derive(Debug)]
pub struct OrderIdSequence {
    next: AtomicU64,
}

impl OrderIdSequence {
    /// Create a sequence whose first id is 0
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Create a sequence whose first id is `first`
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Allocate the next id
    pub fn next_id(&self) -> OrderId {
        OrderId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Id that the next allocation will return
    pub fn peek(&self) -> OrderId {
        OrderId(self.next.load(Ordering::Relaxed))
    }
}

impl Default for OrderIdSequence {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_ids_strictly_increase() {
        let seq = OrderIdSequence::starting_at(7);
        let a = seq.next_id();
        let b = seq.next_id();

        assert_eq!(a, OrderId(7));
        assert!(b > a);
        assert_eq!(seq.peek(), OrderId(9));
    }

    #[test]
    fn test_concurrent_allocation_has_no_duplicates() {
        let seq = Arc::new(OrderIdSequence::new());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let seq = Arc::clone(&seq);
                thread::spawn(move || (0..1000).map(|_| seq.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id {}", id);
            }
        }
        assert_eq!(seen.len(), 4000);
    }

    #[test]
    fn test_display() {
        assert_eq!(OrderId(3).to_string(), "[ID 3]");
    }
}
