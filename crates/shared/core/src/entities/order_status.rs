use std::fmt;

use serde::{Deserialize, Serialize};

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Order has been created and not traded yet
    New,
    /// Order has been partially filled
    PartiallyFilled,
    /// Order has been completely filled
    Filled,
    /// Order has been canceled
    Canceled,
}

impl OrderStatus {
    /// Returns true if the order is in a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Filled | OrderStatus::Canceled)
    }

    /// Returns true if the order is still active
    pub fn is_active(&self) -> bool {
        matches!(self, OrderStatus::New | OrderStatus::PartiallyFilled)
    }

    /// Forward-only state machine. Staying in the same state is always allowed.
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;

        if *self == next {
            return true;
        }

        matches!(
            (self, next),
            (New, PartiallyFilled)
                | (New, Filled)
                | (PartiallyFilled, Filled)
                | (New, Canceled)
                | (PartiallyFilled, Canceled)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "new",
            OrderStatus::PartiallyFilled => "partially filled",
            OrderStatus::Filled => "filled",
            OrderStatus::Canceled => "canceled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OrderStatus::*;

    #[test]
    fn test_forward_transitions() {
        assert!(New.can_transition_to(PartiallyFilled));
        assert!(New.can_transition_to(Filled));
        assert!(PartiallyFilled.can_transition_to(Filled));
        assert!(New.can_transition_to(Canceled));
        assert!(PartiallyFilled.can_transition_to(Canceled));
    }

    #[test]
    fn test_no_backward_or_terminal_exit() {
        assert!(!PartiallyFilled.can_transition_to(New));
        assert!(!Filled.can_transition_to(PartiallyFilled));
        assert!(!Filled.can_transition_to(Canceled));
        assert!(!Canceled.can_transition_to(New));
        assert!(!Canceled.can_transition_to(Filled));
    }

    #[test]
    fn test_terminal_and_active() {
        assert!(Filled.is_terminal());
        assert!(Canceled.is_terminal());
        assert!(New.is_active());
        assert!(PartiallyFilled.is_active());
        assert!(!Filled.is_active());
    }
}
