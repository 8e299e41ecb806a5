use std::sync::Arc;

use meridian_core::Order;
use meridian_ports::MatchPolicy;

/// Every currency and price compatible pair may trade
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl MatchPolicy for AllowAll {
    fn permits(&self, _resting: &Order, _incoming: &Order) -> bool {
        true
    }

    fn name(&self) -> &str {
        "allow-all"
    }
}

/// Orders carrying the same owner never trade with each other
///
/// Orders without an owner are treated as belonging to nobody in particular
/// and always pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreventSelfTrade;

impl MatchPolicy for PreventSelfTrade {
    fn permits(&self, resting: &Order, incoming: &Order) -> bool {
        match (resting.owner(), incoming.owner()) {
            (Some(a), Some(b)) => a != b,
            _ => true,
        }
    }

    fn name(&self) -> &str {
        "prevent-self-trade"
    }
}

/// Factory function to create match policies by name
pub fn create_match_policy(name: &str) -> Arc<dyn MatchPolicy> {
    match name.to_lowercase().as_str() {
        "prevent-self-trade" | "preventselftrade" => Arc::new(PreventSelfTrade),
        _ => Arc::new(AllowAll), // Default
    }
}
