use meridian_core::Order;

/// Port for pairwise match checks beyond currency and price compatibility
///
/// Implementations decide whether a resting order may trade with an
/// incoming one, e.g.:
/// - Allow everything (default)
/// - Prevent orders of the same owner from trading with each other
pub trait MatchPolicy: Send + Sync {
    /// Check if `resting` may be executed against `incoming`
    fn permits(&self, resting: &Order, incoming: &Order) -> bool;

    /// Get the name of the policy
    fn name(&self) -> &str;
}
