use meridian_core::Timestamp;

/// Port for the priority marker source
///
/// This allows the engine to stamp orders from different sources:
/// - Wall-clock milliseconds in production
/// - A plain arrival counter for deterministic tests
/// - Block height and transaction index when replaying a chain
pub trait Clock: Send + Sync {
    /// Get the current priority marker
    fn now(&self) -> Timestamp;

    /// Get the clock's name/identifier for debugging
    fn name(&self) -> &str {
        "Clock"
    }
}
