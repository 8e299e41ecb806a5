use serde::{Deserialize, Serialize};

use crate::values::Currency;

/// Directed currency pair: what an order sells and what it wants in return
///
/// `MSC/BTC` (sell MSC, desire BTC) and `BTC/MSC` are different keys.
/// Resting orders on the counter pair are the ones that can trade.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub for_sale: Currency,
    pub desired: Currency,
}

impl CurrencyPair {
    pub fn new(for_sale: impl Into<Currency>, desired: impl Into<Currency>) -> Self {
        Self {
            for_sale: for_sale.into(),
            desired: desired.into(),
        }
    }

    /// The pair seen from the other side of a trade
    pub fn counter(&self) -> Self {
        Self {
            for_sale: self.desired.clone(),
            desired: self.for_sale.clone(),
        }
    }
}

impl std::fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.for_sale, self.desired)
    }
}
