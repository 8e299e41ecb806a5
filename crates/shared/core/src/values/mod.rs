/// Remaining or traded quantity, in whole base units of a currency
pub type Amount = u64;

/// Exchange rate between two amounts (desired per unit for sale)
/// Derived from integer amounts with double-precision division
pub type Price = f64;

/// Sequence/priority marker (arrival order or block height and tx index)
/// Only used for tie-breaking between equally priced orders
pub type Timestamp = i64;

/// Currency or smart property symbol - opaque and case-sensitive
pub type Currency = String;

/// Base units per whole divisible token, e.g. 0.1 BTC is `COIN / 10`
pub const COIN: Amount = 100_000_000;

/// `ceil(a * b / c)` evaluated on the integers, without going through a price
///
/// Returns `None` when `c` is zero or the result does not fit an `Amount`.
pub fn mul_div_ceil(a: Amount, b: Amount, c: Amount) -> Option<Amount> {
    if c == 0 {
        return None;
    }

    let product = a as u128 * b as u128;
    Amount::try_from(product.div_ceil(c as u128)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mul_div_ceil() {
        assert_eq!(mul_div_ceil(17, 10, 20), Some(9));
        assert_eq!(mul_div_ceil(16, 10, 20), Some(8));
        assert_eq!(mul_div_ceil(0, 10, 20), Some(0));
        assert_eq!(mul_div_ceil(1, 1, 0), None);
        assert_eq!(mul_div_ceil(Amount::MAX, Amount::MAX, 1), None);
        // 1.5e9 * 0.2155 without floating point noise
        assert_eq!(
            mul_div_ceil(1_500_000_000, 323_250_000, 1_500_000_000),
            Some(323_250_000)
        );
    }
}
