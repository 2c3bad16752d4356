/// Requests per unit of weight.
pub const WEIGHT_UNIT: u64 = 1000;

/// Load score of a request count: `count / 1000` rounded half up.
///
/// Every report column labelled weight goes through this function.
pub fn weight(count: u64) -> u64 {
    count.saturating_add(WEIGHT_UNIT / 2) / WEIGHT_UNIT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounding() {
        assert_eq!(weight(0), 0);
        assert_eq!(weight(499), 0);
        assert_eq!(weight(500), 1);
        assert_eq!(weight(999), 1);
        assert_eq!(weight(1400), 1);
        assert_eq!(weight(1500), 2);
        assert_eq!(weight(2499), 2);
        assert_eq!(weight(u64::MAX), u64::MAX / WEIGHT_UNIT);
    }

    #[test]
    fn test_monotonic() {
        let mut previous = 0;
        for count in 0..10_000 {
            let current = weight(count);
            assert!(current >= previous, "weight decreased at {count}");
            previous = current;
        }
    }
}
