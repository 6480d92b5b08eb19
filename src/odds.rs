//! Odds mathematics.
//!
//! Pure conversions between American odds, decimal odds, and implied
//! probability. An American price of 0 is not a quotable price, so every
//! conversion returns `None` for it — callers treat `None` as "unknown,"
//! never as zero.

/// Convert American odds to decimal odds.
///
/// +150 pays 1.5x the stake on top of the stake back (2.5 total), so the
/// decimal price is `1 + odds/100`. -135 risks 135 to win 100, so the
/// decimal price is `1 + 100/135`.
pub fn american_to_decimal(odds: Option<i32>) -> Option<f64> {
    match odds {
        None | Some(0) => None,
        Some(o) if o > 0 => Some(1.0 + o as f64 / 100.0),
        Some(o) => Some(1.0 + 100.0 / (o as f64).abs()),
    }
}

/// Convert American odds to the implied win probability, in (0, 1).
pub fn american_to_implied(odds: Option<i32>) -> Option<f64> {
    match odds {
        None | Some(0) => None,
        Some(o) if o > 0 => Some(100.0 / (o as f64 + 100.0)),
        Some(o) => {
            let a = (o as f64).abs();
            Some(a / (a + 100.0))
        }
    }
}

/// Clip a value to [0, 1]. Implied probability plus an edge term can leave
/// the valid probability range; every derived probability goes through here.
pub fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

/// Model probability for a priced selection: clamp01(implied + edge).
/// `None` when the price (and hence the implied probability) is unknown.
pub fn model_probability(odds: Option<i32>, edge: Option<f64>) -> Option<f64> {
    let implied = american_to_implied(odds)?;
    let edge = edge?;
    Some(clamp01(implied + edge))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_decimal_positive_odds() {
        assert!((american_to_decimal(Some(150)).unwrap() - 2.5).abs() < EPS);
        assert!((american_to_decimal(Some(100)).unwrap() - 2.0).abs() < EPS);
        assert!((american_to_decimal(Some(250)).unwrap() - 3.5).abs() < EPS);
    }

    #[test]
    fn test_decimal_negative_odds() {
        assert!((american_to_decimal(Some(-100)).unwrap() - 2.0).abs() < EPS);
        assert!((american_to_decimal(Some(-135)).unwrap() - (1.0 + 100.0 / 135.0)).abs() < EPS);
        assert!((american_to_decimal(Some(-110)).unwrap() - (1.0 + 100.0 / 110.0)).abs() < EPS);
    }

    #[test]
    fn test_decimal_zero_and_missing_are_unknown() {
        assert!(american_to_decimal(Some(0)).is_none());
        assert!(american_to_decimal(None).is_none());
    }

    #[test]
    fn test_implied_positive_odds() {
        assert!((american_to_implied(Some(150)).unwrap() - 0.4).abs() < EPS);
        assert!((american_to_implied(Some(100)).unwrap() - 0.5).abs() < EPS);
    }

    #[test]
    fn test_implied_negative_odds() {
        assert!((american_to_implied(Some(-150)).unwrap() - 0.6).abs() < EPS);
        assert!((american_to_implied(Some(-110)).unwrap() - (110.0 / 210.0)).abs() < EPS);
    }

    #[test]
    fn test_implied_zero_and_missing_are_unknown() {
        assert!(american_to_implied(Some(0)).is_none());
        assert!(american_to_implied(None).is_none());
    }

    #[test]
    fn test_implied_in_open_unit_interval() {
        for odds in [-10_000, -500, -101, 100, 101, 500, 10_000] {
            let p = american_to_implied(Some(odds)).unwrap();
            assert!(p > 0.0 && p < 1.0, "implied({odds}) = {p}");
        }
    }

    #[test]
    fn test_clamp01() {
        assert_eq!(clamp01(-0.5), 0.0);
        assert_eq!(clamp01(0.0), 0.0);
        assert_eq!(clamp01(0.37), 0.37);
        assert_eq!(clamp01(1.0), 1.0);
        assert_eq!(clamp01(1.2), 1.0);
    }

    #[test]
    fn test_model_probability() {
        // -110 implies ~52.38%; +3% edge lands at ~55.38%
        let p = model_probability(Some(-110), Some(0.03)).unwrap();
        assert!((p - (110.0 / 210.0 + 0.03)).abs() < EPS);
    }

    #[test]
    fn test_model_probability_clamps() {
        // Heavy favorite plus a large edge cannot exceed 1.0
        let p = model_probability(Some(-10_000), Some(0.10)).unwrap();
        assert!(p <= 1.0);
    }

    #[test]
    fn test_model_probability_unknown_inputs() {
        assert!(model_probability(Some(0), Some(0.03)).is_none());
        assert!(model_probability(None, Some(0.03)).is_none());
        assert!(model_probability(Some(-110), None).is_none());
    }
}
