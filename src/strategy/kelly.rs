//! Fractional-Kelly stake sizing.
//!
//! Converts a model probability and a decimal price into a recommended
//! stake, expressed against a bankroll/unit policy with a hard unit cap.

use tracing::debug;

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Bankroll and staking policy used for sizing recommendations.
#[derive(Debug, Clone)]
pub struct StakePolicy {
    /// Total bankroll in dollars.
    pub bankroll: f64,
    /// Dollar value of one betting unit.
    pub unit_size: f64,
    /// Fractional Kelly multiplier (0.25 = quarter-Kelly). Lower = more conservative.
    pub kelly_fraction: f64,
    /// Hard cap on a recommendation, in units.
    pub max_units: f64,
}

impl Default for StakePolicy {
    fn default() -> Self {
        Self {
            bankroll: 1000.0,
            unit_size: 25.0,
            kelly_fraction: 0.25, // Quarter-Kelly: conservative
            max_units: 3.0,
        }
    }
}

impl StakePolicy {
    /// Dollar cap implied by `max_units`.
    pub fn max_stake(&self) -> f64 {
        self.max_units * self.unit_size
    }
}

// ---------------------------------------------------------------------------
// Sizing
// ---------------------------------------------------------------------------

/// Recommended stake in dollars for a selection.
///
/// Kelly formula on decimal odds d and model probability p:
///   f* = (p*d - 1) / (d - 1)
/// scaled by the policy's Kelly fraction and bankroll, floored at 0
/// (never recommend a negative stake) and capped at `max_units` units.
/// Degenerate prices (d <= 1) size to 0.
pub fn kelly_stake(policy: &StakePolicy, model_prob: f64, decimal_odds: f64) -> f64 {
    if decimal_odds <= 1.0 || policy.bankroll <= 0.0 {
        return 0.0;
    }

    let kelly = (model_prob * decimal_odds - 1.0) / (decimal_odds - 1.0);
    if kelly <= 0.0 {
        debug!(kelly, "Negative Kelly — no stake");
        return 0.0;
    }

    let raw = policy.kelly_fraction * policy.bankroll * kelly;
    let capped = raw.min(policy.max_stake());

    debug!(
        raw_kelly = format!("{:.2}%", kelly * 100.0),
        stake = format!("${:.2}", capped),
        units = format!("{:.2}", capped / policy.unit_size),
        "Stake sized"
    );

    capped
}

/// A stake expressed in units of the policy's unit size.
pub fn units(policy: &StakePolicy, stake: f64) -> f64 {
    if policy.unit_size <= 0.0 {
        return 0.0;
    }
    stake / policy.unit_size
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
