//! Strategy engine — signal scoring and bankroll-aware evaluation.

pub mod kelly;
pub mod signal;

use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::odds;
use crate::types::{MarketRow, SignalResult};
use kelly::StakePolicy;
use signal::SignalEngine;

// ---------------------------------------------------------------------------
// Evaluated row
// ---------------------------------------------------------------------------

/// A market row plus everything the evaluator derived from it.
/// The input row is embedded untouched; evaluation never mutates inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatedRow {
    #[serde(flatten)]
    pub row: MarketRow,
    /// None when the row's price is unknown (odds of 0).
    pub decimal_odds: Option<f64>,
    pub implied_prob: Option<f64>,
    /// clamp01(implied + edge); None when the price is unknown.
    pub model_prob: Option<f64>,
    pub signal: SignalResult,
    /// Recommended stake in dollars; 0 for degenerate prices or when the
    /// model shows no advantage over the implied probability.
    pub stake: f64,
    /// The stake expressed in policy units.
    pub units: f64,
    /// True when the signal score reaches the sharp-watch threshold.
    pub actionable: bool,
}

// ---------------------------------------------------------------------------
// Evaluator
// ---------------------------------------------------------------------------

/// Batch-evaluates market rows against a bankroll/stake policy.
///
/// Pipeline per row: odds conversions → model probability → signal
/// score → fractional-Kelly stake → actionable flag.
pub struct Evaluator<R: Rng = StdRng> {
    signal: SignalEngine<R>,
    policy: StakePolicy,
    /// Signal score (inclusive) at which a row is flagged actionable.
    sharp_watch_threshold: u8,
}

impl<R: Rng> Evaluator<R> {
    pub fn new(signal: SignalEngine<R>, policy: StakePolicy, sharp_watch_threshold: u8) -> Self {
        Self {
            signal,
            policy,
            sharp_watch_threshold,
        }
    }

    /// Access the stake policy.
    pub fn policy(&self) -> &StakePolicy {
        &self.policy
    }

    /// Evaluate a batch of rows. Degenerate rows (unknown price, no model
    /// advantage) are returned with a zero stake, never dropped.
    pub fn evaluate(&mut self, rows: &[MarketRow]) -> Vec<EvaluatedRow> {
        let evaluated: Vec<EvaluatedRow> = rows.iter().map(|row| self.evaluate_row(row)).collect();

        info!(
            rows_in = rows.len(),
            actionable = evaluated.iter().filter(|r| r.actionable).count(),
            "Evaluation complete"
        );

        evaluated
    }

    fn evaluate_row(&mut self, row: &MarketRow) -> EvaluatedRow {
        let price = if row.odds == 0 { None } else { Some(row.odds) };
        let decimal_odds = odds::american_to_decimal(price);
        let implied_prob = odds::american_to_implied(price);
        let model_prob = odds::model_probability(price, Some(row.edge));

        let signal = self.signal.score(row.edge, row.odds_delta as f64);

        let stake = match (model_prob, decimal_odds) {
            (Some(p), Some(d)) => kelly::kelly_stake(&self.policy, p, d),
            _ => 0.0,
        };
        let units = kelly::units(&self.policy, stake);

        let actionable = signal.score >= self.sharp_watch_threshold;

        debug!(
            row = %row,
            score = signal.score,
            label = %signal.label,
            stake = format!("${:.2}", stake),
            actionable,
            "Row evaluated"
        );

        EvaluatedRow {
            row: row.clone(),
            decimal_odds,
            implied_prob,
            model_prob,
            signal,
            stake,
            units,
            actionable,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
