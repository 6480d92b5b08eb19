//! Market-signal scoring.
//!
//! Scores a single market observation (projected edge + line movement)
//! into a bounded confidence signal with a categorical label and a
//! steam-move flag.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::types::{SignalLabel, SignalResult};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Signal scoring configuration.
///
/// Edges are fractional throughout the engine: 0.05 = 5%.
#[derive(Debug, Clone)]
pub struct SignalConfig {
    /// Reference "typical maximum" edge for the market; edges are
    /// normalized onto [0, 1] against it.
    pub edge_normalizer: f64,
    /// Absolute odds movement (points) that counts as a steam move.
    pub steam_threshold: f64,
    /// Odds movement (points) at which drift intensity saturates.
    pub drift_normalizer: f64,
    /// Upper bound of the jitter term added to each score, standing in
    /// for measurement noise while no live feed is attached. 0 disables
    /// jitter entirely.
    pub jitter_max: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            edge_normalizer: 0.05,
            steam_threshold: 1.0,
            drift_normalizer: 2.0,
            jitter_max: 15.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Signal engine
// ---------------------------------------------------------------------------

/// Scores market observations. The random source is injected and
/// seedable so that scoring is reproducible under test and swappable
/// for a live odds-delta feed in production.
pub struct SignalEngine<R: Rng = StdRng> {
    config: SignalConfig,
    rng: R,
}

impl SignalEngine<StdRng> {
    /// Engine with a deterministic RNG derived from `seed`.
    pub fn seeded(config: SignalConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> SignalEngine<R> {
    pub fn new(config: SignalConfig, rng: R) -> Self {
        Self { config, rng }
    }

    /// Access the signal configuration.
    pub fn config(&self) -> &SignalConfig {
        &self.config
    }

    /// Score one observation.
    ///
    /// Weighted components: normalized edge (x30), steam flag (x35),
    /// drift intensity (x20), plus bounded jitter. The result is rounded
    /// and clamped to 0..=100; labels are inclusive lower bounds
    /// (>=81 ELITE, >=61 SHARP WATCH, >=31 INTEREST, else NOISE).
    pub fn score(&mut self, edge: f64, odds_delta: f64) -> SignalResult {
        let ev_score = (edge / self.config.edge_normalizer).clamp(0.0, 1.0);

        let steam = odds_delta.abs() >= self.config.steam_threshold;
        let steam_score = if steam { 1.0 } else { 0.0 };

        let drift_score = (odds_delta.abs() / self.config.drift_normalizer).min(1.0);

        let jitter = if self.config.jitter_max > 0.0 {
            self.rng.gen_range(0.0..self.config.jitter_max)
        } else {
            0.0
        };

        let raw = ev_score * 30.0 + steam_score * 35.0 + drift_score * 20.0 + jitter;
        let score = raw.round().clamp(0.0, 100.0) as u8;

        let label = label_for(score);

        debug!(
            edge = format!("{:.2}%", edge * 100.0),
            odds_delta,
            score,
            label = %label,
            steam,
            "Signal scored"
        );

        SignalResult { score, label, steam }
    }
}

/// Label for a score. Deterministic: the label is a pure function of the
/// (already jittered) score.
pub fn label_for(score: u8) -> SignalLabel {
    match score {
        81..=u8::MAX => SignalLabel::Elite,
        61..=80 => SignalLabel::SharpWatch,
        31..=60 => SignalLabel::Interest,
        _ => SignalLabel::Noise,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
