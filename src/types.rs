//! Shared types for the SHARPBOOK engine.
//!
//! These types form the data model used across all modules.
//! They are designed to be stable so that strategy, engine,
//! and storage modules can depend on them without circular references.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Market rows
// ---------------------------------------------------------------------------

/// A single market observation from the board: one selection at one book
/// at one price. Ephemeral — consumed by evaluation, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketRow {
    pub sport: String,
    /// Display start time, e.g. "02/18, 10:18 PM".
    pub start: String,
    pub matchup: String,
    pub market: MarketKind,
    /// Selection label, e.g. "BOS -2.5" or "O 47.5".
    pub line: String,
    /// American odds. 0 means the price is unknown.
    pub odds: i32,
    pub book: String,
    /// Projected edge as a fraction: 0.03 = 3%.
    pub edge: f64,
    /// Signed movement (American-odds points) since the row was first
    /// observed. 0 when no live movement is modeled.
    #[serde(default)]
    pub odds_delta: i32,
}

impl fmt::Display for MarketRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {} {} @ {:+} ({}, edge {:.1}%)",
            self.sport,
            self.matchup,
            self.market,
            self.line,
            self.odds,
            self.book,
            self.edge * 100.0,
        )
    }
}

/// Market type for a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketKind {
    Moneyline,
    Spread,
    Total,
    Prop,
}

impl fmt::Display for MarketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketKind::Moneyline => write!(f, "ML"),
            MarketKind::Spread => write!(f, "SPREAD"),
            MarketKind::Total => write!(f, "TOTAL"),
            MarketKind::Prop => write!(f, "PROP"),
        }
    }
}

impl std::str::FromStr for MarketKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ml" | "moneyline" => Ok(MarketKind::Moneyline),
            "spread" => Ok(MarketKind::Spread),
            "total" | "totals" => Ok(MarketKind::Total),
            "prop" => Ok(MarketKind::Prop),
            other => Err(anyhow::anyhow!("Unknown market kind: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Signals
// ---------------------------------------------------------------------------

/// Confidence label on an ordered scale, derived from the signal score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SignalLabel {
    #[serde(rename = "NOISE")]
    Noise,
    #[serde(rename = "INTEREST")]
    Interest,
    #[serde(rename = "SHARP WATCH")]
    SharpWatch,
    #[serde(rename = "ELITE")]
    Elite,
}

impl fmt::Display for SignalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalLabel::Noise => write!(f, "NOISE"),
            SignalLabel::Interest => write!(f, "INTEREST"),
            SignalLabel::SharpWatch => write!(f, "SHARP WATCH"),
            SignalLabel::Elite => write!(f, "ELITE"),
        }
    }
}

/// Scored market signal. Immutable once produced.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SignalResult {
    /// Bounded confidence score in 0..=100.
    pub score: u8,
    pub label: SignalLabel,
    /// True when the price moved at least the steam threshold.
    pub steam: bool,
}

// ---------------------------------------------------------------------------
// Tickets and legs
// ---------------------------------------------------------------------------

/// Wager composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetType {
    Single,
    Parlay,
}

impl fmt::Display for BetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetType::Single => write!(f, "single"),
            BetType::Parlay => write!(f, "parlay"),
        }
    }
}

/// Ticket lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Pending,
    Settled,
}

/// Final outcome of a settled ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetResult {
    Win,
    Loss,
    Push,
}

impl fmt::Display for BetResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BetResult::Win => write!(f, "win"),
            BetResult::Loss => write!(f, "loss"),
            BetResult::Push => write!(f, "push"),
        }
    }
}

/// Confidence tier assigned at creation from the projected edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfidenceTier {
    A,
    B,
    C,
}

impl ConfidenceTier {
    /// All tiers in descending order of confidence.
    pub const ALL: &'static [ConfidenceTier] =
        &[ConfidenceTier::A, ConfidenceTier::B, ConfidenceTier::C];

    /// Classify a fractional projected edge: >= 6% is A, >= 3% is B,
    /// everything else (including unknown) is C.
    pub fn from_edge(edge: Option<f64>) -> Self {
        match edge {
            Some(e) if e >= 0.06 => ConfidenceTier::A,
            Some(e) if e >= 0.03 => ConfidenceTier::B,
            _ => ConfidenceTier::C,
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfidenceTier::A => write!(f, "A"),
            ConfidenceTier::B => write!(f, "B"),
            ConfidenceTier::C => write!(f, "C"),
        }
    }
}

/// One selection on a ticket submission. Everything is optional —
/// partial rows are accepted and unknown values stay unknown.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegInput {
    pub sport: Option<String>,
    pub start: Option<String>,
    pub matchup: Option<String>,
    pub market_type: Option<MarketKind>,
    pub market: Option<String>,
    pub line: Option<String>,
    pub odds: Option<i32>,
    pub book: Option<String>,
    /// Projected edge as a fraction: 0.06 = 6%.
    pub edge: Option<f64>,
    pub signal_score: Option<u8>,
    pub signal_label: Option<SignalLabel>,
    #[serde(default)]
    pub steam: bool,
}

/// A selection frozen into a ticket. Derived fields are computed once at
/// creation time; later price moves never alter a stored leg.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Leg {
    pub sport: Option<String>,
    pub start: Option<String>,
    pub matchup: Option<String>,
    pub market_type: Option<MarketKind>,
    pub market: Option<String>,
    pub line: Option<String>,
    pub odds: Option<i32>,
    pub book: Option<String>,
    pub edge: Option<f64>,
    pub signal_score: Option<u8>,
    pub signal_label: Option<SignalLabel>,
    pub steam: bool,
    /// Decimal odds derived from `odds`; None when the price is unknown.
    pub decimal_odds: Option<f64>,
    /// Implied probability derived from `odds`; None when unknown.
    pub implied_prob: Option<f64>,
    /// clamp01(implied + edge); None when either input is unknown.
    pub model_prob: Option<f64>,
}

/// The unit of wagering accounting. A ticket exclusively owns its legs;
/// a leg never outlives its ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    /// Store-assigned id (0 until inserted).
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub bet_type: BetType,
    pub tier: ConfidenceTier,
    /// Wager amount, strictly positive.
    pub stake: f64,
    /// Amount at risk. Equals stake in this model.
    pub cost: f64,
    pub decimal_odds: Option<f64>,
    pub implied_prob: Option<f64>,
    pub model_prob: Option<f64>,
    /// Mean of the legs' fractional edges.
    pub projected_edge: Option<f64>,
    /// Expected-value profit at creation: cost * (decimal * model_prob - 1).
    pub ev_profit: Option<f64>,
    pub status: TicketStatus,
    pub result: Option<BetResult>,
    pub profit: Option<f64>,
    pub closing_line: Option<i32>,
    pub clv: Option<f64>,
    pub legs: Vec<Leg>,
    #[serde(default)]
    pub meta: HashMap<String, serde_json::Value>,
}

impl Ticket {
    pub fn is_settled(&self) -> bool {
        self.status == TicketStatus::Settled
    }

    /// The stored settlement, when the ticket has one.
    pub fn settlement(&self) -> Option<Settlement> {
        let result = self.result?;
        Some(Settlement {
            result,
            profit: self.profit.unwrap_or(0.0),
            clv: self.clv,
        })
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Ticket #{} [{} | tier {}] stake ${:.2}, {} leg(s), {:?}",
            self.id,
            self.bet_type,
            self.tier,
            self.stake,
            self.legs.len(),
            self.status,
        )
    }
}

// ---------------------------------------------------------------------------
// Requests and settlement record
// ---------------------------------------------------------------------------

/// Ticket submission. A `single` request with N legs produces N
/// independent one-leg tickets; a `parlay` produces one ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketCreateRequest {
    pub bet_type: BetType,
    pub stake: f64,
    pub legs: Vec<LegInput>,
    #[serde(default)]
    pub meta: HashMap<String, serde_json::Value>,
}

/// Settlement submission for a pending ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettleRequest {
    pub result: BetResult,
    pub closing_line: Option<i32>,
    /// Takes precedence verbatim over the computed profit.
    pub profit_override: Option<f64>,
}

/// Outcome of a settlement (fresh or previously stored).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub result: BetResult,
    pub profit: f64,
    pub clv: Option<f64>,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for SHARPBOOK.
#[derive(Debug, thiserror::Error)]
pub enum BookError {
    /// Rejected at the boundary, before anything was persisted.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Ticket not found: {0}")]
    NotFound(i64),

    #[error("Storage error: {0}")]
    Storage(String),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
