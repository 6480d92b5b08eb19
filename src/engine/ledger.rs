//! Ticket ledger — turns validated selections into stored tickets.
//!
//! Owns ticket and leg composition: per-leg derived fields are computed
//! and frozen at insertion time, ticket-level aggregates are fixed at
//! creation, and every ticket is committed with its legs as one atomic
//! unit through the storage collaborator.

use chrono::Utc;
use tracing::{debug, info};

use crate::odds;
use crate::storage::TicketStore;
use crate::types::{
    BetType, BookError, ConfidenceTier, Leg, LegInput, Ticket, TicketCreateRequest, TicketStatus,
};

pub struct TicketLedger<'a, S: TicketStore> {
    store: &'a S,
}

impl<'a, S: TicketStore> TicketLedger<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Create tickets from a submission.
    ///
    /// A `single` request with N legs produces N independent one-leg
    /// tickets (one row per analytic unit); a `parlay` produces exactly
    /// one ticket carrying all legs. Returns the assigned ids in
    /// creation order.
    pub fn create(&self, req: &TicketCreateRequest) -> Result<Vec<i64>, BookError> {
        if req.legs.is_empty() {
            return Err(BookError::Validation("empty leg list".into()));
        }
        if !(req.stake > 0.0) {
            return Err(BookError::Validation(format!(
                "stake must be positive, got {}",
                req.stake
            )));
        }

        let ids = match req.bet_type {
            BetType::Single => {
                let mut ids = Vec::with_capacity(req.legs.len());
                for input in &req.legs {
                    let leg = freeze_leg(input);
                    let ticket = compose_ticket(BetType::Single, req, vec![leg]);
                    ids.push(self.store.insert_ticket(ticket)?);
                }
                ids
            }
            BetType::Parlay => {
                let legs: Vec<Leg> = req.legs.iter().map(freeze_leg).collect();
                let ticket = compose_ticket(BetType::Parlay, req, legs);
                vec![self.store.insert_ticket(ticket)?]
            }
        };

        info!(
            bet_type = %req.bet_type,
            legs = req.legs.len(),
            tickets = ids.len(),
            stake = format!("${:.2}", req.stake),
            "Ticket(s) created"
        );

        Ok(ids)
    }

    /// Read a ticket with its legs.
    pub fn ticket(&self, id: i64) -> Result<Ticket, BookError> {
        self.store.ticket(id)?.ok_or(BookError::NotFound(id))
    }
}

/// Freeze a leg: derived fields are computed once here and never
/// recomputed, so later odds changes cannot alter a stored leg.
fn freeze_leg(input: &LegInput) -> Leg {
    // An explicit 0 is not a quotable price; treat it as unknown.
    let price = input.odds.filter(|o| *o != 0);

    Leg {
        sport: input.sport.clone(),
        start: input.start.clone(),
        matchup: input.matchup.clone(),
        market_type: input.market_type,
        market: input.market.clone(),
        line: input.line.clone(),
        odds: price,
        book: input.book.clone(),
        edge: input.edge,
        signal_score: input.signal_score,
        signal_label: input.signal_label,
        steam: input.steam,
        decimal_odds: odds::american_to_decimal(price),
        implied_prob: odds::american_to_implied(price),
        model_prob: odds::model_probability(price, input.edge),
    }
}

fn compose_ticket(bet_type: BetType, req: &TicketCreateRequest, legs: Vec<Leg>) -> Ticket {
    let decimal_odds = product_over(&legs, |l| l.decimal_odds);
    let implied_prob = product_over(&legs, |l| l.implied_prob);
    let model_prob = product_over(&legs, |l| l.model_prob);
    let projected_edge = mean_edge(&legs);
    let tier = ConfidenceTier::from_edge(projected_edge);

    let cost = req.stake;
    let ev_profit = match (decimal_odds, model_prob) {
        (Some(d), Some(p)) => Some(cost * (d * p - 1.0)),
        _ => None,
    };

    debug!(
        bet_type = %bet_type,
        legs = legs.len(),
        tier = %tier,
        decimal = ?decimal_odds,
        edge = ?projected_edge,
        ev = ?ev_profit,
        "Ticket composed"
    );

    Ticket {
        id: 0,
        created_at: Utc::now(),
        bet_type,
        tier,
        stake: req.stake,
        cost,
        decimal_odds,
        implied_prob,
        model_prob,
        projected_edge,
        ev_profit,
        status: TicketStatus::Pending,
        result: None,
        profit: None,
        closing_line: None,
        clv: None,
        legs,
        meta: req.meta.clone(),
    }
}

/// Product across legs with a known value. Legs with an unknown value
/// are excluded from the product, not treated as fatal; the aggregate is
/// None only when no leg has a known value.
fn product_over(legs: &[Leg], f: impl Fn(&Leg) -> Option<f64>) -> Option<f64> {
    let known: Vec<f64> = legs.iter().filter_map(&f).collect();
    if known.is_empty() {
        None
    } else {
        Some(known.iter().product())
    }
}

/// Arithmetic mean of the legs' individual edges. Deliberately not
/// compounded: true parlay edge is not the mean of marginal edges, but
/// this is the inherited product definition.
fn mean_edge(legs: &[Leg]) -> Option<f64> {
    let known: Vec<f64> = legs.iter().filter_map(|l| l.edge).collect();
    if known.is_empty() {
        None
    } else {
        Some(known.iter().sum::<f64>() / known.len() as f64)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
