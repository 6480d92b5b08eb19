//! Settlement — resolves pending tickets to a final result.
//!
//! State machine: pending --settle--> settled (terminal). Settling an
//! already-settled ticket is a no-op that returns the stored result, so
//! settlement is idempotent by design. Exactly-once profit computation
//! under concurrent attempts comes from the store's conditional write,
//! not from any process-wide lock.

use tracing::{info, warn};

use crate::storage::TicketStore;
use crate::types::{BetResult, BookError, SettleRequest, Settlement, Ticket};

pub struct SettlementEngine<'a, S: TicketStore> {
    store: &'a S,
}

impl<'a, S: TicketStore> SettlementEngine<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Settle a ticket. Unknown ids fail with `NotFound`; already-settled
    /// tickets return the previously stored result without recomputation.
    pub fn settle(&self, id: i64, req: &SettleRequest) -> Result<Settlement, BookError> {
        let ticket = self.store.ticket(id)?.ok_or(BookError::NotFound(id))?;

        if let Some(stored) = ticket.settlement() {
            info!(ticket_id = id, result = %stored.result, "Already settled — returning stored result");
            return Ok(stored);
        }

        let profit = match req.profit_override {
            Some(p) => p,
            None => compute_profit(&ticket, req.result),
        };
        let clv = compute_clv(&ticket, req.closing_line);

        let wrote = self
            .store
            .update_settlement(id, req.result, profit, req.closing_line, clv)?;

        if !wrote {
            // Lost a settle race: another caller got there first. Return
            // what was stored, exactly as for any re-settlement.
            warn!(ticket_id = id, "Concurrent settlement detected — returning stored result");
            let ticket = self.store.ticket(id)?.ok_or(BookError::NotFound(id))?;
            return ticket
                .settlement()
                .ok_or_else(|| BookError::Storage(format!("ticket {id} settled without a result")));
        }

        info!(
            ticket_id = id,
            result = %req.result,
            profit = format!("${:.2}", profit),
            clv = ?clv,
            "Ticket settled"
        );

        Ok(Settlement {
            result: req.result,
            profit,
            clv,
        })
    }
}

/// Realized profit for a result.
///
/// Win pays `stake * decimal - cost`; when the decimal price was never
/// known the fallback is `stake - cost` (the explicit even-money
/// fallback, not a silent error). Push returns the stake, loss burns
/// the cost.
fn compute_profit(ticket: &Ticket, result: BetResult) -> f64 {
    match result {
        BetResult::Loss => -ticket.cost,
        BetResult::Push => 0.0,
        BetResult::Win => match ticket.decimal_odds {
            Some(d) => ticket.stake * d - ticket.cost,
            None => ticket.stake - ticket.cost,
        },
    }
}

/// Closing-line value: closing price minus the price taken, only for a
/// single-leg ticket with a recorded American price. Parlay CLV against
/// aggregate odds is out of scope, so parlays stay None.
fn compute_clv(ticket: &Ticket, closing_line: Option<i32>) -> Option<f64> {
    let closing = closing_line?;
    if ticket.legs.len() != 1 {
        return None;
    }
    let taken = ticket.legs[0].odds?;
    Some(f64::from(closing) - f64::from(taken))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
