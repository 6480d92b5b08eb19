//! Ticket persistence.
//!
//! The engine talks to a `TicketStore` collaborator and never to a
//! concrete database. `MemoryStore` is the reference implementation:
//! an in-process map with a JSON snapshot for durability between runs.
//! A relational store can implement the same trait later.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

use crate::types::{BetResult, BetType, BookError, ConfidenceTier, Ticket, TicketStatus};

// ---------------------------------------------------------------------------
// Store contract
// ---------------------------------------------------------------------------

/// Predicates for ticket queries. Empty filter matches everything.
#[derive(Debug, Clone, Default)]
pub struct TicketFilter {
    pub status: Option<TicketStatus>,
    pub tier: Option<ConfidenceTier>,
    pub bet_type: Option<BetType>,
}

impl TicketFilter {
    pub fn matches(&self, ticket: &Ticket) -> bool {
        self.status.map_or(true, |s| ticket.status == s)
            && self.tier.map_or(true, |t| ticket.tier == t)
            && self.bet_type.map_or(true, |b| ticket.bet_type == b)
    }
}

/// Storage collaborator contract.
///
/// `insert_ticket` commits a ticket and all of its legs as one atomic
/// unit. `update_settlement` is a conditional write: it returns false
/// when the ticket is already settled, which is what makes settlement
/// idempotent and exactly-once under concurrent attempts.
pub trait TicketStore {
    /// Atomically persist a ticket with its legs. Returns the assigned id.
    fn insert_ticket(&self, ticket: Ticket) -> Result<i64, BookError>;

    fn ticket(&self, id: i64) -> Result<Option<Ticket>, BookError>;

    /// Settle `id` only if it is still pending. Returns false (without
    /// writing) when the ticket was already settled; errors when the id
    /// is unknown.
    fn update_settlement(
        &self,
        id: i64,
        result: BetResult,
        profit: f64,
        closing_line: Option<i32>,
        clv: Option<f64>,
    ) -> Result<bool, BookError>;

    /// Tickets matching `filter`, in insertion order, at most `limit`.
    fn query_tickets(&self, filter: &TicketFilter, limit: usize) -> Result<Vec<Ticket>, BookError>;
}

// ---------------------------------------------------------------------------
// In-memory store with JSON snapshots
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreState {
    next_id: i64,
    tickets: BTreeMap<i64, Ticket>,
}

/// In-process ticket store. The single mutex serializes the
/// read-check-write inside `update_settlement`, which is the only
/// cross-operation invariant the engine needs from its store.
pub struct MemoryStore {
    state: Mutex<StoreState>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StoreState {
                next_id: 1,
                tickets: BTreeMap::new(),
            }),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, StoreState>, BookError> {
        self.state
            .lock()
            .map_err(|e| BookError::Storage(format!("store lock poisoned: {e}")))
    }

    /// Save a snapshot of all tickets to a JSON file.
    pub fn save(&self, path: &str) -> Result<()> {
        let state = self
            .state
            .lock()
            .map_err(|e| anyhow::anyhow!("store lock poisoned: {e}"))?;
        let json = serde_json::to_string_pretty(&*state)
            .context("Failed to serialise ticket store")?;
        std::fs::write(path, &json).context(format!("Failed to write snapshot to {path}"))?;
        debug!(path, tickets = state.tickets.len(), "Snapshot saved");
        Ok(())
    }

    /// Load a snapshot from a JSON file. Returns a fresh store when the
    /// file doesn't exist.
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            info!(path, "No snapshot found, starting fresh");
            return Ok(Self::new());
        }

        let json = std::fs::read_to_string(path)
            .context(format!("Failed to read snapshot from {path}"))?;
        let state: StoreState =
            serde_json::from_str(&json).context(format!("Failed to parse snapshot from {path}"))?;

        info!(path, tickets = state.tickets.len(), "Snapshot loaded");
        Ok(Self {
            state: Mutex::new(state),
        })
    }
}

impl TicketStore for MemoryStore {
    fn insert_ticket(&self, mut ticket: Ticket) -> Result<i64, BookError> {
        let mut state = self.lock()?;
        let id = state.next_id;
        state.next_id += 1;
        ticket.id = id;
        state.tickets.insert(id, ticket);
        Ok(id)
    }

    fn ticket(&self, id: i64) -> Result<Option<Ticket>, BookError> {
        let state = self.lock()?;
        Ok(state.tickets.get(&id).cloned())
    }

    fn update_settlement(
        &self,
        id: i64,
        result: BetResult,
        profit: f64,
        closing_line: Option<i32>,
        clv: Option<f64>,
    ) -> Result<bool, BookError> {
        let mut state = self.lock()?;
        let ticket = state.tickets.get_mut(&id).ok_or(BookError::NotFound(id))?;

        if ticket.status == TicketStatus::Settled {
            return Ok(false);
        }

        ticket.status = TicketStatus::Settled;
        ticket.result = Some(result);
        ticket.profit = Some(profit);
        ticket.closing_line = closing_line;
        ticket.clv = clv;
        Ok(true)
    }

    fn query_tickets(&self, filter: &TicketFilter, limit: usize) -> Result<Vec<Ticket>, BookError> {
        let state = self.lock()?;
        Ok(state
            .tickets
            .values()
            .filter(|t| filter.matches(t))
            .take(limit)
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;

    fn make_ticket(bet_type: BetType, tier: ConfidenceTier) -> Ticket {
        Ticket {
            id: 0,
            created_at: Utc::now(),
            bet_type,
            tier,
            stake: 25.0,
            cost: 25.0,
            decimal_odds: Some(2.0),
            implied_prob: Some(0.5),
            model_prob: Some(0.53),
            projected_edge: Some(0.03),
            ev_profit: Some(1.5),
            status: TicketStatus::Pending,
            result: None,
            profit: None,
            closing_line: None,
            clv: None,
            legs: Vec::new(),
            meta: HashMap::new(),
        }
    }

    fn temp_path() -> String {
        let mut p = std::env::temp_dir();
        p.push(format!(
            "sharpbook_test_store_{}_{:?}.json",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos(),
        ));
        p.to_string_lossy().to_string()
    }

    #[test]
    fn test_insert_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let a = store.insert_ticket(make_ticket(BetType::Single, ConfidenceTier::B)).unwrap();
        let b = store.insert_ticket(make_ticket(BetType::Parlay, ConfidenceTier::A)).unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, 2);
        assert_eq!(store.ticket(a).unwrap().unwrap().id, a);
    }

    #[test]
    fn test_get_unknown_is_none() {
        let store = MemoryStore::new();
        assert!(store.ticket(99).unwrap().is_none());
    }

    #[test]
    fn test_update_settlement_once() {
        let store = MemoryStore::new();
        let id = store.insert_ticket(make_ticket(BetType::Single, ConfidenceTier::B)).unwrap();

        let wrote = store
            .update_settlement(id, BetResult::Loss, -25.0, None, None)
            .unwrap();
        assert!(wrote);

        // Second attempt is a conditional no-op.
        let wrote_again = store
            .update_settlement(id, BetResult::Win, 999.0, None, None)
            .unwrap();
        assert!(!wrote_again);

        let t = store.ticket(id).unwrap().unwrap();
        assert_eq!(t.result, Some(BetResult::Loss));
        assert_eq!(t.profit, Some(-25.0));
    }

    #[test]
    fn test_update_settlement_unknown_id() {
        let store = MemoryStore::new();
        let err = store
            .update_settlement(7, BetResult::Win, 0.0, None, None)
            .unwrap_err();
        assert!(matches!(err, BookError::NotFound(7)));
    }

    #[test]
    fn test_query_filters_and_limit() {
        let store = MemoryStore::new();
        store.insert_ticket(make_ticket(BetType::Single, ConfidenceTier::A)).unwrap();
        store.insert_ticket(make_ticket(BetType::Single, ConfidenceTier::B)).unwrap();
        store.insert_ticket(make_ticket(BetType::Parlay, ConfidenceTier::A)).unwrap();

        let singles = store
            .query_tickets(
                &TicketFilter {
                    bet_type: Some(BetType::Single),
                    ..Default::default()
                },
                100,
            )
            .unwrap();
        assert_eq!(singles.len(), 2);

        let tier_a = store
            .query_tickets(
                &TicketFilter {
                    tier: Some(ConfidenceTier::A),
                    ..Default::default()
                },
                100,
            )
            .unwrap();
        assert_eq!(tier_a.len(), 2);

        let limited = store.query_tickets(&TicketFilter::default(), 1).unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].id, 1); // insertion order
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let path = temp_path();
        let store = MemoryStore::new();
        let id = store.insert_ticket(make_ticket(BetType::Parlay, ConfidenceTier::A)).unwrap();
        store.update_settlement(id, BetResult::Win, 25.0, None, None).unwrap();
        store.save(&path).unwrap();

        let restored = MemoryStore::load(&path).unwrap();
        let t = restored.ticket(id).unwrap().unwrap();
        assert_eq!(t.result, Some(BetResult::Win));

        // Id sequence continues after restore.
        let next = restored.insert_ticket(make_ticket(BetType::Single, ConfidenceTier::C)).unwrap();
        assert_eq!(next, id + 1);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_nonexistent_starts_fresh() {
        let store = MemoryStore::load("/tmp/sharpbook_nonexistent_snapshot_12345.json").unwrap();
        assert!(store.query_tickets(&TicketFilter::default(), 10).unwrap().is_empty());
    }
}
