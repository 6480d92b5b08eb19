//! Performance aggregation — read-only views over the ticket population.
//!
//! Every call recomputes from current ticket state; there is no cached
//! aggregate to go stale, at the cost of O(n) per call. Every ratio with
//! an empty denominator resolves to 0 so dashboards always render.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::storage::{TicketFilter, TicketStore};
use crate::types::{BetResult, BetType, BookError, ConfidenceTier, Ticket};

// ---------------------------------------------------------------------------
// Summary records
// ---------------------------------------------------------------------------

/// Settled-performance tuple for one slice of the population.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub tickets: u64,
    pub settled: u64,
    pub wins: u64,
    pub losses: u64,
    /// wins / settled; 0 with no settled tickets.
    pub win_rate: f64,
    /// Realized profit over settled tickets.
    pub profit: f64,
    /// Cost risked on settled tickets.
    pub cost: f64,
    /// profit / cost; 0 when cost is 0.
    pub roi: f64,
}

/// Global and sliced performance view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceSummary {
    pub overall: GroupStats,
    /// Realized profit on tickets created in the trailing 30 days.
    pub last_30d_profit: f64,
    pub by_tier: HashMap<ConfidenceTier, GroupStats>,
    pub by_bet_type: HashMap<BetType, GroupStats>,
}

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

pub struct PerformanceAggregator<'a, S: TicketStore> {
    store: &'a S,
}

impl<'a, S: TicketStore> PerformanceAggregator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Compute the full summary from current ticket state.
    pub fn summary(&self) -> Result<PerformanceSummary, BookError> {
        let tickets = self.store.query_tickets(&TicketFilter::default(), usize::MAX)?;

        let overall = group_stats(tickets.iter());

        let window_start = Utc::now() - Duration::days(30);
        let last_30d_profit: f64 = tickets
            .iter()
            .filter(|t| t.created_at >= window_start)
            .filter_map(|t| t.profit)
            .sum();

        let mut by_tier = HashMap::new();
        for tier in ConfidenceTier::ALL {
            by_tier.insert(*tier, group_stats(tickets.iter().filter(|t| t.tier == *tier)));
        }

        let mut by_bet_type = HashMap::new();
        for bet_type in [BetType::Single, BetType::Parlay] {
            by_bet_type.insert(
                bet_type,
                group_stats(tickets.iter().filter(|t| t.bet_type == bet_type)),
            );
        }

        Ok(PerformanceSummary {
            overall,
            last_30d_profit,
            by_tier,
            by_bet_type,
        })
    }
}

fn group_stats<'t>(tickets: impl Iterator<Item = &'t Ticket>) -> GroupStats {
    let mut stats = GroupStats::default();

    for ticket in tickets {
        stats.tickets += 1;
        if !ticket.is_settled() {
            continue;
        }
        stats.settled += 1;
        match ticket.result {
            Some(BetResult::Win) => stats.wins += 1,
            Some(BetResult::Loss) => stats.losses += 1,
            _ => {}
        }
        stats.profit += ticket.profit.unwrap_or(0.0);
        stats.cost += ticket.cost;
    }

    if stats.settled > 0 {
        stats.win_rate = stats.wins as f64 / stats.settled as f64;
    }
    if stats.cost > 0.0 {
        stats.roi = stats.profit / stats.cost;
    }

    stats
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ledger::TicketLedger;
    use crate::engine::settlement::SettlementEngine;
    use crate::storage::MemoryStore;
    use crate::types::{LegInput, SettleRequest, TicketCreateRequest};
    use std::collections::HashMap as Meta;

    fn create(store: &MemoryStore, bet_type: BetType, odds: i32, edge: f64, stake: f64) -> i64 {
        let legs = match bet_type {
            BetType::Single => vec![LegInput { odds: Some(odds), edge: Some(edge), ..Default::default() }],
            BetType::Parlay => vec![
                LegInput { odds: Some(odds), edge: Some(edge), ..Default::default() },
                LegInput { odds: Some(odds), edge: Some(edge), ..Default::default() },
            ],
        };
        TicketLedger::new(store)
            .create(&TicketCreateRequest { bet_type, stake, legs, meta: Meta::new() })
            .unwrap()[0]
    }

    fn settle(store: &MemoryStore, id: i64, result: BetResult) {
        SettlementEngine::new(store)
            .settle(id, &SettleRequest { result, closing_line: None, profit_override: None })
            .unwrap();
    }

    #[test]
    fn test_empty_population_all_zero() {
        let store = MemoryStore::new();
        let summary = PerformanceAggregator::new(&store).summary().unwrap();
        assert_eq!(summary.overall.tickets, 0);
        assert_eq!(summary.overall.win_rate, 0.0);
        assert_eq!(summary.overall.roi, 0.0);
        assert_eq!(summary.last_30d_profit, 0.0);
    }

    #[test]
    fn test_pending_tickets_counted_but_not_settled() {
        let store = MemoryStore::new();
        create(&store, BetType::Single, -110, 0.03, 25.0);
        create(&store, BetType::Single, -110, 0.03, 25.0);

        let summary = PerformanceAggregator::new(&store).summary().unwrap();
        assert_eq!(summary.overall.tickets, 2);
        assert_eq!(summary.overall.settled, 0);
        // Zero settled: no division happens, everything stays 0.
        assert_eq!(summary.overall.win_rate, 0.0);
        assert_eq!(summary.overall.roi, 0.0);
    }

    #[test]
    fn test_global_tallies() {
        let store = MemoryStore::new();
        // +100 single, stake 25: win pays +25.
        let w = create(&store, BetType::Single, 100, 0.07, 25.0);
        let l = create(&store, BetType::Single, 100, 0.01, 25.0);
        let p = create(&store, BetType::Single, 100, 0.04, 25.0);
        settle(&store, w, BetResult::Win);
        settle(&store, l, BetResult::Loss);
        settle(&store, p, BetResult::Push);

        let s = PerformanceAggregator::new(&store).summary().unwrap();
        assert_eq!(s.overall.tickets, 3);
        assert_eq!(s.overall.settled, 3);
        assert_eq!(s.overall.wins, 1);
        assert_eq!(s.overall.losses, 1);
        assert!((s.overall.win_rate - 1.0 / 3.0).abs() < 1e-9);
        assert!((s.overall.profit - 0.0).abs() < 1e-9); // +25 - 25 + 0
        assert!((s.overall.cost - 75.0).abs() < 1e-9);
        assert_eq!(s.overall.roi, 0.0);
        assert!((s.last_30d_profit - 0.0).abs() < 1e-9);
    }

    #[test]
    fn test_roi_over_settled_cost() {
        let store = MemoryStore::new();
        let w = create(&store, BetType::Single, 100, 0.07, 50.0);
        settle(&store, w, BetResult::Win); // +50 on 50 risked
        create(&store, BetType::Single, 100, 0.07, 500.0); // pending, excluded

        let s = PerformanceAggregator::new(&store).summary().unwrap();
        assert!((s.overall.roi - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_tier_slices() {
        let store = MemoryStore::new();
        let a = create(&store, BetType::Single, 100, 0.07, 25.0); // tier A
        let c = create(&store, BetType::Single, 100, 0.01, 25.0); // tier C
        settle(&store, a, BetResult::Win);
        settle(&store, c, BetResult::Loss);

        let s = PerformanceAggregator::new(&store).summary().unwrap();
        let tier_a = &s.by_tier[&ConfidenceTier::A];
        assert_eq!(tier_a.tickets, 1);
        assert_eq!(tier_a.wins, 1);
        assert!((tier_a.profit - 25.0).abs() < 1e-9);

        let tier_b = &s.by_tier[&ConfidenceTier::B];
        assert_eq!(tier_b.tickets, 0);
        assert_eq!(tier_b.roi, 0.0);

        let tier_c = &s.by_tier[&ConfidenceTier::C];
        assert_eq!(tier_c.losses, 1);
        assert!((tier_c.profit + 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_bet_type_slices() {
        let store = MemoryStore::new();
        let single = create(&store, BetType::Single, 100, 0.03, 25.0);
        let parlay = create(&store, BetType::Parlay, 100, 0.03, 10.0);
        settle(&store, single, BetResult::Loss);
        settle(&store, parlay, BetResult::Win); // 2-leg +100 parlay: d = 4.0, +30

        let s = PerformanceAggregator::new(&store).summary().unwrap();
        let singles = &s.by_bet_type[&BetType::Single];
        assert_eq!(singles.tickets, 1);
        assert!((singles.profit + 25.0).abs() < 1e-9);

        let parlays = &s.by_bet_type[&BetType::Parlay];
        assert_eq!(parlays.tickets, 1);
        assert!((parlays.profit - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_recent_profit_window_includes_fresh_tickets() {
        let store = MemoryStore::new();
        let id = create(&store, BetType::Single, 100, 0.03, 25.0);
        settle(&store, id, BetResult::Win);

        let s = PerformanceAggregator::new(&store).summary().unwrap();
        // Created just now — inside the trailing window.
        assert!((s.last_30d_profit - 25.0).abs() < 1e-9);
    }
}
