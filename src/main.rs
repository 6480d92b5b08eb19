//! SHARPBOOK — Sports Wagering Evaluation & Ledger Engine
//!
//! Demo entry point. Loads configuration, initialises structured
//! logging, restores the ticket snapshot (or starts fresh), evaluates
//! the demo slate with simulated line movement, books the actionable
//! rows as a ticket, and logs the running performance summary.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use sharpbook::config::AppConfig;
use sharpbook::engine::ledger::TicketLedger;
use sharpbook::engine::performance::PerformanceAggregator;
use sharpbook::storage::MemoryStore;
use sharpbook::strategy::kelly::StakePolicy;
use sharpbook::strategy::signal::{SignalConfig, SignalEngine};
use sharpbook::strategy::{EvaluatedRow, Evaluator};
use sharpbook::types::{BetType, LegInput, MarketKind, MarketRow, TicketCreateRequest};

const BANNER: &str = r#"
 ____  _   _    _    ____  ____  ____   ___   ___  _  __
/ ___|| | | |  / \  |  _ \|  _ \| __ ) / _ \ / _ \| |/ /
\___ \| |_| | / _ \ | |_) | |_) |  _ \| | | | | | | ' /
 ___) |  _  |/ ___ \|  _ <|  __/| |_) | |_| | |_| | . \
|____/|_| |_/_/   \_\_| \_\_|   |____/ \___/ \___/|_|\_\

  Sports Wagering Evaluation & Ledger Engine
  v0.1.0 — Demo Driver
"#;

fn main() -> Result<()> {
    let cfg = AppConfig::load("config.toml")?;

    init_logging();

    println!("{BANNER}");
    info!(
        book = %cfg.book.name,
        bankroll = cfg.staking.bankroll,
        unit_size = cfg.staking.unit_size,
        "SHARPBOOK starting up"
    );

    // -- Restore or create the ticket store -------------------------------

    let store = MemoryStore::load(&cfg.storage.snapshot_file)?;

    // -- Build the evaluation pipeline ------------------------------------

    let mut rng = match cfg.book.signal_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let signal_config = SignalConfig {
        edge_normalizer: cfg.signal.edge_normalizer,
        steam_threshold: cfg.signal.steam_threshold,
        drift_normalizer: cfg.signal.drift_normalizer,
        jitter_max: cfg.signal.jitter_max,
    };
    let policy = StakePolicy {
        bankroll: cfg.staking.bankroll,
        unit_size: cfg.staking.unit_size,
        kelly_fraction: cfg.staking.kelly_fraction,
        max_units: cfg.staking.max_units,
    };

    let signal_rng = StdRng::seed_from_u64(rng.gen());
    let mut evaluator = Evaluator::new(
        SignalEngine::new(signal_config, signal_rng),
        policy,
        cfg.signal.sharp_watch_threshold,
    );

    // -- Evaluate the demo slate ------------------------------------------

    let slate = demo_slate(&mut rng);
    let evaluated = evaluator.evaluate(&slate);

    for row in &evaluated {
        info!(
            row = %row.row,
            score = row.signal.score,
            label = %row.signal.label,
            steam = row.signal.steam,
            stake = format!("${:.2}", row.stake),
            units = format!("{:.2}", row.units),
            actionable = row.actionable,
            "Board row"
        );
    }

    // -- Book the actionable rows as single tickets ------------------------

    let actionable: Vec<&EvaluatedRow> = evaluated.iter().filter(|r| r.actionable).collect();
    if actionable.is_empty() {
        info!("No actionable rows on this slate");
    } else {
        let ledger = TicketLedger::new(&store);
        let request = TicketCreateRequest {
            bet_type: BetType::Single,
            stake: cfg.staking.unit_size,
            legs: actionable.iter().map(|r| leg_from_row(r)).collect(),
            meta: Default::default(),
        };
        let ids = ledger.create(&request)?;
        info!(tickets = ?ids, "Actionable rows booked");
    }

    // -- Report ------------------------------------------------------------

    let summary = PerformanceAggregator::new(&store).summary()?;
    info!(
        tickets = summary.overall.tickets,
        settled = summary.overall.settled,
        win_rate = format!("{:.1}%", summary.overall.win_rate * 100.0),
        profit = format!("${:.2}", summary.overall.profit),
        roi = format!("{:.1}%", summary.overall.roi * 100.0),
        last_30d = format!("${:.2}", summary.last_30d_profit),
        "Performance summary"
    );

    store.save(&cfg.storage.snapshot_file)?;
    info!(path = %cfg.storage.snapshot_file, "Snapshot saved — done");

    Ok(())
}

/// The demo board: three selections with simulated line movement, the
/// stand-in for a live odds feed.
fn demo_slate(rng: &mut StdRng) -> Vec<MarketRow> {
    let base = [
        ("NCAAB", "02/18, 10:18 PM", "KANSAS @ BAYLOR", MarketKind::Moneyline, "KANSAS", -135, "DraftKings", 0.025),
        ("NBA", "02/18, 8:57 PM", "BOS @ MIA", MarketKind::Spread, "BOS -2.5", -110, "Circa", 0.020),
        ("NFL", "02/18, 10:37 PM", "KC @ CIN", MarketKind::Total, "O 47.5", -108, "FanDuel", 0.015),
    ];

    base.iter()
        .map(|(sport, start, matchup, market, line, base_odds, book, edge)| {
            let delta: i32 = rng.gen_range(-1..=1);
            MarketRow {
                sport: sport.to_string(),
                start: start.to_string(),
                matchup: matchup.to_string(),
                market: *market,
                line: line.to_string(),
                odds: base_odds + delta,
                book: book.to_string(),
                edge: *edge,
                odds_delta: delta,
            }
        })
        .collect()
}

fn leg_from_row(row: &EvaluatedRow) -> LegInput {
    LegInput {
        sport: Some(row.row.sport.clone()),
        start: Some(row.row.start.clone()),
        matchup: Some(row.row.matchup.clone()),
        market_type: Some(row.row.market),
        market: Some(row.row.market.to_string()),
        line: Some(row.row.line.clone()),
        odds: Some(row.row.odds),
        book: Some(row.row.book.clone()),
        edge: Some(row.row.edge),
        signal_score: Some(row.signal.score),
        signal_label: Some(row.signal.label),
        steam: row.signal.steam,
    }
}

fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sharpbook=info"));

    let json_logging = std::env::var("SHARPBOOK_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .init();
    }
}
