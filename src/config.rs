//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! Every knob the engine exposes (staking policy, signal tuning,
//! snapshot path) lives here; there is no process-wide mutable state.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub book: BookConfig,
    pub staking: StakingConfig,
    pub signal: SignalTuning,
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BookConfig {
    pub name: String,
    /// Seed for the signal jitter source; omit for a nondeterministic run.
    #[serde(default)]
    pub signal_seed: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StakingConfig {
    pub bankroll: f64,
    pub unit_size: f64,
    pub kelly_fraction: f64,
    pub max_units: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SignalTuning {
    pub edge_normalizer: f64,
    pub steam_threshold: f64,
    pub drift_normalizer: f64,
    pub jitter_max: f64,
    /// Score at which a row is flagged actionable.
    pub sharp_watch_threshold: u8,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub snapshot_file: String,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }
}
