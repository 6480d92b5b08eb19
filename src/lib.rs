//! SHARPBOOK — Sports Wagering Evaluation & Ledger Engine
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod engine;
pub mod odds;
pub mod storage;
pub mod strategy;
pub mod types;
