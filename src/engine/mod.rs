//! Ledger engine — ticket composition, settlement, and performance.

pub mod ledger;
pub mod performance;
pub mod settlement;
