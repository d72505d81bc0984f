//! History fetching and cache reconciliation.

mod gitcoin;
mod housekeeping;
mod ignore;
mod locations;
mod manual;
mod orchestrator;
pub mod reconcile;
mod types;

pub use locations::{AssetMovements, LedgerActions, LocationCategory, Trades};
pub use orchestrator::HistoryOrchestrator;
pub use types::*;
