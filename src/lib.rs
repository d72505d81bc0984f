//! Fetch, cache and status orchestration for a portfolio tracker's history data.
//!
//! Orchestrators pull trades, deposits and withdrawals, ledger actions, ethereum
//! transactions and staking data from the backend, wait on the backend's background
//! tasks and reconcile the results into a single-writer [`store::Store`].

pub mod config;
pub mod gateway;
pub mod history;
pub mod messages;
pub mod notifications;
pub mod staking;
pub mod store;
pub mod tasks;

#[cfg(test)]
pub(crate) mod testing;

pub use config::Config;
pub use history::{HistoryOrchestrator, HistorySyncError};
pub use staking::StakingOrchestrator;
