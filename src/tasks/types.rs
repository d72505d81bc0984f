use crate::gateway::{GatewayError, Location, TaskId};
use std::fmt;

/// Kind of background task. At most one fetch flow per kind is started at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskType {
    Trades,
    Movements,
    LedgerActions,
    Tx,
    StakingEth2,
    StakingEth2Deposits,
    StakingAdex,
    StakingAdexHistory,
    GitcoinGrantEvents,
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TaskType::Trades => "trades",
            TaskType::Movements => "movements",
            TaskType::LedgerActions => "ledger_actions",
            TaskType::Tx => "tx",
            TaskType::StakingEth2 => "staking_eth2",
            TaskType::StakingEth2Deposits => "staking_eth2_deposits",
            TaskType::StakingAdex => "staking_adex",
            TaskType::StakingAdexHistory => "staking_adex_history",
            TaskType::GitcoinGrantEvents => "gitcoin_grant_events",
        };
        f.write_str(name)
    }
}

/// Display and decoding metadata attached to an awaited task.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskMeta {
    pub title: String,
    pub description: Option<String>,
    /// Fields whose values must be coerced to decimal numbers before decoding.
    pub numeric_keys: Vec<String>,
    pub location: Option<Location>,
    pub address: Option<String>,
}

impl TaskMeta {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_numeric_keys(mut self, keys: &[&str]) -> Self {
        self.numeric_keys = keys.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn with_location(mut self, location: &Location) -> Self {
        self.location = Some(location.clone());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

/// Error types for awaiting background tasks
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("{0}")]
    Failed(String),

    #[error("Task {0} was not found")]
    NotFound(TaskId),

    #[error("Task {0} is still pending")]
    Pending(TaskId),

    #[error("Timed out waiting for task {0}")]
    TimedOut(TaskId),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Failed to decode task result: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Field {key} is not a number: {value}")]
    Numeric { key: String, value: String },
}
