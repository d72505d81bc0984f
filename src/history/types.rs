use crate::gateway::{GatewayError, IgnoreActionType, Location};
use crate::tasks::TaskError;

use serde::{Deserialize, Serialize};

/// Error types for history and staking orchestration
#[derive(Debug, thiserror::Error)]
pub enum HistorySyncError {
	#[error(transparent)]
	Gateway(#[from] GatewayError),

	#[error(transparent)]
	Task(#[from] TaskError),

	#[error("Configuration error: {0}")]
	Config(String),
}

/// Outcome of a user-initiated mutating action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionStatus {
	pub success: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
}

impl ActionStatus {
	pub fn ok() -> Self {
		Self {
			success: true,
			message: None,
		}
	}

	pub fn failed(message: impl Into<String>) -> Self {
		Self {
			success: false,
			message: Some(message.into()),
		}
	}
}

/// Result of an action that returns data; `message` is empty on success
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult<T> {
	pub result: T,
	pub message: String,
}

/// Whether a fetch is the first load of a section or a user-forced refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchSource {
	#[default]
	Load,
	Refresh,
}

impl FetchSource {
	pub fn is_refresh(self) -> bool {
		self == FetchSource::Refresh
	}
}

impl From<bool> for FetchSource {
	fn from(refresh: bool) -> Self {
		if refresh {
			FetchSource::Refresh
		} else {
			FetchSource::Load
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoreActionPayload {
	pub action_ids: Vec<String>,
	pub action_type: IgnoreActionType,
}

/// Which exchange data to drop from the cache
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PurgeTarget {
	All,
	Exchange(Location),
}
