//! Interfaces the orchestrators use to talk to the backend.

use super::types::*;

/// State of a background task as reported by the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskStatus {
	/// Still running.
	Pending,
	/// Finished. `result` is `None` when the task failed; `message` then carries the reason.
	Completed {
		result: Option<serde_json::Value>,
		message: String,
	},
	/// The backend does not know the task (already collected or never existed).
	NotFound,
}

/// Remote data gateway for history and staking data.
///
/// Calls that may take long return a [`TaskHandle`]; the result is collected through a
/// [`crate::tasks::TaskAwaiter`].
#[async_trait::async_trait]
pub trait HistoryGateway: Send + Sync {
	/// Locations (exchanges and manual sources) that have data associated with them.
	async fn associated_locations(&self) -> Result<Vec<Location>, GatewayError>;

	async fn trades(
		&self,
		location: &Location,
		only_cache: bool,
	) -> Result<TaskHandle, GatewayError>;

	async fn asset_movements(
		&self,
		location: &Location,
		only_cache: bool,
	) -> Result<TaskHandle, GatewayError>;

	/// Ledger actions for one location, or for every location when `location` is `None`.
	async fn ledger_actions(
		&self,
		location: Option<&Location>,
		only_cache: bool,
	) -> Result<TaskHandle, GatewayError>;

	/// Cached transactions, answered inline.
	async fn eth_transactions(
		&self,
		request: &TransactionRequest,
	) -> Result<Transactions, GatewayError>;

	/// Transactions query that may resync with the chain, scheduled as a task.
	async fn eth_transactions_task(
		&self,
		request: &TransactionRequest,
	) -> Result<TaskHandle, GatewayError>;

	async fn add_external_trade(&self, trade: &NewTrade) -> Result<Trade, GatewayError>;

	async fn edit_external_trade(&self, trade: &Trade) -> Result<Trade, GatewayError>;

	async fn delete_external_trade(&self, trade_id: &str) -> Result<bool, GatewayError>;

	async fn add_ledger_action(
		&self,
		action: &NewLedgerAction,
	) -> Result<LedgerActionId, GatewayError>;

	async fn edit_ledger_action(
		&self,
		action: &LedgerAction,
	) -> Result<LimitedResponse<EntryWithMeta<LedgerAction>>, GatewayError>;

	async fn delete_ledger_action(
		&self,
		identifier: u64,
	) -> Result<LimitedResponse<EntryWithMeta<LedgerAction>>, GatewayError>;

	async fn ignore_actions(
		&self,
		action_ids: &[String],
		action_type: IgnoreActionType,
	) -> Result<IgnoredActions, GatewayError>;

	async fn unignore_actions(
		&self,
		action_ids: &[String],
		action_type: IgnoreActionType,
	) -> Result<IgnoredActions, GatewayError>;

	async fn fetch_ignored(&self) -> Result<IgnoredActions, GatewayError>;

	async fn eth2_staking_details(&self) -> Result<TaskHandle, GatewayError>;

	async fn eth2_staking_deposits(&self) -> Result<TaskHandle, GatewayError>;

	async fn adex_balances(&self) -> Result<TaskHandle, GatewayError>;

	async fn adex_history(&self) -> Result<TaskHandle, GatewayError>;

	async fn gitcoin_grant_events(
		&self,
		payload: &GitcoinGrantEventsPayload,
	) -> Result<TaskHandle, GatewayError>;
}

/// Read access to the backend's task table.
#[async_trait::async_trait]
pub trait TaskQuery: Send + Sync {
	async fn query_task(&self, task_id: TaskId) -> Result<TaskStatus, GatewayError>;
}
