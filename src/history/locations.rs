//! History categories that are partitioned by location.
//!
//! Each category describes how to request one location's entries and where they live in
//! the store; the orchestrator runs the same fetch flow for all of them.

use super::reconcile::{Ignorable, Located};
use crate::gateway::{
	EntryWithMeta, GatewayError, HistoryGateway, Location, TaskHandle,
};
use crate::messages::{self, CategoryTexts};
use crate::store::{AppState, HistoricData, Mutation, Section};
use crate::tasks::{self, TaskType};

use serde::de::DeserializeOwned;

/// A location-partitioned history category
#[async_trait::async_trait]
pub trait LocationCategory: Send + Sync {
	type Entry: Located + Ignorable + Clone + DeserializeOwned + Send + Sync + 'static;

	const SECTION: Section;
	const TASK_TYPE: TaskType;
	const NUMERIC_KEYS: &'static [&'static str];
	const TEXTS: CategoryTexts;

	/// Start the backend task that queries one location.
	async fn request(
		&self,
		gateway: &dyn HistoryGateway,
		location: &Location,
	) -> Result<TaskHandle, GatewayError>;

	/// Start a task that reads the cached view of all locations, if the category has one.
	async fn request_default(
		&self,
		_gateway: &dyn HistoryGateway,
	) -> Option<Result<TaskHandle, GatewayError>> {
		None
	}

	fn collection(state: &AppState) -> &HistoricData<EntryWithMeta<Self::Entry>>;

	fn replace(data: HistoricData<EntryWithMeta<Self::Entry>>) -> Mutation;
}

pub struct Trades;

pub struct AssetMovements;

pub struct LedgerActions;

#[async_trait::async_trait]
impl LocationCategory for Trades {
	type Entry = crate::gateway::Trade;

	const SECTION: Section = Section::Trades;
	const TASK_TYPE: TaskType = TaskType::Trades;
	const NUMERIC_KEYS: &'static [&'static str] = tasks::TRADE_NUMERIC_KEYS;
	const TEXTS: CategoryTexts = messages::TRADES;

	async fn request(
		&self,
		gateway: &dyn HistoryGateway,
		location: &Location,
	) -> Result<TaskHandle, GatewayError> {
		gateway.trades(location, false).await
	}

	fn collection(state: &AppState) -> &HistoricData<EntryWithMeta<Self::Entry>> {
		&state.history.trades
	}

	fn replace(data: HistoricData<EntryWithMeta<Self::Entry>>) -> Mutation {
		Mutation::SetTrades(data)
	}
}

#[async_trait::async_trait]
impl LocationCategory for AssetMovements {
	type Entry = crate::gateway::AssetMovement;

	const SECTION: Section = Section::AssetMovement;
	const TASK_TYPE: TaskType = TaskType::Movements;
	const NUMERIC_KEYS: &'static [&'static str] = tasks::MOVEMENT_NUMERIC_KEYS;
	const TEXTS: CategoryTexts = messages::ASSET_MOVEMENTS;

	async fn request(
		&self,
		gateway: &dyn HistoryGateway,
		location: &Location,
	) -> Result<TaskHandle, GatewayError> {
		gateway.asset_movements(location, false).await
	}

	fn collection(state: &AppState) -> &HistoricData<EntryWithMeta<Self::Entry>> {
		&state.history.asset_movements
	}

	fn replace(data: HistoricData<EntryWithMeta<Self::Entry>>) -> Mutation {
		Mutation::SetMovements(data)
	}
}

#[async_trait::async_trait]
impl LocationCategory for LedgerActions {
	type Entry = crate::gateway::LedgerAction;

	const SECTION: Section = Section::LedgerActions;
	const TASK_TYPE: TaskType = TaskType::LedgerActions;
	const NUMERIC_KEYS: &'static [&'static str] = tasks::LEDGER_ACTION_NUMERIC_KEYS;
	const TEXTS: CategoryTexts = messages::LEDGER_ACTIONS;

	async fn request(
		&self,
		gateway: &dyn HistoryGateway,
		location: &Location,
	) -> Result<TaskHandle, GatewayError> {
		gateway.ledger_actions(Some(location), false).await
	}

	async fn request_default(
		&self,
		gateway: &dyn HistoryGateway,
	) -> Option<Result<TaskHandle, GatewayError>> {
		Some(gateway.ledger_actions(None, true).await)
	}

	fn collection(state: &AppState) -> &HistoricData<EntryWithMeta<Self::Entry>> {
		&state.history.ledger_actions
	}

	fn replace(data: HistoricData<EntryWithMeta<Self::Entry>>) -> Mutation {
		Mutation::SetLedgerActions(data)
	}
}
