//! History fetch orchestrator.
//!
//! This module defines the `HistoryOrchestrator`, which coordinates fetching trades, asset
//! movements, ledger actions and ethereum transactions from the backend and reconciling
//! them into the store.
//!
//! For each fetch the orchestrator:
//! - Skips when a task of the same kind is running or the section is already being loaded
//! - Queries every associated location concurrently, each through a background task
//! - Merges each location's result as soon as it arrives
//! - Reports per-location failures through the notifier without stopping the others
//!
//! The ignore, manual entry and housekeeping actions live in sibling modules as further
//! `impl HistoryOrchestrator` blocks.

use super::locations::{AssetMovements, LedgerActions, LocationCategory, Trades};
use super::reconcile::merge_location;
use super::types::{FetchSource, HistorySyncError};
use crate::gateway::{
    EntryWithMeta, GatewayError, HistoryGateway, LimitedResponse, Location, TaskHandle,
    TransactionQuery, Transactions,
};
use crate::messages::{self, exchange_name};
use crate::notifications::{Notification, Notifier};
use crate::store::{FetchGuard, HistoricData, Mutation, Section, Status, Store};
use crate::tasks::{TaskAwaiter, TaskMeta, TaskType, await_result};

use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Coordinates history fetches and keeps the store in sync with the backend.
///
/// All collaborators are shared: the same store and awaiter are typically also used by the
/// staking orchestrator.
pub struct HistoryOrchestrator {
    pub(super) gateway: Arc<dyn HistoryGateway>,
    pub(super) tasks: Arc<dyn TaskAwaiter>,
    pub(super) notifier: Arc<dyn Notifier>,
    pub(super) store: Arc<Store>,
}

impl HistoryOrchestrator {
    pub fn new(
        gateway: Arc<dyn HistoryGateway>,
        tasks: Arc<dyn TaskAwaiter>,
        notifier: Arc<dyn Notifier>,
        store: Arc<Store>,
    ) -> Self {
        Self {
            gateway,
            tasks,
            notifier,
            store,
        }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    pub async fn fetch_trades(&self, source: FetchSource) {
        self.fetch_by_location(&Trades, source).await;
    }

    pub async fn fetch_movements(&self, source: FetchSource) {
        self.fetch_by_location(&AssetMovements, source).await;
    }

    /// Fetch ledger actions. The cached view of all locations is read first and replaces
    /// the collection; the per-location results are then merged on top of it.
    pub async fn fetch_ledger_actions(&self, source: FetchSource) {
        self.fetch_by_location(&LedgerActions, source).await;
    }

    async fn fetch_by_location<C: LocationCategory>(&self, category: &C, source: FetchSource) {
        if self.tasks.is_task_running(C::TASK_TYPE) {
            debug!("{} task already running, not fetching", C::TASK_TYPE);
            return;
        }
        if !self
            .store
            .begin_fetch(C::SECTION, source.is_refresh(), FetchGuard::History)
        {
            return;
        }

        info!("Fetching {} ({:?})", C::TEXTS.noun, source);

        if let Some(request) = category.request_default(self.gateway.as_ref()).await {
            if let Err(e) = self.fetch_default::<C>(request).await {
                self.notifier.notify(Notification::error(
                    messages::DEFAULT_LEDGER_ERROR_TITLE,
                    messages::default_ledger_error_description(&e.to_string()),
                ));
            }
        }

        match self.gateway.associated_locations().await {
            Ok(locations) => {
                let fetches = locations
                    .iter()
                    .map(|location| self.fetch_location(category, location));
                join_all(fetches).await;
            }
            Err(e) => {
                error!("Could not list associated locations: {}", e);
                self.notifier.notify(Notification::error(
                    messages::LOCATIONS_ERROR_TITLE,
                    messages::locations_error_description(C::TEXTS.noun, &e.to_string()),
                ));
            }
        }

        self.store.set_status(C::SECTION, Status::Loaded);
        info!("Finished fetching {}", C::TEXTS.noun);
    }

    async fn fetch_default<C: LocationCategory>(
        &self,
        request: Result<TaskHandle, GatewayError>,
    ) -> Result<(), HistorySyncError> {
        let meta = TaskMeta::new(messages::DEFAULT_LEDGER_TASK_TITLE)
            .with_description(messages::DEFAULT_LEDGER_TASK_DESCRIPTION)
            .with_numeric_keys(C::NUMERIC_KEYS);
        let page: LimitedResponse<EntryWithMeta<C::Entry>> =
            await_result(self.tasks.as_ref(), request?, C::TASK_TYPE, meta, true).await?;

        self.store.commit(C::replace(HistoricData::from(page)));
        self.store.set_status(C::SECTION, Status::PartiallyLoaded);
        Ok(())
    }

    async fn fetch_location<C: LocationCategory>(&self, category: &C, location: &Location) {
        match self.query_location(category, location).await {
            Ok(count) => debug!("{} {} from {}", count, C::TEXTS.noun, location),
            Err(e) => {
                let exchange = exchange_name(location);
                self.notifier.notify(Notification::error(
                    C::TEXTS.error_title(&exchange),
                    C::TEXTS.error_description(&exchange, &e.to_string()),
                ));
            }
        }
    }

    async fn query_location<C: LocationCategory>(
        &self,
        category: &C,
        location: &Location,
    ) -> Result<usize, HistorySyncError> {
        let handle = category.request(self.gateway.as_ref(), location).await?;
        let meta = TaskMeta::new(C::TEXTS.task_title)
            .with_description(C::TEXTS.task_description(&exchange_name(location)))
            .with_numeric_keys(C::NUMERIC_KEYS)
            .with_location(location);
        let page: LimitedResponse<EntryWithMeta<C::Entry>> =
            await_result(self.tasks.as_ref(), handle, C::TASK_TYPE, meta, true).await?;

        let count = page.entries.len();
        self.store
            .commit_with(|state| C::replace(merge_location(C::collection(state), location, page)));
        self.store.set_status(C::SECTION, Status::PartiallyLoaded);
        Ok(count)
    }

    /// Fetch ethereum transactions.
    ///
    /// The cached transactions are committed first. Unless `only_cache` is set, every
    /// known address is then refreshed on the backend and, except on the first load, the
    /// cache is read again. The first load of a session always refreshes.
    pub async fn fetch_transactions(&self, query: TransactionQuery) {
        if let Err(e) = self.refresh_transactions(&query).await {
            error!("Fetching ethereum transactions failed: {}", e);
            self.store.set_status(Section::Tx, Status::None);
        }
    }

    async fn refresh_transactions(&self, query: &TransactionQuery) -> Result<(), HistorySyncError> {
        let task_running = self.tasks.is_task_running(TaskType::Tx);
        let mut only_cache = false;
        let previous = self.store.try_transition(Section::Tx, |current| {
            let first_load = current == Status::None;
            only_cache = !first_load && query.only_cache.unwrap_or(false);
            if (task_running || current.is_loading()) && !only_cache {
                return None;
            }
            Some(if first_load {
                Status::Loading
            } else {
                Status::Refreshing
            })
        });
        let Some(previous) = previous else {
            return Ok(());
        };
        let first_load = previous == Status::None;

        let cached = self.gateway.eth_transactions(&query.cache_request()).await?;
        self.store.commit(Mutation::SetTransactions(cached));

        if !only_cache {
            self.store.set_status(Section::Tx, Status::Refreshing);
            let addresses = self.store.read().session.eth_addresses.clone();
            info!("Refreshing transactions of {} addresses", addresses.len());
            join_all(addresses.iter().map(|address| self.refresh_address(address))).await;

            if !first_load {
                let cached = self.gateway.eth_transactions(&query.cache_request()).await?;
                self.store.commit(Mutation::SetTransactions(cached));
            }
        }

        let status = if self.tasks.is_task_running(TaskType::Tx) {
            Status::Refreshing
        } else {
            Status::Loaded
        };
        self.store.set_status(Section::Tx, status);
        Ok(())
    }

    async fn refresh_address(&self, address: &str) {
        if let Err(e) = self.query_address(address).await {
            self.notifier.notify(Notification::error(
                messages::TRANSACTIONS_ERROR_TITLE,
                messages::transactions_error_description(address, &e.to_string()),
            ));
        }
    }

    /// Trigger a backend resync of one address. The returned page is not used: the
    /// cache read that follows picks the new transactions up.
    async fn query_address(&self, address: &str) -> Result<(), HistorySyncError> {
        let request = TransactionQuery::for_address(address).to_request();
        let handle = self.gateway.eth_transactions_task(&request).await?;
        let meta = TaskMeta::new(messages::TRANSACTIONS_TASK_TITLE)
            .with_description(messages::transactions_task_description(address))
            .with_address(address);
        let _: Transactions =
            await_result(self.tasks.as_ref(), handle, TaskType::Tx, meta, true).await?;
        Ok(())
    }
}
