//! Staking fetch orchestrator.
//!
//! Staking data is only available to premium users. ETH2 details and deposits are fetched
//! together; AdEx balances and history one after the other. Each item has its own section
//! and reports its own failure, and every section ends `Loaded` whatever the outcome.

use crate::gateway::{GatewayError, HistoryGateway, TaskHandle};
use crate::history::HistorySyncError;
use crate::messages::{self, StakingTexts};
use crate::notifications::{Notification, Notifier};
use crate::store::{FetchGuard, Mutation, Section, Status, Store};
use crate::tasks::{self, TaskAwaiter, TaskMeta, TaskType, await_result};

use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::{debug, info};

/// Which staking module to clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurgeModule {
    Eth2,
    Adex,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StakingItem {
    Eth2Details,
    Eth2Deposits,
    AdexBalances,
    AdexHistory,
}

impl StakingItem {
    fn section(self) -> Section {
        match self {
            StakingItem::Eth2Details => Section::StakingEth2,
            StakingItem::Eth2Deposits => Section::StakingEth2Deposits,
            StakingItem::AdexBalances => Section::StakingAdex,
            StakingItem::AdexHistory => Section::StakingAdexHistory,
        }
    }

    fn task_type(self) -> TaskType {
        match self {
            StakingItem::Eth2Details => TaskType::StakingEth2,
            StakingItem::Eth2Deposits => TaskType::StakingEth2Deposits,
            StakingItem::AdexBalances => TaskType::StakingAdex,
            StakingItem::AdexHistory => TaskType::StakingAdexHistory,
        }
    }

    fn texts(self) -> StakingTexts {
        match self {
            StakingItem::Eth2Details => messages::ETH2_DETAILS,
            StakingItem::Eth2Deposits => messages::ETH2_DEPOSITS,
            StakingItem::AdexBalances => messages::ADEX_BALANCES,
            StakingItem::AdexHistory => messages::ADEX_HISTORY,
        }
    }

    fn numeric_keys(self) -> &'static [&'static str] {
        match self {
            StakingItem::AdexHistory => tasks::ADEX_HISTORY_NUMERIC_KEYS,
            _ => tasks::BALANCE_KEYS,
        }
    }

    async fn request(self, gateway: &dyn HistoryGateway) -> Result<TaskHandle, GatewayError> {
        match self {
            StakingItem::Eth2Details => gateway.eth2_staking_details().await,
            StakingItem::Eth2Deposits => gateway.eth2_staking_deposits().await,
            StakingItem::AdexBalances => gateway.adex_balances().await,
            StakingItem::AdexHistory => gateway.adex_history().await,
        }
    }
}

pub struct StakingOrchestrator {
    gateway: Arc<dyn HistoryGateway>,
    tasks: Arc<dyn TaskAwaiter>,
    notifier: Arc<dyn Notifier>,
    store: Arc<Store>,
}

impl StakingOrchestrator {
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

    fn is_premium(&self) -> bool {
        self.store.read().session.premium
    }

    /// Fetch ETH2 validator details and deposits concurrently.
    pub async fn fetch_staking_details(&self, refresh: bool) {
        if !self.is_premium() {
            debug!("Not premium, skipping ETH2 staking");
            return;
        }
        if !self
            .store
            .begin_fetch(Section::StakingEth2, refresh, FetchGuard::Staking)
        {
            return;
        }
        info!("Fetching ETH2 staking data");

        let starting = Status::starting(refresh);
        self.store.set_status(Section::StakingEth2Deposits, starting);
        futures::join!(
            self.fetch_item(StakingItem::Eth2Details, Mutation::SetEth2Details),
            self.fetch_item(StakingItem::Eth2Deposits, Mutation::SetEth2Deposits),
        );
    }

    /// Fetch AdEx balances, then AdEx history.
    pub async fn fetch_adex(&self, refresh: bool) {
        if !self.is_premium() {
            debug!("Not premium, skipping AdEx staking");
            return;
        }
        if !self
            .store
            .begin_fetch(Section::StakingAdex, refresh, FetchGuard::Staking)
        {
            return;
        }
        info!("Fetching AdEx staking data");

        self.fetch_item(StakingItem::AdexBalances, Mutation::SetAdexBalances)
            .await;
        self.store
            .set_status(Section::StakingAdexHistory, Status::starting(refresh));
        self.fetch_item(StakingItem::AdexHistory, Mutation::SetAdexHistory)
            .await;
    }

    async fn fetch_item<T: DeserializeOwned>(&self, item: StakingItem, into: fn(T) -> Mutation) {
        match self.query_item(item).await {
            Ok(result) => {
                self.store.commit(into(result));
            }
            Err(e) => {
                let texts = item.texts();
                self.notifier.notify(Notification::error(
                    texts.error_title,
                    texts.error_description(&e.to_string()),
                ));
            }
        }
        self.store.set_status(item.section(), Status::Loaded);
    }

    async fn query_item<T: DeserializeOwned>(&self, item: StakingItem) -> Result<T, HistorySyncError> {
        let handle = item.request(self.gateway.as_ref()).await?;
        let meta = TaskMeta::new(item.texts().task_title).with_numeric_keys(item.numeric_keys());
        Ok(await_result(self.tasks.as_ref(), handle, item.task_type(), meta, false).await?)
    }

    /// Clear cached staking data and mark the sections as never fetched.
    pub fn purge_staking(&self, module: PurgeModule) {
        info!("Purging staking data: {:?}", module);
        if matches!(module, PurgeModule::Eth2 | PurgeModule::All) {
            self.store.commit(Mutation::SetEth2Details(Vec::new()));
            self.store.commit(Mutation::SetEth2Deposits(Vec::new()));
            self.store.set_status(Section::StakingEth2, Status::None);
            self.store
                .set_status(Section::StakingEth2Deposits, Status::None);
        }
        if matches!(module, PurgeModule::Adex | PurgeModule::All) {
            self.store.commit(Mutation::SetAdexHistory(Default::default()));
            self.store.commit(Mutation::SetAdexBalances(Default::default()));
            self.store.set_status(Section::StakingAdex, Status::None);
            self.store
                .set_status(Section::StakingAdexHistory, Status::None);
        }
    }
}
