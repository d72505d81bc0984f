//! Manually entered trades and ledger actions.

use super::orchestrator::HistoryOrchestrator;
use super::types::ActionStatus;
use crate::gateway::{EntryWithMeta, LedgerAction, NewLedgerAction, NewTrade, Trade};
use crate::store::{HistoricData, Mutation};

use tracing::{info, warn};

impl HistoryOrchestrator {
    pub async fn add_external_trade(&self, trade: NewTrade) -> ActionStatus {
        match self.gateway.add_external_trade(&trade).await {
            Ok(created) => {
                info!("Added trade {} at {}", created.trade_id, created.location);
                self.store.commit(Mutation::AddTrade(created));
                ActionStatus::ok()
            }
            Err(e) => failed("add trade", e),
        }
    }

    /// Save an edited trade. The edit may assign a new trade id, so the cached entry is
    /// looked up by the id it had before; its accounting flag is kept.
    pub async fn edit_external_trade(&self, trade: EntryWithMeta<Trade>) -> ActionStatus {
        let EntryWithMeta {
            entry,
            ignored_in_accounting,
        } = trade;
        let old_trade_id = entry.trade_id.clone();

        match self.gateway.edit_external_trade(&entry).await {
            Ok(updated) => {
                self.store.commit(Mutation::UpdateTrade {
                    trade: EntryWithMeta::new(updated, ignored_in_accounting),
                    old_trade_id,
                });
                ActionStatus::ok()
            }
            Err(e) => failed("edit trade", e),
        }
    }

    pub async fn delete_external_trade(&self, trade_id: &str) -> ActionStatus {
        match self.gateway.delete_external_trade(trade_id).await {
            Ok(true) => {
                self.store.commit(Mutation::DeleteTrade {
                    trade_id: trade_id.to_string(),
                });
                ActionStatus::ok()
            }
            Ok(false) => ActionStatus {
                success: false,
                message: None,
            },
            Err(e) => failed("delete trade", e),
        }
    }

    pub async fn add_ledger_action(&self, action: NewLedgerAction) -> ActionStatus {
        match self.gateway.add_ledger_action(&action).await {
            Ok(id) => {
                info!("Added ledger action {}", id.identifier);
                self.store
                    .commit(Mutation::AddLedgerAction(action.into_action(id.identifier)));
                ActionStatus::ok()
            }
            Err(e) => failed("add ledger action", e),
        }
    }

    /// Save an edited ledger action. The backend answers with the full collection, which
    /// replaces the cached one.
    pub async fn edit_ledger_action(&self, action: LedgerAction) -> ActionStatus {
        match self.gateway.edit_ledger_action(&action).await {
            Ok(all) => {
                self.store
                    .commit(Mutation::SetLedgerActions(HistoricData::from(all)));
                ActionStatus::ok()
            }
            Err(e) => failed("edit ledger action", e),
        }
    }

    pub async fn delete_ledger_action(&self, identifier: u64) -> ActionStatus {
        match self.gateway.delete_ledger_action(identifier).await {
            Ok(all) => {
                self.store
                    .commit(Mutation::SetLedgerActions(HistoricData::from(all)));
                ActionStatus::ok()
            }
            Err(e) => failed("delete ledger action", e),
        }
    }
}

fn failed(action: &str, error: impl std::fmt::Display) -> ActionStatus {
    warn!("Could not {}: {}", action, error);
    ActionStatus::failed(error.to_string())
}
