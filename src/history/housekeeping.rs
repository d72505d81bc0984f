//! Dropping exchange data and loading the ignored lists.

use super::orchestrator::HistoryOrchestrator;
use super::reconcile::remove_location;
use super::types::PurgeTarget;
use crate::gateway::Location;
use crate::messages;
use crate::notifications::Notification;
use crate::store::{HistoricData, Mutation};

use tracing::{error, info};

impl HistoryOrchestrator {
    /// Drop the cached trades of an exchange, e.g. after it was disconnected.
    pub fn remove_exchange_trades(&self, location: &Location) {
        self.store
            .commit_with(|state| Mutation::SetTrades(remove_location(&state.history.trades, location)));
    }

    pub fn remove_exchange_movements(&self, location: &Location) {
        self.store.commit_with(|state| {
            Mutation::SetMovements(remove_location(&state.history.asset_movements, location))
        });
    }

    pub fn purge_exchange(&self, target: PurgeTarget) {
        match target {
            PurgeTarget::All => {
                info!("Purging cached data of all exchanges");
                self.store.commit(Mutation::SetTrades(HistoricData::default()));
                self.store
                    .commit(Mutation::SetMovements(HistoricData::default()));
            }
            PurgeTarget::Exchange(location) => {
                info!("Purging cached data of {}", location);
                self.remove_exchange_trades(&location);
                self.remove_exchange_movements(&location);
            }
        }
    }

    pub async fn fetch_ignored(&self) {
        match self.gateway.fetch_ignored().await {
            Ok(ignored) => {
                self.store.commit(Mutation::SetIgnored(ignored));
            }
            Err(e) => {
                error!("Fetching ignored actions failed: {}", e);
                self.notifier.notify(Notification::error(
                    messages::FETCH_IGNORED_ERROR_TITLE,
                    messages::fetch_ignored_error_description(&e.to_string()),
                ));
            }
        }
    }
}
