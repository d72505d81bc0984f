//! Excluding actions from accounting.

use super::locations::{AssetMovements, LedgerActions, LocationCategory, Trades};
use super::orchestrator::HistoryOrchestrator;
use super::reconcile::{apply_ignored_flags, flag_ignored};
use super::types::{ActionStatus, IgnoreActionPayload};
use crate::gateway::IgnoreActionType;
use crate::messages;
use crate::store::{Message, Mutation};

use tracing::{info, warn};

impl HistoryOrchestrator {
    pub async fn ignore_actions(&self, payload: IgnoreActionPayload) -> ActionStatus {
        self.toggle_ignored(payload, true).await
    }

    pub async fn unignore_actions(&self, payload: IgnoreActionPayload) -> ActionStatus {
        self.toggle_ignored(payload, false).await
    }

    /// Persist the change, store the returned ignored lists and re-derive the accounting
    /// flag of every cached entry of that type from them. A failure changes no entry and
    /// leaves a message in the store.
    async fn toggle_ignored(&self, payload: IgnoreActionPayload, ignore: bool) -> ActionStatus {
        let IgnoreActionPayload {
            action_ids,
            action_type,
        } = payload;

        let outcome = if ignore {
            self.gateway.ignore_actions(&action_ids, action_type).await
        } else {
            self.gateway.unignore_actions(&action_ids, action_type).await
        };

        let returned = match outcome {
            Ok(returned) => returned,
            Err(e) => {
                warn!("Changing ignored {:?} failed: {}", action_type, e);
                self.store.commit(Mutation::SetMessage(Message {
                    title: messages::ignore_error_title(ignore).to_string(),
                    description: messages::ignore_error_description(ignore, &e.to_string()),
                    success: false,
                }));
                return ActionStatus {
                    success: false,
                    message: None,
                };
            }
        };

        let ids = returned.ids(action_type).to_vec();
        info!(
            "{} {} {:?} actions, {} now ignored",
            if ignore { "Ignored" } else { "Unignored" },
            action_ids.len(),
            action_type,
            ids.len()
        );
        self.store
            .commit_with(|state| Mutation::SetIgnored(state.history.ignored.clone().merge(returned)));

        match action_type {
            IgnoreActionType::Trades => self.reflag::<Trades>(&ids),
            IgnoreActionType::Movements => self.reflag::<AssetMovements>(&ids),
            IgnoreActionType::LedgerActions => self.reflag::<LedgerActions>(&ids),
            IgnoreActionType::EthTransactions => {
                self.store.commit_with(|state| {
                    let mut transactions = state.history.transactions.clone();
                    flag_ignored(&mut transactions.entries, &ids);
                    Mutation::SetTransactions(transactions)
                });
            }
        }
        ActionStatus::ok()
    }

    fn reflag<C: LocationCategory>(&self, ids: &[String]) {
        self.store
            .commit_with(|state| C::replace(apply_ignored_flags(C::collection(state), ids)));
    }
}
