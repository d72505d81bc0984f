use super::orchestrator::HistoryOrchestrator;
use super::types::{ActionResult, HistorySyncError};
use crate::gateway::{GitcoinGrantEventsPayload, GitcoinGrants};
use crate::messages;
use crate::tasks::{self, TaskMeta, TaskType, await_result};

impl HistoryOrchestrator {
    /// Gather the events of one or all gitcoin grants. On failure the result is empty and
    /// `message` carries the error.
    pub async fn fetch_gitcoin_grant(
        &self,
        payload: GitcoinGrantEventsPayload,
    ) -> ActionResult<GitcoinGrants> {
        match self.gather_gitcoin_events(&payload).await {
            Ok(result) => ActionResult {
                result,
                message: String::new(),
            },
            Err(e) => ActionResult {
                result: GitcoinGrants::new(),
                message: e.to_string(),
            },
        }
    }

    async fn gather_gitcoin_events(
        &self,
        payload: &GitcoinGrantEventsPayload,
    ) -> Result<GitcoinGrants, HistorySyncError> {
        let handle = self.gateway.gitcoin_grant_events(payload).await?;
        let meta = TaskMeta::new(messages::gitcoin_task_title(payload.grant_id))
            .with_numeric_keys(tasks::BALANCE_KEYS);
        Ok(await_result(
            self.tasks.as_ref(),
            handle,
            TaskType::GitcoinGrantEvents,
            meta,
            false,
        )
        .await?)
    }
}
