//! Waiting on backend background tasks.
//!
//! `PollingTaskAwaiter` keeps a table of the tasks it is currently waiting on, so callers
//! can ask whether a task of a given kind is in flight before starting another fetch.

use super::numeric::coerce_numeric_keys;
use super::types::{TaskError, TaskMeta, TaskType};
use crate::config::Config;
use crate::gateway::{TaskHandle, TaskId, TaskQuery, TaskStatus};

use backoff::ExponentialBackoffBuilder;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Job awaiter: resolves a task handle into the task's result.
#[async_trait::async_trait]
pub trait TaskAwaiter: Send + Sync {
    /// Wait until the task completes and return its raw result.
    ///
    /// `multipart` marks tasks of which several of the same type may run together.
    async fn await_task(
        &self,
        handle: TaskHandle,
        task_type: TaskType,
        meta: TaskMeta,
        multipart: bool,
    ) -> Result<serde_json::Value, TaskError>;

    /// Whether any task of this type is currently being awaited.
    fn is_task_running(&self, task_type: TaskType) -> bool;
}

/// Await a task and decode its result, coercing the meta's numeric keys first.
pub async fn await_result<T: DeserializeOwned>(
    awaiter: &dyn TaskAwaiter,
    handle: TaskHandle,
    task_type: TaskType,
    meta: TaskMeta,
    multipart: bool,
) -> Result<T, TaskError> {
    let numeric_keys = meta.numeric_keys.clone();
    let mut value = awaiter
        .await_task(handle, task_type, meta, multipart)
        .await?;
    coerce_numeric_keys(&mut value, &numeric_keys)?;
    Ok(serde_json::from_value(value)?)
}

#[derive(Debug, Clone)]
struct RunningTask {
    task_type: TaskType,
    meta: TaskMeta,
}

/// Polls the backend task table with exponential backoff.
pub struct PollingTaskAwaiter<Q: TaskQuery> {
    query: Arc<Q>,
    running: Mutex<HashMap<TaskId, RunningTask>>,
    poll_interval: Duration,
    max_poll_interval: Duration,
    timeout: Option<Duration>,
}

impl<Q: TaskQuery> PollingTaskAwaiter<Q> {
    pub fn new(query: Arc<Q>, config: &Config) -> Self {
        Self {
            query,
            running: Mutex::new(HashMap::new()),
            poll_interval: config.task_poll_interval,
            max_poll_interval: config.task_poll_max_interval,
            timeout: config.task_timeout,
        }
    }

    async fn poll(&self, task_id: TaskId) -> Result<serde_json::Value, TaskError> {
        let policy = ExponentialBackoffBuilder::new()
            .with_initial_interval(self.poll_interval)
            .with_max_interval(self.max_poll_interval)
            .with_randomization_factor(0.0)
            .with_max_elapsed_time(self.timeout)
            .build();

        let query = &self.query;
        let outcome = backoff::future::retry(policy, || async move {
            match query.query_task(task_id).await {
                Ok(TaskStatus::Pending) => {
                    debug!("Task {} still pending", task_id);
                    Err(backoff::Error::transient(TaskError::Pending(task_id)))
                }
                Ok(TaskStatus::Completed {
                    result: Some(result),
                    ..
                }) => Ok(result),
                Ok(TaskStatus::Completed { result: None, message }) => {
                    Err(backoff::Error::permanent(TaskError::Failed(message)))
                }
                Ok(TaskStatus::NotFound) => {
                    Err(backoff::Error::permanent(TaskError::NotFound(task_id)))
                }
                Err(e) => Err(backoff::Error::permanent(TaskError::Gateway(e))),
            }
        })
        .await;

        outcome.map_err(|e| match e {
            TaskError::Pending(id) => TaskError::TimedOut(id),
            other => other,
        })
    }
}

#[async_trait::async_trait]
impl<Q: TaskQuery + 'static> TaskAwaiter for PollingTaskAwaiter<Q> {
    async fn await_task(
        &self,
        handle: TaskHandle,
        task_type: TaskType,
        meta: TaskMeta,
        multipart: bool,
    ) -> Result<serde_json::Value, TaskError> {
        let task_id = handle.task_id;
        {
            let mut running = self.running.lock();
            if !multipart && running.values().any(|t| t.task_type == task_type) {
                warn!("Another {} task is already running", task_type);
            }
            info!("Awaiting task {} ({}): {}", task_id, task_type, meta.title);
            running.insert(task_id, RunningTask { task_type, meta });
        }

        let outcome = self.poll(task_id).await;
        let title = self
            .running
            .lock()
            .remove(&task_id)
            .map(|task| task.meta.title)
            .unwrap_or_default();

        match &outcome {
            Ok(_) => debug!("Task {} ({}) completed: {}", task_id, task_type, title),
            Err(e) => warn!("Task {} ({}) failed: {}: {}", task_id, task_type, title, e),
        }
        outcome
    }

    fn is_task_running(&self, task_type: TaskType) -> bool {
        self.running
            .lock()
            .values()
            .any(|task| task.task_type == task_type)
    }
}
