//! Test doubles for the backend, the task awaiter and the notifier.

use crate::gateway::*;
use crate::notifications::{Notification, Notifier};
use crate::tasks::{TaskAwaiter, TaskError, TaskMeta, TaskType};

use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Default)]
struct MockState {
    calls: Vec<String>,
    responses: HashMap<&'static str, Result<Value, String>>,
    task_results: HashMap<String, Result<Value, String>>,
    handles: HashMap<TaskId, String>,
    next_task_id: TaskId,
    running: HashSet<TaskType>,
    awaited: Vec<(TaskType, TaskMeta, bool)>,
}

/// Scripted backend: answers gateway calls from canned JSON and resolves every task it
/// hands out from a result keyed by what the task was for (`trades:kraken`, `eth2_details`).
#[derive(Default)]
pub struct MockBackend {
    state: Mutex<MockState>,
    locations_gate: Mutex<Option<Arc<Notify>>>,
}

impl MockBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, method: &'static str, value: Value) {
        self.state.lock().responses.insert(method, Ok(value));
    }

    pub fn fail(&self, method: &'static str, message: &str) {
        self.state
            .lock()
            .responses
            .insert(method, Err(message.to_string()));
    }

    pub fn task_result(&self, key: &str, value: Value) {
        self.state
            .lock()
            .task_results
            .insert(key.to_string(), Ok(value));
    }

    pub fn task_failure(&self, key: &str, message: &str) {
        self.state
            .lock()
            .task_results
            .insert(key.to_string(), Err(message.to_string()));
    }

    pub fn set_running(&self, task_type: TaskType) {
        self.state.lock().running.insert(task_type);
    }

    /// Hold `associated_locations` until the returned handle is notified.
    pub fn gate_locations(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.locations_gate.lock() = Some(gate.clone());
        gate
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    pub fn call_count(&self, prefix: &str) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    /// Type, meta and multi-part flag of every awaited task, in order.
    pub fn awaited(&self) -> Vec<(TaskType, TaskMeta, bool)> {
        self.state.lock().awaited.clone()
    }

    fn record(&self, call: String) {
        self.state.lock().calls.push(call);
    }

    fn answer<T: DeserializeOwned>(&self, method: &'static str) -> Result<T, GatewayError> {
        self.record(method.to_string());
        let response = self
            .state
            .lock()
            .responses
            .get(method)
            .cloned()
            .unwrap_or_else(|| Err(format!("no response scripted for {}", method)));
        match response {
            Ok(value) => Ok(serde_json::from_value(value)?),
            Err(message) => Err(GatewayError::Api {
                status: 500,
                message,
            }),
        }
    }

    fn start_task(&self, key: String) -> Result<TaskHandle, GatewayError> {
        let mut state = self.state.lock();
        state.calls.push(key.clone());
        state.next_task_id += 1;
        let task_id = state.next_task_id;
        state.handles.insert(task_id, key);
        Ok(TaskHandle { task_id })
    }
}

#[async_trait::async_trait]
impl HistoryGateway for MockBackend {
    async fn associated_locations(&self) -> Result<Vec<Location>, GatewayError> {
        let gate = self.locations_gate.lock().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.answer("associated_locations")
    }

    async fn trades(&self, location: &Location, _only_cache: bool) -> Result<TaskHandle, GatewayError> {
        self.start_task(format!("trades:{}", location))
    }

    async fn asset_movements(
        &self,
        location: &Location,
        _only_cache: bool,
    ) -> Result<TaskHandle, GatewayError> {
        self.start_task(format!("movements:{}", location))
    }

    async fn ledger_actions(
        &self,
        location: Option<&Location>,
        only_cache: bool,
    ) -> Result<TaskHandle, GatewayError> {
        match location {
            Some(location) => self.start_task(format!("ledger_actions:{}", location)),
            None => self.start_task(format!("ledger_actions:*:cache={}", only_cache)),
        }
    }

    async fn eth_transactions(&self, request: &TransactionRequest) -> Result<Transactions, GatewayError> {
        self.record(format!("eth_transactions:cache={}", request.only_cache));
        self.answer("eth_transactions")
    }

    async fn eth_transactions_task(
        &self,
        request: &TransactionRequest,
    ) -> Result<TaskHandle, GatewayError> {
        let address = request.address.clone().unwrap_or_default();
        self.start_task(format!("tx:{}", address))
    }

    async fn add_external_trade(&self, _trade: &NewTrade) -> Result<Trade, GatewayError> {
        self.answer("add_external_trade")
    }

    async fn edit_external_trade(&self, _trade: &Trade) -> Result<Trade, GatewayError> {
        self.answer("edit_external_trade")
    }

    async fn delete_external_trade(&self, _trade_id: &str) -> Result<bool, GatewayError> {
        self.answer("delete_external_trade")
    }

    async fn add_ledger_action(
        &self,
        _action: &NewLedgerAction,
    ) -> Result<LedgerActionId, GatewayError> {
        self.answer("add_ledger_action")
    }

    async fn edit_ledger_action(
        &self,
        _action: &LedgerAction,
    ) -> Result<LimitedResponse<EntryWithMeta<LedgerAction>>, GatewayError> {
        self.answer("edit_ledger_action")
    }

    async fn delete_ledger_action(
        &self,
        _identifier: u64,
    ) -> Result<LimitedResponse<EntryWithMeta<LedgerAction>>, GatewayError> {
        self.answer("delete_ledger_action")
    }

    async fn ignore_actions(
        &self,
        _action_ids: &[String],
        _action_type: IgnoreActionType,
    ) -> Result<IgnoredActions, GatewayError> {
        self.answer("ignore_actions")
    }

    async fn unignore_actions(
        &self,
        _action_ids: &[String],
        _action_type: IgnoreActionType,
    ) -> Result<IgnoredActions, GatewayError> {
        self.answer("unignore_actions")
    }

    async fn fetch_ignored(&self) -> Result<IgnoredActions, GatewayError> {
        self.answer("fetch_ignored")
    }

    async fn eth2_staking_details(&self) -> Result<TaskHandle, GatewayError> {
        self.start_task("eth2_details".to_string())
    }

    async fn eth2_staking_deposits(&self) -> Result<TaskHandle, GatewayError> {
        self.start_task("eth2_deposits".to_string())
    }

    async fn adex_balances(&self) -> Result<TaskHandle, GatewayError> {
        self.start_task("adex_balances".to_string())
    }

    async fn adex_history(&self) -> Result<TaskHandle, GatewayError> {
        self.start_task("adex_history".to_string())
    }

    async fn gitcoin_grant_events(
        &self,
        payload: &GitcoinGrantEventsPayload,
    ) -> Result<TaskHandle, GatewayError> {
        let grant = payload
            .grant_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "all".to_string());
        self.start_task(format!("gitcoin:{}", grant))
    }
}

#[async_trait::async_trait]
impl TaskAwaiter for MockBackend {
    async fn await_task(
        &self,
        handle: TaskHandle,
        task_type: TaskType,
        meta: TaskMeta,
        multipart: bool,
    ) -> Result<Value, TaskError> {
        tokio::task::yield_now().await;
        let mut state = self.state.lock();
        state.awaited.push((task_type, meta, multipart));
        let key = state
            .handles
            .get(&handle.task_id)
            .cloned()
            .ok_or(TaskError::NotFound(handle.task_id))?;
        match state.task_results.get(&key).cloned() {
            Some(Ok(value)) => Ok(value),
            Some(Err(message)) => Err(TaskError::Failed(message)),
            None => Err(TaskError::Failed(format!("no result scripted for {}", key))),
        }
    }

    fn is_task_running(&self, task_type: TaskType) -> bool {
        self.state.lock().running.contains(&task_type)
    }
}

/// Keeps every notification it receives.
#[derive(Default)]
pub struct RecordingNotifier {
    received: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn received(&self) -> Vec<Notification> {
        self.received.lock().clone()
    }

    pub fn titles(&self) -> Vec<String> {
        self.received
            .lock()
            .iter()
            .map(|n| n.title.clone())
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.received.lock().push(notification);
    }
}

pub fn trade_json(trade_id: &str, location: &str) -> Value {
    serde_json::json!({
        "trade_id": trade_id,
        "timestamp": 1_611_000_000,
        "location": location,
        "base_asset": "ETH",
        "quote_asset": "EUR",
        "trade_type": "buy",
        "amount": "1.5",
        "rate": "1020.25",
        "fee": "0.01",
        "fee_currency": "EUR",
        "link": "",
        "notes": ""
    })
}

pub fn movement_json(identifier: &str, location: &str) -> Value {
    serde_json::json!({
        "identifier": identifier,
        "location": location,
        "category": "deposit",
        "address": null,
        "transaction_id": null,
        "timestamp": 1_611_000_000,
        "asset": "BTC",
        "amount": "0.25",
        "fee_asset": "BTC",
        "fee": "0",
        "link": ""
    })
}

pub fn ledger_action_json(identifier: u64, location: &str) -> Value {
    serde_json::json!({
        "identifier": identifier,
        "timestamp": 1_611_000_000,
        "action_type": "income",
        "location": location,
        "amount": "100",
        "asset": "DAI",
        "rate": null,
        "rate_asset": null,
        "link": null,
        "notes": null
    })
}

pub fn transaction_json(tx_hash: &str, nonce: u64) -> Value {
    serde_json::json!({
        "tx_hash": tx_hash,
        "timestamp": 1_611_000_000,
        "block_number": 11_700_000,
        "from_address": "0xfrom",
        "to_address": "0xto",
        "value": "0",
        "gas": "21000",
        "gas_price": "50000000000",
        "gas_used": "21000",
        "input_data": "0x",
        "nonce": nonce
    })
}

/// A limited response wrapping `entries`, none of them ignored.
pub fn page(entries: Vec<Value>, found: usize) -> Value {
    let entries: Vec<Value> = entries
        .into_iter()
        .map(|entry| serde_json::json!({ "entry": entry, "ignored_in_accounting": false }))
        .collect();
    serde_json::json!({ "entries": entries, "entries_found": found, "entries_limit": -1 })
}

pub fn transactions_page(entries: Vec<Value>) -> Value {
    let total = entries.len();
    let mut page = page(entries, total);
    page["entries_total"] = serde_json::json!(total);
    page
}

/// Decode a fixture built with the helpers above.
pub fn decode<T: DeserializeOwned>(value: Value) -> T {
    serde_json::from_value(value).expect("fixture does not decode")
}

/// A history orchestrator wired to a fresh mock backend, notifier and store.
pub fn history_harness() -> (
    Arc<MockBackend>,
    Arc<RecordingNotifier>,
    Arc<crate::store::Store>,
    crate::history::HistoryOrchestrator,
) {
    let backend = MockBackend::new();
    let notifier = RecordingNotifier::new();
    let store = Arc::new(crate::store::Store::new());
    let orchestrator = crate::history::HistoryOrchestrator::new(
        backend.clone(),
        backend.clone(),
        notifier.clone(),
        store.clone(),
    );
    (backend, notifier, store, orchestrator)
}
