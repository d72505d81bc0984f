//! Types exchanged with the backend history API

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of a background task on the backend.
pub type TaskId = u64;

/// Handle returned by the backend when a query is scheduled as a background task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskHandle {
    pub task_id: TaskId,
}

/// A data source: an exchange name or one of the manual buckets (`external`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location(String);

impl Location {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Location {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Amount of an asset together with its USD valuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Balance {
    pub amount: Decimal,
    pub usd_value: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeType {
    #[serde(rename = "buy")]
    Buy,
    #[serde(rename = "sell")]
    Sell,
    #[serde(rename = "settlement buy")]
    SettlementBuy,
    #[serde(rename = "settlement sell")]
    SettlementSell,
}

/// A trade as reported by an exchange or entered manually.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: String,
    pub timestamp: i64,
    pub location: Location,
    pub base_asset: String,
    pub quote_asset: String,
    pub trade_type: TradeType,
    pub amount: Decimal,
    pub rate: Decimal,
    #[serde(default)]
    pub fee: Option<Decimal>,
    #[serde(default)]
    pub fee_currency: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A manually entered trade before the backend assigned it an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTrade {
    pub timestamp: i64,
    pub location: Location,
    pub base_asset: String,
    pub quote_asset: String,
    pub trade_type: TradeType,
    pub amount: Decimal,
    pub rate: Decimal,
    pub fee: Option<Decimal>,
    pub fee_currency: Option<String>,
    pub link: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementCategory {
    Deposit,
    Withdrawal,
}

/// A deposit to or withdrawal from an exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetMovement {
    pub identifier: String,
    pub location: Location,
    pub category: MovementCategory,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    pub timestamp: i64,
    pub asset: String,
    pub amount: Decimal,
    pub fee_asset: String,
    pub fee: Decimal,
    #[serde(default)]
    pub link: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerActionType {
    Income,
    Expense,
    Loss,
    DividendsIncome,
    DonationReceived,
    Airdrop,
    Gift,
    Grant,
}

/// An accounting entry that is neither a trade nor a movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerAction {
    pub identifier: u64,
    pub timestamp: i64,
    pub action_type: LedgerActionType,
    pub location: Location,
    pub amount: Decimal,
    pub asset: String,
    #[serde(default)]
    pub rate: Option<Decimal>,
    #[serde(default)]
    pub rate_asset: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A ledger action before the backend assigned it an identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLedgerAction {
    pub timestamp: i64,
    pub action_type: LedgerActionType,
    pub location: Location,
    pub amount: Decimal,
    pub asset: String,
    pub rate: Option<Decimal>,
    pub rate_asset: Option<String>,
    pub link: Option<String>,
    pub notes: Option<String>,
}

impl NewLedgerAction {
    /// The stored action once the backend has assigned `identifier`.
    pub fn into_action(self, identifier: u64) -> LedgerAction {
        LedgerAction {
            identifier,
            timestamp: self.timestamp,
            action_type: self.action_type,
            location: self.location,
            amount: self.amount,
            asset: self.asset,
            rate: self.rate,
            rate_asset: self.rate_asset,
            link: self.link,
            notes: self.notes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerActionId {
    pub identifier: u64,
}

/// An ethereum transaction touching one of the tracked addresses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EthTransaction {
    pub tx_hash: String,
    pub timestamp: i64,
    pub block_number: u64,
    pub from_address: String,
    #[serde(default)]
    pub to_address: Option<String>,
    pub value: Decimal,
    pub gas: Decimal,
    pub gas_price: Decimal,
    pub gas_used: Decimal,
    #[serde(default)]
    pub input_data: String,
    pub nonce: u64,
}

/// A record together with its accounting flag, as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryWithMeta<T> {
    pub entry: T,
    #[serde(default)]
    pub ignored_in_accounting: bool,
}

impl<T> EntryWithMeta<T> {
    pub fn new(entry: T, ignored_in_accounting: bool) -> Self {
        Self {
            entry,
            ignored_in_accounting,
        }
    }
}

/// Page of entries plus the totals the backend knows about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitedResponse<T> {
    pub entries: Vec<T>,
    pub entries_found: usize,
    pub entries_limit: i64,
}

/// Ethereum transactions page. Unlike the other categories it is not split by location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transactions {
    pub entries: Vec<EntryWithMeta<EthTransaction>>,
    pub entries_found: usize,
    pub entries_limit: i64,
    #[serde(default)]
    pub entries_total: usize,
}

impl Default for Transactions {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            entries_found: 0,
            entries_limit: 0,
            entries_total: 0,
        }
    }
}

/// Query parameters sent with every transactions request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRequest {
    pub limit: u64,
    pub offset: u64,
    pub ascending: bool,
    pub order_by_attribute: String,
    #[serde(skip)]
    pub address: Option<String>,
    pub only_cache: bool,
}

impl Default for TransactionRequest {
    fn default() -> Self {
        Self {
            limit: 1,
            offset: 0,
            ascending: false,
            order_by_attribute: "timestamp".to_string(),
            address: None,
            only_cache: false,
        }
    }
}

/// Partial transactions request as supplied by a caller; unset fields fall back to
/// [`TransactionRequest::default`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionQuery {
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub ascending: Option<bool>,
    pub order_by_attribute: Option<String>,
    pub address: Option<String>,
    pub only_cache: Option<bool>,
}

impl TransactionQuery {
    pub fn for_address(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            ..Default::default()
        }
    }

    /// Merge this query over the defaults.
    pub fn to_request(&self) -> TransactionRequest {
        let defaults = TransactionRequest::default();
        TransactionRequest {
            limit: self.limit.unwrap_or(defaults.limit),
            offset: self.offset.unwrap_or(defaults.offset),
            ascending: self.ascending.unwrap_or(defaults.ascending),
            order_by_attribute: self
                .order_by_attribute
                .clone()
                .unwrap_or(defaults.order_by_attribute),
            address: self.address.clone(),
            only_cache: self.only_cache.unwrap_or(defaults.only_cache),
        }
    }

    /// Same query, forced to read only what the backend already has cached.
    pub fn cache_request(&self) -> TransactionRequest {
        TransactionRequest {
            only_cache: true,
            ..self.to_request()
        }
    }
}

/// Action categories that can be excluded from accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IgnoreActionType {
    #[serde(rename = "trade")]
    Trades,
    #[serde(rename = "asset movement")]
    Movements,
    #[serde(rename = "ethereum transaction")]
    EthTransactions,
    #[serde(rename = "ledger action")]
    LedgerActions,
}

/// Identifiers excluded from accounting, per action type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IgnoredActions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trades: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_movements: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethereum_transactions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ledger_actions: Option<Vec<String>>,
}

impl IgnoredActions {
    /// Identifiers for one action type; an absent list is empty.
    pub fn ids(&self, action_type: IgnoreActionType) -> &[String] {
        let ids = match action_type {
            IgnoreActionType::Trades => &self.trades,
            IgnoreActionType::Movements => &self.asset_movements,
            IgnoreActionType::EthTransactions => &self.ethereum_transactions,
            IgnoreActionType::LedgerActions => &self.ledger_actions,
        };
        ids.as_deref().unwrap_or(&[])
    }

    /// Overlay `other` on top of `self`: lists present in `other` win.
    pub fn merge(self, other: IgnoredActions) -> IgnoredActions {
        IgnoredActions {
            trades: other.trades.or(self.trades),
            asset_movements: other.asset_movements.or(self.asset_movements),
            ethereum_transactions: other.ethereum_transactions.or(self.ethereum_transactions),
            ledger_actions: other.ledger_actions.or(self.ledger_actions),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Eth2DailyStat {
    pub timestamp: i64,
    pub pnl: Balance,
    pub start_balance: Balance,
    pub end_balance: Balance,
    pub missed_attestations: u64,
    pub orphaned_attestations: u64,
    pub proposed_blocks: u64,
    pub missed_blocks: u64,
    pub orphaned_blocks: u64,
    pub included_attester_slashings: u64,
    pub proposer_attester_slashings: u64,
    pub deposits_number: u64,
    pub deposited_balance: Balance,
}

/// Per-validator staking detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Eth2Detail {
    pub eth1_depositor: String,
    pub public_key: String,
    pub index: u64,
    pub balance: Balance,
    pub performance_1d: Balance,
    pub performance_1w: Balance,
    pub performance_1m: Balance,
    pub performance_1y: Balance,
    #[serde(default)]
    pub daily_stats: Vec<Eth2DailyStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Eth2Deposit {
    pub from_address: String,
    pub pubkey: String,
    pub withdrawal_credentials: String,
    pub value: Balance,
    pub deposit_index: u64,
    pub tx_hash: String,
    pub log_index: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdexStakingBalance {
    pub address: String,
    pub pool_id: String,
    pub pool_name: Option<String>,
    pub adx_balance: Balance,
    pub adx_unclaimed_balance: Balance,
    pub dai_unclaimed_balance: Balance,
    pub contract_address: String,
}

/// Adex pool balances keyed by account address.
pub type AdexBalances = BTreeMap<String, Vec<AdexStakingBalance>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdexEvent {
    pub tx_hash: String,
    pub address: String,
    pub identity_address: String,
    pub timestamp: i64,
    pub event_type: String,
    pub value: Balance,
    #[serde(default)]
    pub bond_id: Option<String>,
    pub pool_id: String,
    #[serde(default)]
    pub pool_name: Option<String>,
    #[serde(default)]
    pub total_staked_amount: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdexStakingDetail {
    pub contract_address: String,
    pub pool_id: String,
    #[serde(default)]
    pub pool_name: Option<String>,
    pub total_staked_amount: Decimal,
    pub apr: String,
    pub adx_balance: Balance,
    pub adx_unclaimed_balance: Balance,
    pub dai_unclaimed_balance: Balance,
    pub adx_profit_loss: Balance,
    pub dai_profit_loss: Balance,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdexAccountHistory {
    #[serde(default)]
    pub events: Vec<AdexEvent>,
    #[serde(default)]
    pub staking_details: Vec<AdexStakingDetail>,
}

/// Adex events and staking details keyed by account address.
pub type AdexHistory = BTreeMap<String, AdexAccountHistory>;

/// Selects which gitcoin grant events to gather.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitcoinGrantEventsPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grant_id: Option<u64>,
    pub from_timestamp: i64,
    pub to_timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitcoinGrantEvent {
    pub timestamp: i64,
    pub amount: Decimal,
    pub asset: String,
    pub usd_value: Decimal,
    pub grant_id: u64,
    pub tx_id: String,
    pub tx_type: String,
    #[serde(default)]
    pub clr_round: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GitcoinGrant {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub created_on: Option<i64>,
    #[serde(default)]
    pub events: Vec<GitcoinGrantEvent>,
}

/// Gitcoin grants keyed by grant id.
pub type GitcoinGrants = BTreeMap<String, GitcoinGrant>;

/// Error types for backend requests
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("No data returned")]
    NoData,

    #[error("Invalid API url: {0}")]
    InvalidUrl(String),
}
