use super::status::StatusTracker;
use crate::gateway::{
    AdexBalances, AdexHistory, AssetMovement, EntryWithMeta, Eth2Deposit, Eth2Detail,
    IgnoredActions, LedgerAction, LimitedResponse, Trade, Transactions,
};

pub type TradeEntry = EntryWithMeta<Trade>;
pub type AssetMovementEntry = EntryWithMeta<AssetMovement>;
pub type LedgerActionEntry = EntryWithMeta<LedgerAction>;

/// A cached collection of history entries.
///
/// `found` is the total the backend reported for the last response merged in, which may
/// exceed `data.len()` when the backend paginates. `limit` is the page size the backend
/// is willing to return.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricData<T> {
    pub data: Vec<T>,
    pub found: usize,
    pub limit: i64,
}

impl<T> Default for HistoricData<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            found: 0,
            limit: 0,
        }
    }
}

impl<T> From<LimitedResponse<T>> for HistoricData<T> {
    fn from(response: LimitedResponse<T>) -> Self {
        Self {
            data: response.entries,
            found: response.entries_found,
            limit: response.entries_limit,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryState {
    pub trades: HistoricData<TradeEntry>,
    pub asset_movements: HistoricData<AssetMovementEntry>,
    pub ledger_actions: HistoricData<LedgerActionEntry>,
    pub transactions: Transactions,
    pub ignored: IgnoredActions,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StakingState {
    pub eth2_details: Vec<Eth2Detail>,
    pub eth2_deposits: Vec<Eth2Deposit>,
    pub adex_balances: AdexBalances,
    pub adex_history: AdexHistory,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub premium: bool,
    pub eth_addresses: Vec<String>,
}

/// Result message of a user action, shown by the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub title: String,
    pub description: String,
    pub success: bool,
}

/// Everything the store holds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub history: HistoryState,
    pub staking: StakingState,
    pub session: SessionState,
    pub statuses: StatusTracker,
    pub message: Option<Message>,
}
