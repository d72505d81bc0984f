//! Typed store mutations.
//!
//! Every change to [`AppState`] is one of these. Each variant carries the wire name the
//! UI layer subscribes to (`SET_TRADES`, ...).

use super::state::{
    AppState, AssetMovementEntry, HistoricData, LedgerActionEntry, Message, TradeEntry,
};
use super::status::{Section, Status};
use crate::gateway::{
    AdexBalances, AdexHistory, EntryWithMeta, Eth2Deposit, Eth2Detail, IgnoredActions,
    LedgerAction, Trade, Transactions,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    SetStatus { section: Section, status: Status },
    SetTrades(HistoricData<TradeEntry>),
    SetMovements(HistoricData<AssetMovementEntry>),
    SetLedgerActions(HistoricData<LedgerActionEntry>),
    SetTransactions(Transactions),
    SetIgnored(IgnoredActions),
    /// Append a freshly created trade; it starts out counted in accounting.
    AddTrade(Trade),
    /// Replace the trade stored under `old_trade_id`. Editing may change the id.
    UpdateTrade {
        trade: TradeEntry,
        old_trade_id: String,
    },
    DeleteTrade { trade_id: String },
    AddLedgerAction(LedgerAction),
    SetEth2Details(Vec<Eth2Detail>),
    SetEth2Deposits(Vec<Eth2Deposit>),
    SetAdexBalances(AdexBalances),
    SetAdexHistory(AdexHistory),
    SetMessage(Message),
    SetPremium(bool),
    SetEthAddresses(Vec<String>),
}

impl Mutation {
    /// Name subscribers see for this mutation.
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::SetStatus { .. } => "SET_STATUS",
            Mutation::SetTrades(_) => "SET_TRADES",
            Mutation::SetMovements(_) => "SET_MOVEMENTS",
            Mutation::SetLedgerActions(_) => "SET_LEDGER_ACTIONS",
            Mutation::SetTransactions(_) => "SET_TRANSACTIONS",
            Mutation::SetIgnored(_) => "SET_IGNORED",
            Mutation::AddTrade(_) => "ADD_TRADE",
            Mutation::UpdateTrade { .. } => "UPDATE_TRADE",
            Mutation::DeleteTrade { .. } => "DELETE_TRADE",
            Mutation::AddLedgerAction(_) => "ADD_LEDGER_ACTION",
            Mutation::SetEth2Details(_) => "SET_ETH2_DETAILS",
            Mutation::SetEth2Deposits(_) => "SET_ETH2_DEPOSITS",
            Mutation::SetAdexBalances(_) => "SET_ADEX_BALANCES",
            Mutation::SetAdexHistory(_) => "SET_ADEX_HISTORY",
            Mutation::SetMessage(_) => "SET_MESSAGE",
            Mutation::SetPremium(_) => "SET_PREMIUM",
            Mutation::SetEthAddresses(_) => "SET_ETH_ADDRESSES",
        }
    }

    /// Apply to `state`. Returns false when the state was left untouched.
    pub(crate) fn apply(&self, state: &mut AppState) -> bool {
        let history = &mut state.history;
        match self {
            Mutation::SetStatus { section, status } => state.statuses.set(*section, *status),
            Mutation::SetTrades(trades) => replace(&mut history.trades, trades),
            Mutation::SetMovements(movements) => replace(&mut history.asset_movements, movements),
            Mutation::SetLedgerActions(actions) => replace(&mut history.ledger_actions, actions),
            Mutation::SetTransactions(transactions) => {
                replace(&mut history.transactions, transactions)
            }
            Mutation::SetIgnored(ignored) => replace(&mut history.ignored, ignored),
            Mutation::AddTrade(trade) => {
                let trades = &mut history.trades;
                trades.data.push(EntryWithMeta::new(trade.clone(), false));
                trades.found += 1;
                true
            }
            Mutation::UpdateTrade {
                trade,
                old_trade_id,
            } => {
                let slot = history
                    .trades
                    .data
                    .iter_mut()
                    .find(|existing| &existing.entry.trade_id == old_trade_id);
                match slot {
                    Some(slot) => {
                        *slot = trade.clone();
                        true
                    }
                    None => false,
                }
            }
            Mutation::DeleteTrade { trade_id } => {
                let trades = &mut history.trades;
                let before = trades.data.len();
                trades.data.retain(|existing| &existing.entry.trade_id != trade_id);
                let removed = before - trades.data.len();
                trades.found = trades.found.saturating_sub(removed);
                removed > 0
            }
            Mutation::AddLedgerAction(action) => {
                let actions = &mut history.ledger_actions;
                actions.data.push(EntryWithMeta::new(action.clone(), false));
                actions.found += 1;
                true
            }
            Mutation::SetEth2Details(details) => replace(&mut state.staking.eth2_details, details),
            Mutation::SetEth2Deposits(deposits) => {
                replace(&mut state.staking.eth2_deposits, deposits)
            }
            Mutation::SetAdexBalances(balances) => {
                replace(&mut state.staking.adex_balances, balances)
            }
            Mutation::SetAdexHistory(adex_history) => {
                replace(&mut state.staking.adex_history, adex_history)
            }
            Mutation::SetMessage(message) => {
                state.message = Some(message.clone());
                true
            }
            Mutation::SetPremium(premium) => replace(&mut state.session.premium, premium),
            Mutation::SetEthAddresses(addresses) => {
                replace(&mut state.session.eth_addresses, addresses)
            }
        }
    }
}

fn replace<T: Clone>(slot: &mut T, value: &T) -> bool {
    *slot = value.clone();
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{Location, TradeType};
    use rust_decimal_macros::dec;

    fn trade(id: &str) -> Trade {
        Trade {
            trade_id: id.to_string(),
            timestamp: 1_600_000_000,
            location: Location::new("external"),
            base_asset: "ETH".to_string(),
            quote_asset: "EUR".to_string(),
            trade_type: TradeType::Buy,
            amount: dec!(1.5),
            rate: dec!(320),
            fee: None,
            fee_currency: None,
            link: None,
            notes: None,
        }
    }

    #[test]
    fn add_trade_counts_it() {
        let mut state = AppState::default();
        assert!(Mutation::AddTrade(trade("a")).apply(&mut state));

        let trades = &state.history.trades;
        assert_eq!(trades.data.len(), 1);
        assert_eq!(trades.found, 1);
        assert!(!trades.data[0].ignored_in_accounting);
    }

    #[test]
    fn update_trade_follows_id_change() {
        let mut state = AppState::default();
        Mutation::AddTrade(trade("a")).apply(&mut state);
        Mutation::AddTrade(trade("b")).apply(&mut state);

        let edited = EntryWithMeta::new(trade("a2"), true);
        let applied = Mutation::UpdateTrade {
            trade: edited.clone(),
            old_trade_id: "a".to_string(),
        }
        .apply(&mut state);

        assert!(applied);
        assert_eq!(state.history.trades.data[0], edited);
        assert_eq!(state.history.trades.data[1].entry.trade_id, "b");
    }

    #[test]
    fn update_of_unknown_trade_is_ignored() {
        let mut state = AppState::default();
        let applied = Mutation::UpdateTrade {
            trade: EntryWithMeta::new(trade("x"), false),
            old_trade_id: "missing".to_string(),
        }
        .apply(&mut state);

        assert!(!applied);
        assert!(state.history.trades.data.is_empty());
    }

    #[test]
    fn delete_trade_never_underflows_found() {
        let mut state = AppState::default();
        state.history.trades.data.push(EntryWithMeta::new(trade("a"), false));

        assert!(
            Mutation::DeleteTrade {
                trade_id: "a".to_string()
            }
            .apply(&mut state)
        );
        assert!(state.history.trades.data.is_empty());
        assert_eq!(state.history.trades.found, 0);
    }

    #[test]
    fn wire_names() {
        assert_eq!(Mutation::SetTrades(HistoricData::default()).name(), "SET_TRADES");
        assert_eq!(Mutation::SetIgnored(IgnoredActions::default()).name(), "SET_IGNORED");
        assert_eq!(
            Mutation::SetStatus {
                section: Section::Tx,
                status: Status::Loaded
            }
            .name(),
            "SET_STATUS"
        );
    }
}
