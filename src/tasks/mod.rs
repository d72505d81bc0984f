//! Background task tracking.
//!
//! Long-running backend queries return a task handle. The awaiter polls the backend until
//! the task is done and knows which kinds of tasks are in flight.

mod awaiter;
mod numeric;
mod types;

pub use awaiter::{PollingTaskAwaiter, TaskAwaiter, await_result};
pub use numeric::coerce_numeric_keys;
pub use types::*;

/// Fields of a balance that carry decimal values.
pub const BALANCE_KEYS: &[&str] = &["amount", "usd_value"];
pub const TRADE_NUMERIC_KEYS: &[&str] = &["amount", "rate", "fee"];
pub const MOVEMENT_NUMERIC_KEYS: &[&str] = &["amount", "fee"];
pub const LEDGER_ACTION_NUMERIC_KEYS: &[&str] = &["amount", "usd_value", "rate"];
pub const ADEX_HISTORY_NUMERIC_KEYS: &[&str] = &["amount", "usd_value", "total_staked_amount"];
