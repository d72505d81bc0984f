//! English texts for task titles, notifications and action messages.

use crate::gateway::Location;

/// Display name of a location, e.g. `coinbasepro` -> `Coinbase Pro`.
pub fn exchange_name(location: &Location) -> String {
    let known = match location.as_str() {
        "kraken" => Some("Kraken"),
        "binance" => Some("Binance"),
        "binance_us" => Some("Binance US"),
        "bitmex" => Some("BitMEX"),
        "bittrex" => Some("Bittrex"),
        "bitfinex" => Some("Bitfinex"),
        "bitstamp" => Some("Bitstamp"),
        "coinbase" => Some("Coinbase"),
        "coinbasepro" => Some("Coinbase Pro"),
        "ftx" => Some("FTX"),
        "gemini" => Some("Gemini"),
        "iconomi" => Some("ICONOMI"),
        "kucoin" => Some("KuCoin"),
        "poloniex" => Some("Poloniex"),
        "external" => Some("External"),
        _ => None,
    };
    match known {
        Some(name) => name.to_string(),
        None => capitalize_words(location.as_str()),
    }
}

fn capitalize_words(raw: &str) -> String {
    raw.split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Texts of one location-partitioned history category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryTexts {
    /// Title of the background task.
    pub task_title: &'static str,
    /// Plural noun used inside sentences.
    pub noun: &'static str,
}

pub const TRADES: CategoryTexts = CategoryTexts {
    task_title: "Trades",
    noun: "trades",
};

pub const ASSET_MOVEMENTS: CategoryTexts = CategoryTexts {
    task_title: "Deposits & Withdrawals",
    noun: "deposits and withdrawals",
};

pub const LEDGER_ACTIONS: CategoryTexts = CategoryTexts {
    task_title: "Ledger Actions",
    noun: "ledger actions",
};

impl CategoryTexts {
    pub fn task_description(&self, exchange: &str) -> String {
        format!("Querying {} from {}", self.noun, exchange)
    }

    pub fn error_title(&self, exchange: &str) -> String {
        format!("{} query from {} failed", self.task_title, exchange)
    }

    pub fn error_description(&self, exchange: &str, error: &str) -> String {
        format!(
            "Failed to query {} from {}: {}",
            self.noun, exchange, error
        )
    }
}

pub const LOCATIONS_ERROR_TITLE: &str = "Could not list connected locations";

pub fn locations_error_description(noun: &str, error: &str) -> String {
    format!("No {} were fetched: {}", noun, error)
}

pub const TRANSACTIONS_TASK_TITLE: &str = "Ethereum Transactions";
pub const TRANSACTIONS_ERROR_TITLE: &str = "Ethereum transactions query failed";

pub fn transactions_task_description(address: &str) -> String {
    format!("Querying ethereum transactions of {}", address)
}

pub fn transactions_error_description(address: &str, error: &str) -> String {
    format!(
        "Failed to query ethereum transactions of {}: {}",
        address, error
    )
}

pub const DEFAULT_LEDGER_TASK_TITLE: &str = "Manual Ledger Actions";
pub const DEFAULT_LEDGER_TASK_DESCRIPTION: &str = "Reading cached ledger actions";
pub const DEFAULT_LEDGER_ERROR_TITLE: &str = "Ledger actions query failed";

pub fn default_ledger_error_description(error: &str) -> String {
    format!("Failed to read cached ledger actions: {}", error)
}

pub fn ignore_error_title(ignore: bool) -> &'static str {
    if ignore {
        "Ignoring actions failed"
    } else {
        "Un-ignoring actions failed"
    }
}

pub fn ignore_error_description(ignore: bool, error: &str) -> String {
    let verb = if ignore { "ignore" } else { "unignore" };
    format!("Failed to {} the selected actions: {}", verb, error)
}

pub const FETCH_IGNORED_ERROR_TITLE: &str = "Fetching ignored actions failed";

pub fn fetch_ignored_error_description(error: &str) -> String {
    format!("Could not read the ignored actions: {}", error)
}

pub fn gitcoin_task_title(grant_id: Option<u64>) -> String {
    match grant_id {
        Some(id) => format!("Gitcoin grant {} events", id),
        None => "Gitcoin grant events".to_string(),
    }
}

/// Texts of one staking data item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StakingTexts {
    pub task_title: &'static str,
    pub error_title: &'static str,
    pub noun: &'static str,
}

impl StakingTexts {
    pub fn error_description(&self, error: &str) -> String {
        format!("Failed to fetch {}: {}", self.noun, error)
    }
}

pub const ETH2_DETAILS: StakingTexts = StakingTexts {
    task_title: "ETH2 Staking Details",
    error_title: "ETH2 staking details query failed",
    noun: "ETH2 staking details",
};

pub const ETH2_DEPOSITS: StakingTexts = StakingTexts {
    task_title: "ETH2 Staking Deposits",
    error_title: "ETH2 staking deposits query failed",
    noun: "ETH2 staking deposits",
};

pub const ADEX_BALANCES: StakingTexts = StakingTexts {
    task_title: "AdEx Staking Balances",
    error_title: "AdEx balances query failed",
    noun: "AdEx staking balances",
};

pub const ADEX_HISTORY: StakingTexts = StakingTexts {
    task_title: "AdEx Staking History",
    error_title: "AdEx history query failed",
    noun: "AdEx staking history",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_exchanges_use_their_brand_name() {
        assert_eq!(exchange_name(&Location::new("coinbasepro")), "Coinbase Pro");
        assert_eq!(exchange_name(&Location::new("kraken")), "Kraken");
        assert_eq!(exchange_name(&Location::new("ftx")), "FTX");
    }

    #[test]
    fn unknown_locations_are_capitalized() {
        assert_eq!(exchange_name(&Location::new("crypto_com")), "Crypto Com");
        assert_eq!(exchange_name(&Location::new("blockchain")), "Blockchain");
        assert_eq!(exchange_name(&Location::new("")), "");
    }

    #[test]
    fn category_texts_name_the_exchange() {
        assert_eq!(
            TRADES.error_description("Binance", "rate limited"),
            "Failed to query trades from Binance: rate limited"
        );
        assert!(ASSET_MOVEMENTS.error_title("Kraken").contains("Kraken"));
    }
}
