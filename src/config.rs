//! Runtime configuration.
//!
//! Defaults target a backend running locally; every field can be overridden from the
//! environment with [`Config::from_env`].

use crate::history::HistorySyncError;
use std::time::Duration;

pub const ENV_API_URL: &str = "HISTORY_SYNC_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "HISTORY_SYNC_TIMEOUT_SECS";
pub const ENV_POLL_MS: &str = "HISTORY_SYNC_POLL_MS";
pub const ENV_TASK_TIMEOUT_SECS: &str = "HISTORY_SYNC_TASK_TIMEOUT_SECS";
pub const ENV_PREMIUM: &str = "HISTORY_SYNC_PREMIUM";
pub const ENV_ETH_ADDRESSES: &str = "HISTORY_SYNC_ETH_ADDRESSES";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base url of the backend API
    pub api_url: String,
    /// Timeout applied to each HTTP request
    pub request_timeout: Duration,
    /// First delay between two task status polls
    pub task_poll_interval: Duration,
    /// Upper bound for the delay between two task status polls
    pub task_poll_max_interval: Duration,
    /// Give up waiting on a task after this long; `None` waits forever
    pub task_timeout: Option<Duration>,
    /// Whether the session has a premium subscription (required for staking data)
    pub premium: bool,
    /// Ethereum accounts whose transactions are tracked
    pub eth_addresses: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:4242/api/1".to_string(),
            request_timeout: Duration::from_secs(30),
            task_poll_interval: Duration::from_millis(500),
            task_poll_max_interval: Duration::from_secs(5),
            task_timeout: None,
            premium: false,
            eth_addresses: Vec::new(),
        }
    }
}

impl Config {
    /// Build a configuration from the process environment.
    pub fn from_env() -> Result<Self, HistorySyncError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, HistorySyncError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(url) = lookup(ENV_API_URL) {
            config.api_url = url;
        }
        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            config.request_timeout = Duration::from_secs(parse_number(ENV_TIMEOUT_SECS, &secs)?);
        }
        if let Some(ms) = lookup(ENV_POLL_MS) {
            config.task_poll_interval = Duration::from_millis(parse_number(ENV_POLL_MS, &ms)?);
            config.task_poll_max_interval = config.task_poll_max_interval.max(config.task_poll_interval);
        }
        if let Some(secs) = lookup(ENV_TASK_TIMEOUT_SECS) {
            config.task_timeout = Some(Duration::from_secs(parse_number(
                ENV_TASK_TIMEOUT_SECS,
                &secs,
            )?));
        }
        if let Some(premium) = lookup(ENV_PREMIUM) {
            config.premium = match premium.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" | "" => false,
                other => {
                    return Err(HistorySyncError::Config(format!(
                        "{} must be a boolean, got {:?}",
                        ENV_PREMIUM, other
                    )));
                }
            };
        }
        if let Some(addresses) = lookup(ENV_ETH_ADDRESSES) {
            config.eth_addresses = addresses
                .split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string)
                .collect();
        }

        Ok(config)
    }
}

/// Durations of zero would disable the request timeout or poll without delay.
fn parse_number(key: &str, value: &str) -> Result<u64, HistorySyncError> {
    match value.trim().parse::<u64>() {
        Ok(0) => Err(HistorySyncError::Config(format!(
            "{} must be a positive integer, got 0",
            key
        ))),
        Ok(number) => Ok(number),
        Err(e) => Err(HistorySyncError::Config(format!(
            "{} must be a positive integer: {}",
            key, e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn overrides_from_environment() {
        let config = Config::from_lookup(lookup(&[
            (ENV_API_URL, "http://backend:5042/api/1"),
            (ENV_TIMEOUT_SECS, "10"),
            (ENV_POLL_MS, "250"),
            (ENV_TASK_TIMEOUT_SECS, "600"),
            (ENV_PREMIUM, "true"),
            (ENV_ETH_ADDRESSES, "0xaaa, 0xbbb,,"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "http://backend:5042/api/1");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.task_poll_interval, Duration::from_millis(250));
        assert_eq!(config.task_timeout, Some(Duration::from_secs(600)));
        assert!(config.premium);
        assert_eq!(config.eth_addresses, vec!["0xaaa", "0xbbb"]);
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(matches!(
            Config::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "soon")])),
            Err(HistorySyncError::Config(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup(&[(ENV_PREMIUM, "maybe")])),
            Err(HistorySyncError::Config(_))
        ));
    }

    #[test]
    fn rejects_zero_durations() {
        for key in [ENV_TIMEOUT_SECS, ENV_POLL_MS, ENV_TASK_TIMEOUT_SECS] {
            let result = Config::from_lookup(lookup(&[(key, "0")]));
            assert!(
                matches!(&result, Err(HistorySyncError::Config(message)) if message.contains(key)),
                "{} accepted zero: {:?}",
                key,
                result
            );
        }
    }
}
