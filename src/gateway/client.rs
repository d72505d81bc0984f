//!
//! REST client for the portfolio backend.
//!
//! This module provides an async client for the backend history API. Every response is
//! wrapped in a `{ "result": ..., "message": ... }` envelope; long-running queries are
//! issued with `async_query=true` and answer with a task id that is later collected from
//! the `tasks/{id}` endpoint.

use super::api::{HistoryGateway, TaskQuery, TaskStatus};
use super::types::*;
use crate::config::Config;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

/// Response envelope used by every backend endpoint.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
	result: Option<T>,
	#[serde(default)]
	#[allow(dead_code)]
	message: String,
}

#[derive(Debug, Serialize)]
struct LocationQuery<'a> {
	#[serde(skip_serializing_if = "Option::is_none")]
	location: Option<&'a str>,
	only_cache: bool,
	async_query: bool,
}

#[derive(Debug, Serialize)]
struct AsyncQuery {
	async_query: bool,
}

#[derive(Debug, Serialize)]
struct AsyncBody<'a, T> {
	#[serde(flatten)]
	payload: &'a T,
	async_query: bool,
}

/// HTTP implementation of [`HistoryGateway`] and [`TaskQuery`].
#[derive(Clone)]
pub struct RestGateway {
	/// The underlying HTTP client.
	http_client: Client,
	/// Base URL of the backend API, e.g. `http://localhost:4242/api/1`.
	api_url: String,
}

impl RestGateway {
	/// Create a new gateway from the configured API url and request timeout.
	///
	/// # Errors
	/// Returns `GatewayError::InvalidUrl` if the url does not parse, or
	/// `GatewayError::Http` if the HTTP client cannot be built.
	pub fn new(config: &Config) -> Result<Self, GatewayError> {
		reqwest::Url::parse(&config.api_url)
			.map_err(|e| GatewayError::InvalidUrl(format!("{}: {}", config.api_url, e)))?;

		let http_client = Client::builder().timeout(config.request_timeout).build()?;

		Ok(Self {
			http_client,
			api_url: config.api_url.clone(),
		})
	}

	fn url(&self, path: &str) -> String {
		join_url(&self.api_url, path)
	}

	/// Send a request and unwrap the response envelope.
	///
	/// Non-success statuses are turned into `GatewayError::Api` carrying the backend's
	/// message when it sent one.
	async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, GatewayError> {
		let response = request.send().await?;
		let status = response.status();
		let body = response.text().await?;

		if !status.is_success() {
			let message = serde_json::from_str::<serde_json::Value>(&body)
				.ok()
				.and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
				.filter(|m| !m.is_empty())
				.unwrap_or_else(|| format!("HTTP error: {}", status));
			return Err(GatewayError::Api {
				status: status.as_u16(),
				message,
			});
		}

		let envelope: ApiResponse<T> = serde_json::from_str(&body)?;
		envelope.result.ok_or(GatewayError::NoData)
	}

	async fn location_task(
		&self,
		path: &str,
		location: Option<&Location>,
		only_cache: bool,
	) -> Result<TaskHandle, GatewayError> {
		debug!("Scheduling {} query for {:?}", path, location.map(Location::as_str));
		let query = LocationQuery {
			location: location.map(Location::as_str),
			only_cache,
			async_query: true,
		};
		self.execute(self.http_client.get(self.url(path)).query(&query))
			.await
	}

	async fn async_get(&self, path: &str) -> Result<TaskHandle, GatewayError> {
		debug!("Scheduling {} query", path);
		self.execute(
			self.http_client
				.get(self.url(path))
				.query(&AsyncQuery { async_query: true }),
		)
		.await
	}

	fn transactions_path(request: &TransactionRequest) -> String {
		match &request.address {
			Some(address) => format!("blockchains/ETH/transactions/{}", address),
			None => "blockchains/ETH/transactions".to_string(),
		}
	}
}

fn join_url(base: &str, path: &str) -> String {
	format!(
		"{}/{}",
		base.trim_end_matches('/'),
		path.trim_start_matches('/')
	)
}

/// Decode the `result` of a `tasks/{id}` response.
fn parse_task_status(result: &serde_json::Value) -> Result<TaskStatus, GatewayError> {
	let status = result
		.get("status")
		.and_then(|s| s.as_str())
		.ok_or(GatewayError::NoData)?;

	match status {
		"pending" => Ok(TaskStatus::Pending),
		"not-found" => Ok(TaskStatus::NotFound),
		"completed" => {
			let outcome = result.get("outcome");
			let task_result = outcome
				.and_then(|o| o.get("result"))
				.filter(|r| !r.is_null())
				.cloned();
			let message = outcome
				.and_then(|o| o.get("message"))
				.and_then(|m| m.as_str())
				.unwrap_or_default()
				.to_string();
			Ok(TaskStatus::Completed {
				result: task_result,
				message,
			})
		}
		other => Err(GatewayError::Api {
			status: 200,
			message: format!("Unknown task status: {}", other),
		}),
	}
}

#[async_trait::async_trait]
impl HistoryGateway for RestGateway {
	async fn associated_locations(&self) -> Result<Vec<Location>, GatewayError> {
		self.execute(self.http_client.get(self.url("locations/associated")))
			.await
	}

	async fn trades(
		&self,
		location: &Location,
		only_cache: bool,
	) -> Result<TaskHandle, GatewayError> {
		self.location_task("trades", Some(location), only_cache).await
	}

	async fn asset_movements(
		&self,
		location: &Location,
		only_cache: bool,
	) -> Result<TaskHandle, GatewayError> {
		self.location_task("asset_movements", Some(location), only_cache)
			.await
	}

	async fn ledger_actions(
		&self,
		location: Option<&Location>,
		only_cache: bool,
	) -> Result<TaskHandle, GatewayError> {
		self.location_task("ledgeractions", location, only_cache).await
	}

	async fn eth_transactions(
		&self,
		request: &TransactionRequest,
	) -> Result<Transactions, GatewayError> {
		self.execute(
			self.http_client
				.get(self.url(&Self::transactions_path(request)))
				.query(request)
				.query(&AsyncQuery { async_query: false }),
		)
		.await
	}

	async fn eth_transactions_task(
		&self,
		request: &TransactionRequest,
	) -> Result<TaskHandle, GatewayError> {
		debug!(
			"Scheduling transactions query for {}",
			request.address.as_deref().unwrap_or("all addresses")
		);
		self.execute(
			self.http_client
				.get(self.url(&Self::transactions_path(request)))
				.query(request)
				.query(&AsyncQuery { async_query: true }),
		)
		.await
	}

	async fn add_external_trade(&self, trade: &NewTrade) -> Result<Trade, GatewayError> {
		self.execute(self.http_client.put(self.url("trades")).json(trade))
			.await
	}

	async fn edit_external_trade(&self, trade: &Trade) -> Result<Trade, GatewayError> {
		self.execute(self.http_client.patch(self.url("trades")).json(trade))
			.await
	}

	async fn delete_external_trade(&self, trade_id: &str) -> Result<bool, GatewayError> {
		self.execute(
			self.http_client
				.delete(self.url("trades"))
				.json(&json!({ "trade_id": trade_id })),
		)
		.await
	}

	async fn add_ledger_action(
		&self,
		action: &NewLedgerAction,
	) -> Result<LedgerActionId, GatewayError> {
		self.execute(self.http_client.put(self.url("ledgeractions")).json(action))
			.await
	}

	async fn edit_ledger_action(
		&self,
		action: &LedgerAction,
	) -> Result<LimitedResponse<EntryWithMeta<LedgerAction>>, GatewayError> {
		self.execute(
			self.http_client
				.patch(self.url("ledgeractions"))
				.json(action),
		)
		.await
	}

	async fn delete_ledger_action(
		&self,
		identifier: u64,
	) -> Result<LimitedResponse<EntryWithMeta<LedgerAction>>, GatewayError> {
		self.execute(
			self.http_client
				.delete(self.url("ledgeractions"))
				.json(&json!({ "identifier": identifier })),
		)
		.await
	}

	async fn ignore_actions(
		&self,
		action_ids: &[String],
		action_type: IgnoreActionType,
	) -> Result<IgnoredActions, GatewayError> {
		self.execute(
			self.http_client
				.put(self.url("actions/ignored"))
				.json(&json!({ "action_type": action_type, "action_ids": action_ids })),
		)
		.await
	}

	async fn unignore_actions(
		&self,
		action_ids: &[String],
		action_type: IgnoreActionType,
	) -> Result<IgnoredActions, GatewayError> {
		self.execute(
			self.http_client
				.delete(self.url("actions/ignored"))
				.json(&json!({ "action_type": action_type, "action_ids": action_ids })),
		)
		.await
	}

	async fn fetch_ignored(&self) -> Result<IgnoredActions, GatewayError> {
		self.execute(self.http_client.get(self.url("actions/ignored")))
			.await
	}

	async fn eth2_staking_details(&self) -> Result<TaskHandle, GatewayError> {
		self.async_get("blockchains/ETH2/stake/details").await
	}

	async fn eth2_staking_deposits(&self) -> Result<TaskHandle, GatewayError> {
		self.async_get("blockchains/ETH2/stake/deposits").await
	}

	async fn adex_balances(&self) -> Result<TaskHandle, GatewayError> {
		self.async_get("blockchains/ETH/modules/adex/balances").await
	}

	async fn adex_history(&self) -> Result<TaskHandle, GatewayError> {
		self.async_get("blockchains/ETH/modules/adex/history").await
	}

	async fn gitcoin_grant_events(
		&self,
		payload: &GitcoinGrantEventsPayload,
	) -> Result<TaskHandle, GatewayError> {
		self.execute(
			self.http_client
				.post(self.url("gitcoin/events"))
				.json(&AsyncBody {
					payload,
					async_query: true,
				}),
		)
		.await
	}
}

#[async_trait::async_trait]
impl TaskQuery for RestGateway {
	async fn query_task(&self, task_id: TaskId) -> Result<TaskStatus, GatewayError> {
		let request = self.http_client.get(self.url(&format!("tasks/{}", task_id)));
		match self.execute::<serde_json::Value>(request).await {
			Ok(result) => parse_task_status(&result),
			Err(GatewayError::Api { status: 404, .. }) => Ok(TaskStatus::NotFound),
			Err(e) => Err(e),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_join_url() {
		assert_eq!(
			join_url("http://localhost:4242/api/1/", "/trades"),
			"http://localhost:4242/api/1/trades"
		);
		assert_eq!(
			join_url("http://localhost:4242/api/1", "tasks/7"),
			"http://localhost:4242/api/1/tasks/7"
		);
	}

	#[test]
	fn test_parse_task_status() {
		let pending = json!({ "status": "pending", "outcome": null });
		assert_eq!(parse_task_status(&pending).unwrap(), TaskStatus::Pending);

		let done = json!({
			"status": "completed",
			"outcome": { "result": { "entries": [] }, "message": "" }
		});
		assert_eq!(
			parse_task_status(&done).unwrap(),
			TaskStatus::Completed {
				result: Some(json!({ "entries": [] })),
				message: String::new(),
			}
		);

		let failed = json!({
			"status": "completed",
			"outcome": { "result": null, "message": "kraken api key invalid" }
		});
		assert_eq!(
			parse_task_status(&failed).unwrap(),
			TaskStatus::Completed {
				result: None,
				message: "kraken api key invalid".to_string(),
			}
		);

		assert!(matches!(
			parse_task_status(&json!({ "status": "exploded" })),
			Err(GatewayError::Api { .. })
		));
		assert!(matches!(
			parse_task_status(&json!({})),
			Err(GatewayError::NoData)
		));
	}

	#[test]
	fn test_rejects_invalid_url() {
		let config = Config {
			api_url: "not a url".to_string(),
			..Config::default()
		};
		assert!(matches!(
			RestGateway::new(&config),
			Err(GatewayError::InvalidUrl(_))
		));
	}

	#[test]
	fn test_transactions_path() {
		let request = TransactionRequest::default();
		assert_eq!(
			RestGateway::transactions_path(&request),
			"blockchains/ETH/transactions"
		);
		let request = TransactionQuery::for_address("0xabc").to_request();
		assert_eq!(
			RestGateway::transactions_path(&request),
			"blockchains/ETH/transactions/0xabc"
		);
	}
}
