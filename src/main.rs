use history_sync::config::Config;
use history_sync::gateway::{RestGateway, TransactionQuery};
use history_sync::history::{FetchSource, HistoryOrchestrator, HistorySyncError};
use history_sync::notifications::LogNotifier;
use history_sync::staking::StakingOrchestrator;
use history_sync::store::{Mutation, Section, Store, TracingObserver};
use history_sync::tasks::PollingTaskAwaiter;

use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), HistorySyncError> {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| EnvFilter::new("history_sync=info")),
		)
		.with_target(false)
		.with_thread_ids(false)
		.with_thread_names(false)
		.with_file(false)
		.with_line_number(false)
		.with_timer(tracing_subscriber::fmt::time::time())
		.init();

	let config = Config::from_env()?;
	info!("Starting history sync against {}", config.api_url);

	let gateway = Arc::new(RestGateway::new(&config)?);
	let tasks = Arc::new(PollingTaskAwaiter::new(gateway.clone(), &config));
	let notifier = Arc::new(LogNotifier);

	let store = Arc::new(Store::new());
	store.register_observer(Arc::new(TracingObserver));
	store.commit(Mutation::SetPremium(config.premium));
	store.commit(Mutation::SetEthAddresses(config.eth_addresses.clone()));

	let history = HistoryOrchestrator::new(
		gateway.clone(),
		tasks.clone(),
		notifier.clone(),
		store.clone(),
	);
	let staking = StakingOrchestrator::new(gateway, tasks, notifier, store.clone());

	history.fetch_ignored().await;
	tokio::join!(
		history.fetch_trades(FetchSource::Load),
		history.fetch_movements(FetchSource::Load),
		history.fetch_ledger_actions(FetchSource::Load),
		history.fetch_transactions(TransactionQuery::default()),
		staking.fetch_staking_details(false),
		staking.fetch_adex(false),
	);

	let state = store.snapshot();
	info!(
		"Sync finished: {} trades, {} asset movements, {} ledger actions, {} transactions",
		state.history.trades.data.len(),
		state.history.asset_movements.data.len(),
		state.history.ledger_actions.data.len(),
		state.history.transactions.entries.len(),
	);
	if state.session.premium {
		info!(
			"Staking: {} ETH2 validators, {} deposits, {} AdEx accounts",
			state.staking.eth2_details.len(),
			state.staking.eth2_deposits.len(),
			state.staking.adex_history.len(),
		);
	}
	for section in [Section::Trades, Section::AssetMovement, Section::LedgerActions, Section::Tx] {
		info!("{:?}: {:?}", section, state.statuses.status(section));
	}
	Ok(())
}
