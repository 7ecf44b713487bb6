//! Core status resolution for cross-chain orders.
//!
//! This crate combines the two contract reads behind [`status_reader::OrderReader`]
//! into a single order status. It provides:
//! - a fill checker for the destination chain's outbox
//! - a resolver deriving the status from the fill and the inbox order state
//! - a poller re-running the resolver on a fixed interval
//! - [`OrderStatusWatcher`], the entry point wiring these to a configuration

use status_config::Config;
use status_reader::OrderReader;
use status_types::{OrderQuery, StatusResolution, StatusTable};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::instrument;

pub mod fill;
pub mod poller;
pub mod resolver;

pub use fill::FillChecker;
pub use poller::PollerHandle;
pub use resolver::{derive_status, StatusResolver};

/// Errors that can occur when starting a status resolution.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WatcherError {
	/// The query references a chain missing from the contract registry.
	#[error("Chain {0} is not configured")]
	UnsupportedChain(u64),
	/// The poll interval cannot drive a poller.
	#[error("Poll interval must be greater than zero")]
	ZeroPollInterval,
}

/// Entry point resolving and watching order statuses.
///
/// Holds the injected reader together with the settings every resolver shares.
pub struct OrderStatusWatcher {
	reader: Arc<dyn OrderReader>,
	table: StatusTable,
	poll_interval: Duration,
	chains: HashSet<u64>,
}

impl OrderStatusWatcher {
	/// Creates a watcher from explicit settings.
	pub fn new(
		reader: Arc<dyn OrderReader>,
		table: StatusTable,
		poll_interval: Duration,
		chains: impl IntoIterator<Item = u64>,
	) -> Self {
		Self {
			reader,
			table,
			poll_interval,
			chains: chains.into_iter().collect(),
		}
	}

	/// Creates a watcher using the settings and chains of `config`.
	pub fn from_config(config: &Config, reader: Arc<dyn OrderReader>) -> Self {
		Self::new(
			reader,
			config.watcher.status_table,
			config.watcher.poll_interval(),
			config.networks.keys().copied(),
		)
	}

	/// Poll interval used by watches.
	pub fn poll_interval(&self) -> Duration {
		self.poll_interval
	}

	/// Resolves the status of an order with a single round of reads.
	#[instrument(skip_all, fields(origin_chain_id = query.origin_chain_id, dest_chain_id = query.dest_chain_id))]
	pub async fn resolve_once(&self, query: OrderQuery) -> Result<StatusResolution, WatcherError> {
		let mut resolver = self.resolver(query)?;
		Ok(resolver.refresh().await)
	}

	/// Starts polling the status of an order until the handle is stopped.
	pub fn watch(&self, query: OrderQuery) -> Result<PollerHandle, WatcherError> {
		if self.poll_interval.is_zero() {
			return Err(WatcherError::ZeroPollInterval);
		}
		let resolver = self.resolver(query)?;
		Ok(poller::spawn(resolver, self.poll_interval))
	}

	fn resolver(&self, query: OrderQuery) -> Result<StatusResolver, WatcherError> {
		for chain_id in [query.origin_chain_id, query.dest_chain_id] {
			if !self.chains.contains(&chain_id) {
				return Err(WatcherError::UnsupportedChain(chain_id));
			}
		}
		Ok(StatusResolver::new(self.reader.clone(), query, self.table))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::B256;
	use status_reader::implementations::mock::MockOrderReader;
	use status_types::OrderStatus;
	use std::str::FromStr;

	const CONFIG: &str = r#"
[watcher]
id = "test"
poll_interval_ms = 500
status_table = "compact"

[networks.1]
rpc_url = "http://localhost:8545"
inbox_address = "0x1234567890123456789012345678901234567890"
outbox_address = "0x0987654321098765432109876543210987654321"

[networks.10]
rpc_url = "http://localhost:8546"
inbox_address = "0x1234567890123456789012345678901234567890"
outbox_address = "0x0987654321098765432109876543210987654321"
"#;

	fn query() -> OrderQuery {
		OrderQuery::new(1, 10)
			.with_order_id(B256::repeat_byte(9))
			.with_origin_data(vec![0x01])
	}

	#[tokio::test]
	async fn test_resolve_once_uses_configured_table() {
		let config = Config::from_str(CONFIG).unwrap();
		let reader = Arc::new(MockOrderReader::new());
		reader.set_filled(false).await;
		reader.set_order(B256::repeat_byte(9), 2).await;

		let watcher = OrderStatusWatcher::from_config(&config, reader);
		assert_eq!(watcher.poll_interval(), Duration::from_millis(500));
		assert_eq!(
			watcher.resolve_once(query()).await,
			Ok(StatusResolution::Resolved(OrderStatus::Rejected))
		);
	}

	#[tokio::test]
	async fn test_unconfigured_chain_rejected() {
		let config = Config::from_str(CONFIG).unwrap();
		let reader = Arc::new(MockOrderReader::new());
		let watcher = OrderStatusWatcher::from_config(&config, reader.clone());

		let mut unknown_dest = query();
		unknown_dest.dest_chain_id = 42;
		assert_eq!(
			watcher.resolve_once(unknown_dest.clone()).await,
			Err(WatcherError::UnsupportedChain(42))
		);
		assert!(matches!(
			watcher.watch(unknown_dest),
			Err(WatcherError::UnsupportedChain(42))
		));
		assert_eq!(reader.order_calls(), 0);
	}

	#[tokio::test]
	async fn test_zero_poll_interval_rejected() {
		let reader = Arc::new(MockOrderReader::new());
		reader.set_order(B256::repeat_byte(9), 1).await;

		let watcher =
			OrderStatusWatcher::new(reader.clone(), StatusTable::Extended, Duration::ZERO, [1, 10]);
		assert!(matches!(
			watcher.watch(query()),
			Err(WatcherError::ZeroPollInterval)
		));
		assert_eq!(reader.order_calls(), 0);

		// A single resolution does not poll
		assert_eq!(
			watcher.resolve_once(query()).await,
			Ok(StatusResolution::Resolved(OrderStatus::Pending))
		);
	}

	#[tokio::test(start_paused = true)]
	async fn test_watch_publishes_status() {
		let reader = Arc::new(MockOrderReader::new());
		reader.set_filled(true).await;
		reader.set_order(B256::repeat_byte(9), 1).await;

		let watcher = OrderStatusWatcher::new(
			reader,
			StatusTable::Extended,
			Duration::from_secs(1),
			[1, 10],
		);
		let handle = watcher.watch(query()).unwrap();
		let mut rx = handle.subscribe();
		rx.changed().await.unwrap();
		assert_eq!(
			*rx.borrow(),
			StatusResolution::Resolved(OrderStatus::Filled)
		);
		handle.stop().await;
	}
}
