//! Scheduled polling of an order's status.
//!
//! A poller owns one [`StatusResolver`] and refreshes it on a fixed interval in
//! a background task until it is stopped. Subscribers see a new value only when
//! the resolved status changes.

use crate::resolver::StatusResolver;
use status_types::{truncate_id, StatusResolution};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::Instrument;

/// Shortest interval a poller runs at.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Handle to a running status poller.
///
/// Dropping the handle stops the poller as well.
pub struct PollerHandle {
	status: watch::Receiver<StatusResolution>,
	stop_tx: mpsc::Sender<()>,
	task: JoinHandle<()>,
}

impl PollerHandle {
	/// Returns a receiver notified on every status change.
	pub fn subscribe(&self) -> watch::Receiver<StatusResolution> {
		self.status.clone()
	}

	/// Returns the latest resolved status.
	pub fn current(&self) -> StatusResolution {
		*self.status.borrow()
	}

	/// Returns true once the polling task has exited.
	pub fn is_finished(&self) -> bool {
		self.task.is_finished()
	}

	/// Stops polling and waits for the task to exit.
	///
	/// A read in flight is abandoned.
	pub async fn stop(self) {
		let _ = self.stop_tx.send(()).await;
		if let Err(e) = self.task.await {
			tracing::warn!(error = %e, "Status poller task failed");
		}
	}
}

/// Starts polling `resolver` every `interval`.
///
/// The first poll runs immediately. Ticks missed because a poll took longer
/// than the interval are skipped. Intervals below [`MIN_POLL_INTERVAL`] are
/// raised to it.
pub fn spawn(resolver: StatusResolver, interval: Duration) -> PollerHandle {
	let interval = interval.max(MIN_POLL_INTERVAL);
	let (status_tx, status_rx) = watch::channel(StatusResolution::Pending);
	let (stop_tx, stop_rx) = mpsc::channel(1);

	let span = tracing::info_span!(
		"status_poller",
		order_id = %resolver
			.query()
			.order_id
			.map(|id| truncate_id(&id.to_string()))
			.unwrap_or_default(),
		origin_chain_id = resolver.query().origin_chain_id,
		dest_chain_id = resolver.query().dest_chain_id,
	);

	let task = tokio::spawn(polling_loop(resolver, interval, status_tx, stop_rx).instrument(span));

	PollerHandle {
		status: status_rx,
		stop_tx,
		task,
	}
}

async fn polling_loop(
	mut resolver: StatusResolver,
	interval: Duration,
	status_tx: watch::Sender<StatusResolution>,
	mut stop_rx: mpsc::Receiver<()>,
) {
	let mut ticker = tokio::time::interval(interval);
	ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

	tracing::debug!(interval_ms = interval.as_millis() as u64, "Started polling");

	loop {
		tokio::select! {
			_ = ticker.tick() => {}
			_ = stop_rx.recv() => break,
		}

		let resolution = tokio::select! {
			resolution = resolver.refresh() => resolution,
			_ = stop_rx.recv() => break,
		};

		status_tx.send_if_modified(|current| {
			if *current == resolution {
				return false;
			}
			tracing::info!(status = %resolution, previous = %current, "Order status changed");
			*current = resolution;
			true
		});
	}

	tracing::debug!("Stopped polling");
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::B256;
	use status_reader::implementations::mock::MockOrderReader;
	use status_types::{OrderQuery, OrderStatus, StatusTable};
	use std::sync::Arc;

	const INTERVAL: Duration = Duration::from_secs(1);

	fn order_id() -> B256 {
		B256::repeat_byte(0x33)
	}

	fn resolver(reader: Arc<MockOrderReader>) -> StatusResolver {
		let query = OrderQuery::new(1, 10)
			.with_order_id(order_id())
			.with_origin_data(vec![0xff]);
		StatusResolver::new(reader, query, StatusTable::Extended)
	}

	#[tokio::test(start_paused = true)]
	async fn test_publishes_status_changes() {
		let reader = Arc::new(MockOrderReader::new());
		reader.set_filled(false).await;
		reader.set_order(order_id(), 1).await;

		let handle = spawn(resolver(reader.clone()), INTERVAL);
		let mut rx = handle.subscribe();

		rx.changed().await.unwrap();
		assert_eq!(
			*rx.borrow_and_update(),
			StatusResolution::Resolved(OrderStatus::Pending)
		);

		reader.set_filled(true).await;
		rx.changed().await.unwrap();
		assert_eq!(
			*rx.borrow_and_update(),
			StatusResolution::Resolved(OrderStatus::Filled)
		);
		assert_eq!(handle.current(), StatusResolution::Resolved(OrderStatus::Filled));

		handle.stop().await;
	}

	#[tokio::test(start_paused = true)]
	async fn test_unchanged_status_not_republished() {
		let reader = Arc::new(MockOrderReader::new());
		reader.set_filled(false).await;
		reader.set_order(order_id(), 2).await;

		let handle = spawn(resolver(reader.clone()), INTERVAL);
		let mut rx = handle.subscribe();
		rx.changed().await.unwrap();
		rx.borrow_and_update();

		tokio::time::sleep(INTERVAL * 5).await;

		assert!(reader.order_calls() >= 5);
		assert!(!rx.has_changed().unwrap());
		assert_eq!(handle.current(), StatusResolution::Resolved(OrderStatus::Accepted));

		handle.stop().await;
	}

	#[tokio::test(start_paused = true)]
	async fn test_stop_ends_polling() {
		let reader = Arc::new(MockOrderReader::new());
		reader.set_filled(false).await;
		reader.set_order(order_id(), 1).await;

		let handle = spawn(resolver(reader.clone()), INTERVAL);
		let mut rx = handle.subscribe();
		rx.changed().await.unwrap();

		handle.stop().await;
		let calls = reader.order_calls();

		tokio::time::sleep(INTERVAL * 5).await;
		assert_eq!(reader.order_calls(), calls);
		assert!(rx.changed().await.is_err());
	}

	#[tokio::test(start_paused = true)]
	async fn test_zero_interval_still_polls() {
		let reader = Arc::new(MockOrderReader::new());
		reader.set_filled(false).await;
		reader.set_order(order_id(), 1).await;

		let handle = spawn(resolver(reader.clone()), Duration::ZERO);
		let mut rx = handle.subscribe();
		rx.changed().await.unwrap();
		assert_eq!(
			*rx.borrow_and_update(),
			StatusResolution::Resolved(OrderStatus::Pending)
		);
		assert!(!handle.is_finished());

		handle.stop().await;
	}

	#[tokio::test(start_paused = true)]
	async fn test_dropping_handle_stops_polling() {
		let reader = Arc::new(MockOrderReader::new());
		reader.set_order(order_id(), 1).await;

		let handle = spawn(resolver(reader.clone()), INTERVAL);
		let mut rx = handle.subscribe();
		rx.changed().await.unwrap();
		drop(handle);

		// The task exits on its next wake-up and closes the channel
		assert!(rx.changed().await.is_err());
	}
}
