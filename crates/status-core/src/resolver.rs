//! Status resolver combining the fill check with the inbox order state.
//!
//! Each refresh runs the fill check, then reads the order from the inbox when
//! the read is enabled, and derives the status from both results. A reported
//! fill always wins over the inbox status code.

use crate::fill::FillChecker;
use status_reader::{OrderReader, ReaderError};
use status_types::{
	truncate_id, OrderQuery, OrderRecord, OrderStatus, StatusError, StatusResolution, StatusTable,
};
use std::sync::Arc;

/// Derives the status of an order from the two read results.
///
/// Returns `Pending` until the inbox read produced a record. A status code
/// outside `table` yields `Invalid` carrying the code.
pub fn derive_status(
	filled: Option<bool>,
	order: Option<&OrderRecord>,
	table: StatusTable,
) -> StatusResolution {
	let Some(order) = order else {
		return StatusResolution::Pending;
	};

	if filled == Some(true) {
		return StatusResolution::Resolved(OrderStatus::Filled);
	}

	match table.decode(order.status) {
		Ok(status) => StatusResolution::Resolved(status),
		Err(StatusError::InvalidStatus(code)) => StatusResolution::Invalid(code),
	}
}

/// Inputs the derived status was last computed from.
type MemoKey = (Option<bool>, Option<OrderRecord>);

/// Resolves the status of one order by polling both contracts.
pub struct StatusResolver {
	reader: Arc<dyn OrderReader>,
	query: OrderQuery,
	table: StatusTable,
	fill: FillChecker,
	order: Option<OrderRecord>,
	memo: Option<(MemoKey, StatusResolution)>,
}

impl StatusResolver {
	pub fn new(reader: Arc<dyn OrderReader>, query: OrderQuery, table: StatusTable) -> Self {
		let fill = FillChecker::new(reader.clone(), &query);
		Self {
			reader,
			query,
			table,
			fill,
			order: None,
			memo: None,
		}
	}

	/// The query this resolver was created for.
	pub fn query(&self) -> &OrderQuery {
		&self.query
	}

	/// Returns true if the inbox read should be issued.
	///
	/// The read stays enabled unless the order is known to be filled and no
	/// order id is available.
	pub fn metadata_enabled(&self) -> bool {
		self.query.order_id.is_some() || self.fill.filled() != Some(true)
	}

	/// Runs one poll of both reads and returns the derived status.
	pub async fn refresh(&mut self) -> StatusResolution {
		self.fill.check().await;

		if self.metadata_enabled() {
			match self.read_order().await {
				Ok(record) => self.order = Some(record),
				Err(ReaderError::MissingArgument(arg)) => {
					tracing::debug!(argument = arg, "Skipping order read");
				},
				Err(e) => {
					tracing::warn!(
						chain_id = self.query.origin_chain_id,
						error = %e,
						"Failed to read order"
					);
				},
			}
		}

		self.current()
	}

	/// Returns the status derived from the latest read results.
	///
	/// The value is only recomputed when the fill value or the order record changed.
	pub fn current(&mut self) -> StatusResolution {
		let key: MemoKey = (self.fill.filled(), self.order.clone());
		if let Some((cached_key, cached)) = &self.memo {
			if *cached_key == key {
				return *cached;
			}
		}

		let resolution = derive_status(key.0, key.1.as_ref(), self.table);

		if let StatusResolution::Invalid(code) = resolution {
			tracing::error!(
				order_id = %self.order_id_label(),
				code,
				"Inbox reported an unknown order status"
			);
		}

		self.memo = Some((key, resolution));
		resolution
	}

	async fn read_order(&self) -> Result<OrderRecord, ReaderError> {
		let order_id = self
			.query
			.order_id
			.ok_or(ReaderError::MissingArgument("orderId"))?;
		self.reader
			.get_order(self.query.origin_chain_id, order_id)
			.await
	}

	fn order_id_label(&self) -> String {
		self.query
			.order_id
			.map(|id| truncate_id(&id.to_string()))
			.unwrap_or_else(|| "none".to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::B256;
	use status_reader::implementations::mock::MockOrderReader;

	fn order_id() -> B256 {
		B256::repeat_byte(0x5a)
	}

	fn full_query() -> OrderQuery {
		OrderQuery::new(1, 10)
			.with_order_id(order_id())
			.with_origin_data(vec![0x01, 0x02])
	}

	fn record(status: u8) -> OrderRecord {
		OrderRecord {
			order_id: order_id(),
			status,
		}
	}

	#[test]
	fn test_derive_pending_without_record() {
		assert_eq!(
			derive_status(Some(true), None, StatusTable::Extended),
			StatusResolution::Pending
		);
		assert_eq!(
			derive_status(None, None, StatusTable::Compact),
			StatusResolution::Pending
		);
	}

	#[test]
	fn test_derive_decodes_code() {
		assert_eq!(
			derive_status(Some(false), Some(&record(1)), StatusTable::Extended),
			StatusResolution::Resolved(OrderStatus::Pending)
		);
		assert_eq!(
			derive_status(None, Some(&record(6)), StatusTable::Extended),
			StatusResolution::Resolved(OrderStatus::Claimed)
		);
		assert_eq!(
			derive_status(None, Some(&record(2)), StatusTable::Compact),
			StatusResolution::Resolved(OrderStatus::Rejected)
		);
	}

	#[test]
	fn test_derive_fill_takes_precedence() {
		for code in [0u8, 1, 3, 6, 99] {
			assert_eq!(
				derive_status(Some(true), Some(&record(code)), StatusTable::Extended),
				StatusResolution::Resolved(OrderStatus::Filled),
				"code {}",
				code
			);
		}
	}

	#[test]
	fn test_derive_unknown_code() {
		assert_eq!(
			derive_status(Some(false), Some(&record(99)), StatusTable::Extended),
			StatusResolution::Invalid(99)
		);
		assert_eq!(
			derive_status(None, Some(&record(4)), StatusTable::Compact),
			StatusResolution::Invalid(4)
		);
	}

	#[tokio::test]
	async fn test_refresh_resolves_pending_order() {
		let reader = Arc::new(MockOrderReader::new());
		reader.set_filled(false).await;
		reader.set_order(order_id(), 1).await;

		let mut resolver = StatusResolver::new(reader.clone(), full_query(), StatusTable::Extended);
		assert_eq!(resolver.current(), StatusResolution::Pending);
		assert_eq!(
			resolver.refresh().await,
			StatusResolution::Resolved(OrderStatus::Pending)
		);
		assert_eq!(reader.fill_calls(), 1);
		assert_eq!(reader.order_calls(), 1);
	}

	#[tokio::test]
	async fn test_refresh_fill_overrides_code() {
		let reader = Arc::new(MockOrderReader::new());
		reader.set_filled(true).await;
		reader.set_order(order_id(), 1).await;

		let mut resolver = StatusResolver::new(reader, full_query(), StatusTable::Extended);
		assert_eq!(
			resolver.refresh().await,
			StatusResolution::Resolved(OrderStatus::Filled)
		);
	}

	#[tokio::test]
	async fn test_refresh_pending_until_order_read() {
		let reader = Arc::new(MockOrderReader::new());
		reader.set_filled(true).await;

		let mut resolver = StatusResolver::new(reader.clone(), full_query(), StatusTable::Extended);
		assert_eq!(resolver.refresh().await, StatusResolution::Pending);

		reader.set_order(order_id(), 2).await;
		assert_eq!(
			resolver.refresh().await,
			StatusResolution::Resolved(OrderStatus::Filled)
		);
	}

	#[tokio::test]
	async fn test_refresh_reports_invalid_code() {
		let reader = Arc::new(MockOrderReader::new());
		reader.set_order(order_id(), 99).await;

		let mut resolver = StatusResolver::new(reader, full_query(), StatusTable::Extended);
		assert_eq!(resolver.refresh().await, StatusResolution::Invalid(99));
	}

	#[tokio::test]
	async fn test_metadata_enabled_without_order_id() {
		let reader = Arc::new(MockOrderReader::new());
		reader.set_order(order_id(), 1).await;

		let query = OrderQuery::new(1, 10).with_origin_data(vec![0x01]);
		let mut resolver = StatusResolver::new(reader.clone(), query, StatusTable::Extended);

		assert!(resolver.metadata_enabled());
		assert_eq!(resolver.refresh().await, StatusResolution::Pending);
		assert!(resolver.metadata_enabled());

		// No order id: neither read can be encoded
		assert_eq!(reader.fill_calls(), 0);
		assert_eq!(reader.order_calls(), 0);
	}

	#[tokio::test]
	async fn test_read_failure_keeps_last_status() {
		let reader = Arc::new(MockOrderReader::new());
		reader.set_filled(false).await;
		reader.set_order(order_id(), 2).await;

		let mut resolver = StatusResolver::new(reader.clone(), full_query(), StatusTable::Extended);
		assert_eq!(
			resolver.refresh().await,
			StatusResolution::Resolved(OrderStatus::Accepted)
		);

		reader
			.set_order_error(ReaderError::Network("connection refused".into()))
			.await;
		assert_eq!(
			resolver.refresh().await,
			StatusResolution::Resolved(OrderStatus::Accepted)
		);
	}

	#[tokio::test]
	async fn test_status_recomputed_only_on_change() {
		let reader = Arc::new(MockOrderReader::new());
		reader.set_filled(false).await;
		reader.set_order(order_id(), 2).await;

		let mut resolver = StatusResolver::new(reader.clone(), full_query(), StatusTable::Extended);
		assert_eq!(
			resolver.refresh().await,
			StatusResolution::Resolved(OrderStatus::Accepted)
		);

		// Unchanged inputs keep the cached status even though the table differs now
		resolver.table = StatusTable::Compact;
		assert_eq!(
			resolver.refresh().await,
			StatusResolution::Resolved(OrderStatus::Accepted)
		);

		reader.set_order(order_id(), 3).await;
		assert_eq!(
			resolver.refresh().await,
			StatusResolution::Resolved(OrderStatus::Filled)
		);

		reader.set_filled(true).await;
		reader.set_order(order_id(), 2).await;
		resolver.table = StatusTable::Extended;
		assert_eq!(
			resolver.refresh().await,
			StatusResolution::Resolved(OrderStatus::Filled)
		);
	}
}
