//! Fill checker reading the outbox on the destination chain.

use alloy_primitives::{Bytes, B256};
use status_reader::OrderReader;
use status_types::{truncate_id, OrderQuery};
use std::sync::Arc;

/// Tracks whether an order has been filled on its destination chain.
///
/// The check only runs when both the order id and the origin data are known.
/// Read failures leave the last known value in place.
pub struct FillChecker {
	reader: Arc<dyn OrderReader>,
	dest_chain_id: u64,
	order_id: Option<B256>,
	origin_data: Option<Bytes>,
	filled: Option<bool>,
}

impl FillChecker {
	pub fn new(reader: Arc<dyn OrderReader>, query: &OrderQuery) -> Self {
		Self {
			reader,
			dest_chain_id: query.dest_chain_id,
			order_id: query.order_id,
			origin_data: query.origin_data.clone(),
			filled: None,
		}
	}

	/// Returns true if the inputs needed for `didFill` are present.
	pub fn is_enabled(&self) -> bool {
		self.order_id.is_some() && self.origin_data.is_some()
	}

	/// Last fill value read, or `None` while unresolved.
	pub fn filled(&self) -> Option<bool> {
		self.filled
	}

	/// Issues one `didFill` read and returns the fill value.
	///
	/// Returns `None` without issuing a read when the checker is disabled.
	pub async fn check(&mut self) -> Option<bool> {
		let (Some(order_id), Some(origin_data)) = (self.order_id, self.origin_data.as_ref()) else {
			return None;
		};

		let result = self
			.reader
			.did_fill(self.dest_chain_id, order_id, origin_data)
			.await;

		match result {
			Ok(filled) => self.filled = Some(filled),
			Err(e) => {
				tracing::warn!(
					order_id = %truncate_id(&order_id.to_string()),
					chain_id = self.dest_chain_id,
					error = %e,
					"Failed to read fill status"
				);
			},
		}

		self.filled
	}
}
