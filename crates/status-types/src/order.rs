//! Order query and on-chain order record types.

use alloy_primitives::{Bytes, B256};
use serde::{Deserialize, Serialize};

/// Identifies the order whose status should be resolved.
///
/// The order id and origin data are optional: a caller may not know them yet
/// (for example while the opening transaction is still pending). Reads that
/// need a missing value are skipped rather than treated as errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderQuery {
	/// Chain ID hosting the inbox contract the order was opened on.
	pub origin_chain_id: u64,
	/// Chain ID hosting the outbox contract the order is filled on.
	pub dest_chain_id: u64,
	/// Unique 32-byte order identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub order_id: Option<B256>,
	/// Origin data bytes required to check the fill on the outbox.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub origin_data: Option<Bytes>,
}

impl OrderQuery {
	/// Creates a query without an order id or origin data.
	pub fn new(origin_chain_id: u64, dest_chain_id: u64) -> Self {
		Self {
			origin_chain_id,
			dest_chain_id,
			order_id: None,
			origin_data: None,
		}
	}

	/// Sets the order id.
	pub fn with_order_id(mut self, order_id: B256) -> Self {
		self.order_id = Some(order_id);
		self
	}

	/// Sets the origin data.
	pub fn with_origin_data(mut self, origin_data: impl Into<Bytes>) -> Self {
		self.origin_data = Some(origin_data.into());
		self
	}
}

/// Order metadata read from the inbox contract.
///
/// Only the fields needed to derive a status are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
	/// Order id reported by the inbox. Zero when the inbox does not know the order.
	pub order_id: B256,
	/// Raw status code of the order state.
	pub status: u8,
}

impl OrderRecord {
	/// Returns true if the inbox reported the order as unknown.
	pub fn is_not_found(&self) -> bool {
		self.order_id.is_zero()
	}
}
