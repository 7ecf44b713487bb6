//! Order status labels and the tables that decode raw inbox status codes.
//!
//! The inbox contract reports an order's lifecycle state as a small integer.
//! Two deployments of the contract disagree on the enumeration, so decoding is
//! always done through an explicit [`StatusTable`].

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur while decoding order status codes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StatusError {
	/// The status code has no entry in the active status table.
	#[error("Invalid order status: {0}")]
	InvalidStatus(u8),
}

/// Lifecycle status of a cross-chain order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
	/// The inbox does not know the order.
	Invalid,
	/// The order was opened and awaits a solver.
	Pending,
	/// A solver accepted the order.
	Accepted,
	/// A solver rejected the order.
	Rejected,
	/// The order was reverted by its owner.
	Reverted,
	/// The order was filled on the destination chain.
	Filled,
	/// The solver claimed the order's inputs.
	Claimed,
}

impl OrderStatus {
	/// Returns the lowercase label of this status.
	pub fn as_str(&self) -> &'static str {
		match self {
			OrderStatus::Invalid => "invalid",
			OrderStatus::Pending => "pending",
			OrderStatus::Accepted => "accepted",
			OrderStatus::Rejected => "rejected",
			OrderStatus::Reverted => "reverted",
			OrderStatus::Filled => "filled",
			OrderStatus::Claimed => "claimed",
		}
	}

	/// Returns true if no further status change is expected by a watcher.
	///
	/// A reported fill always takes precedence over the inbox status, so once
	/// an order is filled a later claim is never observed.
	pub fn is_terminal(&self) -> bool {
		matches!(
			self,
			OrderStatus::Filled
				| OrderStatus::Rejected
				| OrderStatus::Reverted
				| OrderStatus::Claimed
		)
	}
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Status code enumeration used by an inbox deployment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTable {
	/// Seven states, including `accepted`, `reverted` and `claimed`.
	#[default]
	Extended,
	/// Four states: `invalid`, `pending`, `rejected` and `filled`.
	Compact,
}

const EXTENDED: &[OrderStatus] = &[
	OrderStatus::Invalid,
	OrderStatus::Pending,
	OrderStatus::Accepted,
	OrderStatus::Rejected,
	OrderStatus::Reverted,
	OrderStatus::Filled,
	OrderStatus::Claimed,
];

const COMPACT: &[OrderStatus] = &[
	OrderStatus::Invalid,
	OrderStatus::Pending,
	OrderStatus::Rejected,
	OrderStatus::Filled,
];

impl StatusTable {
	/// Returns the statuses of this table indexed by their code.
	pub fn entries(&self) -> &'static [OrderStatus] {
		match self {
			StatusTable::Extended => EXTENDED,
			StatusTable::Compact => COMPACT,
		}
	}

	/// Decodes a raw status code into its label.
	///
	/// # Errors
	///
	/// Returns `StatusError::InvalidStatus` carrying the code if the table
	/// has no entry for it.
	pub fn decode(&self, code: u8) -> Result<OrderStatus, StatusError> {
		self.entries()
			.get(code as usize)
			.copied()
			.ok_or(StatusError::InvalidStatus(code))
	}
}
