//! Contract read module for the order status watcher.
//!
//! This module abstracts the two read-only contract calls the resolver depends
//! on: `didFill` on the destination chain's outbox and `getOrder` on the origin
//! chain's inbox. Transport, ABI encoding and connection handling belong to the
//! implementation behind the [`OrderReader`] trait.

use alloy_primitives::{Bytes, B256};
use async_trait::async_trait;
use status_types::OrderRecord;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod evm {
		pub mod alloy;
	}
	#[cfg(any(test, feature = "testing"))]
	pub mod mock;
}

/// Errors that can occur while reading order data from contracts.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReaderError {
	/// Error that occurs during network communication or contract calls.
	#[error("Network error: {0}")]
	Network(String),
	/// No contract registry entry exists for the chain.
	#[error("Unknown chain: {0}")]
	UnknownChain(u64),
	/// A call argument required by the contract is absent.
	#[error("Missing call argument: {0}")]
	MissingArgument(&'static str),
	/// The inbox returned an order other than the one requested.
	#[error("Order ID mismatch: requested {requested}, got {actual}")]
	OrderIdMismatch { requested: B256, actual: B256 },
	/// Error that occurs when the reader cannot be configured.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the read-only contract calls used to resolve order status.
///
/// Implementations are shared between poller tasks and must be thread-safe.
#[async_trait]
pub trait OrderReader: Send + Sync {
	/// Returns whether the order was filled on the destination chain.
	///
	/// Calls `didFill(orderId, originData)` on the outbox of `chain_id`.
	async fn did_fill(
		&self,
		chain_id: u64,
		order_id: B256,
		origin_data: &Bytes,
	) -> Result<bool, ReaderError>;

	/// Reads the order metadata from the origin chain.
	///
	/// Calls `getOrder(orderId)` on the inbox of `chain_id` and returns the
	/// resolved order id together with the raw status code.
	async fn get_order(&self, chain_id: u64, order_id: B256) -> Result<OrderRecord, ReaderError>;
}
