//! Scripted in-memory reader for tests and local development.
//!
//! Responses are set by the caller and returned for every chain. Each read is
//! counted so tests can assert which calls were issued.

use crate::{OrderReader, ReaderError};
use alloy_primitives::{Bytes, B256};
use async_trait::async_trait;
use status_types::OrderRecord;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// Scripted responses of the mock reader.
struct Responses {
	fill: Result<bool, ReaderError>,
	order: Result<OrderRecord, ReaderError>,
}

/// Order reader returning scripted responses.
pub struct MockOrderReader {
	responses: RwLock<Responses>,
	fill_calls: AtomicUsize,
	order_calls: AtomicUsize,
}

impl Default for MockOrderReader {
	fn default() -> Self {
		Self::new()
	}
}

impl MockOrderReader {
	/// Creates a reader whose reads fail until responses are scripted.
	pub fn new() -> Self {
		Self {
			responses: RwLock::new(Responses {
				fill: Err(ReaderError::Network("no fill response scripted".into())),
				order: Err(ReaderError::Network("no order response scripted".into())),
			}),
			fill_calls: AtomicUsize::new(0),
			order_calls: AtomicUsize::new(0),
		}
	}

	/// Scripts the `didFill` result.
	pub async fn set_filled(&self, filled: bool) {
		self.responses.write().await.fill = Ok(filled);
	}

	/// Scripts a `didFill` failure.
	pub async fn set_fill_error(&self, error: ReaderError) {
		self.responses.write().await.fill = Err(error);
	}

	/// Scripts the `getOrder` result.
	pub async fn set_order(&self, order_id: B256, status: u8) {
		self.responses.write().await.order = Ok(OrderRecord { order_id, status });
	}

	/// Scripts a `getOrder` failure.
	pub async fn set_order_error(&self, error: ReaderError) {
		self.responses.write().await.order = Err(error);
	}

	/// Number of `didFill` reads issued so far.
	pub fn fill_calls(&self) -> usize {
		self.fill_calls.load(Ordering::SeqCst)
	}

	/// Number of `getOrder` reads issued so far.
	pub fn order_calls(&self) -> usize {
		self.order_calls.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl OrderReader for MockOrderReader {
	async fn did_fill(
		&self,
		_chain_id: u64,
		_order_id: B256,
		_origin_data: &Bytes,
	) -> Result<bool, ReaderError> {
		self.fill_calls.fetch_add(1, Ordering::SeqCst);
		self.responses.read().await.fill.clone()
	}

	async fn get_order(&self, _chain_id: u64, _order_id: B256) -> Result<OrderRecord, ReaderError> {
		self.order_calls.fetch_add(1, Ordering::SeqCst);
		self.responses.read().await.order.clone()
	}
}
