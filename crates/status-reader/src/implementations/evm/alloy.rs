//! Alloy-based contract reader for EVM chains.
//!
//! Holds one HTTP provider per configured chain and issues `eth_call`s against
//! the inbox and outbox contracts registered for that chain.

use crate::{OrderReader, ReaderError};
use alloy_primitives::{Address, Bytes, B256};
use alloy_provider::RootProvider;
use alloy_sol_types::sol;
use alloy_transport_http::Http;
use async_trait::async_trait;
use status_types::{truncate_id, NetworksConfig, OrderRecord};
use std::collections::HashMap;
use tracing::instrument;

// Solidity type definitions for the inbox and outbox contracts.
//
// The resolved order follows ERC-7683; only `state.status` is consumed.
sol! {
	struct Output {
		bytes32 token;
		uint256 amount;
		bytes32 recipient;
		uint256 chainId;
	}

	struct FillInstruction {
		uint64 destinationChainId;
		bytes32 destinationSettler;
		bytes originData;
	}

	struct ResolvedCrossChainOrder {
		address user;
		uint256 originChainId;
		uint32 openDeadline;
		uint32 fillDeadline;
		bytes32 orderId;
		Output[] maxSpent;
		Output[] minReceived;
		FillInstruction[] fillInstructions;
	}

	struct OrderState {
		uint8 status;
		uint8 rejectReason;
		uint32 timestamp;
		address updatedBy;
	}

	#[sol(rpc)]
	interface IInbox {
		function getOrder(bytes32 id) external view returns (ResolvedCrossChainOrder memory resolved, OrderState memory state, uint248 offset);
	}

	#[sol(rpc)]
	interface IOutbox {
		function didFill(bytes32 orderId, bytes calldata originData) external view returns (bool);
	}
}

/// Provider and contract addresses of one chain.
struct ChainContracts {
	provider: RootProvider<Http<reqwest::Client>>,
	inbox: Address,
	outbox: Address,
}

/// Contract reader backed by alloy HTTP providers.
pub struct AlloyOrderReader {
	/// Contracts and providers keyed by chain ID.
	chains: HashMap<u64, ChainContracts>,
}

impl AlloyOrderReader {
	/// Creates a reader for every chain in the contract registry.
	///
	/// Providers connect lazily, so no request is issued here.
	pub fn new(networks: &NetworksConfig) -> Result<Self, ReaderError> {
		let mut chains = HashMap::new();

		for (chain_id, network) in networks {
			let provider = RootProvider::new_http(network.rpc_url.parse().map_err(|e| {
				ReaderError::Configuration(format!(
					"Invalid RPC URL for network {}: {}",
					chain_id, e
				))
			})?);

			chains.insert(
				*chain_id,
				ChainContracts {
					provider,
					inbox: network.inbox_address,
					outbox: network.outbox_address,
				},
			);
		}

		tracing::debug!(chains = chains.len(), "Created contract reader");
		Ok(Self { chains })
	}

	fn chain(&self, chain_id: u64) -> Result<&ChainContracts, ReaderError> {
		self.chains
			.get(&chain_id)
			.ok_or(ReaderError::UnknownChain(chain_id))
	}
}

/// Checks the order returned by the inbox against the requested one.
///
/// A zero order id means the inbox does not know the order and is passed
/// through so the status code decodes as such.
fn to_record(requested: B256, resolved_id: B256, status: u8) -> Result<OrderRecord, ReaderError> {
	if !resolved_id.is_zero() && resolved_id != requested {
		return Err(ReaderError::OrderIdMismatch {
			requested,
			actual: resolved_id,
		});
	}

	Ok(OrderRecord {
		order_id: resolved_id,
		status,
	})
}

#[async_trait]
impl OrderReader for AlloyOrderReader {
	#[instrument(skip_all, fields(chain_id = chain_id, order_id = %truncate_id(&order_id.to_string())))]
	async fn did_fill(
		&self,
		chain_id: u64,
		order_id: B256,
		origin_data: &Bytes,
	) -> Result<bool, ReaderError> {
		let chain = self.chain(chain_id)?;
		let outbox = IOutbox::new(chain.outbox, &chain.provider);

		let filled = outbox
			.didFill(order_id, origin_data.clone())
			.call()
			.await
			.map_err(|e| ReaderError::Network(format!("Failed to call didFill: {}", e)))?;

		tracing::trace!(filled = filled._0, "Read fill status");
		Ok(filled._0)
	}

	#[instrument(skip_all, fields(chain_id = chain_id, order_id = %truncate_id(&order_id.to_string())))]
	async fn get_order(&self, chain_id: u64, order_id: B256) -> Result<OrderRecord, ReaderError> {
		let chain = self.chain(chain_id)?;
		let inbox = IInbox::new(chain.inbox, &chain.provider);

		let order = inbox
			.getOrder(order_id)
			.call()
			.await
			.map_err(|e| ReaderError::Network(format!("Failed to call getOrder: {}", e)))?;

		tracing::trace!(status = order.state.status, "Read order state");
		let record = to_record(order_id, order.resolved.orderId, order.state.status)?;
		if record.is_not_found() {
			tracing::debug!("Order not known to inbox");
		}
		Ok(record)
	}
}
