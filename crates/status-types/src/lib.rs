//! Common types module for the order status watcher.
//!
//! This module defines the data types shared by the configuration, reader,
//! resolver and service crates: order queries, on-chain order records, status
//! labels and the tables used to decode raw status codes.

/// Network configuration types for the contract registry.
pub mod networks;
/// Order query and on-chain order record types.
pub mod order;
/// Resolved status values produced by the resolver.
pub mod resolution;
/// Order status labels and status code tables.
pub mod status;
/// Utility functions for formatting identifiers.
pub mod utils;

// Re-export all types for convenient access
pub use networks::{deserialize_networks, NetworkConfig, NetworksConfig};
pub use order::*;
pub use resolution::*;
pub use status::*;
pub use utils::truncate_id;
