//! Configuration module for the order status watcher.
//!
//! This module provides structures and utilities for managing watcher configuration.
//! It supports loading configuration from TOML files and validates that the
//! contract registry and polling settings are usable before any read is issued.
//!
//! ## Modular Configuration Support
//!
//! Configurations can be split into multiple files:
//! - Use `include = ["networks.toml"]` to include other config files
//! - Each top-level section must be unique across all files (no duplicates allowed)

mod loader;

use regex::Regex;
use serde::{Deserialize, Serialize};
use status_types::{deserialize_networks, NetworksConfig, StatusTable};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Lower bound for the poll interval in milliseconds.
const MIN_POLL_INTERVAL_MS: u64 = 100;
/// Upper bound for the poll interval in milliseconds.
const MAX_POLL_INTERVAL_MS: u64 = 60_000;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		let message = err.message().to_string();
		ConfigError::Parse(message)
	}
}

/// Main configuration structure for the order status watcher.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Settings of the watcher itself.
	pub watcher: WatcherConfig,
	/// Contract registry: RPC endpoint, inbox and outbox address per chain.
	#[serde(deserialize_with = "deserialize_networks")]
	pub networks: NetworksConfig,
}

/// Configuration specific to the watcher instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WatcherConfig {
	/// Identifier of this watcher, used in logs.
	pub id: String,
	/// Interval between two polls of the contracts, in milliseconds.
	/// Defaults to 1000 milliseconds if not specified.
	#[serde(default = "default_poll_interval_ms")]
	pub poll_interval_ms: u64,
	/// Status code table of the deployed inbox contracts.
	#[serde(default)]
	pub status_table: StatusTable,
}

impl WatcherConfig {
	/// Returns the poll interval as a duration.
	pub fn poll_interval(&self) -> Duration {
		Duration::from_millis(self.poll_interval_ms)
	}
}

/// Returns the default poll interval in milliseconds.
fn default_poll_interval_ms() -> u64 {
	1000
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = String::with_capacity(input.len());
	let mut last_end = 0;

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};

		let value = match std::env::var(var_name.as_str()) {
			Ok(v) => v,
			Err(_) => match cap.get(2) {
				Some(default) => default.as_str().to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name.as_str()
					)));
				},
			},
		};

		result.push_str(&input[last_end..full_match.start()]);
		result.push_str(&value);
		last_end = full_match.end();
	}

	result.push_str(&input[last_end..]);
	Ok(result)
}

impl Config {
	/// Loads configuration from a file, resolving includes and environment variables.
	pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

		let mut loader = loader::ConfigLoader::new(base_dir);
		let file_name = path.file_name().ok_or_else(|| {
			ConfigError::Validation(format!("Invalid path: {}", path.display()))
		})?;
		loader.load_config(file_name).await
	}

	/// Validates the configuration to ensure all required fields are properly set.
	fn validate(&self) -> Result<(), ConfigError> {
		if self.watcher.id.is_empty() {
			return Err(ConfigError::Validation("Watcher ID cannot be empty".into()));
		}

		if self.watcher.poll_interval_ms < MIN_POLL_INTERVAL_MS
			|| self.watcher.poll_interval_ms > MAX_POLL_INTERVAL_MS
		{
			return Err(ConfigError::Validation(format!(
				"poll_interval_ms must be between {} and {}, got {}",
				MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS, self.watcher.poll_interval_ms
			)));
		}

		if self.networks.is_empty() {
			return Err(ConfigError::Validation(
				"Networks configuration cannot be empty".into(),
			));
		}

		for (chain_id, network) in &self.networks {
			if !network.rpc_url.starts_with("http://") && !network.rpc_url.starts_with("https://")
			{
				return Err(ConfigError::Validation(format!(
					"Network {} rpc_url must start with http:// or https://",
					chain_id
				)));
			}
			if network.inbox_address.is_zero() {
				return Err(ConfigError::Validation(format!(
					"Network {} must have a non-zero inbox_address",
					chain_id
				)));
			}
			if network.outbox_address.is_zero() {
				return Err(ConfigError::Validation(format!(
					"Network {} must have a non-zero outbox_address",
					chain_id
				)));
			}
		}

		Ok(())
	}
}

/// Parses a configuration from a TOML string.
///
/// Environment variables are resolved and the configuration is validated
/// after parsing.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}
