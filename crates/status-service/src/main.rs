//! Main entry point for the order status watcher.
//!
//! This binary resolves the status of one cross-chain order by polling the
//! inbox contract on its origin chain and the outbox contract on its
//! destination chain, printing every status change.

use alloy_primitives::{Bytes, B256};
use clap::Parser;
use status_config::Config;
use status_core::OrderStatusWatcher;
use status_reader::implementations::evm::alloy::AlloyOrderReader;
use status_types::{OrderQuery, StatusError, StatusResolution};
use std::path::PathBuf;
use std::sync::Arc;

mod watch;

/// Command-line arguments for the order status watcher.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,

	/// Chain ID the order was opened on
	#[arg(long, visible_alias = "src-chain-id")]
	origin_chain_id: u64,

	/// Chain ID the order is filled on
	#[arg(long)]
	dest_chain_id: u64,

	/// Order ID (32 bytes, hex)
	#[arg(long)]
	order_id: Option<B256>,

	/// Origin data of the order (hex)
	#[arg(long)]
	origin_data: Option<Bytes>,

	/// Resolve the status once and exit
	#[arg(long)]
	once: bool,

	/// Keep polling after a terminal status
	#[arg(long, conflicts_with = "once")]
	follow: bool,

	/// Print statuses as JSON lines
	#[arg(long)]
	json: bool,
}

impl Args {
	fn query(&self) -> OrderQuery {
		OrderQuery {
			origin_chain_id: self.origin_chain_id,
			dest_chain_id: self.dest_chain_id,
			order_id: self.order_id,
			origin_data: self.origin_data.clone(),
		}
	}
}

/// Main entry point for the order status watcher.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Builds the contract reader for the configured networks
/// 5. Resolves or watches the order status
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	// Logs go to stderr so stdout only carries statuses
	fmt()
		.with_env_filter(env_filter)
		.with_writer(std::io::stderr)
		.with_target(true)
		.init();

	let config = Config::from_file(&args.config).await?;
	tracing::info!("Loaded configuration [{}]", config.watcher.id);

	let reader = Arc::new(AlloyOrderReader::new(&config.networks)?);
	let watcher = OrderStatusWatcher::from_config(&config, reader);
	let query = args.query();

	let resolution = if args.once {
		let resolution = watcher.resolve_once(query).await?;
		println!("{}", watch::render(&resolution, args.json));
		resolution
	} else {
		let handle = watcher.watch(query)?;
		watch::run(handle, args.follow, |resolution| {
			println!("{}", watch::render(resolution, args.json));
		})
		.await
	};

	if let StatusResolution::Invalid(code) = resolution {
		return Err(StatusError::InvalidStatus(code).into());
	}

	Ok(())
}
