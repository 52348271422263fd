//! Main entry point for the baedal platform service.
//!
//! This binary runs the platform core: the order lifecycle engine with its
//! notification event loop, and the HTTP API exposing status transitions
//! and popular-search queries. Implementations for storage, the user
//! directory and the notifier are selected by name from configuration.

use baedal_config::Config;
use baedal_core::{Engine, EngineBuilder, EngineError};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

mod apis;
mod server;

/// Command-line arguments for the platform service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the platform service.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file
/// 4. Builds the engine with all registered implementations
/// 5. Runs the engine (and the API server if enabled) until interrupted
#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt().with_env_filter(env_filter).with_target(true).init();

	tracing::info!("Started baedal");

	// Load configuration
	let config = Config::from_file(
		args.config
			.to_str()
			.ok_or_else(|| anyhow::anyhow!("Invalid config path"))?,
	)
	.await?;
	tracing::info!("Loaded configuration [{}]", config.service.id);

	let api_config = config.api.clone();

	// Build engine with implementations
	let engine = Arc::new(build_engine(config)?);

	// Check if the API server should be started
	let api_enabled = api_config.as_ref().is_some_and(|api| api.enabled);

	if api_enabled {
		let api_config = api_config.unwrap();
		let api_engine = Arc::clone(&engine);

		// Run the engine loop and the API server concurrently
		tokio::select! {
			result = engine.run() => {
				tracing::info!("Engine finished");
				result?;
			}
			result = server::start_server(api_config, api_engine) => {
				tracing::info!("API server finished");
				result?;
			}
		}
	} else {
		tracing::info!("Starting engine only");
		engine.run().await?;
	}

	tracing::info!("Stopped baedal");
	Ok(())
}

/// Builds the engine, registering every known implementation factory.
fn build_engine(config: Config) -> Result<Engine, EngineError> {
	let mut builder = EngineBuilder::new(config);

	for (name, factory) in baedal_storage::get_all_implementations() {
		builder = builder.with_storage_factory(name, factory);
	}
	for (name, factory) in baedal_directory::get_all_implementations() {
		builder = builder.with_directory_factory(name, factory);
	}
	for (name, factory) in baedal_notify::get_all_implementations() {
		builder = builder.with_notifier_factory(name, factory);
	}

	builder.build()
}
