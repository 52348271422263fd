//! Logging notification sink.
//!
//! Writes every message to the tracing output instead of an external
//! channel. Used in development and in tests where a real messaging
//! endpoint is unavailable.

use crate::{NotifierFactory, NotifierInterface, NotifierRegistry, NotifyError};
use async_trait::async_trait;
use baedal_types::{ConfigSchema, ImplementationRegistry, Schema, ValidationError};

/// Notifier that logs messages instead of delivering them.
pub struct LogNotifier;

#[async_trait]
impl NotifierInterface for LogNotifier {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(LogNotifierSchema)
	}

	async fn send(&self, text: &str) -> Result<(), NotifyError> {
		tracing::info!(sink = "log", "{}", text);
		Ok(())
	}
}

/// Configuration schema for LogNotifier.
pub struct LogNotifierSchema;

impl ConfigSchema for LogNotifierSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		// The log notifier has no required configuration
		Schema::new(vec![], vec![]).validate(config)
	}
}

/// Registry for the log notifier implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "log";
	type Factory = NotifierFactory;

	fn factory() -> Self::Factory {
		create_notifier
	}
}

impl NotifierRegistry for Registry {}

/// Factory function to create a log notifier from configuration.
pub fn create_notifier(_config: &toml::Value) -> Result<Box<dyn NotifierInterface>, NotifyError> {
	Ok(Box::new(LogNotifier))
}
