//! Notification delivery module for the baedal platform.
//!
//! This module handles delivery of order-status notifications to an
//! external messaging channel. Delivery is best-effort and at-most-once:
//! there is no retry, no queue, and no ordering guarantee across concurrent
//! sends. A failed or timed-out send is logged by the caller and never
//! affects the state change that triggered it.

use async_trait::async_trait;
use baedal_types::{ConfigSchema, ImplementationRegistry};
use std::time::Duration;
use thiserror::Error;

pub mod message;

/// Re-export implementations
pub mod implementations {
	pub mod log;
	pub mod slack;
}

/// Errors that can occur during notification delivery.
#[derive(Debug, Error)]
pub enum NotifyError {
	/// Error that occurs during network communication.
	#[error("Network error: {0}")]
	Network(String),
	/// Error that occurs when the messaging API rejects the request.
	#[error("API error: {0}")]
	Api(String),
	/// Error that occurs when a delivery attempt exceeds its time bound.
	#[error("Delivery timed out after {0}s")]
	Timeout(u64),
	/// Error that occurs when the notifier configuration is invalid.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the interface for notification sinks.
///
/// Implementations deliver a single text message to their configured
/// channel. They must not retry internally; the at-most-once contract is
/// part of the interface.
#[async_trait]
pub trait NotifierInterface: Send + Sync {
	/// Returns the configuration schema for this notifier implementation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Delivers a text message to the configured channel.
	async fn send(&self, text: &str) -> Result<(), NotifyError>;
}

/// Type alias for notifier factory functions.
pub type NotifierFactory = fn(&toml::Value) -> Result<Box<dyn NotifierInterface>, NotifyError>;

/// Registry trait for notifier implementations.
pub trait NotifierRegistry: ImplementationRegistry<Factory = NotifierFactory> {}

/// Get all registered notifier implementations.
pub fn get_all_implementations() -> Vec<(&'static str, NotifierFactory)> {
	use implementations::{log, slack};

	vec![
		(slack::Registry::NAME, slack::Registry::factory()),
		(log::Registry::NAME, log::Registry::factory()),
	]
}

/// Service that dispatches notifications with a bounded delivery time.
///
/// Wraps a notifier implementation and applies the configured outbound
/// timeout to every send, so a slow messaging API can never stall the
/// engine's event loop beyond the bound.
pub struct NotifierService {
	/// The underlying notifier implementation.
	implementation: Box<dyn NotifierInterface>,
	/// Bound on a single delivery attempt.
	timeout: Duration,
}

impl NotifierService {
	/// Creates a new NotifierService with the specified implementation.
	pub fn new(implementation: Box<dyn NotifierInterface>, timeout: Duration) -> Self {
		Self {
			implementation,
			timeout,
		}
	}

	/// Attempts a single delivery within the configured time bound.
	pub async fn dispatch(&self, text: &str) -> Result<(), NotifyError> {
		match tokio::time::timeout(self.timeout, self.implementation.send(text)).await {
			Ok(result) => result,
			Err(_) => Err(NotifyError::Timeout(self.timeout.as_secs())),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use baedal_types::{Schema, ValidationError};

	struct HangingNotifier;

	#[async_trait]
	impl NotifierInterface for HangingNotifier {
		fn config_schema(&self) -> Box<dyn ConfigSchema> {
			struct Empty;
			impl ConfigSchema for Empty {
				fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
					Schema::new(vec![], vec![]).validate(config)
				}
			}
			Box::new(Empty)
		}

		async fn send(&self, _text: &str) -> Result<(), NotifyError> {
			// Simulates a sink that never answers.
			std::future::pending().await
		}
	}

	struct RejectingNotifier;

	#[async_trait]
	impl NotifierInterface for RejectingNotifier {
		fn config_schema(&self) -> Box<dyn ConfigSchema> {
			HangingNotifier.config_schema()
		}

		async fn send(&self, _text: &str) -> Result<(), NotifyError> {
			Err(NotifyError::Api("channel_not_found".into()))
		}
	}

	#[tokio::test]
	async fn dispatch_times_out_hanging_sends() {
		let service =
			NotifierService::new(Box::new(HangingNotifier), Duration::from_millis(10));
		let result = service.dispatch("order accepted").await;
		assert!(matches!(result, Err(NotifyError::Timeout(_))));
	}

	#[tokio::test]
	async fn dispatch_passes_through_api_errors() {
		let service =
			NotifierService::new(Box::new(RejectingNotifier), Duration::from_secs(1));
		let result = service.dispatch("order accepted").await;
		assert!(matches!(result, Err(NotifyError::Api(e)) if e == "channel_not_found"));
	}
}
