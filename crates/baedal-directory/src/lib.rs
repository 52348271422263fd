//! User directory module for the baedal platform.
//!
//! The directory is the collaborator that answers "what role does this user
//! hold?". The state machine authorizes transitions against the answer. A
//! full deployment backs this with the platform's user service; the core
//! only depends on the lookup interface defined here.

use async_trait::async_trait;
use baedal_types::{ActorRole, ConfigSchema, ImplementationRegistry};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod static_map;
}

/// Errors that can occur during directory lookups.
#[derive(Debug, Error)]
pub enum DirectoryError {
	/// Error that occurs when the user id cannot be resolved.
	#[error("Unknown user: {0}")]
	UnknownUser(String),
	/// Error that occurs when the directory configuration is invalid.
	#[error("Configuration error: {0}")]
	Configuration(String),
}

/// Trait defining the interface for user directory implementations.
#[async_trait]
pub trait DirectoryInterface: Send + Sync {
	/// Returns the configuration schema for this directory implementation.
	fn config_schema(&self) -> Box<dyn ConfigSchema>;

	/// Resolves the role held by the given user.
	async fn role_of(&self, user_id: &str) -> Result<ActorRole, DirectoryError>;
}

/// Type alias for directory factory functions.
pub type DirectoryFactory = fn(&toml::Value) -> Result<Box<dyn DirectoryInterface>, DirectoryError>;

/// Registry trait for directory implementations.
pub trait DirectoryRegistry: ImplementationRegistry<Factory = DirectoryFactory> {}

/// Get all registered directory implementations.
pub fn get_all_implementations() -> Vec<(&'static str, DirectoryFactory)> {
	use implementations::static_map;

	vec![(static_map::Registry::NAME, static_map::Registry::factory())]
}

/// Service that manages user role lookups.
///
/// Wraps an underlying directory implementation behind a uniform interface.
pub struct DirectoryService {
	/// The underlying directory implementation.
	implementation: Box<dyn DirectoryInterface>,
}

impl DirectoryService {
	/// Creates a new DirectoryService with the specified implementation.
	pub fn new(implementation: Box<dyn DirectoryInterface>) -> Self {
		Self { implementation }
	}

	/// Resolves the role held by the given user.
	pub async fn role_of(&self, user_id: &str) -> Result<ActorRole, DirectoryError> {
		self.implementation.role_of(user_id).await
	}
}
