//! Configuration module for the baedal platform.
//!
//! This module provides structures and utilities for managing platform
//! configuration. It supports loading configuration from TOML files with
//! `${VAR}` / `${VAR:-default}` environment variable resolution, and
//! validates that all required configuration values are properly set
//! before the engine is built.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

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
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for the platform.
///
/// Contains all sections required for the engine to operate: service
/// identity, storage backend, user directory, messaging notifier, search
/// aggregation knobs, and the HTTP API server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
	/// Configuration specific to this service instance.
	pub service: ServiceConfig,
	/// Configuration for the storage backend.
	pub storage: StorageConfig,
	/// Configuration for the user directory.
	pub directory: DirectoryConfig,
	/// Configuration for the messaging notifier.
	pub notifier: NotifierConfig,
	/// Configuration for search aggregation.
	#[serde(default)]
	pub search: SearchConfig,
	/// Configuration for the HTTP API server.
	pub api: Option<ApiConfig>,
}

/// Configuration specific to this service instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
	/// Unique identifier for this service instance.
	pub id: String,
}

/// Configuration for the storage backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of storage implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
}

/// Configuration for the user directory.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DirectoryConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of directory implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
}

/// Configuration for the messaging notifier.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotifierConfig {
	/// Which implementation to use as primary.
	pub primary: String,
	/// Map of notifier implementation names to their configurations.
	pub implementations: HashMap<String, toml::Value>,
	/// Bound on a single outbound delivery attempt, in seconds.
	#[serde(default = "default_notifier_timeout_seconds")]
	pub timeout_seconds: u64,
}

/// Returns the default outbound notification timeout in seconds.
fn default_notifier_timeout_seconds() -> u64 {
	5
}

/// Configuration for search aggregation.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
	/// Result count used when a popular-search query gives no limit.
	#[serde(default = "default_search_limit")]
	pub default_limit: usize,
	/// Upper bound on the result count a query may request.
	#[serde(default = "default_search_max_limit")]
	pub max_limit: usize,
}

impl Default for SearchConfig {
	fn default() -> Self {
		Self {
			default_limit: default_search_limit(),
			max_limit: default_search_max_limit(),
		}
	}
}

/// Returns the default popular-search result count.
fn default_search_limit() -> usize {
	10
}

/// Returns the default cap on requested popular-search result counts.
fn default_search_max_limit() -> usize {
	50
}

/// Configuration for the HTTP API server.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
	/// Whether the API server is enabled.
	#[serde(default)]
	pub enabled: bool,
	/// Host address to bind the server to.
	#[serde(default = "default_api_host")]
	pub host: String,
	/// Port to bind the server to.
	#[serde(default = "default_api_port")]
	pub port: u16,
}

/// Returns the default API host.
fn default_api_host() -> String {
	"127.0.0.1".to_string()
}

/// Returns the default API port.
fn default_api_port() -> u16 {
	3000
}

/// Resolves environment variables in a string.
///
/// Replaces `${VAR_NAME}` with the value of the environment variable
/// VAR_NAME. Supports default values with `${VAR_NAME:-default_value}`.
///
/// Input strings are limited to 1MB to prevent ReDoS attacks.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024; // 1MB
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = input.to_string();
	let mut replacements = Vec::new();

	for cap in re.captures_iter(input) {
		let full_match = cap.get(0).unwrap();
		let var_name = cap.get(1).unwrap().as_str();
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name) {
			Ok(v) => v,
			Err(_) => match default_value {
				Some(default) => default.to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name
					)));
				}
			},
		};

		replacements.push((full_match.start(), full_match.end(), value));
	}

	// Apply replacements in reverse order to maintain positions
	for (start, end, value) in replacements.iter().rev() {
		result.replace_range(start..end, value);
	}

	Ok(result)
}

impl Config {
	/// Loads configuration from a TOML file.
	///
	/// Environment variables are resolved and the configuration is
	/// validated after parsing.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let contents = tokio::fs::read_to_string(path).await?;
		contents.parse()
	}

	/// Validates the configuration to ensure all required fields are
	/// properly set.
	fn validate(&self) -> Result<(), ConfigError> {
		if self.service.id.is_empty() {
			return Err(ConfigError::Validation("Service ID cannot be empty".into()));
		}

		Self::validate_component(
			"storage",
			&self.storage.primary,
			&self.storage.implementations,
		)?;
		Self::validate_component(
			"directory",
			&self.directory.primary,
			&self.directory.implementations,
		)?;
		Self::validate_component(
			"notifier",
			&self.notifier.primary,
			&self.notifier.implementations,
		)?;

		if self.notifier.timeout_seconds == 0 {
			return Err(ConfigError::Validation(
				"Notifier timeout_seconds must be greater than 0".into(),
			));
		}
		if self.notifier.timeout_seconds > 60 {
			return Err(ConfigError::Validation(
				"Notifier timeout_seconds cannot exceed 60".into(),
			));
		}

		if self.search.default_limit == 0 {
			return Err(ConfigError::Validation(
				"Search default_limit must be at least 1".into(),
			));
		}
		if self.search.max_limit < self.search.default_limit {
			return Err(ConfigError::Validation(
				"Search max_limit cannot be smaller than default_limit".into(),
			));
		}

		Ok(())
	}

	/// Validates a primary-plus-implementations component section.
	fn validate_component(
		name: &str,
		primary: &str,
		implementations: &HashMap<String, toml::Value>,
	) -> Result<(), ConfigError> {
		if implementations.is_empty() {
			return Err(ConfigError::Validation(format!(
				"At least one {} implementation must be configured",
				name
			)));
		}
		if primary.is_empty() {
			return Err(ConfigError::Validation(format!(
				"{} primary implementation cannot be empty",
				name
			)));
		}
		if !implementations.contains_key(primary) {
			return Err(ConfigError::Validation(format!(
				"Primary {} '{}' not found in implementations",
				name, primary
			)));
		}
		Ok(())
	}
}

/// Implementation of FromStr for Config to enable parsing from string.
///
/// Environment variables are resolved and the configuration is
/// automatically validated after parsing.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const BASE_CONFIG: &str = r#"
[service]
id = "baedal-test"

[storage]
primary = "memory"
[storage.implementations.memory]

[directory]
primary = "static"
[directory.implementations.static]
default_role = "customer"
[directory.implementations.static.users]
store-1 = "owner"

[notifier]
primary = "log"
[notifier.implementations.log]
"#;

	#[test]
	fn test_env_var_resolution() {
		std::env::set_var("BAEDAL_TEST_CHANNEL", "C012345");

		let input = "channel = \"${BAEDAL_TEST_CHANNEL}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "channel = \"C012345\"");

		std::env::remove_var("BAEDAL_TEST_CHANNEL");
	}

	#[test]
	fn test_env_var_with_default() {
		let input = "value = \"${BAEDAL_MISSING_VAR:-fallback}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "value = \"fallback\"");
	}

	#[test]
	fn test_missing_env_var_error() {
		let input = "value = \"${BAEDAL_MISSING_VAR}\"";
		let result = resolve_env_vars(input);
		assert!(result.is_err());
		assert!(result
			.unwrap_err()
			.to_string()
			.contains("BAEDAL_MISSING_VAR"));
	}

	#[test]
	fn test_base_config_parses_with_defaults() {
		let config: Config = BASE_CONFIG.parse().unwrap();
		assert_eq!(config.service.id, "baedal-test");
		assert_eq!(config.notifier.timeout_seconds, 5);
		assert_eq!(config.search.default_limit, 10);
		assert_eq!(config.search.max_limit, 50);
		assert!(config.api.is_none());
	}

	#[test]
	fn test_primary_must_exist_in_implementations() {
		let config_str = BASE_CONFIG.replace("primary = \"memory\"", "primary = \"file\"");
		let result = Config::from_str(&config_str);
		assert!(result.is_err());
		assert!(result
			.unwrap_err()
			.to_string()
			.contains("Primary storage 'file' not found"));
	}

	#[test]
	fn test_zero_notifier_timeout_rejected() {
		let config_str = BASE_CONFIG.replace(
			"[notifier.implementations.log]",
			"timeout_seconds = 0\n[notifier.implementations.log]",
		);
		let result = Config::from_str(&config_str);
		assert!(result.is_err());
		assert!(result.unwrap_err().to_string().contains("timeout_seconds"));
	}

	#[test]
	fn test_search_limits_validated() {
		let config_str = format!("{}\n[search]\ndefault_limit = 20\nmax_limit = 5\n", BASE_CONFIG);
		let result = Config::from_str(&config_str);
		assert!(result.is_err());
		assert!(result.unwrap_err().to_string().contains("max_limit"));
	}

	#[tokio::test]
	async fn test_from_file_resolves_and_validates() {
		use std::io::Write;

		std::env::set_var("BAEDAL_TEST_SERVICE_ID", "baedal-from-file");
		let contents = BASE_CONFIG.replace("baedal-test", "${BAEDAL_TEST_SERVICE_ID}");

		let mut file = tempfile::NamedTempFile::new().unwrap();
		file.write_all(contents.as_bytes()).unwrap();

		let config = Config::from_file(file.path().to_str().unwrap())
			.await
			.unwrap();
		assert_eq!(config.service.id, "baedal-from-file");

		std::env::remove_var("BAEDAL_TEST_SERVICE_ID");
	}
}
