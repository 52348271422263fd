//! Static user directory implementation.
//!
//! Resolves roles from a fixed user-to-role table in the configuration
//! file, with an optional default role for users not listed. Suitable for
//! development and tests; a deployment would swap in an implementation
//! backed by the real user service.

use crate::{DirectoryError, DirectoryFactory, DirectoryInterface, DirectoryRegistry};
use async_trait::async_trait;
use baedal_types::{
	ActorRole, ConfigSchema, Field, FieldType, ImplementationRegistry, Schema, ValidationError,
};
use std::collections::HashMap;
use std::str::FromStr;

/// Directory resolving roles from a fixed in-memory table.
pub struct StaticDirectory {
	/// Explicit user-to-role assignments.
	users: HashMap<String, ActorRole>,
	/// Role applied to users not in the table, if configured.
	default_role: Option<ActorRole>,
}

impl StaticDirectory {
	/// Creates a new StaticDirectory.
	pub fn new(users: HashMap<String, ActorRole>, default_role: Option<ActorRole>) -> Self {
		Self {
			users,
			default_role,
		}
	}
}

#[async_trait]
impl DirectoryInterface for StaticDirectory {
	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(StaticDirectorySchema)
	}

	async fn role_of(&self, user_id: &str) -> Result<ActorRole, DirectoryError> {
		if let Some(role) = self.users.get(user_id) {
			return Ok(*role);
		}
		self.default_role
			.ok_or_else(|| DirectoryError::UnknownUser(user_id.to_string()))
	}
}

/// Configuration schema for StaticDirectory.
pub struct StaticDirectorySchema;

impl ConfigSchema for StaticDirectorySchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let role_validator = |v: &toml::Value| match v.as_str() {
			Some(s) if ActorRole::from_str(s).is_ok() => Ok(()),
			Some(s) => Err(format!("unknown role '{}'", s)),
			None => Err("must be a string".to_string()),
		};

		let schema = Schema::new(
			vec![],
			vec![
				Field::new("users", FieldType::Table(Schema::new(vec![], vec![]))),
				Field::new("default_role", FieldType::String).with_validator(role_validator),
			],
		);
		schema.validate(config)
	}
}

/// Registry for the static directory implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "static";
	type Factory = DirectoryFactory;

	fn factory() -> Self::Factory {
		create_directory
	}
}

impl DirectoryRegistry for Registry {}

/// Factory function to create a static directory from configuration.
///
/// Configuration parameters:
/// - `users` (optional table): user id -> "customer" | "owner".
/// - `default_role` (optional): role for users not listed.
pub fn create_directory(
	config: &toml::Value,
) -> Result<Box<dyn DirectoryInterface>, DirectoryError> {
	let mut users = HashMap::new();

	if let Some(table) = config.get("users").and_then(|v| v.as_table()) {
		for (user_id, value) in table {
			let role_str = value.as_str().ok_or_else(|| {
				DirectoryError::Configuration(format!("Role for '{}' must be a string", user_id))
			})?;
			let role = ActorRole::from_str(role_str).map_err(|_| {
				DirectoryError::Configuration(format!(
					"Unknown role '{}' for user '{}'",
					role_str, user_id
				))
			})?;
			users.insert(user_id.clone(), role);
		}
	}

	let default_role = match config.get("default_role").and_then(|v| v.as_str()) {
		Some(s) => Some(ActorRole::from_str(s).map_err(|_| {
			DirectoryError::Configuration(format!("Unknown default_role '{}'", s))
		})?),
		None => None,
	};

	Ok(Box::new(StaticDirectory::new(users, default_role)))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse(s: &str) -> toml::Value {
		toml::from_str(s).unwrap()
	}

	#[tokio::test]
	async fn resolves_listed_users_and_default() {
		let config = parse(
			r#"
default_role = "customer"
[users]
store-1 = "owner"
"#,
		);
		let directory = create_directory(&config).unwrap();

		assert_eq!(directory.role_of("store-1").await.unwrap(), ActorRole::Owner);
		assert_eq!(
			directory.role_of("someone-else").await.unwrap(),
			ActorRole::Customer
		);
	}

	#[tokio::test]
	async fn unknown_user_without_default_fails() {
		let config = parse("[users]\nstore-1 = \"owner\"\n");
		let directory = create_directory(&config).unwrap();

		let err = directory.role_of("ghost").await.unwrap_err();
		assert!(matches!(err, DirectoryError::UnknownUser(id) if id == "ghost"));
	}

	#[test]
	fn bad_role_is_a_configuration_error() {
		let config = parse("[users]\nstore-1 = \"chef\"\n");
		assert!(matches!(
			create_directory(&config),
			Err(DirectoryError::Configuration(_))
		));
	}
}
