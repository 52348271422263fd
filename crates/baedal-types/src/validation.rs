//! Configuration validation utilities for implementation config blocks.
//!
//! Each pluggable implementation (storage backend, directory, notifier)
//! declares a schema for its TOML configuration block. The engine builder
//! validates the block against the schema before constructing the
//! implementation, so misconfiguration fails fast at startup with a field
//! level error instead of surfacing later at request time.

use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Debug, Error)]
pub enum ValidationError {
	/// Error that occurs when a required field is missing.
	#[error("Missing required field: {0}")]
	MissingField(String),
	/// Error that occurs when a field has an invalid value.
	#[error("Invalid value for field '{field}': {message}")]
	InvalidValue { field: String, message: String },
	/// Error that occurs when a field's type is incorrect.
	#[error("Type mismatch for field '{field}': expected {expected}")]
	TypeMismatch { field: String, expected: String },
}

/// Represents the type of a configuration field.
#[derive(Debug)]
pub enum FieldType {
	/// A string value.
	String,
	/// An integer value with optional inclusive bounds.
	Integer { min: Option<i64>, max: Option<i64> },
	/// A boolean value.
	Boolean,
	/// An array of values, all of the same type.
	Array(Box<FieldType>),
	/// A nested table with its own schema.
	Table(Schema),
}

/// Type alias for field validator functions.
///
/// Validators perform checks beyond type matching; they receive the TOML
/// value and return an error message if validation fails.
pub type FieldValidator = Box<dyn Fn(&toml::Value) -> Result<(), String> + Send + Sync>;

/// A single field in a configuration schema.
pub struct Field {
	pub name: String,
	pub field_type: FieldType,
	pub validator: Option<FieldValidator>,
}

impl std::fmt::Debug for Field {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Field")
			.field("name", &self.name)
			.field("field_type", &self.field_type)
			.field("validator", &self.validator.is_some())
			.finish()
	}
}

impl Field {
	/// Creates a new field with the given name and type.
	pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
		Self {
			name: name.into(),
			field_type,
			validator: None,
		}
	}

	/// Adds a custom validator to this field.
	pub fn with_validator<F>(mut self, validator: F) -> Self
	where
		F: Fn(&toml::Value) -> Result<(), String> + Send + Sync + 'static,
	{
		self.validator = Some(Box::new(validator));
		self
	}
}

/// Defines a validation schema for a TOML configuration block.
///
/// A schema consists of required fields that must be present and optional
/// fields that may be present. Unknown fields are tolerated.
#[derive(Debug)]
pub struct Schema {
	pub required: Vec<Field>,
	pub optional: Vec<Field>,
}

impl Schema {
	/// Creates a new schema with required and optional fields.
	pub fn new(required: Vec<Field>, optional: Vec<Field>) -> Self {
		Self { required, optional }
	}

	/// Validates a TOML value against this schema.
	pub fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		for field in &self.required {
			match config.get(&field.name) {
				Some(value) => Self::validate_field(field, value)?,
				None => return Err(ValidationError::MissingField(field.name.clone())),
			}
		}

		for field in &self.optional {
			if let Some(value) = config.get(&field.name) {
				Self::validate_field(field, value)?;
			}
		}

		Ok(())
	}

	fn validate_field(field: &Field, value: &toml::Value) -> Result<(), ValidationError> {
		Self::validate_type(&field.name, &field.field_type, value)?;

		if let Some(validator) = &field.validator {
			validator(value).map_err(|message| ValidationError::InvalidValue {
				field: field.name.clone(),
				message,
			})?;
		}

		Ok(())
	}

	fn validate_type(
		name: &str,
		expected: &FieldType,
		value: &toml::Value,
	) -> Result<(), ValidationError> {
		let mismatch = |expected: &str| ValidationError::TypeMismatch {
			field: name.to_string(),
			expected: expected.to_string(),
		};

		match expected {
			FieldType::String => {
				value.as_str().ok_or_else(|| mismatch("string"))?;
			}
			FieldType::Integer { min, max } => {
				let n = value.as_integer().ok_or_else(|| mismatch("integer"))?;
				if let Some(min) = min {
					if n < *min {
						return Err(ValidationError::InvalidValue {
							field: name.to_string(),
							message: format!("must be >= {}", min),
						});
					}
				}
				if let Some(max) = max {
					if n > *max {
						return Err(ValidationError::InvalidValue {
							field: name.to_string(),
							message: format!("must be <= {}", max),
						});
					}
				}
			}
			FieldType::Boolean => {
				value.as_bool().ok_or_else(|| mismatch("boolean"))?;
			}
			FieldType::Array(element) => {
				let items = value.as_array().ok_or_else(|| mismatch("array"))?;
				for item in items {
					Self::validate_type(name, element, item)?;
				}
			}
			FieldType::Table(schema) => {
				if !value.is_table() {
					return Err(mismatch("table"));
				}
				schema.validate(value)?;
			}
		}

		Ok(())
	}
}

/// Trait implemented by every pluggable implementation to describe its
/// configuration requirements.
pub trait ConfigSchema: Send + Sync {
	/// Validates the given TOML configuration block.
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError>;
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse(s: &str) -> toml::Value {
		toml::from_str(s).unwrap()
	}

	#[test]
	fn missing_required_field_is_rejected() {
		let schema = Schema::new(vec![Field::new("channel", FieldType::String)], vec![]);
		let err = schema.validate(&parse("other = 1")).unwrap_err();
		assert!(matches!(err, ValidationError::MissingField(f) if f == "channel"));
	}

	#[test]
	fn integer_bounds_are_enforced() {
		let schema = Schema::new(
			vec![Field::new(
				"timeout_seconds",
				FieldType::Integer {
					min: Some(1),
					max: Some(60),
				},
			)],
			vec![],
		);
		assert!(schema.validate(&parse("timeout_seconds = 5")).is_ok());
		assert!(schema.validate(&parse("timeout_seconds = 0")).is_err());
		assert!(schema.validate(&parse("timeout_seconds = 61")).is_err());
	}

	#[test]
	fn custom_validator_runs_after_type_check() {
		let schema = Schema::new(
			vec![
				Field::new("token", FieldType::String).with_validator(|v| {
					if v.as_str().is_some_and(|s| s.is_empty()) {
						Err("must not be empty".into())
					} else {
						Ok(())
					}
				}),
			],
			vec![],
		);
		assert!(schema.validate(&parse("token = \"abc\"")).is_ok());
		assert!(schema.validate(&parse("token = \"\"")).is_err());
	}

	#[test]
	fn nested_tables_are_validated() {
		let schema = Schema::new(
			vec![Field::new(
				"users",
				FieldType::Table(Schema::new(vec![], vec![])),
			)],
			vec![],
		);
		assert!(schema.validate(&parse("[users]\nalice = \"owner\"")).is_ok());
		assert!(schema.validate(&parse("users = 3")).is_err());
	}
}
