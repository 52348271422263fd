//! File-based storage backend implementation.
//!
//! Each key is persisted as one JSON file under a configured base path.
//! Writes go through a temp file plus rename so a crash mid-write never
//! leaves a truncated record behind.

use crate::{StorageError, StorageFactory, StorageInterface, StorageRegistry};
use async_trait::async_trait;
use baedal_types::{ConfigSchema, Field, FieldType, ImplementationRegistry, Schema, ValidationError};
use std::path::{Path, PathBuf};
use tokio::fs;

/// File-based storage implementation.
pub struct FileStorage {
	/// Directory all record files live under.
	base_path: PathBuf,
}

impl FileStorage {
	/// Creates a new FileStorage rooted at the given directory.
	///
	/// The directory is created on first write if it does not exist.
	pub fn new(base_path: impl Into<PathBuf>) -> Self {
		Self {
			base_path: base_path.into(),
		}
	}

	/// Maps a storage key to a filesystem path.
	///
	/// Keys may contain characters that are unsafe in filenames (the
	/// normalized region can hold spaces, ids are caller-supplied), so
	/// every byte outside `[A-Za-z0-9_-]` is percent-encoded.
	fn path_for(&self, key: &str) -> PathBuf {
		let mut name = String::with_capacity(key.len());
		for byte in key.bytes() {
			match byte {
				b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' => {
					name.push(byte as char)
				}
				_ => name.push_str(&format!("%{:02x}", byte)),
			}
		}
		self.base_path.join(format!("{}.json", name))
	}

	async fn ensure_base_dir(&self) -> Result<(), StorageError> {
		fs::create_dir_all(&self.base_path)
			.await
			.map_err(|e| StorageError::Backend(format!("Failed to create base dir: {}", e)))
	}
}

#[async_trait]
impl StorageInterface for FileStorage {
	async fn get_bytes(&self, key: &str) -> Result<Vec<u8>, StorageError> {
		match fs::read(self.path_for(key)).await {
			Ok(bytes) => Ok(bytes),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StorageError::NotFound),
			Err(e) => Err(StorageError::Backend(e.to_string())),
		}
	}

	async fn set_bytes(&self, key: &str, value: Vec<u8>) -> Result<(), StorageError> {
		self.ensure_base_dir().await?;

		let path = self.path_for(key);
		let tmp = path.with_extension("json.tmp");

		fs::write(&tmp, &value)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))?;
		fs::rename(&tmp, &path)
			.await
			.map_err(|e| StorageError::Backend(e.to_string()))
	}

	async fn delete(&self, key: &str) -> Result<(), StorageError> {
		match fs::remove_file(self.path_for(key)).await {
			Ok(()) => Ok(()),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
			Err(e) => Err(StorageError::Backend(e.to_string())),
		}
	}

	async fn exists(&self, key: &str) -> Result<bool, StorageError> {
		Ok(fs::try_exists(self.path_for(key)).await.unwrap_or(false))
	}

	fn config_schema(&self) -> Box<dyn ConfigSchema> {
		Box::new(FileStorageSchema)
	}
}

/// Configuration schema for FileStorage.
pub struct FileStorageSchema;

impl ConfigSchema for FileStorageSchema {
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let schema = Schema::new(
			vec![
				Field::new("base_path", FieldType::String).with_validator(|v| {
					if v.as_str().is_some_and(|s| s.is_empty()) {
						Err("must not be empty".into())
					} else {
						Ok(())
					}
				}),
			],
			vec![],
		);
		schema.validate(config)
	}
}

/// Registry for the file storage implementation.
pub struct Registry;

impl ImplementationRegistry for Registry {
	const NAME: &'static str = "file";
	type Factory = StorageFactory;

	fn factory() -> Self::Factory {
		create_storage
	}
}

impl StorageRegistry for Registry {}

/// Factory function to create a file storage backend from configuration.
///
/// Configuration parameters:
/// - `base_path` (required): directory to store record files in.
pub fn create_storage(config: &toml::Value) -> Result<Box<dyn StorageInterface>, StorageError> {
	let base_path = config
		.get("base_path")
		.and_then(|v| v.as_str())
		.ok_or_else(|| StorageError::Configuration("base_path is required".to_string()))?;

	Ok(Box::new(FileStorage::new(Path::new(base_path))))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn roundtrip_and_delete() {
		let dir = tempfile::tempdir().unwrap();
		let storage = FileStorage::new(dir.path());

		storage
			.set_bytes("orders:abc", b"{\"id\":\"abc\"}".to_vec())
			.await
			.unwrap();
		assert!(storage.exists("orders:abc").await.unwrap());
		assert_eq!(
			storage.get_bytes("orders:abc").await.unwrap(),
			b"{\"id\":\"abc\"}".to_vec()
		);

		storage.delete("orders:abc").await.unwrap();
		assert!(!storage.exists("orders:abc").await.unwrap());
		// Deleting a missing key is not an error.
		storage.delete("orders:abc").await.unwrap();
	}

	#[tokio::test]
	async fn keys_with_unsafe_characters_do_not_collide() {
		let dir = tempfile::tempdir().unwrap();
		let storage = FileStorage::new(dir.path());

		storage
			.set_bytes("searches:new york", b"a".to_vec())
			.await
			.unwrap();
		storage
			.set_bytes("searches:new/york", b"b".to_vec())
			.await
			.unwrap();

		assert_eq!(storage.get_bytes("searches:new york").await.unwrap(), b"a");
		assert_eq!(storage.get_bytes("searches:new/york").await.unwrap(), b"b");
	}

	#[test]
	fn schema_requires_base_path() {
		let schema = FileStorageSchema;
		let ok: toml::Value = toml::from_str("base_path = \"/tmp/baedal\"").unwrap();
		let missing: toml::Value = toml::from_str("other = 1").unwrap();
		assert!(schema.validate(&ok).is_ok());
		assert!(schema.validate(&missing).is_err());
	}
}
