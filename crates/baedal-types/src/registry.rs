//! Registry trait for self-registering implementations.
//!
//! Each implementation module (storage, directory, notifier) provides a
//! `Registry` struct implementing this trait, declaring the configuration
//! name it answers to and the factory that builds it.

/// Base trait for implementation registries.
pub trait ImplementationRegistry {
	/// The name used in configuration files to reference this implementation.
	///
	/// This must match the key used in the TOML configuration, for example
	/// "memory" for `storage.implementations.memory` or "slack" for
	/// `notifier.implementations.slack`.
	const NAME: &'static str;

	/// The factory function type this implementation provides.
	type Factory;

	/// Get the factory function for this implementation.
	fn factory() -> Self::Factory;
}
