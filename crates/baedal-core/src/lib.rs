//! Core engine for the baedal platform.
//!
//! This module provides the orchestration logic for the platform core,
//! coordinating storage, the user directory, the notification sink and the
//! search aggregator. It owns the order-status transition sequence and the
//! event-driven notification side effect, and includes the builder that
//! wires pluggable implementations from configuration.

use baedal_config::Config;
use baedal_directory::{DirectoryError, DirectoryFactory, DirectoryService};
use baedal_notify::{message, NotifierFactory, NotifierService};
use baedal_order::{transitions, TransitionError};
use baedal_search::{SearchError, SearchService};
use baedal_storage::{KeyedLocks, StorageError, StorageFactory, StorageService};
use baedal_types::{
	now_unix, truncate_id, Order, OrderEvent, OrderStatus, PlatformEvent, SearchEvent,
	SearchPopularity, StorageTable, TransitionReceipt,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::broadcast;

pub mod event_bus;

use event_bus::EventBus;

/// Errors that can occur while building or running the engine.
#[derive(Debug, Error)]
pub enum EngineError {
	/// Error related to configuration issues.
	#[error("Configuration error: {0}")]
	Config(String),
	/// Error from one of the platform services.
	#[error("Service error: {0}")]
	Service(String),
}

/// Main engine orchestrating the platform core.
///
/// The engine coordinates between:
/// - Storage: the durable order and search records
/// - Directory: user-to-role resolution for authorization
/// - Notifier: best-effort status notifications to the messaging channel
/// - Search: popularity aggregation and queries
pub struct Engine {
	/// Platform configuration.
	config: Config,
	/// Storage service for persisting records.
	storage: Arc<StorageService>,
	/// Directory service for role lookups.
	directory: Arc<DirectoryService>,
	/// Notifier service for status-change messages.
	notifier: Arc<NotifierService>,
	/// Search aggregation service.
	search: Arc<SearchService>,
	/// Per-order locks serializing same-order transitions.
	order_locks: KeyedLocks,
	/// Event bus for post-commit side effects.
	event_bus: EventBus,
}

impl Engine {
	/// Creates a new order for `user_id` in the `Waiting` status.
	pub async fn create_order(&self, user_id: &str) -> Result<Order, EngineError> {
		let order = Order::new(
			uuid::Uuid::new_v4().to_string(),
			user_id.to_string(),
			now_unix(),
		);

		self.storage
			.store(StorageTable::Orders, &order.id, &order)
			.await
			.map_err(|e| EngineError::Service(e.to_string()))?;

		tracing::info!(order_id = %truncate_id(&order.id), "Created order");

		self.event_bus
			.publish(PlatformEvent::Order(OrderEvent::Created {
				order: order.clone(),
			}))
			.ok();

		Ok(order)
	}

	/// Retrieves an order by id, or None if it does not exist.
	pub async fn order(&self, order_id: &str) -> Result<Option<Order>, EngineError> {
		match self.storage.retrieve(StorageTable::Orders, order_id).await {
			Ok(order) => Ok(Some(order)),
			Err(StorageError::NotFound) => Ok(None),
			Err(e) => Err(EngineError::Service(e.to_string())),
		}
	}

	/// Applies a status transition to an order.
	///
	/// The sequence runs under the order's lock so concurrent requests for
	/// the same order serialize; orders are independent of each other.
	/// Validation failures abort before any mutation. Once the new status
	/// is durably written, a `StatusChanged` event is published; the
	/// notification it triggers is best-effort and cannot fail the
	/// transition.
	pub async fn transition(
		&self,
		order_id: &str,
		requested: OrderStatus,
		actor_id: &str,
	) -> Result<TransitionReceipt, TransitionError> {
		let _guard = self.order_locks.lock(order_id).await;

		let mut order: Order = match self.storage.retrieve(StorageTable::Orders, order_id).await {
			Ok(order) => order,
			Err(StorageError::NotFound) => {
				return Err(TransitionError::NotFound(order_id.to_string()))
			}
			Err(e) => return Err(TransitionError::Storage(e.to_string())),
		};

		let from = order.status;
		if !transitions::is_allowed(from, requested) {
			return Err(TransitionError::InvalidTransition {
				from,
				to: requested,
			});
		}

		let role = match self.directory.role_of(actor_id).await {
			Ok(role) => role,
			Err(DirectoryError::UnknownUser(id)) => return Err(TransitionError::UnknownActor(id)),
			Err(e) => return Err(TransitionError::Storage(e.to_string())),
		};
		if !transitions::permitted(role, from, requested) {
			return Err(TransitionError::Forbidden {
				role,
				from,
				to: requested,
			});
		}

		order.status = requested;
		order.updated_at = now_unix().max(order.updated_at);

		self.storage
			.update(StorageTable::Orders, order_id, &order)
			.await
			.map_err(|e| TransitionError::Storage(e.to_string()))?;

		tracing::info!(
			order_id = %truncate_id(order_id),
			from = %from,
			to = %requested,
			"Transitioned order"
		);

		// The status change is durable at this point; everything after is
		// best-effort side effect.
		self.event_bus
			.publish(PlatformEvent::Order(OrderEvent::StatusChanged {
				order_id: order.id.clone(),
				user_id: order.user_id.clone(),
				previous: from,
				status: requested,
			}))
			.ok();

		Ok(TransitionReceipt {
			id: order.id,
			status: requested,
		})
	}

	/// Records a search event through the aggregator.
	pub async fn record_search(
		&self,
		user_id: &str,
		keyword: &str,
		region: &str,
	) -> Result<SearchPopularity, SearchError> {
		let record = self.search.record(user_id, keyword, region).await?;

		self.event_bus
			.publish(PlatformEvent::Search(SearchEvent::Recorded {
				user_id: record.user_id.clone(),
				keyword: record.keyword.clone(),
				region: record.region.clone(),
				count: record.count,
			}))
			.ok();

		Ok(record)
	}

	/// Returns the most popular searches for a region.
	///
	/// Uses the configured default when no limit is given.
	pub async fn popular_searches(
		&self,
		region: &str,
		limit: Option<usize>,
	) -> Result<Vec<SearchPopularity>, SearchError> {
		let n = limit.unwrap_or(self.config.search.default_limit);
		self.search.top_n(region, n).await
	}

	/// Main event loop of the engine.
	///
	/// Subscribes to the event bus and fires a notification task for every
	/// status change. Runs until the bus closes or ctrl-c is received.
	pub async fn run(&self) -> Result<(), EngineError> {
		let mut events = self.event_bus.subscribe();

		loop {
			tokio::select! {
				event = events.recv() => {
					match event {
						Ok(PlatformEvent::Order(OrderEvent::StatusChanged {
							order_id,
							user_id,
							status,
							..
						})) => {
							let notifier = Arc::clone(&self.notifier);
							tokio::spawn(async move {
								deliver_status_notification(
									&notifier, &order_id, &user_id, status,
								)
								.await;
							});
						}
						Ok(_) => {}
						Err(broadcast::error::RecvError::Lagged(missed)) => {
							tracing::warn!(missed, "Event loop lagged; notifications dropped");
						}
						Err(broadcast::error::RecvError::Closed) => break,
					}
				}

				_ = tokio::signal::ctrl_c() => {
					break;
				}
			}
		}

		Ok(())
	}

	/// Returns a reference to the event bus.
	pub fn event_bus(&self) -> &EventBus {
		&self.event_bus
	}

	/// Returns a reference to the configuration.
	pub fn config(&self) -> &Config {
		&self.config
	}

	/// Returns a reference to the storage service.
	pub fn storage(&self) -> &Arc<StorageService> {
		&self.storage
	}
}

/// Formats and attempts the notification for a committed status change.
///
/// Failures (including the bounded timeout) are logged and swallowed: the
/// state change is the durable fact, the notification is best-effort.
pub async fn deliver_status_notification(
	notifier: &NotifierService,
	order_id: &str,
	user_id: &str,
	status: OrderStatus,
) {
	let notification = message::notification_for(order_id, user_id, status);
	let text = message::render(&notification);

	if let Err(e) = notifier.dispatch(&text).await {
		tracing::warn!(
			order_id = %truncate_id(order_id),
			error = %e,
			"Notification delivery failed"
		);
	}
}

/// Builder for constructing an Engine with pluggable implementations.
///
/// Factories are registered by configuration name; `build` instantiates the
/// implementation each component's `primary` selects, validates its
/// configuration block against the implementation's schema, and wires the
/// services together.
pub struct EngineBuilder {
	config: Config,
	storage_factories: HashMap<String, StorageFactory>,
	directory_factories: HashMap<String, DirectoryFactory>,
	notifier_factories: HashMap<String, NotifierFactory>,
}

impl EngineBuilder {
	/// Creates a new EngineBuilder with the given configuration.
	pub fn new(config: Config) -> Self {
		Self {
			config,
			storage_factories: HashMap::new(),
			directory_factories: HashMap::new(),
			notifier_factories: HashMap::new(),
		}
	}

	/// Adds a factory function for creating storage backends.
	pub fn with_storage_factory(mut self, name: &str, factory: StorageFactory) -> Self {
		self.storage_factories.insert(name.to_string(), factory);
		self
	}

	/// Adds a factory function for creating directory implementations.
	pub fn with_directory_factory(mut self, name: &str, factory: DirectoryFactory) -> Self {
		self.directory_factories.insert(name.to_string(), factory);
		self
	}

	/// Adds a factory function for creating notifier implementations.
	pub fn with_notifier_factory(mut self, name: &str, factory: NotifierFactory) -> Self {
		self.notifier_factories.insert(name.to_string(), factory);
		self
	}

	/// Builds the Engine using the configured factories.
	pub fn build(self) -> Result<Engine, EngineError> {
		// Create storage backend
		let storage_name = self.config.storage.primary.clone();
		let storage_config = self
			.config
			.storage
			.implementations
			.get(&storage_name)
			.ok_or_else(|| {
				EngineError::Config(format!("Missing storage config for '{}'", storage_name))
			})?;
		let storage_factory = self.storage_factories.get(&storage_name).ok_or_else(|| {
			EngineError::Config(format!("Unknown storage implementation '{}'", storage_name))
		})?;
		let backend = storage_factory(storage_config).map_err(|e| {
			EngineError::Config(format!(
				"Failed to create storage backend '{}': {}",
				storage_name, e
			))
		})?;
		backend.config_schema().validate(storage_config).map_err(|e| {
			EngineError::Config(format!(
				"Invalid configuration for storage '{}': {}",
				storage_name, e
			))
		})?;
		tracing::info!(component = "storage", implementation = %storage_name, "Loaded");
		let storage = Arc::new(StorageService::new(backend));

		// Create directory implementation
		let directory_name = self.config.directory.primary.clone();
		let directory_config = self
			.config
			.directory
			.implementations
			.get(&directory_name)
			.ok_or_else(|| {
				EngineError::Config(format!("Missing directory config for '{}'", directory_name))
			})?;
		let directory_factory =
			self.directory_factories.get(&directory_name).ok_or_else(|| {
				EngineError::Config(format!(
					"Unknown directory implementation '{}'",
					directory_name
				))
			})?;
		let directory_impl = directory_factory(directory_config).map_err(|e| {
			EngineError::Config(format!(
				"Failed to create directory '{}': {}",
				directory_name, e
			))
		})?;
		directory_impl
			.config_schema()
			.validate(directory_config)
			.map_err(|e| {
				EngineError::Config(format!(
					"Invalid configuration for directory '{}': {}",
					directory_name, e
				))
			})?;
		tracing::info!(component = "directory", implementation = %directory_name, "Loaded");
		let directory = Arc::new(DirectoryService::new(directory_impl));

		// Create notifier implementation
		let notifier_name = self.config.notifier.primary.clone();
		let notifier_config = self
			.config
			.notifier
			.implementations
			.get(&notifier_name)
			.ok_or_else(|| {
				EngineError::Config(format!("Missing notifier config for '{}'", notifier_name))
			})?;
		let notifier_factory = self.notifier_factories.get(&notifier_name).ok_or_else(|| {
			EngineError::Config(format!(
				"Unknown notifier implementation '{}'",
				notifier_name
			))
		})?;
		let notifier_impl = notifier_factory(notifier_config).map_err(|e| {
			EngineError::Config(format!(
				"Failed to create notifier '{}': {}",
				notifier_name, e
			))
		})?;
		notifier_impl
			.config_schema()
			.validate(notifier_config)
			.map_err(|e| {
				EngineError::Config(format!(
					"Invalid configuration for notifier '{}': {}",
					notifier_name, e
				))
			})?;
		tracing::info!(component = "notifier", implementation = %notifier_name, "Loaded");
		let notifier = Arc::new(NotifierService::new(
			notifier_impl,
			Duration::from_secs(self.config.notifier.timeout_seconds),
		));

		let search = Arc::new(SearchService::new(
			Arc::clone(&storage),
			self.config.search.max_limit,
		));

		Ok(Engine {
			config: self.config,
			storage,
			directory,
			notifier,
			search,
			order_locks: KeyedLocks::new(),
			event_bus: EventBus::new(1000),
		})
	}
}
