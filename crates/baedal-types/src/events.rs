//! Event types for inter-service communication.
//!
//! This module defines the events flowing through the engine's event bus.
//! Events are published after the corresponding state has been durably
//! written, so consumers may treat them as post-commit facts.

use crate::{Order, OrderStatus};
use serde::{Deserialize, Serialize};

/// Main event type encompassing all platform events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PlatformEvent {
	/// Events from the order lifecycle.
	Order(OrderEvent),
	/// Events from the search aggregator.
	Search(SearchEvent),
}

/// Events related to the order lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OrderEvent {
	/// A new order has been created in the `Waiting` status.
	Created { order: Order },
	/// An order's status changed; the new status is already persisted.
	StatusChanged {
		order_id: String,
		user_id: String,
		previous: OrderStatus,
		status: OrderStatus,
	},
}

/// Events related to search aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SearchEvent {
	/// A search event was recorded; `count` is the post-increment value.
	Recorded {
		user_id: String,
		keyword: String,
		region: String,
		count: u64,
	},
}
