//! Order lifecycle types for the platform core.
//!
//! This module defines the order record as the core sees it, the closed
//! status enumeration governing the lifecycle, and the actor roles used to
//! authorize transitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A delivery order as tracked by the platform core.
///
/// The core mutates only `status` and `updated_at`; everything else is
/// owned by the surrounding CRUD layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
	/// Unique identifier for this order.
	pub id: String,
	/// Identifier of the user who placed the order.
	#[serde(rename = "userId")]
	pub user_id: String,
	/// Current status of the order.
	pub status: OrderStatus,
	/// Unix timestamp (seconds) when this order was created.
	#[serde(rename = "createdAt")]
	pub created_at: u64,
	/// Unix timestamp (seconds) when this order was last updated.
	/// Monotonically non-decreasing across status mutations.
	#[serde(rename = "updatedAt")]
	pub updated_at: u64,
}

impl Order {
	/// Creates a new order in the `Waiting` status.
	pub fn new(id: String, user_id: String, now: u64) -> Self {
		Self {
			id,
			user_id,
			status: OrderStatus::Waiting,
			created_at: now,
			updated_at: now,
		}
	}
}

/// Status of an order in the delivery lifecycle.
///
/// The set is closed; `Completed`, `Rejected` and `Canceled` are terminal
/// and admit no further transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
	/// Order has been placed and awaits the store's decision.
	Waiting,
	/// The store has accepted the order.
	Accepted,
	/// The store is preparing the order.
	Cooking,
	/// The order is on its way to the customer.
	Delivering,
	/// The order has been delivered.
	Completed,
	/// The store declined the order.
	Rejected,
	/// The order was canceled before completion.
	Canceled,
}

impl OrderStatus {
	/// Returns true if no further transitions are permitted from this status.
	pub fn is_terminal(&self) -> bool {
		matches!(
			self,
			OrderStatus::Completed | OrderStatus::Rejected | OrderStatus::Canceled
		)
	}

	/// Returns an iterator over all status variants.
	pub fn all() -> impl Iterator<Item = Self> {
		[
			Self::Waiting,
			Self::Accepted,
			Self::Cooking,
			Self::Delivering,
			Self::Completed,
			Self::Rejected,
			Self::Canceled,
		]
		.into_iter()
	}
}

impl fmt::Display for OrderStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OrderStatus::Waiting => write!(f, "WAITING"),
			OrderStatus::Accepted => write!(f, "ACCEPTED"),
			OrderStatus::Cooking => write!(f, "COOKING"),
			OrderStatus::Delivering => write!(f, "DELIVERING"),
			OrderStatus::Completed => write!(f, "COMPLETED"),
			OrderStatus::Rejected => write!(f, "REJECTED"),
			OrderStatus::Canceled => write!(f, "CANCELED"),
		}
	}
}

/// Role of the user requesting a transition.
///
/// Roles are resolved through the user directory; the state machine uses
/// them to decide which lifecycle edges an actor may drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
	/// The ordering consumer.
	Customer,
	/// The store operator fulfilling orders.
	Owner,
}

impl fmt::Display for ActorRole {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ActorRole::Customer => write!(f, "customer"),
			ActorRole::Owner => write!(f, "owner"),
		}
	}
}

impl FromStr for ActorRole {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"customer" => Ok(Self::Customer),
			"owner" => Ok(Self::Owner),
			_ => Err(()),
		}
	}
}

/// Result of a successful transition: the order's id and its new status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionReceipt {
	/// Identifier of the transitioned order.
	pub id: String,
	/// The status the order now holds.
	pub status: OrderStatus,
}
