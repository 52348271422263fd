//! Order lifecycle rules for the baedal platform.
//!
//! This crate defines the state machine governing order status transitions:
//! which edges exist, which statuses are terminal, and which actor roles
//! may drive each edge. Everything here is pure; the engine owns the
//! surrounding load-validate-persist sequence.

use baedal_types::{ActorRole, OrderStatus};
use thiserror::Error;

pub mod transitions;

/// Errors that can occur while validating or applying a transition.
#[derive(Debug, Error)]
pub enum TransitionError {
	/// The referenced order does not exist.
	#[error("Order not found: {0}")]
	NotFound(String),
	/// The requested edge is not reachable from the current status.
	#[error("Invalid transition: {from} -> {to}")]
	InvalidTransition { from: OrderStatus, to: OrderStatus },
	/// The actor's role does not permit the requested edge.
	#[error("Role {role} may not move an order {from} -> {to}")]
	Forbidden {
		role: ActorRole,
		from: OrderStatus,
		to: OrderStatus,
	},
	/// The acting user could not be resolved to a role.
	#[error("Actor {0} could not be resolved to a role")]
	UnknownActor(String),
	/// The order store failed while reading or writing.
	#[error("Storage error: {0}")]
	Storage(String),
}
