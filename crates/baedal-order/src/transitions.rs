//! The order status transition table.
//!
//! Edges are explicit: a fulfillment path
//! `Waiting -> Accepted -> Cooking -> Delivering -> Completed`, a store
//! rejection `Waiting -> Rejected`, and cancellation from every
//! non-terminal status. Terminal statuses (`Completed`, `Rejected`,
//! `Canceled`) have no outgoing edges.

use baedal_types::{ActorRole, OrderStatus};

/// Returns the statuses reachable from `from` in a single transition.
pub fn allowed_targets(from: OrderStatus) -> &'static [OrderStatus] {
	match from {
		OrderStatus::Waiting => &[
			OrderStatus::Accepted,
			OrderStatus::Rejected,
			OrderStatus::Canceled,
		],
		OrderStatus::Accepted => &[OrderStatus::Cooking, OrderStatus::Canceled],
		OrderStatus::Cooking => &[OrderStatus::Delivering, OrderStatus::Canceled],
		OrderStatus::Delivering => &[OrderStatus::Completed, OrderStatus::Canceled],
		OrderStatus::Completed | OrderStatus::Rejected | OrderStatus::Canceled => &[],
	}
}

/// Returns true if the edge `from -> to` exists in the lifecycle.
pub fn is_allowed(from: OrderStatus, to: OrderStatus) -> bool {
	allowed_targets(from).contains(&to)
}

/// Returns true if `role` may drive the edge `from -> to`.
///
/// Cancellation is open to the consumer and the store; every forward edge
/// (acceptance, rejection, and fulfillment progression) is driven by the
/// store.
pub fn permitted(role: ActorRole, _from: OrderStatus, to: OrderStatus) -> bool {
	match to {
		OrderStatus::Canceled => matches!(role, ActorRole::Customer | ActorRole::Owner),
		_ => role == ActorRole::Owner,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn terminal_statuses_have_no_outgoing_edges() {
		for status in OrderStatus::all().filter(|s| s.is_terminal()) {
			assert!(allowed_targets(status).is_empty(), "{status} must be terminal");
			for target in OrderStatus::all() {
				assert!(!is_allowed(status, target));
			}
		}
	}

	#[test]
	fn every_non_terminal_status_can_be_canceled() {
		for status in OrderStatus::all().filter(|s| !s.is_terminal()) {
			assert!(is_allowed(status, OrderStatus::Canceled));
		}
	}

	#[test]
	fn full_edge_matrix() {
		use OrderStatus::*;

		let expected: &[(OrderStatus, OrderStatus)] = &[
			(Waiting, Accepted),
			(Waiting, Rejected),
			(Waiting, Canceled),
			(Accepted, Cooking),
			(Accepted, Canceled),
			(Cooking, Delivering),
			(Cooking, Canceled),
			(Delivering, Completed),
			(Delivering, Canceled),
		];

		for from in OrderStatus::all() {
			for to in OrderStatus::all() {
				let should_exist = expected.contains(&(from, to));
				assert_eq!(
					is_allowed(from, to),
					should_exist,
					"edge {from} -> {to} mismatch"
				);
			}
		}
	}

	#[test]
	fn no_self_transitions() {
		for status in OrderStatus::all() {
			assert!(!is_allowed(status, status));
		}
	}

	#[test]
	fn customers_may_only_cancel() {
		use OrderStatus::*;

		assert!(permitted(ActorRole::Customer, Waiting, Canceled));
		assert!(permitted(ActorRole::Customer, Delivering, Canceled));

		assert!(!permitted(ActorRole::Customer, Waiting, Accepted));
		assert!(!permitted(ActorRole::Customer, Waiting, Rejected));
		assert!(!permitted(ActorRole::Customer, Accepted, Cooking));
		assert!(!permitted(ActorRole::Customer, Cooking, Delivering));
		assert!(!permitted(ActorRole::Customer, Delivering, Completed));
	}

	#[test]
	fn owners_drive_fulfillment_and_may_cancel() {
		use OrderStatus::*;

		assert!(permitted(ActorRole::Owner, Waiting, Accepted));
		assert!(permitted(ActorRole::Owner, Waiting, Rejected));
		assert!(permitted(ActorRole::Owner, Accepted, Cooking));
		assert!(permitted(ActorRole::Owner, Cooking, Delivering));
		assert!(permitted(ActorRole::Owner, Delivering, Completed));
		assert!(permitted(ActorRole::Owner, Accepted, Canceled));
	}
}
