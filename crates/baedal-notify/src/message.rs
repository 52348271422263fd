//! Pure notification formatting.
//!
//! Maps an order status to its fixed human-readable message and builds the
//! `NotificationMessage` for a status change. Both functions are pure and
//! deterministic; the status enumeration is closed, so the mapping is total
//! by exhaustive match.

use baedal_types::{truncate_id, Audience, NotificationMessage, OrderStatus};

/// Returns the fixed message text for a status.
pub fn status_message(status: OrderStatus) -> &'static str {
	match status {
		OrderStatus::Waiting => "order received, awaiting confirmation",
		OrderStatus::Accepted => "order accepted",
		OrderStatus::Cooking => "your order is being prepared",
		OrderStatus::Delivering => "your order is on the way",
		OrderStatus::Completed => "order delivered, enjoy your meal",
		OrderStatus::Rejected => "order rejected by the store",
		OrderStatus::Canceled => "order canceled",
	}
}

/// Builds the notification for an order's status change.
///
/// The message is addressed to the ordering user and carries the order id
/// so the channel reader can correlate it.
pub fn notification_for(order_id: &str, user_id: &str, status: OrderStatus) -> NotificationMessage {
	NotificationMessage {
		audience: Audience::User(user_id.to_string()),
		text: format!("Order {}: {}", truncate_id(order_id), status_message(status)),
	}
}

/// Renders a notification to the single line of text the sink delivers.
pub fn render(message: &NotificationMessage) -> String {
	match &message.audience {
		Audience::User(user_id) => format!("{} (user {})", message.text, user_id),
		Audience::Broadcast => message.text.clone(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn formatter_is_total_and_deterministic() {
		for status in OrderStatus::all() {
			assert_eq!(status_message(status), status_message(status));
			assert!(!status_message(status).is_empty());
		}
	}

	#[test]
	fn each_status_has_a_distinct_message() {
		let messages: std::collections::HashSet<_> =
			OrderStatus::all().map(status_message).collect();
		assert_eq!(messages.len(), OrderStatus::all().count());
	}

	#[test]
	fn notification_targets_the_ordering_user() {
		let message = notification_for("order-123456789", "user-42", OrderStatus::Accepted);

		assert_eq!(message.audience, Audience::User("user-42".into()));
		assert!(message.text.contains("order accepted"));
		assert!(message.text.contains("order-12.."));
	}

	#[test]
	fn render_handles_both_audiences() {
		let to_user = NotificationMessage {
			audience: Audience::User("user-7".into()),
			text: "order accepted".into(),
		};
		assert_eq!(render(&to_user), "order accepted (user user-7)");

		let broadcast = NotificationMessage {
			audience: Audience::Broadcast,
			text: "store closing soon".into(),
		};
		assert_eq!(render(&broadcast), "store closing soon");
	}
}
