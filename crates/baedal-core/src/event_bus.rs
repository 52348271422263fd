//! Event bus for inter-service communication.
//!
//! A thin wrapper over a tokio broadcast channel. Publishing is
//! best-effort: an event with no live subscribers is simply dropped, which
//! matches the fire-and-forget contract of the notification side effect.

use baedal_types::PlatformEvent;
use tokio::sync::broadcast;

/// Broadcast bus carrying platform events to any number of subscribers.
#[derive(Clone)]
pub struct EventBus {
	sender: broadcast::Sender<PlatformEvent>,
}

impl EventBus {
	/// Creates a new event bus with the given channel capacity.
	pub fn new(capacity: usize) -> Self {
		let (sender, _) = broadcast::channel(capacity);
		Self { sender }
	}

	/// Publishes an event to all current subscribers.
	///
	/// Returns Err only when there are no subscribers; callers typically
	/// ignore the result.
	pub fn publish(
		&self,
		event: PlatformEvent,
	) -> Result<(), Box<broadcast::error::SendError<PlatformEvent>>> {
		self.sender.send(event).map(|_| ()).map_err(Box::new)
	}

	/// Creates a new subscription to the bus.
	pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
		self.sender.subscribe()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use baedal_types::{OrderEvent, OrderStatus};

	#[tokio::test]
	async fn subscribers_receive_published_events() {
		let bus = EventBus::new(16);
		let mut receiver = bus.subscribe();

		bus.publish(PlatformEvent::Order(OrderEvent::StatusChanged {
			order_id: "order-1".into(),
			user_id: "user-1".into(),
			previous: OrderStatus::Waiting,
			status: OrderStatus::Accepted,
		}))
		.unwrap();

		match receiver.recv().await.unwrap() {
			PlatformEvent::Order(OrderEvent::StatusChanged { status, .. }) => {
				assert_eq!(status, OrderStatus::Accepted);
			}
			other => panic!("unexpected event: {:?}", other),
		}
	}

	#[test]
	fn publish_without_subscribers_is_an_ignorable_error() {
		let bus = EventBus::new(16);
		let result = bus.publish(PlatformEvent::Order(OrderEvent::StatusChanged {
			order_id: "order-1".into(),
			user_id: "user-1".into(),
			previous: OrderStatus::Waiting,
			status: OrderStatus::Canceled,
		}));
		assert!(result.is_err());
	}
}
