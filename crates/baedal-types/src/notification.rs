//! Notification message types produced by the formatter.
//!
//! A `NotificationMessage` is ephemeral: it is built by the formatter for a
//! single status change and handed straight to the messaging sink, never
//! persisted.

use serde::{Deserialize, Serialize};

/// Who a notification is addressed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Audience {
	/// A single user, identified by their user id.
	User(String),
	/// Everyone watching the channel.
	Broadcast,
}

/// A formatted, ready-to-send notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
	/// The intended audience of the message.
	pub audience: Audience,
	/// Human-readable message text.
	pub text: String,
}
