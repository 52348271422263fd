//! API types for the baedal HTTP surface.
//!
//! This module defines the request and response types for the platform's
//! HTTP endpoints, plus the structured error type with its HTTP status
//! mapping.

use crate::{Order, OrderStatus, SearchPopularity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Request body for creating an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
	/// The ordering user's id.
	#[serde(rename = "userId")]
	pub user_id: String,
}

/// Request body for a status transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRequest {
	/// The requested target status.
	pub status: OrderStatus,
	/// Identifier of the acting user; authorized through the directory.
	#[serde(rename = "actorId")]
	pub actor_id: String,
}

/// Order snapshot returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
	/// Unique identifier for this order.
	pub id: String,
	/// Identifier of the user who placed the order.
	#[serde(rename = "userId")]
	pub user_id: String,
	/// Current order status.
	pub status: OrderStatus,
	/// Unix timestamp (seconds) when this order was created.
	#[serde(rename = "createdAt")]
	pub created_at: u64,
	/// Unix timestamp (seconds) when this order was last updated.
	#[serde(rename = "updatedAt")]
	pub updated_at: u64,
}

impl From<Order> for OrderResponse {
	fn from(order: Order) -> Self {
		Self {
			id: order.id,
			user_id: order.user_id,
			status: order.status,
			created_at: order.created_at,
			updated_at: order.updated_at,
		}
	}
}

/// Request body for recording a search event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSearchRequest {
	/// The searching user's id.
	#[serde(rename = "userId")]
	pub user_id: String,
	/// The raw search keyword; normalized by the aggregator.
	pub keyword: String,
	/// The raw region; normalized by the aggregator.
	pub region: String,
}

/// Response containing the popular searches for a region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopularSearchesResponse {
	/// Aggregated records ordered by popularity.
	pub searches: Vec<SearchPopularity>,
}

/// API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
	/// Error type/code.
	pub error: String,
	/// Human-readable description.
	pub message: String,
	/// Additional error context.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub details: Option<serde_json::Value>,
}

/// Structured API error type with appropriate HTTP status mapping.
#[derive(Debug)]
pub enum ApiError {
	/// Malformed or invalid request input (400).
	BadRequest {
		error_type: String,
		message: String,
		details: Option<serde_json::Value>,
	},
	/// The actor lacks permission for the requested operation (403).
	Forbidden { error_type: String, message: String },
	/// The referenced resource does not exist (404).
	NotFound { error_type: String, message: String },
	/// The request conflicts with the resource's current state (409).
	Conflict {
		error_type: String,
		message: String,
		details: Option<serde_json::Value>,
	},
	/// Internal server error (500).
	InternalServerError { error_type: String, message: String },
}

impl ApiError {
	/// Get the HTTP status code for this error.
	pub fn status_code(&self) -> u16 {
		match self {
			ApiError::BadRequest { .. } => 400,
			ApiError::Forbidden { .. } => 403,
			ApiError::NotFound { .. } => 404,
			ApiError::Conflict { .. } => 409,
			ApiError::InternalServerError { .. } => 500,
		}
	}

	/// Convert to ErrorResponse for JSON serialization.
	pub fn to_error_response(&self) -> ErrorResponse {
		match self {
			ApiError::BadRequest {
				error_type,
				message,
				details,
			}
			| ApiError::Conflict {
				error_type,
				message,
				details,
			} => ErrorResponse {
				error: error_type.clone(),
				message: message.clone(),
				details: details.clone(),
			},
			ApiError::Forbidden {
				error_type,
				message,
			}
			| ApiError::NotFound {
				error_type,
				message,
			}
			| ApiError::InternalServerError {
				error_type,
				message,
			} => ErrorResponse {
				error: error_type.clone(),
				message: message.clone(),
				details: None,
			},
		}
	}
}

impl fmt::Display for ApiError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			ApiError::BadRequest { message, .. } => write!(f, "Bad Request: {}", message),
			ApiError::Forbidden { message, .. } => write!(f, "Forbidden: {}", message),
			ApiError::NotFound { message, .. } => write!(f, "Not Found: {}", message),
			ApiError::Conflict { message, .. } => write!(f, "Conflict: {}", message),
			ApiError::InternalServerError { message, .. } => {
				write!(f, "Internal Server Error: {}", message)
			}
		}
	}
}

impl std::error::Error for ApiError {}

impl axum::response::IntoResponse for ApiError {
	fn into_response(self) -> axum::response::Response {
		use axum::{http::StatusCode, response::Json};

		let status = StatusCode::from_u16(self.status_code())
			.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

		(status, Json(self.to_error_response())).into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn status_codes_match_error_classes() {
		let conflict = ApiError::Conflict {
			error_type: "INVALID_TRANSITION".into(),
			message: "cannot move COMPLETED -> CANCELED".into(),
			details: None,
		};
		assert_eq!(conflict.status_code(), 409);

		let not_found = ApiError::NotFound {
			error_type: "ORDER_NOT_FOUND".into(),
			message: "no such order".into(),
		};
		assert_eq!(not_found.status_code(), 404);
	}

	#[test]
	fn conflict_details_survive_conversion() {
		let err = ApiError::Conflict {
			error_type: "INVALID_TRANSITION".into(),
			message: "edge not allowed".into(),
			details: Some(serde_json::json!({
				"current": "COMPLETED",
				"requested": "CANCELED",
			})),
		};
		let body = err.to_error_response();
		assert_eq!(body.error, "INVALID_TRANSITION");
		assert_eq!(body.details.unwrap()["current"], "COMPLETED");
	}
}
