//! Order API implementation.
//!
//! Maps order endpoints onto the engine and translates `TransitionError`
//! into the HTTP error taxonomy: missing order -> 404, invalid edge -> 409
//! (with current and requested status in the payload), unauthorized
//! actor -> 403, storage faults -> 500.

use baedal_core::{Engine, EngineError};
use baedal_order::TransitionError;
use baedal_types::{
	ApiError, CreateOrderRequest, OrderResponse, TransitionReceipt, TransitionRequest,
};

/// Creates a new order in the `Waiting` status.
pub async fn create_order(
	engine: &Engine,
	request: CreateOrderRequest,
) -> Result<OrderResponse, ApiError> {
	if request.user_id.trim().is_empty() {
		return Err(ApiError::BadRequest {
			error_type: "INVALID_USER_ID".to_string(),
			message: "userId must not be empty".to_string(),
			details: None,
		});
	}

	let order = engine
		.create_order(&request.user_id)
		.await
		.map_err(internal)?;

	Ok(order.into())
}

/// Retrieves an order by id.
pub async fn get_order(engine: &Engine, order_id: &str) -> Result<OrderResponse, ApiError> {
	match engine.order(order_id).await.map_err(internal)? {
		Some(order) => Ok(order.into()),
		None => Err(ApiError::NotFound {
			error_type: "ORDER_NOT_FOUND".to_string(),
			message: format!("No order with id '{}'", order_id),
		}),
	}
}

/// Applies a status transition to an order.
pub async fn transition_order(
	engine: &Engine,
	order_id: &str,
	request: TransitionRequest,
) -> Result<TransitionReceipt, ApiError> {
	engine
		.transition(order_id, request.status, &request.actor_id)
		.await
		.map_err(map_transition_error)
}

fn map_transition_error(error: TransitionError) -> ApiError {
	match error {
		TransitionError::NotFound(order_id) => ApiError::NotFound {
			error_type: "ORDER_NOT_FOUND".to_string(),
			message: format!("No order with id '{}'", order_id),
		},
		TransitionError::InvalidTransition { from, to } => ApiError::Conflict {
			error_type: "INVALID_TRANSITION".to_string(),
			message: format!("Cannot move an order {} -> {}", from, to),
			details: Some(serde_json::json!({
				"current": from.to_string(),
				"requested": to.to_string(),
			})),
		},
		TransitionError::Forbidden { role, from, to } => ApiError::Forbidden {
			error_type: "FORBIDDEN_TRANSITION".to_string(),
			message: format!("Role {} may not move an order {} -> {}", role, from, to),
		},
		TransitionError::UnknownActor(actor_id) => ApiError::Forbidden {
			error_type: "UNKNOWN_ACTOR".to_string(),
			message: format!("Actor '{}' could not be resolved", actor_id),
		},
		TransitionError::Storage(message) => ApiError::InternalServerError {
			error_type: "STORAGE_ERROR".to_string(),
			message,
		},
	}
}

fn internal(error: EngineError) -> ApiError {
	ApiError::InternalServerError {
		error_type: "INTERNAL_ERROR".to_string(),
		message: error.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use baedal_types::OrderStatus;

	#[test]
	fn invalid_transition_maps_to_conflict_with_both_statuses() {
		let api_error = map_transition_error(TransitionError::InvalidTransition {
			from: OrderStatus::Completed,
			to: OrderStatus::Canceled,
		});

		assert_eq!(api_error.status_code(), 409);
		let body = api_error.to_error_response();
		let details = body.details.unwrap();
		assert_eq!(details["current"], "COMPLETED");
		assert_eq!(details["requested"], "CANCELED");
	}

	#[test]
	fn not_found_and_forbidden_map_to_their_statuses() {
		assert_eq!(
			map_transition_error(TransitionError::NotFound("x".into())).status_code(),
			404
		);
		assert_eq!(
			map_transition_error(TransitionError::UnknownActor("ghost".into())).status_code(),
			403
		);
		assert_eq!(
			map_transition_error(TransitionError::Forbidden {
				role: baedal_types::ActorRole::Customer,
				from: OrderStatus::Waiting,
				to: OrderStatus::Accepted,
			})
			.status_code(),
			403
		);
	}
}
