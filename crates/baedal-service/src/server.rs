//! HTTP server for the baedal platform API.
//!
//! This module provides the HTTP surface over the engine: order creation
//! and retrieval, status transitions, and search recording/queries. Routing
//! and serialization live here; behavior lives in the engine.

use axum::{
	extract::{Path, Query, State},
	response::Json,
	routing::{get, patch, post},
	Router,
};
use baedal_config::ApiConfig;
use baedal_core::Engine;
use baedal_types::{
	ApiError, CreateOrderRequest, OrderResponse, PopularSearchesResponse, RecordSearchRequest,
	SearchPopularity, TransitionReceipt, TransitionRequest,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::apis;

/// Shared application state for the API server.
#[derive(Clone)]
pub struct AppState {
	/// Reference to the engine for processing requests.
	pub engine: Arc<Engine>,
}

/// Starts the HTTP server for the API.
///
/// This function creates and configures the HTTP server with routing,
/// middleware, and error handling for all endpoints.
pub async fn start_server(api_config: ApiConfig, engine: Arc<Engine>) -> anyhow::Result<()> {
	let app_state = AppState { engine };

	// Build the router with /api base path
	let app = Router::new()
		.nest(
			"/api",
			Router::new()
				.route("/orders", post(handle_create_order))
				.route("/orders/{id}", get(handle_get_order))
				.route("/orders/{id}/status", patch(handle_transition))
				.route("/searches", post(handle_record_search))
				.route("/searches/popular", get(handle_popular_searches)),
		)
		.layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
		.with_state(app_state);

	let bind_address = format!("{}:{}", api_config.host, api_config.port);
	let listener = TcpListener::bind(&bind_address).await?;

	tracing::info!("baedal API server starting on {}", bind_address);

	axum::serve(listener, app).await?;

	Ok(())
}

/// Handles POST /api/orders requests.
async fn handle_create_order(
	State(state): State<AppState>,
	Json(request): Json<CreateOrderRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
	match apis::orders::create_order(&state.engine, request).await {
		Ok(response) => Ok(Json(response)),
		Err(e) => {
			tracing::warn!("Order creation failed: {}", e);
			Err(e)
		}
	}
}

/// Handles GET /api/orders/{id} requests.
async fn handle_get_order(
	Path(id): Path<String>,
	State(state): State<AppState>,
) -> Result<Json<OrderResponse>, ApiError> {
	match apis::orders::get_order(&state.engine, &id).await {
		Ok(response) => Ok(Json(response)),
		Err(e) => {
			tracing::warn!("Order retrieval failed: {}", e);
			Err(e)
		}
	}
}

/// Handles PATCH /api/orders/{id}/status requests.
///
/// This endpoint applies a status transition: it validates the requested
/// edge against the order's current status and the actor's role, persists
/// the change, and triggers the best-effort notification.
async fn handle_transition(
	Path(id): Path<String>,
	State(state): State<AppState>,
	Json(request): Json<TransitionRequest>,
) -> Result<Json<TransitionReceipt>, ApiError> {
	match apis::orders::transition_order(&state.engine, &id, request).await {
		Ok(receipt) => Ok(Json(receipt)),
		Err(e) => {
			tracing::warn!("Transition failed: {}", e);
			Err(e)
		}
	}
}

/// Handles POST /api/searches requests.
async fn handle_record_search(
	State(state): State<AppState>,
	Json(request): Json<RecordSearchRequest>,
) -> Result<Json<SearchPopularity>, ApiError> {
	match apis::searches::record_search(&state.engine, request).await {
		Ok(record) => Ok(Json(record)),
		Err(e) => {
			tracing::warn!("Search recording failed: {}", e);
			Err(e)
		}
	}
}

/// Handles GET /api/searches/popular requests.
async fn handle_popular_searches(
	Query(params): Query<apis::searches::PopularQuery>,
	State(state): State<AppState>,
) -> Result<Json<PopularSearchesResponse>, ApiError> {
	match apis::searches::popular_searches(&state.engine, params).await {
		Ok(response) => Ok(Json(response)),
		Err(e) => {
			tracing::warn!("Popular search query failed: {}", e);
			Err(e)
		}
	}
}
