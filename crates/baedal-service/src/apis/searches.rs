//! Search API implementation.
//!
//! Maps the search endpoints onto the engine: recording an event returns
//! the updated counter, and the popular query returns the region's top-N
//! list. Normalization and limit rules live in the aggregator; this layer
//! only translates its errors.

use baedal_core::Engine;
use baedal_search::SearchError;
use baedal_types::{ApiError, PopularSearchesResponse, RecordSearchRequest, SearchPopularity};
use serde::Deserialize;

/// Query parameters for GET /api/searches/popular.
#[derive(Debug, Deserialize)]
pub struct PopularQuery {
	/// Region to query.
	pub region: String,
	/// Maximum number of records to return; defaults from configuration.
	pub limit: Option<usize>,
}

/// Records one search event.
pub async fn record_search(
	engine: &Engine,
	request: RecordSearchRequest,
) -> Result<SearchPopularity, ApiError> {
	if request.user_id.trim().is_empty() {
		return Err(ApiError::BadRequest {
			error_type: "INVALID_USER_ID".to_string(),
			message: "userId must not be empty".to_string(),
			details: None,
		});
	}

	engine
		.record_search(&request.user_id, &request.keyword, &request.region)
		.await
		.map_err(map_search_error)
}

/// Returns the most popular searches for a region.
pub async fn popular_searches(
	engine: &Engine,
	params: PopularQuery,
) -> Result<PopularSearchesResponse, ApiError> {
	let searches = engine
		.popular_searches(&params.region, params.limit)
		.await
		.map_err(map_search_error)?;

	Ok(PopularSearchesResponse { searches })
}

fn map_search_error(error: SearchError) -> ApiError {
	match error {
		SearchError::InvalidKeyword | SearchError::InvalidRegion | SearchError::InvalidLimit => {
			ApiError::BadRequest {
				error_type: "INVALID_SEARCH_REQUEST".to_string(),
				message: error.to_string(),
				details: None,
			}
		}
		SearchError::Storage(message) => ApiError::InternalServerError {
			error_type: "STORAGE_ERROR".to_string(),
			message,
		},
	}
}
