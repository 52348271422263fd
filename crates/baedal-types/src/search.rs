//! Search popularity types owned by the aggregator.

use serde::{Deserialize, Serialize};

/// Aggregated search counter for a `(user, keyword, region)` key.
///
/// `user_id`, `keyword` and `region` are stored in normalized form (see the
/// aggregator's normalization policy); the triple is unique. Records are
/// created with `count = 1` and only ever incremented, never deleted by the
/// core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPopularity {
	/// Identifier of the searching user.
	#[serde(rename = "userId")]
	pub user_id: String,
	/// Normalized search keyword.
	pub keyword: String,
	/// Normalized region the search was scoped to.
	pub region: String,
	/// Number of identical search events observed.
	pub count: u64,
	/// Unix timestamp (seconds) of the most recent identical event.
	#[serde(rename = "updatedAt")]
	pub updated_at: u64,
}
