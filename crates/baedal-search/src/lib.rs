//! Search popularity aggregation for the baedal platform.
//!
//! This module maintains per-region search counters keyed by
//! `(user, keyword, region)` and answers top-N popularity queries. Each
//! region's counters live in one storage record (a partition); all writes
//! to a partition go through that region's keyed lock, which makes the
//! insert-or-increment atomic with respect to concurrent identical events.

use baedal_storage::{KeyedLocks, StorageError, StorageService};
use baedal_types::{now_unix, SearchPopularity, StorageTable};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

pub mod normalize;

/// Errors that can occur during search aggregation and queries.
#[derive(Debug, Error)]
pub enum SearchError {
	/// The keyword is empty after normalization.
	#[error("Keyword must not be empty")]
	InvalidKeyword,
	/// The region is empty after normalization.
	#[error("Region must not be empty")]
	InvalidRegion,
	/// The requested result count is not a positive integer.
	#[error("Limit must be at least 1")]
	InvalidLimit,
	/// The search store failed while reading or writing.
	#[error("Storage error: {0}")]
	Storage(String),
}

/// All counters for one region, keyed by `user_id \t keyword`.
type RegionPartition = HashMap<String, SearchPopularity>;

fn partition_key(user_id: &str, keyword: &str) -> String {
	format!("{}\t{}", user_id, keyword)
}

/// Service aggregating search events and answering popularity queries.
pub struct SearchService {
	/// Typed storage holding one partition record per region.
	storage: Arc<StorageService>,
	/// Per-region write locks.
	region_locks: KeyedLocks,
	/// Upper bound on the result count a query may request.
	max_limit: usize,
}

impl SearchService {
	/// Creates a new SearchService.
	pub fn new(storage: Arc<StorageService>, max_limit: usize) -> Self {
		Self {
			storage,
			region_locks: KeyedLocks::new(),
			max_limit,
		}
	}

	/// Records one search event, creating or incrementing the counter for
	/// the normalized `(user, keyword, region)` key.
	///
	/// Returns the counter's state after the event.
	pub async fn record(
		&self,
		user_id: &str,
		keyword: &str,
		region: &str,
	) -> Result<SearchPopularity, SearchError> {
		let keyword = normalize::normalize(keyword).ok_or(SearchError::InvalidKeyword)?;
		let region = normalize::normalize(region).ok_or(SearchError::InvalidRegion)?;

		// Serialize writers per region; the read-modify-write below is
		// atomic under this guard.
		let _guard = self.region_locks.lock(&region).await;

		let mut partition = self.load_partition(&region).await?;

		let now = now_unix();
		let entry = partition
			.entry(partition_key(user_id, &keyword))
			.and_modify(|record| {
				record.count += 1;
				record.updated_at = record.updated_at.max(now);
			})
			.or_insert_with(|| SearchPopularity {
				user_id: user_id.to_string(),
				keyword: keyword.clone(),
				region: region.clone(),
				count: 1,
				updated_at: now,
			});
		let result = entry.clone();

		self.storage
			.store(StorageTable::Searches, &region, &partition)
			.await
			.map_err(|e| SearchError::Storage(e.to_string()))?;

		tracing::debug!(
			region = %result.region,
			keyword = %result.keyword,
			count = result.count,
			"Recorded search"
		);

		Ok(result)
	}

	/// Returns up to `n` records for `region`, most popular first.
	///
	/// Ordering is deterministic: count descending, then `updated_at`
	/// descending, then `(user_id, keyword)` ascending. `n` must be at
	/// least 1 and is capped by the configured maximum; an unknown region
	/// yields an empty list.
	pub async fn top_n(
		&self,
		region: &str,
		n: usize,
	) -> Result<Vec<SearchPopularity>, SearchError> {
		if n == 0 {
			return Err(SearchError::InvalidLimit);
		}
		let region = normalize::normalize(region).ok_or(SearchError::InvalidRegion)?;

		let partition = self.load_partition(&region).await?;

		let mut records: Vec<SearchPopularity> = partition.into_values().collect();
		records.sort_by(|a, b| {
			b.count
				.cmp(&a.count)
				.then_with(|| b.updated_at.cmp(&a.updated_at))
				.then_with(|| {
					(a.user_id.as_str(), a.keyword.as_str())
						.cmp(&(b.user_id.as_str(), b.keyword.as_str()))
				})
		});
		records.truncate(n.min(self.max_limit));

		Ok(records)
	}

	async fn load_partition(&self, region: &str) -> Result<RegionPartition, SearchError> {
		match self
			.storage
			.retrieve::<RegionPartition>(StorageTable::Searches, region)
			.await
		{
			Ok(partition) => Ok(partition),
			Err(StorageError::NotFound) => Ok(RegionPartition::new()),
			Err(e) => Err(SearchError::Storage(e.to_string())),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use baedal_storage::implementations::memory::MemoryStorage;

	fn service() -> Arc<SearchService> {
		let storage = Arc::new(StorageService::new(Box::new(MemoryStorage::new())));
		Arc::new(SearchService::new(storage, 50))
	}

	#[tokio::test]
	async fn first_event_creates_with_count_one() {
		let search = service();
		let record = search.record("user-1", "fried chicken", "Seoul").await.unwrap();

		assert_eq!(record.count, 1);
		assert_eq!(record.keyword, "fried chicken");
		assert_eq!(record.region, "seoul");
	}

	#[tokio::test]
	async fn identical_events_increment_one_counter() {
		let search = service();
		search.record("user-1", "pizza", "Seoul").await.unwrap();
		// Different raw spellings of the same key.
		search.record("user-1", "  Pizza ", "seoul ").await.unwrap();
		let record = search.record("user-1", "PIZZA", "SEOUL").await.unwrap();

		assert_eq!(record.count, 3);

		let top = search.top_n("Seoul", 10).await.unwrap();
		assert_eq!(top.len(), 1);
	}

	#[tokio::test]
	async fn different_users_keep_separate_counters() {
		let search = service();
		search.record("user-1", "pizza", "Seoul").await.unwrap();
		let other = search.record("user-2", "pizza", "Seoul").await.unwrap();

		assert_eq!(other.count, 1);
		assert_eq!(search.top_n("Seoul", 10).await.unwrap().len(), 2);
	}

	#[tokio::test]
	async fn concurrent_identical_events_lose_no_updates() {
		let search = service();
		let mut handles = Vec::new();

		for _ in 0..10 {
			let search = Arc::clone(&search);
			handles.push(tokio::spawn(async move {
				for _ in 0..10 {
					search.record("user-1", "bibimbap", "Seoul").await.unwrap();
				}
			}));
		}
		for handle in handles {
			handle.await.unwrap();
		}

		let top = search.top_n("Seoul", 1).await.unwrap();
		assert_eq!(top[0].count, 100);
	}

	#[tokio::test]
	async fn top_n_orders_by_count_then_recency() {
		let search = service();

		// Seed counters directly so counts and timestamps are exact.
		let mut partition = RegionPartition::new();
		let seed: &[(&str, &str, u64, u64)] = &[
			("u1", "chicken", 10, 1_000),
			("u2", "pizza", 10, 2_000),
			("u3", "sushi", 7, 3_000),
			("u4", "pasta", 5, 500),
			("u5", "curry", 1, 4_000),
		];
		for (user, keyword, count, updated_at) in seed {
			partition.insert(
				partition_key(user, keyword),
				SearchPopularity {
					user_id: user.to_string(),
					keyword: keyword.to_string(),
					region: "seoul".into(),
					count: *count,
					updated_at: *updated_at,
				},
			);
		}
		search
			.storage
			.store(StorageTable::Searches, "seoul", &partition)
			.await
			.unwrap();

		let top = search.top_n("Seoul", 3).await.unwrap();
		assert_eq!(top.len(), 3);
		// Two count-10 records: the more recently updated one wins.
		assert_eq!(top[0].keyword, "pizza");
		assert_eq!(top[1].keyword, "chicken");
		assert_eq!(top[2].keyword, "sushi");
	}

	#[tokio::test]
	async fn top_n_is_deterministic_on_full_ties() {
		let search = service();
		let mut partition = RegionPartition::new();
		for user in ["u2", "u1"] {
			partition.insert(
				partition_key(user, "ramen"),
				SearchPopularity {
					user_id: user.to_string(),
					keyword: "ramen".into(),
					region: "seoul".into(),
					count: 4,
					updated_at: 1_000,
				},
			);
		}
		search
			.storage
			.store(StorageTable::Searches, "seoul", &partition)
			.await
			.unwrap();

		let top = search.top_n("seoul", 2).await.unwrap();
		assert_eq!(top[0].user_id, "u1");
		assert_eq!(top[1].user_id, "u2");
	}

	#[tokio::test]
	async fn zero_limit_is_rejected_and_unknown_region_is_empty() {
		let search = service();

		assert!(matches!(
			search.top_n("Seoul", 0).await,
			Err(SearchError::InvalidLimit)
		));
		assert!(search.top_n("Busan", 5).await.unwrap().is_empty());
	}

	#[tokio::test]
	async fn requested_limit_is_capped() {
		let storage = Arc::new(StorageService::new(Box::new(MemoryStorage::new())));
		let search = SearchService::new(storage, 2);

		for keyword in ["a", "b", "c"] {
			search.record("user-1", keyword, "Seoul").await.unwrap();
		}

		let top = search.top_n("Seoul", 10).await.unwrap();
		assert_eq!(top.len(), 2);
	}

	#[tokio::test]
	async fn empty_keyword_is_rejected() {
		let search = service();
		assert!(matches!(
			search.record("user-1", "   ", "Seoul").await,
			Err(SearchError::InvalidKeyword)
		));
	}
}
