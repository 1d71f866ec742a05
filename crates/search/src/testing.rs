//! In-memory search index for tests.

use std::collections::HashMap;

use async_trait::async_trait;
use bioc_model::Candidate;
use parking_lot::Mutex;

use crate::index::{Result, SearchError, SearchIndex};

/// One recorded query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedQuery {
	/// Index name.
	pub index: String,
	/// Query text.
	pub text: String,
	/// Requested limit.
	pub limit: usize,
}

/// Index that matches by case-insensitive label substring and records queries.
#[derive(Default)]
pub struct StaticIndex {
	documents: Mutex<HashMap<String, Vec<Candidate>>>,
	queries: Mutex<Vec<RecordedQuery>>,
	fail_next: Mutex<Option<String>>,
}

impl StaticIndex {
	/// Creates an empty index.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a document to `index`.
	pub fn insert(&self, index: &str, id: &str, label: &str) -> &Self {
		self.documents
			.lock()
			.entry(index.to_string())
			.or_default()
			.push(Candidate {
				id: id.to_string(),
				label: label.to_string(),
				..Candidate::default()
			});
		self
	}

	/// Makes the next query fail with `reason`.
	pub fn fail_next(&self, reason: &str) -> &Self {
		*self.fail_next.lock() = Some(reason.to_string());
		self
	}

	/// Returns every query received so far.
	pub fn queries(&self) -> Vec<RecordedQuery> {
		self.queries.lock().clone()
	}
}

#[async_trait]
impl SearchIndex for StaticIndex {
	async fn query(&self, index: &str, text: &str, limit: usize) -> Result<Vec<Candidate>> {
		self.queries.lock().push(RecordedQuery {
			index: index.to_string(),
			text: text.to_string(),
			limit,
		});
		if let Some(reason) = self.fail_next.lock().take() {
			return Err(SearchError::Service(reason));
		}

		let needle = text.to_lowercase();
		Ok(self
			.documents
			.lock()
			.get(index)
			.map(|docs| {
				docs.iter()
					.filter(|c| c.label.to_lowercase().contains(&needle))
					.take(limit)
					.cloned()
					.collect()
			})
			.unwrap_or_default())
	}
}
