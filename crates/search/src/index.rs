//! Full-text search service seam.

use async_trait::async_trait;
use bioc_model::Candidate;
use meilisearch_sdk::client::Client;
use thiserror::Error;
use tracing::debug;

/// Taxon classification index.
pub const TAXON_INDEX: &str = "classification";
/// Free-text predicate vocabulary (Darwin Core terms).
pub const PREDICATE_INDEX: &str = "dwc";
/// Ontology terms used as trait values.
pub const VALUE_INDEX: &str = "ontology";

/// Errors from the search service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
	/// The service could not be reached or answered with an error.
	#[error("search service error: {0}")]
	Service(String),

	/// The client could not be constructed from its settings.
	#[error("invalid search settings: {0}")]
	Config(String),
}

/// Result type for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Query string in, ranked candidate list out.
#[async_trait]
pub trait SearchIndex: Send + Sync {
	/// Returns at most `limit` ranked hits for `text` in the named index.
	async fn query(&self, index: &str, text: &str, limit: usize) -> Result<Vec<Candidate>>;
}

/// Meilisearch-backed index.
pub struct MeiliSearchIndex {
	client: Client,
}

impl MeiliSearchIndex {
	/// Connects to the service at `url`, authenticating with `api_key` when given.
	pub fn new(url: &str, api_key: Option<&str>) -> Result<Self> {
		let client = Client::new(url, api_key).map_err(|e| SearchError::Config(e.to_string()))?;
		Ok(Self { client })
	}
}

#[async_trait]
impl SearchIndex for MeiliSearchIndex {
	async fn query(&self, index: &str, text: &str, limit: usize) -> Result<Vec<Candidate>> {
		debug!(index, text, limit, "querying search index");
		let results = self
			.client
			.index(index)
			.search()
			.with_query(text)
			.with_limit(limit)
			.execute::<Candidate>()
			.await
			.map_err(|e| SearchError::Service(e.to_string()))?;

		Ok(results.hits.into_iter().map(|hit| hit.result).collect())
	}
}
