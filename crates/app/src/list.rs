//! Occurrence list page.

use std::time::{Duration, Instant};

use bioc_client::{ApiClient, Transport};
use bioc_model::{Credential, Occurrence, User};
use bioc_search::Debouncer;
use tracing::{debug, warn};

/// Message shown when the list cannot be fetched.
pub const LOAD_FAILED: &str = "Could not load occurrences.";

/// Fetch progress shared by the list and detail pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
	/// Not fetched yet, or fetching.
	Loading,
	/// Data is current.
	Loaded,
	/// Fetch failed with the given message.
	Failed(String),
}

/// One line of the rendered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
	/// Id used in detail links.
	pub short_id: String,
	/// Taxon label.
	pub taxon_label: String,
	/// Notes, or a placeholder.
	pub remarks: String,
	/// Creator's display name.
	pub owner_name: String,
	/// Whether the signed-in user created this record.
	pub mine: bool,
}

/// List state: keyword query, filters and the fetched records.
#[derive(Debug, Clone)]
pub struct ListView {
	input: String,
	query: String,
	taxon: Option<String>,
	mine_only: bool,
	debouncer: Debouncer,
	records: Vec<Occurrence>,
	state: LoadState,
}

impl ListView {
	/// Creates a list with the given search debounce.
	pub fn new(debounce: Duration) -> Self {
		Self {
			input: String::new(),
			query: String::new(),
			taxon: None,
			mine_only: false,
			debouncer: Debouncer::new(debounce),
			records: Vec::new(),
			state: LoadState::Loading,
		}
	}

	/// Text in the search box.
	pub fn input(&self) -> &str {
		&self.input
	}

	/// Query the current records were fetched with.
	pub fn query(&self) -> &str {
		&self.query
	}

	/// Records a keystroke in the search box.
	pub fn type_query(&mut self, text: &str, now: Instant) {
		self.input = text.to_string();
		self.debouncer.push(text, now);
	}

	/// Applies the typed query once it has been stable for the debounce
	/// interval. Returns true when the caller should [`refresh`](Self::refresh).
	pub fn poll(&mut self, now: Instant) -> bool {
		match self.debouncer.poll(now) {
			Some(text) => {
				debug!(query = %text, "search query settled");
				self.query = text;
				true
			}
			None => false,
		}
	}

	/// When [`poll`](Self::poll) should next be called, if a query is pending.
	pub fn deadline(&self) -> Option<Instant> {
		self.debouncer.deadline()
	}

	/// Sets the query immediately, skipping the debounce.
	pub fn set_query(&mut self, text: impl Into<String>) {
		self.debouncer.cancel();
		self.query = text.into();
		self.input = self.query.clone();
	}

	/// Restricts server-side search to a taxon.
	pub fn set_taxon_filter(&mut self, taxon: Option<String>) {
		self.taxon = taxon.filter(|t| !t.trim().is_empty());
	}

	/// Shows only records created by the signed-in user.
	pub fn set_mine_only(&mut self, mine_only: bool) {
		self.mine_only = mine_only;
	}

	/// Whether the mine-only filter is on.
	pub fn mine_only(&self) -> bool {
		self.mine_only
	}

	/// Fetch state.
	pub fn state(&self) -> &LoadState {
		&self.state
	}

	/// Fetches records: keyword search when a query or taxon filter is set,
	/// the full list otherwise. The credential, when present, lets the server
	/// mark ownership.
	pub async fn refresh<T: Transport>(&mut self, api: &ApiClient<T>, credential: Option<&Credential>) {
		self.state = LoadState::Loading;
		let query = self.query.trim();
		let result = if query.is_empty() && self.taxon.is_none() {
			api.list(credential).await
		} else {
			api.search(query, self.taxon.as_deref(), credential).await
		};

		match result {
			Ok(records) => {
				self.records = records;
				self.state = LoadState::Loaded;
			}
			Err(error) => {
				warn!(%error, "failed to load occurrences");
				self.records.clear();
				self.state = LoadState::Failed(LOAD_FAILED.to_string());
			}
		}
	}

	/// Every fetched record.
	pub fn records(&self) -> &[Occurrence] {
		&self.records
	}

	/// Records after the mine-only filter. With the filter on and no user, nothing matches.
	pub fn visible<'a>(&'a self, user: Option<&'a User>) -> impl Iterator<Item = &'a Occurrence> + 'a {
		self.records
			.iter()
			.filter(move |r| !self.mine_only || user.is_some_and(|u| r.is_owned_by(u)))
	}

	/// Display rows for the visible records.
	pub fn rows(&self, user: Option<&User>) -> Vec<ListRow> {
		self.visible(user)
			.map(|r| ListRow {
				short_id: r.id.short().to_string(),
				taxon_label: r.taxon_label.clone(),
				remarks: if r.remarks.trim().is_empty() {
					"(no remarks)".to_string()
				} else {
					r.remarks.clone()
				},
				owner_name: r.owner_name.clone(),
				mine: user.is_some_and(|u| r.is_owned_by(u)),
			})
			.collect()
	}
}
