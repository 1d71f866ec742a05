//! Query-as-you-type state shared by the typeahead widgets.

use bioc_model::Candidate;
use tracing::{debug, warn};

use crate::index::{Result, SearchIndex};
use crate::sequence::{RequestSequencer, Ticket};

/// Which index a lookup queries and how eagerly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupPolicy {
	/// Index name.
	pub index: String,
	/// Characters required before a query is issued. Empty text never queries.
	pub min_chars: usize,
	/// Maximum candidates kept.
	pub limit: usize,
}

impl LookupPolicy {
	/// Creates a policy for `index`.
	pub fn new(index: impl Into<String>, min_chars: usize, limit: usize) -> Self {
		Self {
			index: index.into(),
			min_chars,
			limit,
		}
	}
}

/// Query the caller must send to the search index, then hand back via
/// [`Lookup::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuery {
	/// Ticket to resolve with.
	pub ticket: Ticket,
	/// Index name.
	pub index: String,
	/// Query text.
	pub text: String,
	/// Maximum hits requested.
	pub limit: usize,
}

/// Typed text plus the candidate list it produced.
#[derive(Debug, Clone)]
pub struct Lookup {
	policy: LookupPolicy,
	text: String,
	candidates: Vec<Candidate>,
	sequencer: RequestSequencer,
}

impl Lookup {
	/// Creates an empty lookup.
	pub fn new(policy: LookupPolicy) -> Self {
		Self {
			policy,
			text: String::new(),
			candidates: Vec::new(),
			sequencer: RequestSequencer::new(),
		}
	}

	/// Current text.
	pub fn text(&self) -> &str {
		&self.text
	}

	/// Current candidates, best first.
	pub fn candidates(&self) -> &[Candidate] {
		&self.candidates
	}

	/// Lookup settings.
	pub fn policy(&self) -> &LookupPolicy {
		&self.policy
	}

	/// Records a keystroke.
	///
	/// Below the minimum length the candidates are cleared and nothing is
	/// returned. Otherwise a query is returned and any earlier query's result
	/// will be discarded when it arrives.
	pub fn input(&mut self, text: &str) -> Option<PendingQuery> {
		self.text = text.to_string();

		if text.trim().is_empty() || text.chars().count() < self.policy.min_chars {
			self.candidates.clear();
			self.sequencer.invalidate();
			return None;
		}

		Some(PendingQuery {
			ticket: self.sequencer.issue(),
			index: self.policy.index.clone(),
			text: self.text.clone(),
			limit: self.policy.limit,
		})
	}

	/// Applies a query result if `ticket` is still the latest one.
	///
	/// Returns true when the candidate list was replaced. Failed queries leave
	/// the list untouched.
	pub fn resolve(&mut self, ticket: Ticket, result: Result<Vec<Candidate>>) -> bool {
		if !self.sequencer.is_current(ticket) {
			debug!(index = %self.policy.index, ticket = ticket.get(), "discarding stale search result");
			return false;
		}

		match result {
			Ok(mut hits) => {
				hits.truncate(self.policy.limit);
				self.candidates = hits;
				true
			}
			Err(error) => {
				warn!(index = %self.policy.index, %error, "search query failed");
				false
			}
		}
	}

	/// Types `text` and, if that issues a query, runs it against `index`.
	pub async fn search(&mut self, index: &dyn SearchIndex, text: &str) -> bool {
		let Some(query) = self.input(text) else {
			return false;
		};
		let result = index.query(&query.index, &query.text, query.limit).await;
		self.resolve(query.ticket, result)
	}

	/// Takes candidate `idx`, replacing the text with its label and closing the list.
	pub fn pick(&mut self, idx: usize) -> Option<Candidate> {
		let candidate = self.candidates.get(idx).cloned()?;
		self.text = candidate.display_label().to_string();
		self.close();
		Some(candidate)
	}

	/// Drops candidates and outstanding queries, keeping the text.
	pub fn close(&mut self) {
		self.candidates.clear();
		self.sequencer.invalidate();
	}

	/// Resets text, candidates and outstanding queries.
	pub fn reset(&mut self) {
		self.text.clear();
		self.close();
	}

	/// Replaces the text without querying, e.g. to pre-fill an edit form.
	pub fn set_text(&mut self, text: impl Into<String>) {
		self.text = text.into();
		self.close();
	}
}
