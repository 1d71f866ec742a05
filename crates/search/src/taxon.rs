//! Taxon typeahead.

use bioc_model::{Candidate, TaxonRef};

use crate::index::{Result, SearchIndex, TAXON_INDEX};
use crate::lookup::{Lookup, LookupPolicy, PendingQuery};
use crate::sequence::Ticket;

/// Minimum characters before the taxon index is queried.
pub const TAXON_MIN_CHARS: usize = 2;

/// Notification for the owning form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaxonEvent {
	/// A candidate was picked.
	Selected(TaxonRef),
	/// The input was emptied; any earlier selection is void.
	Cleared,
}

/// Outcome of one keystroke.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaxonInput {
	/// Event for the parent, if any.
	pub event: Option<TaxonEvent>,
	/// Query to send, if any.
	pub query: Option<PendingQuery>,
}

/// Lookup against the classification index.
#[derive(Debug, Clone)]
pub struct TaxonLookup {
	lookup: Lookup,
}

impl Default for TaxonLookup {
	fn default() -> Self {
		Self::new(TAXON_MIN_CHARS, 10)
	}
}

impl TaxonLookup {
	/// Creates a taxon lookup with the given thresholds.
	pub fn new(min_chars: usize, limit: usize) -> Self {
		Self {
			lookup: Lookup::new(LookupPolicy::new(TAXON_INDEX, min_chars, limit)),
		}
	}

	/// Current text.
	pub fn text(&self) -> &str {
		self.lookup.text()
	}

	/// Current candidates.
	pub fn candidates(&self) -> &[Candidate] {
		self.lookup.candidates()
	}

	/// Records a keystroke.
	pub fn input(&mut self, text: &str) -> TaxonInput {
		TaxonInput {
			event: text.is_empty().then_some(TaxonEvent::Cleared),
			query: self.lookup.input(text),
		}
	}

	/// Applies a query result; see [`Lookup::resolve`].
	pub fn resolve(&mut self, ticket: Ticket, result: Result<Vec<Candidate>>) -> bool {
		self.lookup.resolve(ticket, result)
	}

	/// Types `text` and runs the resulting query, if any.
	pub async fn search(&mut self, index: &dyn SearchIndex, text: &str) -> Option<TaxonEvent> {
		let TaxonInput { event, query } = self.input(text);
		if let Some(query) = query {
			let result = index.query(&query.index, &query.text, query.limit).await;
			self.lookup.resolve(query.ticket, result);
		}
		event
	}

	/// Picks candidate `idx`, fixing its id and label.
	pub fn select(&mut self, idx: usize) -> Option<TaxonEvent> {
		self.lookup
			.pick(idx)
			.map(|candidate| TaxonEvent::Selected(candidate.to_taxon()))
	}

	/// Shows `label` without querying, e.g. when editing an existing record.
	pub fn prefill(&mut self, label: &str) {
		self.lookup.set_text(label);
	}
}
