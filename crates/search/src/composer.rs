//! Trait composer: two typeahead fields producing one predicate/value pair.

use bioc_model::{Candidate, Trait};

use crate::index::{PREDICATE_INDEX, Result, SearchIndex, VALUE_INDEX};
use crate::lookup::{Lookup, LookupPolicy, PendingQuery};
use crate::sequence::Ticket;

/// One half of a trait: a label plus the vocabulary id it came from, if any.
#[derive(Debug, Clone)]
pub struct TermField {
	id: String,
	lookup: Lookup,
}

impl TermField {
	fn new(index: &str, min_chars: usize, limit: usize) -> Self {
		Self {
			id: String::new(),
			lookup: Lookup::new(LookupPolicy::new(index, min_chars, limit)),
		}
	}

	/// Current label text.
	pub fn label(&self) -> &str {
		self.lookup.text()
	}

	/// Vocabulary id, empty while the label is free text.
	pub fn id(&self) -> &str {
		&self.id
	}

	/// Current candidates.
	pub fn candidates(&self) -> &[Candidate] {
		self.lookup.candidates()
	}

	/// Records a keystroke. Typing always turns the term back into free text.
	pub fn input(&mut self, text: &str) -> Option<PendingQuery> {
		self.id.clear();
		self.lookup.input(text)
	}

	/// Applies a query result; see [`Lookup::resolve`].
	pub fn resolve(&mut self, ticket: Ticket, result: Result<Vec<Candidate>>) -> bool {
		self.lookup.resolve(ticket, result)
	}

	async fn search(&mut self, index: &dyn SearchIndex, text: &str) -> bool {
		self.id.clear();
		self.lookup.search(index, text).await
	}

	/// Picks candidate `idx`, taking both its id and label.
	pub fn select(&mut self, idx: usize) -> Option<Candidate> {
		let candidate = self.lookup.pick(idx)?;
		self.id = candidate.id.clone();
		Some(candidate)
	}

	fn reset(&mut self) {
		self.id.clear();
		self.lookup.reset();
	}
}

/// Builds one [`Trait`] from a predicate field and a value field.
#[derive(Debug, Clone)]
pub struct TraitComposer {
	predicate: TermField,
	value: TermField,
}

impl Default for TraitComposer {
	fn default() -> Self {
		Self::new(0, 10)
	}
}

impl TraitComposer {
	/// Creates an empty composer.
	pub fn new(min_chars: usize, limit: usize) -> Self {
		Self {
			predicate: TermField::new(PREDICATE_INDEX, min_chars, limit),
			value: TermField::new(VALUE_INDEX, min_chars, limit),
		}
	}

	/// Predicate field.
	pub fn predicate(&self) -> &TermField {
		&self.predicate
	}

	/// Value field.
	pub fn value(&self) -> &TermField {
		&self.value
	}

	/// Mutable predicate field, for callers driving queries themselves.
	pub fn predicate_mut(&mut self) -> &mut TermField {
		&mut self.predicate
	}

	/// Mutable value field.
	pub fn value_mut(&mut self) -> &mut TermField {
		&mut self.value
	}

	/// Types into the predicate field and runs its query.
	pub async fn search_predicate(&mut self, index: &dyn SearchIndex, text: &str) -> bool {
		self.predicate.search(index, text).await
	}

	/// Types into the value field and runs its query.
	pub async fn search_value(&mut self, index: &dyn SearchIndex, text: &str) -> bool {
		self.value.search(index, text).await
	}

	/// Picks predicate candidate `idx`.
	pub fn select_predicate(&mut self, idx: usize) -> Option<Candidate> {
		self.predicate.select(idx)
	}

	/// Picks value candidate `idx`.
	pub fn select_value(&mut self, idx: usize) -> Option<Candidate> {
		self.value.select(idx)
	}

	/// Returns true when both labels are non-blank.
	pub fn is_ready(&self) -> bool {
		!self.predicate.label().trim().is_empty() && !self.value.label().trim().is_empty()
	}

	/// Emits the composed trait and clears both fields.
	///
	/// Returns `None`, leaving the fields as they are, while either label is blank.
	pub fn commit(&mut self) -> Option<Trait> {
		if !self.is_ready() {
			return None;
		}

		let composed = Trait {
			predicate_id: self.predicate.id().to_string(),
			predicate_label: self.predicate.label().trim().to_string(),
			value_id: self.value.id().to_string(),
			value_label: self.value.label().trim().to_string(),
		};
		self.clear();
		Some(composed)
	}

	/// Resets both fields.
	pub fn clear(&mut self) {
		self.predicate.reset();
		self.value.reset();
	}
}
