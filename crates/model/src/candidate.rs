//! Search-index hits.

use serde::{Deserialize, Serialize};

use crate::TaxonRef;

/// Term returned by the full-text search service.
///
/// The same document shape backs the taxon classification, predicate vocabulary
/// and ontology value indexes. Candidates are never persisted; they exist only
/// until the user picks one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
	/// Vocabulary id, e.g. `PATO:0000014`.
	pub id: String,
	/// Primary display label.
	#[serde(default)]
	pub label: String,
	/// English label when the primary label is localized.
	#[serde(default)]
	pub en: String,
	/// Canonical URI of the term.
	#[serde(default)]
	pub uri: String,
	/// Source vocabulary name (`pato`, `envo`, `dwc`, ...).
	#[serde(default)]
	pub ontology: String,
}

impl Candidate {
	/// Label to show and store, falling back to the English label and then the id.
	pub fn display_label(&self) -> &str {
		[&self.label, &self.en, &self.id]
			.into_iter()
			.find(|s| !s.trim().is_empty())
			.map_or("", String::as_str)
	}

	/// Converts this hit into a taxon reference.
	pub fn to_taxon(&self) -> TaxonRef {
		TaxonRef::new(self.id.clone(), self.display_label())
	}
}
