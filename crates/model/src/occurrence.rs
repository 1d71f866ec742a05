//! Occurrence records and their trait triples.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

use crate::User;

/// Opaque record identifier.
///
/// The server issues URIs such as `http://example.org/occ/1234-5678`; the final
/// path segment is what the detail and edit routes carry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OccurrenceId(String);

impl OccurrenceId {
	/// Wraps a raw identifier or URI.
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	/// Returns the identifier exactly as the server sent it.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Returns the last `/`-separated segment, ignoring a trailing slash.
	pub fn short(&self) -> &str {
		let trimmed = self.0.trim_end_matches('/');
		trimmed.rsplit('/').next().unwrap_or(trimmed)
	}
}

impl fmt::Display for OccurrenceId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// Predicate/value pair describing an occurrence.
///
/// Empty id fields mark a free-text term rather than a controlled-vocabulary one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trait {
	/// Vocabulary id of the predicate, empty for free text.
	#[serde(default)]
	pub predicate_id: String,
	/// Display label of the predicate.
	#[serde(default)]
	pub predicate_label: String,
	/// Vocabulary id of the value, empty for free text.
	#[serde(default)]
	pub value_id: String,
	/// Display label of the value.
	#[serde(default)]
	pub value_label: String,
}

impl Trait {
	/// Free-text trait with no vocabulary ids.
	pub fn free_text(predicate: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			predicate_label: predicate.into(),
			value_label: value.into(),
			..Self::default()
		}
	}

	/// Returns true when both terms are vocabulary-backed.
	pub fn is_controlled(&self) -> bool {
		!self.predicate_id.is_empty() && !self.value_id.is_empty()
	}

	/// Compares the predicate and value labels, ignoring ids.
	pub fn same_terms(&self, other: &Trait) -> bool {
		self.predicate_label == other.predicate_label && self.value_label == other.value_label
	}
}

/// Taxon identification: a vocabulary id and its display label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonRef {
	/// Classification id, e.g. `ncbi:34844`.
	pub id: String,
	/// Display label.
	pub label: String,
}

impl TaxonRef {
	/// Creates a taxon reference.
	pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			label: label.into(),
		}
	}

	/// Returns true when either half is blank.
	pub fn is_incomplete(&self) -> bool {
		self.id.trim().is_empty() || self.label.trim().is_empty()
	}
}

/// Recorded observation as returned by the list, search and detail endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
	/// Record identifier.
	pub id: OccurrenceId,
	/// Classification id.
	#[serde(default)]
	pub taxon_id: String,
	/// Taxon display label.
	#[serde(default)]
	pub taxon_label: String,
	/// Free-form notes.
	#[serde(default)]
	pub remarks: String,
	/// Descriptive triples.
	#[serde(default, deserialize_with = "null_as_default")]
	pub traits: Vec<Trait>,
	/// Account id of the creator; fixed at creation.
	#[serde(default)]
	pub owner_id: String,
	/// Display name of the creator.
	#[serde(default)]
	pub owner_name: String,
	/// Creation timestamp as sent by the server.
	#[serde(default)]
	pub created_at: Option<String>,
	/// Visibility flag.
	#[serde(default = "default_public")]
	pub is_public: bool,
}

impl Occurrence {
	/// Returns true when `user` created this record.
	pub fn is_owned_by(&self, user: &User) -> bool {
		!self.owner_id.is_empty() && self.owner_id == user.id
	}

	/// Parses [`Self::created_at`] as RFC 3339.
	pub fn created_at_parsed(&self) -> Option<DateTime<FixedOffset>> {
		self.created_at
			.as_deref()
			.and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
	}

	/// Builds the full-replace payload that would recreate this record.
	pub fn to_draft(&self) -> OccurrenceDraft {
		OccurrenceDraft {
			taxon_id: self.taxon_id.clone(),
			taxon_label: self.taxon_label.clone(),
			traits: self.traits.clone(),
			remarks: self.remarks.clone(),
			is_public: self.is_public,
		}
	}
}

/// Create/update request body.
///
/// Updates replace the whole record; there is no partial patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccurrenceDraft {
	/// Classification id.
	pub taxon_id: String,
	/// Taxon display label.
	pub taxon_label: String,
	/// Descriptive triples.
	pub traits: Vec<Trait>,
	/// Free-form notes.
	pub remarks: String,
	/// Visibility flag.
	pub is_public: bool,
}

fn default_public() -> bool {
	true
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
