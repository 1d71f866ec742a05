//! Typeahead search against the vocabulary indexes.
//!
//! The occurrence form never lets users type a taxon or trait term blind: each
//! field queries a full-text index and offers ranked [`Candidate`]s. This crate
//! holds the pieces that make that work outside any particular UI:
//!
//! * [`SearchIndex`]: the query seam, with a Meilisearch implementation
//! * [`Lookup`]: text, candidates and stale-response suppression for one field
//! * [`TaxonLookup`] and [`TraitComposer`]: the two widgets the form uses
//! * [`Debouncer`]: quiet-period gating for the list search box
//!
//! Search failures are never surfaced to the user; widgets log them and keep
//! their previous candidates.
//!
//! [`Candidate`]: bioc_model::Candidate

#![warn(missing_docs)]

mod composer;
mod debounce;
mod index;
mod lookup;
mod sequence;
mod taxon;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use composer::{TermField, TraitComposer};
pub use debounce::{DEFAULT_DEBOUNCE, Debouncer};
pub use index::{MeiliSearchIndex, PREDICATE_INDEX, Result, SearchError, SearchIndex, TAXON_INDEX, VALUE_INDEX};
pub use lookup::{Lookup, LookupPolicy, PendingQuery};
pub use sequence::{RequestSequencer, Ticket};
pub use taxon::{TAXON_MIN_CHARS, TaxonEvent, TaxonInput, TaxonLookup};
