//! Data model for the biodiversity occurrence catalog client.
//!
//! These types mirror the JSON shapes exchanged with the remote occurrence API and
//! the full-text search service. Decoding is deliberately lenient: every field the
//! server may omit has a default, so a partially populated record still decodes.
//!
//! * [`User`] and [`Credential`]: identity and bearer token of a session
//! * [`Occurrence`] and [`Trait`]: a recorded observation and its descriptive triples
//! * [`OccurrenceDraft`]: the create/update payload (full replace semantics)
//! * [`Candidate`]: a transient search-index hit used to populate a trait or taxon

#![warn(missing_docs)]

mod candidate;
mod occurrence;
mod user;

pub use candidate::Candidate;
pub use occurrence::{Occurrence, OccurrenceDraft, OccurrenceId, TaxonRef, Trait};
pub use user::{Credential, User};
