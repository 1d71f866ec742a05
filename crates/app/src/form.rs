//! Record form shared by the create and edit pages.

use std::time::Duration;

use bioc_client::{ApiClient, Transport};
use bioc_model::{Credential, Occurrence, OccurrenceDraft, OccurrenceId, TaxonRef, Trait};
use bioc_search::{SearchIndex, TaxonEvent, TaxonLookup, TraitComposer};
use thiserror::Error;
use tracing::{info, warn};

use crate::route::Route;

/// Message shown after a failed submission.
pub const SUBMIT_FAILED: &str = "Submission failed.";

/// Local validation failures; nothing is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
	/// Taxon id or label is blank.
	#[error("a taxon with both id and label is required")]
	MissingTaxon,
}

/// Whether the form creates or replaces a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
	/// `POST /api/occurrences`.
	Create,
	/// `PUT /api/occurrences/{id}`.
	Edit(String),
}

/// Submission progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormStatus {
	/// Nothing submitted yet.
	Idle,
	/// Request in flight.
	Submitting,
	/// Last submission succeeded.
	Success,
	/// Last submission failed with the given message.
	Failed(String),
}

/// Result of [`OccurrenceForm::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
	/// No credential; go to the login page. Nothing was sent.
	LoginRequired,
	/// Validation failed. Nothing was sent.
	Invalid(FormError),
	/// Record created; the form is ready for the next one.
	Created(Option<OccurrenceId>),
	/// Record replaced; show `redirect` after `after`.
	Updated {
		/// Detail page of the edited record.
		redirect: Route,
		/// Pause before leaving so the success message can be read.
		after: Duration,
	},
	/// The server refused or the request failed.
	Failed(String),
}

/// Form tuning taken from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSettings {
	/// Candidates per search.
	pub search_limit: usize,
	/// Minimum taxon query length.
	pub taxon_min_chars: usize,
	/// Minimum trait query length.
	pub trait_min_chars: usize,
	/// Pause before leaving an updated record.
	pub update_redirect_delay: Duration,
}

impl Default for FormSettings {
	fn default() -> Self {
		Self {
			search_limit: 10,
			taxon_min_chars: bioc_search::TAXON_MIN_CHARS,
			trait_min_chars: 0,
			update_redirect_delay: Duration::from_millis(1500),
		}
	}
}

/// Taxon, traits, remarks and visibility of one record being written.
#[derive(Debug, Clone)]
pub struct OccurrenceForm {
	mode: FormMode,
	taxon: TaxonRef,
	taxon_lookup: TaxonLookup,
	composer: TraitComposer,
	traits: Vec<Trait>,
	remarks: String,
	is_public: bool,
	status: FormStatus,
	update_redirect_delay: Duration,
}

impl OccurrenceForm {
	/// Empty form for a new record.
	pub fn create(settings: &FormSettings) -> Self {
		Self {
			mode: FormMode::Create,
			taxon: TaxonRef::default(),
			taxon_lookup: TaxonLookup::new(settings.taxon_min_chars, settings.search_limit),
			composer: TraitComposer::new(settings.trait_min_chars, settings.search_limit),
			traits: Vec::new(),
			remarks: String::new(),
			is_public: true,
			status: FormStatus::Idle,
			update_redirect_delay: settings.update_redirect_delay,
		}
	}

	/// Form pre-filled from `record`, submitting to `id`.
	pub fn edit(id: impl Into<String>, record: &Occurrence, settings: &FormSettings) -> Self {
		let mut form = Self::create(settings);
		form.mode = FormMode::Edit(id.into());
		let draft = record.to_draft();
		form.set_taxon(TaxonRef::new(draft.taxon_id, draft.taxon_label));
		form.traits = draft.traits;
		form.remarks = draft.remarks;
		form.is_public = draft.is_public;
		form
	}

	/// Create or edit.
	pub fn mode(&self) -> &FormMode {
		&self.mode
	}

	/// Selected taxon.
	pub fn taxon(&self) -> &TaxonRef {
		&self.taxon
	}

	/// Sets the taxon directly, bypassing the lookup.
	pub fn set_taxon(&mut self, taxon: TaxonRef) {
		self.taxon_lookup.prefill(&taxon.label);
		self.taxon = taxon;
	}

	/// Taxon lookup widget.
	pub fn taxon_lookup(&self) -> &TaxonLookup {
		&self.taxon_lookup
	}

	/// Types into the taxon lookup and runs its query.
	pub async fn search_taxon(&mut self, index: &dyn SearchIndex, text: &str) {
		if let Some(event) = self.taxon_lookup.search(index, text).await {
			self.apply_taxon_event(event);
		}
	}

	/// Picks taxon candidate `idx`.
	pub fn select_taxon(&mut self, idx: usize) -> bool {
		match self.taxon_lookup.select(idx) {
			Some(event) => {
				self.apply_taxon_event(event);
				true
			}
			None => false,
		}
	}

	fn apply_taxon_event(&mut self, event: TaxonEvent) {
		match event {
			TaxonEvent::Selected(taxon) => self.taxon = taxon,
			TaxonEvent::Cleared => self.taxon = TaxonRef::default(),
		}
	}

	/// Trait composer widget.
	pub fn composer(&self) -> &TraitComposer {
		&self.composer
	}

	/// Mutable trait composer.
	pub fn composer_mut(&mut self) -> &mut TraitComposer {
		&mut self.composer
	}

	/// Commits the composer into the trait list. Returns true if a trait was added.
	pub fn commit_trait(&mut self) -> bool {
		self.composer.commit().is_some_and(|t| self.add_trait(t))
	}

	/// Adds `candidate` unless a trait with the same labels is already present.
	pub fn add_trait(&mut self, candidate: Trait) -> bool {
		if self.traits.iter().any(|t| t.same_terms(&candidate)) {
			return false;
		}
		self.traits.push(candidate);
		true
	}

	/// Removes the trait at `idx`.
	pub fn remove_trait(&mut self, idx: usize) -> Option<Trait> {
		(idx < self.traits.len()).then(|| self.traits.remove(idx))
	}

	/// Drops every accumulated trait.
	pub fn clear_traits(&mut self) {
		self.traits.clear();
	}

	/// Accumulated traits.
	pub fn traits(&self) -> &[Trait] {
		&self.traits
	}

	/// Free-form notes.
	pub fn remarks(&self) -> &str {
		&self.remarks
	}

	/// Replaces the notes.
	pub fn set_remarks(&mut self, remarks: impl Into<String>) {
		self.remarks = remarks.into();
	}

	/// Visibility flag.
	pub fn is_public(&self) -> bool {
		self.is_public
	}

	/// Sets visibility.
	pub fn set_public(&mut self, is_public: bool) {
		self.is_public = is_public;
	}

	/// Submission progress.
	pub fn status(&self) -> &FormStatus {
		&self.status
	}

	/// Payload for the current contents.
	pub fn draft(&self) -> Result<OccurrenceDraft, FormError> {
		if self.taxon.is_incomplete() {
			return Err(FormError::MissingTaxon);
		}
		Ok(OccurrenceDraft {
			taxon_id: self.taxon.id.trim().to_string(),
			taxon_label: self.taxon.label.trim().to_string(),
			traits: self.traits.clone(),
			remarks: self.remarks.clone(),
			is_public: self.is_public,
		})
	}

	/// Sends the form.
	///
	/// Without a credential nothing is sent. After a create the traits and
	/// remarks are cleared while the taxon stays for the next record.
	pub async fn submit<T: Transport>(&mut self, api: &ApiClient<T>, credential: Option<&Credential>) -> SubmitOutcome {
		let Some(credential) = credential else {
			return SubmitOutcome::LoginRequired;
		};
		let draft = match self.draft() {
			Ok(draft) => draft,
			Err(error) => {
				self.status = FormStatus::Failed(error.to_string());
				return SubmitOutcome::Invalid(error);
			}
		};

		self.status = FormStatus::Submitting;
		let result = match &self.mode {
			FormMode::Create => api.create(&draft, credential).await.map(SubmitOutcome::Created),
			FormMode::Edit(id) => api.update(id, &draft, credential).await.map(|()| SubmitOutcome::Updated {
				redirect: Route::Detail(id.clone()),
				after: self.update_redirect_delay,
			}),
		};

		match result {
			Ok(outcome) => {
				info!(taxon = %draft.taxon_label, mode = ?self.mode, "record saved");
				self.status = FormStatus::Success;
				if self.mode == FormMode::Create {
					self.traits.clear();
					self.remarks.clear();
					self.composer.clear();
				}
				outcome
			}
			Err(error) => {
				warn!(%error, "record submission failed");
				let message = if error.is_unauthorized() {
					error.user_message()
				} else {
					SUBMIT_FAILED.to_string()
				};
				self.status = FormStatus::Failed(message.clone());
				SubmitOutcome::Failed(message)
			}
		}
	}
}
