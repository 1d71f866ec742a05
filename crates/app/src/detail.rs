//! Single-record page with delete.

use bioc_client::{ApiClient, Transport};
use bioc_model::{Credential, Occurrence, Trait, User};
use tracing::{info, warn};

use crate::list::LoadState;

/// Confirmation question asked before deleting.
pub const DELETE_PROMPT: &str = "Really delete this record? This cannot be undone.";
/// Shown when delete is attempted without a session.
pub const DELETE_LOGIN_REQUIRED: &str = "You must be logged in to delete records.";
/// Shown for non-authorization delete failures.
pub const DELETE_FAILED: &str = "Delete failed.";

/// Asks the user a yes/no question.
pub trait Confirm {
	/// Returns true if the user agreed.
	fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
	fn confirm(&self, prompt: &str) -> bool {
		self(prompt)
	}
}

/// Result of [`DetailView::delete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
	/// No credential; go to the login page with [`DELETE_LOGIN_REQUIRED`].
	LoginRequired,
	/// The user declined.
	Cancelled,
	/// Record removed; go back to the list.
	Deleted,
	/// The server refused or the request failed.
	Failed(String),
}

/// Detail page state for one record id.
#[derive(Debug, Clone)]
pub struct DetailView {
	id: String,
	record: Option<Occurrence>,
	state: LoadState,
}

impl DetailView {
	/// Page for `id` as taken from the route.
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			record: None,
			state: LoadState::Loading,
		}
	}

	/// Record id.
	pub fn id(&self) -> &str {
		&self.id
	}

	/// Fetched record.
	pub fn record(&self) -> Option<&Occurrence> {
		self.record.as_ref()
	}

	/// Fetch state.
	pub fn state(&self) -> &LoadState {
		&self.state
	}

	/// Fetches the record.
	pub async fn load<T: Transport>(&mut self, api: &ApiClient<T>) {
		if self.id.trim().is_empty() {
			self.state = LoadState::Failed("No record id given.".into());
			return;
		}
		match api.get(&self.id).await {
			Ok(record) => {
				self.record = Some(record);
				self.state = LoadState::Loaded;
			}
			Err(error) => {
				warn!(id = %self.id, %error, "failed to load occurrence");
				self.record = None;
				self.state = LoadState::Failed("Record not found.".into());
			}
		}
	}

	/// Returns true when `user` created the loaded record.
	pub fn is_owned_by(&self, user: Option<&User>) -> bool {
		matches!((&self.record, user), (Some(record), Some(user)) if record.is_owned_by(user))
	}

	/// Deletes the record after confirmation.
	///
	/// Without a credential the user is not asked and nothing is sent.
	pub async fn delete<T: Transport>(
		&self,
		api: &ApiClient<T>,
		credential: Option<&Credential>,
		confirm: &dyn Confirm,
	) -> DeleteOutcome {
		let Some(credential) = credential else {
			return DeleteOutcome::LoginRequired;
		};
		if !confirm.confirm(DELETE_PROMPT) {
			return DeleteOutcome::Cancelled;
		}

		match api.delete(&self.id, credential).await {
			Ok(()) => {
				info!(id = %self.id, "record deleted");
				DeleteOutcome::Deleted
			}
			Err(error) if error.is_unauthorized() => DeleteOutcome::Failed(error.user_message()),
			Err(error) => {
				warn!(id = %self.id, %error, "delete failed");
				DeleteOutcome::Failed(DELETE_FAILED.to_string())
			}
		}
	}
}

/// Display text for a record, with placeholders for missing fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailModel {
	/// Taxon label.
	pub title: String,
	/// Creator, or "unknown".
	pub owner: String,
	/// Local creation time, when known.
	pub created: Option<String>,
	/// Full record URI.
	pub uri: String,
	/// `predicate -> value` lines.
	pub traits: Vec<String>,
	/// Notes, or a placeholder.
	pub remarks: String,
	/// Visibility.
	pub is_public: bool,
}

impl DetailModel {
	/// Builds the display text for `record`.
	pub fn new(record: &Occurrence) -> Self {
		Self {
			title: record.taxon_label.clone(),
			owner: non_empty_or(&record.owner_name, "unknown"),
			created: record
				.created_at_parsed()
				.map(|at| at.format("%Y-%m-%d %H:%M %:z").to_string())
				.or_else(|| record.created_at.clone()),
			uri: record.id.to_string(),
			traits: record.traits.iter().map(trait_line).collect(),
			remarks: non_empty_or(&record.remarks, "(none)"),
			is_public: record.is_public,
		}
	}
}

fn trait_line(t: &Trait) -> String {
	format!("{} -> {}", non_empty_or(&t.predicate_label, "property"), t.value_label)
}

fn non_empty_or(value: &str, fallback: &str) -> String {
	if value.trim().is_empty() { fallback } else { value }.to_string()
}
