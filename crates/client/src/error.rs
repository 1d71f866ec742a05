//! Error types for remote API calls.

use thiserror::Error;

/// Errors produced while talking to the occurrence API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
	/// The server refused an authentication request and said why.
	#[error("{message}")]
	Rejected {
		/// HTTP status code.
		status: u16,
		/// Server-provided reason, or a per-endpoint fallback.
		message: String,
	},

	/// A mutating request was answered with 401.
	#[error("not authorized")]
	Unauthorized,

	/// Any other non-success status.
	#[error("request failed with status {status}")]
	Status {
		/// HTTP status code.
		status: u16,
	},

	/// Connection, TLS or timeout failure.
	#[error("network error: {0}")]
	Network(String),

	/// The response body did not match the expected schema.
	#[error("malformed response: {0}")]
	Decode(String),

	/// The configured base URL cannot address the API.
	#[error("invalid API url: {0}")]
	InvalidUrl(String),
}

impl ApiError {
	/// Returns true for the 401-on-mutation case, which asks the user to log in again.
	#[must_use]
	pub fn is_unauthorized(&self) -> bool {
		matches!(self, Self::Unauthorized)
	}

	/// Text to show the user.
	///
	/// Authentication refusals are shown verbatim, 401s ask for a fresh login, and
	/// everything else collapses to one generic message.
	pub fn user_message(&self) -> String {
		match self {
			Self::Rejected { message, .. } => message.clone(),
			Self::Unauthorized => "Authentication expired. Please log in again.".to_string(),
			_ => "The operation failed.".to_string(),
		}
	}
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;
