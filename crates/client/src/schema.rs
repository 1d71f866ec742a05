//! Request and response bodies, one type per endpoint.

use bioc_model::{Credential, OccurrenceId, User};
use serde::{Deserialize, Serialize};

/// `POST /api/auth/login` body.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
	/// Account e-mail.
	pub email: &'a str,
	/// Account password.
	pub password: &'a str,
}

/// `POST /api/auth/login` success body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
	/// Authenticated account.
	pub user: User,
	/// Bearer credential for subsequent requests.
	pub token: Credential,
}

/// `POST /api/auth/register` body.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
	/// Display name.
	pub username: &'a str,
	/// Account e-mail.
	pub email: &'a str,
	/// Account password.
	pub password: &'a str,
}

/// `POST /api/occurrences` success body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatedResponse {
	/// Identifier of the new record, when the server echoes it.
	#[serde(default)]
	pub id: Option<OccurrenceId>,
}

/// Error body shape shared by every endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
	#[serde(default)]
	pub error: Option<String>,
}
