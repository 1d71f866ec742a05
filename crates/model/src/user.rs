//! Session identity types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Account identity as returned by the login endpoint.
///
/// The server sends more fields (timestamps, flags); only the ones the client
/// displays or compares against record ownership are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	/// Opaque account identifier, compared against [`Occurrence::owner_id`](crate::Occurrence::owner_id).
	pub id: String,
	/// Display name.
	#[serde(default)]
	pub username: String,
	/// Login e-mail address.
	#[serde(default)]
	pub email: String,
}

/// Bearer token issued at login.
///
/// The secret is never printed by `Debug`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
	/// Wraps a raw token string.
	pub fn new(token: impl Into<String>) -> Self {
		Self(token.into())
	}

	/// Returns the raw token.
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Returns true for an empty token, which the server never issues.
	pub fn is_empty(&self) -> bool {
		self.0.trim().is_empty()
	}

	/// Value for an `Authorization` header.
	pub fn bearer_header(&self) -> String {
		format!("Bearer {}", self.0)
	}
}

impl fmt::Debug for Credential {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Credential").field(&"<redacted>").finish()
	}
}
