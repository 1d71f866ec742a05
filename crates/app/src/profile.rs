//! Settings page and header bar.

use bioc_model::User;

/// Account details shown on the settings page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileView {
	/// Display name.
	pub username: String,
	/// Login e-mail.
	pub email: String,
	/// Account id.
	pub user_id: String,
}

impl ProfileView {
	/// Nothing to show without a user.
	pub fn new(user: Option<&User>) -> Option<Self> {
		user.map(|u| Self {
			username: u.username.clone(),
			email: u.email.clone(),
			user_id: u.id.clone(),
		})
	}
}

/// Header bar contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderView {
	/// Signed in: name plus a logout action.
	SignedIn {
		/// Display name.
		username: String,
	},
	/// Signed out: login and register links.
	SignedOut,
}

impl HeaderView {
	/// Header for the current user.
	pub fn new(user: Option<&User>) -> Self {
		match user {
			Some(user) => Self::SignedIn {
				username: user.username.clone(),
			},
			None => Self::SignedOut,
		}
	}
}
