//! Session lifecycle: restore, login, register, logout.

use bioc_client::{ApiClient, ApiError, Transport};
use bioc_model::{Credential, User};
use thiserror::Error;
use tracing::{info, warn};

use crate::storage::{SessionStorage, StorageError, StorageResult, TOKEN_KEY, USER_KEY};

/// Errors from session transitions.
#[derive(Debug, Error)]
pub enum SessionError {
	/// The remote API refused or failed the request.
	#[error(transparent)]
	Api(#[from] ApiError),

	/// Persisted state could not be written or cleared.
	#[error(transparent)]
	Storage(#[from] StorageError),
}

impl SessionError {
	/// Text to show the user.
	pub fn user_message(&self) -> String {
		match self {
			Self::Api(error) => error.user_message(),
			Self::Storage(_) => "Could not save the session.".to_string(),
		}
	}
}

/// Result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Signed-in identity with its bearer credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
	/// Signed-in account.
	pub user: User,
	/// Bearer token for that account.
	pub credential: Credential,
}

/// What the rest of the client may assume about the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
	/// Persisted state has not been read yet.
	Loading,
	/// Restore finished; `None` means signed out.
	Ready(Option<Session>),
}

/// Owner of the in-memory session and its persisted copy.
///
/// Only this type writes session state. Views read it through
/// [`SessionStore::state`] and friends.
pub struct SessionStore<S> {
	storage: S,
	state: SessionState,
}

impl<S: SessionStorage> SessionStore<S> {
	/// Creates a store in the [`SessionState::Loading`] state.
	pub fn new(storage: S) -> Self {
		Self {
			storage,
			state: SessionState::Loading,
		}
	}

	/// Current state.
	pub fn state(&self) -> &SessionState {
		&self.state
	}

	/// Backing storage.
	pub fn storage(&self) -> &S {
		&self.storage
	}

	/// Returns true until [`Self::restore`] has run.
	pub fn is_loading(&self) -> bool {
		matches!(self.state, SessionState::Loading)
	}

	/// Signed-in session, if any.
	pub fn session(&self) -> Option<&Session> {
		match &self.state {
			SessionState::Ready(session) => session.as_ref(),
			SessionState::Loading => None,
		}
	}

	/// Signed-in user, if any.
	pub fn user(&self) -> Option<&User> {
		self.session().map(|s| &s.user)
	}

	/// Bearer credential, if any.
	pub fn credential(&self) -> Option<&Credential> {
		self.session().map(|s| &s.credential)
	}

	/// Returns true when a session is present.
	pub fn is_authenticated(&self) -> bool {
		self.session().is_some()
	}

	/// Loads the persisted session.
	///
	/// Both keys must be present and the user must decode; anything else is
	/// discarded, both keys are cleared and the store ends up signed out.
	/// Storage failures are treated the same way.
	pub fn restore(&mut self) -> &SessionState {
		let session = match self.read_persisted() {
			Ok(session) => session,
			Err(reason) => {
				warn!(%reason, "discarding persisted session");
				self.clear_persisted();
				None
			}
		};
		if let Some(session) = &session {
			info!(user = %session.user.username, "restored session");
		}
		self.state = SessionState::Ready(session);
		&self.state
	}

	fn read_persisted(&self) -> std::result::Result<Option<Session>, String> {
		let user = self.storage.get(USER_KEY).map_err(|e| e.to_string())?;
		let token = self.storage.get(TOKEN_KEY).map_err(|e| e.to_string())?;

		match (user, token) {
			(None, None) => Ok(None),
			(Some(_), None) => Err("user without credential".into()),
			(None, Some(_)) => Err("credential without user".into()),
			(Some(user), Some(token)) => {
				let user: User = serde_json::from_str(&user).map_err(|e| format!("malformed user: {e}"))?;
				let credential = Credential::new(token);
				if credential.is_empty() {
					return Err("empty credential".into());
				}
				Ok(Some(Session { user, credential }))
			}
		}
	}

	fn clear_persisted(&self) {
		for key in [USER_KEY, TOKEN_KEY] {
			if let Err(error) = self.storage.remove(key) {
				warn!(key, %error, "failed to clear persisted session key");
			}
		}
	}

	/// Authenticates and replaces the session.
	///
	/// The persisted copy is written first; if that fails the previous session
	/// stays in effect, both in memory and in storage.
	pub async fn login<T: Transport>(&mut self, api: &ApiClient<T>, email: &str, password: &str) -> Result<User> {
		let response = api.login(email, password).await.inspect_err(|error| {
			warn!(%error, "login failed");
		})?;
		let session = Session {
			user: response.user,
			credential: response.token,
		};
		self.persist(&session)?;

		info!(user = %session.user.username, "signed in");
		let user = session.user.clone();
		self.state = SessionState::Ready(Some(session));
		Ok(user)
	}

	/// Writes `session` to storage. On failure the previously stored keys are
	/// put back; if that also fails the session is dropped everywhere so memory
	/// and storage still agree.
	fn persist(&mut self, session: &Session) -> Result<()> {
		let user = serde_json::to_string(&session.user).map_err(|e| StorageError::Encode(e.to_string()))?;
		let previous = self.persisted_pair();
		let Err(error) = self
			.storage
			.set(USER_KEY, &user)
			.and_then(|()| self.storage.set(TOKEN_KEY, session.credential.as_str()))
		else {
			return Ok(());
		};

		warn!(%error, "failed to persist session");
		let rolled_back = previous.is_ok_and(|pair| self.write_pair(pair).is_ok());
		if !rolled_back {
			warn!("could not restore the previous session; signing out");
			self.state = SessionState::Ready(None);
			self.clear_persisted();
		}
		Err(error.into())
	}

	fn persisted_pair(&self) -> StorageResult<[Option<String>; 2]> {
		Ok([self.storage.get(USER_KEY)?, self.storage.get(TOKEN_KEY)?])
	}

	fn write_pair(&self, [user, token]: [Option<String>; 2]) -> StorageResult<()> {
		for (key, value) in [(USER_KEY, user), (TOKEN_KEY, token)] {
			match value {
				Some(value) => self.storage.set(key, &value)?,
				None => self.storage.remove(key)?,
			}
		}
		Ok(())
	}

	/// Creates an account. The session is not changed; callers send the user to
	/// the login page.
	pub async fn register<T: Transport>(
		&self,
		api: &ApiClient<T>,
		username: &str,
		email: &str,
		password: &str,
	) -> Result<()> {
		api.register(username, email, password).await.inspect_err(|error| {
			warn!(%error, "registration failed");
		})?;
		info!(%username, "registered account");
		Ok(())
	}

	/// Signs out. Memory is always cleared; storage failures are logged.
	pub fn logout(&mut self) {
		if let Some(user) = self.user() {
			info!(user = %user.username, "signed out");
		}
		self.state = SessionState::Ready(None);
		self.clear_persisted();
	}
}
