//! Authentication session for the occurrence catalog client.
//!
//! [`SessionStore`] owns the signed-in user and bearer credential. It starts in
//! a loading state, restores the persisted pair once at startup and rewrites
//! the persisted copy on every login and logout. Persistence goes through the
//! [`SessionStorage`] seam: [`FileStorage`] on disk, [`MemoryStorage`] for tests
//! and throwaway sessions.

#![warn(missing_docs)]

mod storage;
mod store;

pub use storage::{
	FileStorage, MemoryStorage, SESSION_FILE, SessionStorage, StorageError, StorageResult, TOKEN_KEY, USER_KEY,
	default_data_dir,
};
pub use store::{Result, Session, SessionError, SessionState, SessionStore};
