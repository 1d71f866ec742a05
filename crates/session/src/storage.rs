//! Key-value persistence for session state.

use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use thiserror::Error;

/// Key holding the JSON-encoded signed-in user.
pub const USER_KEY: &str = "bio_user";
/// Key holding the bearer credential string.
pub const TOKEN_KEY: &str = "bio_token";

/// File name used by [`FileStorage`] inside its directory.
pub const SESSION_FILE: &str = "session.json";

/// Owner-only access; the file holds a bearer token.
#[cfg(unix)]
const SESSION_FILE_MODE: u32 = 0o600;

/// Errors from a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
	/// Reading or writing the backing file failed.
	#[error("failed to access {path}: {error}")]
	Io {
		/// File involved.
		path: PathBuf,
		/// Underlying error.
		#[source]
		error: io::Error,
	},

	/// The backing file exists but is not a JSON string map.
	#[error("unreadable session file {path}: {reason}")]
	Corrupt {
		/// File involved.
		path: PathBuf,
		/// Parser message.
		reason: String,
	},

	/// A value could not be serialized for storage.
	#[error("failed to encode session value: {0}")]
	Encode(String),

	/// No data directory could be determined.
	#[error("no data directory available for session storage")]
	NoDataDir,
}

/// Result type for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Synchronous string key-value store surviving process restarts.
pub trait SessionStorage: Send + Sync {
	/// Reads `key`.
	fn get(&self, key: &str) -> StorageResult<Option<String>>;
	/// Writes `key`.
	fn set(&self, key: &str, value: &str) -> StorageResult<()>;
	/// Deletes `key`; deleting an absent key succeeds.
	fn remove(&self, key: &str) -> StorageResult<()>;
}

/// Process-local storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
	entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
	/// Creates an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns a copy of every entry, sorted by key.
	pub fn snapshot(&self) -> BTreeMap<String, String> {
		self.entries.lock().iter().map(|(k, v)| (k.clone(), v.clone())).collect()
	}
}

impl SessionStorage for MemoryStorage {
	fn get(&self, key: &str) -> StorageResult<Option<String>> {
		Ok(self.entries.lock().get(key).cloned())
	}

	fn set(&self, key: &str, value: &str) -> StorageResult<()> {
		self.entries.lock().insert(key.to_string(), value.to_string());
		Ok(())
	}

	fn remove(&self, key: &str) -> StorageResult<()> {
		self.entries.lock().remove(key);
		Ok(())
	}
}

/// Storage backed by a single JSON object file.
///
/// Every write rewrites the whole file through a temporary sibling and a
/// rename, so readers never observe a half-written file.
#[derive(Debug)]
pub struct FileStorage {
	path: PathBuf,
	lock: Mutex<()>,
}

impl FileStorage {
	/// Stores entries in `dir/session.json`.
	pub fn new(dir: impl AsRef<Path>) -> Self {
		Self {
			path: dir.as_ref().join(SESSION_FILE),
			lock: Mutex::new(()),
		}
	}

	/// Stores entries under the user data directory (`$XDG_DATA_HOME/bioc`).
	pub fn in_data_dir() -> StorageResult<Self> {
		default_data_dir().map(Self::new)
	}

	/// Path of the backing file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn read_map(&self) -> StorageResult<BTreeMap<String, String>> {
		let raw = match std::fs::read_to_string(&self.path) {
			Ok(raw) => raw,
			Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
			Err(error) => {
				return Err(StorageError::Io {
					path: self.path.clone(),
					error,
				});
			}
		};
		if raw.trim().is_empty() {
			return Ok(BTreeMap::new());
		}
		serde_json::from_str(&raw).map_err(|e| StorageError::Corrupt {
			path: self.path.clone(),
			reason: e.to_string(),
		})
	}

	fn write_map(&self, map: &BTreeMap<String, String>) -> StorageResult<()> {
		let io_err = |error| StorageError::Io {
			path: self.path.clone(),
			error,
		};

		if let Some(dir) = self.path.parent() {
			std::fs::create_dir_all(dir).map_err(io_err)?;
		}
		let body = serde_json::to_vec_pretty(map).map_err(|e| StorageError::Encode(e.to_string()))?;
		let tmp = self.path.with_extension("json.tmp");
		std::fs::write(&tmp, body).map_err(io_err)?;
		#[cfg(unix)]
		{
			use std::os::unix::fs::PermissionsExt;
			std::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(SESSION_FILE_MODE)).map_err(io_err)?;
		}
		std::fs::rename(&tmp, &self.path).map_err(io_err)
	}

	/// Applies `edit` to the stored map. A corrupt file is treated as empty so
	/// that writes can always recover it.
	fn update(&self, edit: impl FnOnce(&mut BTreeMap<String, String>)) -> StorageResult<()> {
		let _guard = self.lock.lock();
		let mut map = match self.read_map() {
			Err(StorageError::Corrupt { .. }) => BTreeMap::new(),
			other => other?,
		};
		edit(&mut map);
		if map.is_empty() {
			return match std::fs::remove_file(&self.path) {
				Err(error) if error.kind() != io::ErrorKind::NotFound => Err(StorageError::Io {
					path: self.path.clone(),
					error,
				}),
				_ => Ok(()),
			};
		}
		self.write_map(&map)
	}
}

impl SessionStorage for FileStorage {
	fn get(&self, key: &str) -> StorageResult<Option<String>> {
		let _guard = self.lock.lock();
		Ok(self.read_map()?.remove(key))
	}

	fn set(&self, key: &str, value: &str) -> StorageResult<()> {
		self.update(|map| {
			map.insert(key.to_string(), value.to_string());
		})
	}

	fn remove(&self, key: &str) -> StorageResult<()> {
		self.update(|map| {
			map.remove(key);
		})
	}
}

/// Returns the default session directory under the user data directory.
pub fn default_data_dir() -> StorageResult<PathBuf> {
	let data_dir = dirs::data_dir()
		.or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
		.ok_or(StorageError::NoDataDir)?;
	Ok(data_dir.join("bioc"))
}
