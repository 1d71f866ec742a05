//! Configuration for the occurrence catalog client.
//!
//! Configuration is a single optional TOML file. Every key has a default, so
//! an absent file is the same as an empty one:
//!
//! ```toml
//! [api]
//! base_url = "https://catalog.example.org"
//! timeout_secs = 30
//!
//! [search]
//! url = "https://search.example.org"
//! api_key = "public-search-key"
//! limit = 10
//! taxon_min_chars = 2
//! trait_min_chars = 0
//!
//! [list]
//! debounce_ms = 300
//!
//! [form]
//! update_redirect_delay_ms = 1500
//!
//! [session]
//! data_dir = "/var/lib/bioc"
//! ```
//!
//! # Locations
//!
//! 1. An explicit path (`--config`); it must exist.
//! 2. `$XDG_CONFIG_HOME/bioc/config.toml` (or `~/.config/bioc/config.toml`); optional.
//!
//! # Environment
//!
//! `BIOC_API_URL`, `BIOC_SEARCH_URL`, `BIOC_SEARCH_KEY` and `BIOC_DATA_DIR`
//! override the corresponding file values.

pub mod error;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

pub use error::{ConfigError, Result};

/// Overrides `api.base_url`.
pub const ENV_API_URL: &str = "BIOC_API_URL";
/// Overrides `search.url`.
pub const ENV_SEARCH_URL: &str = "BIOC_SEARCH_URL";
/// Overrides `search.api_key`.
pub const ENV_SEARCH_KEY: &str = "BIOC_SEARCH_KEY";
/// Overrides `session.data_dir`.
pub const ENV_DATA_DIR: &str = "BIOC_DATA_DIR";

/// Parsed configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	/// Occurrence API settings.
	pub api: ApiConfig,
	/// Search service settings.
	pub search: SearchConfig,
	/// List view settings.
	pub list: ListConfig,
	/// Record form settings.
	pub form: FormConfig,
	/// Session persistence settings.
	pub session: SessionConfig,
}

/// `[api]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
	/// Base URL the `/api/...` paths are joined onto.
	pub base_url: String,
	/// Per-request timeout in seconds.
	pub timeout_secs: u64,
}

impl Default for ApiConfig {
	fn default() -> Self {
		Self {
			base_url: "http://localhost:8080".into(),
			timeout_secs: 30,
		}
	}
}

impl ApiConfig {
	/// Request timeout.
	pub fn timeout(&self) -> Duration {
		Duration::from_secs(self.timeout_secs)
	}
}

/// `[search]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
	/// Search service URL.
	pub url: String,
	/// Search-only API key, if the service requires one.
	pub api_key: Option<String>,
	/// Candidates requested per query.
	pub limit: usize,
	/// Characters typed before the taxon index is queried.
	pub taxon_min_chars: usize,
	/// Characters typed before the trait indexes are queried.
	pub trait_min_chars: usize,
}

impl Default for SearchConfig {
	fn default() -> Self {
		Self {
			url: "http://localhost:7700".into(),
			api_key: None,
			limit: 10,
			taxon_min_chars: 2,
			trait_min_chars: 0,
		}
	}
}

/// `[list]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListConfig {
	/// Quiet period before a keyword search is sent.
	pub debounce_ms: u64,
}

impl Default for ListConfig {
	fn default() -> Self {
		Self { debounce_ms: 300 }
	}
}

impl ListConfig {
	/// Debounce interval.
	pub fn debounce(&self) -> Duration {
		Duration::from_millis(self.debounce_ms)
	}
}

/// `[form]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormConfig {
	/// Pause between a successful update and the move to the detail view.
	pub update_redirect_delay_ms: u64,
}

impl Default for FormConfig {
	fn default() -> Self {
		Self {
			update_redirect_delay_ms: 1500,
		}
	}
}

impl FormConfig {
	/// Redirect delay after an update.
	pub fn update_redirect_delay(&self) -> Duration {
		Duration::from_millis(self.update_redirect_delay_ms)
	}
}

/// `[session]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
	/// Directory holding the persisted session; the user data directory when unset.
	pub data_dir: Option<PathBuf>,
}

impl Config {
	/// Parse a TOML string into a [`Config`].
	pub fn parse(input: &str) -> Result<Self> {
		let config: Config = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Load configuration from a file that must exist.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
			path: path.to_path_buf(),
			error: e,
		})?;
		Self::parse(&content)
	}

	/// Loads `path` if given, otherwise the default location if it exists,
	/// otherwise defaults. Environment overrides are applied last.
	pub fn discover(path: Option<&Path>) -> Result<Self> {
		let mut config = match path {
			Some(path) => Self::load(path)?,
			None => match default_config_path().filter(|p| p.is_file()) {
				Some(path) => {
					debug!(path = %path.display(), "loading config");
					Self::load(path)?
				}
				None => Self::default(),
			},
		};
		config.apply_overrides(|key| std::env::var(key).ok());
		config.validate()?;
		Ok(config)
	}

	/// Applies environment-style overrides read through `lookup`.
	///
	/// Empty values are ignored.
	pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
		let get = |key| lookup(key).filter(|v: &String| !v.trim().is_empty());

		if let Some(url) = get(ENV_API_URL) {
			self.api.base_url = url;
		}
		if let Some(url) = get(ENV_SEARCH_URL) {
			self.search.url = url;
		}
		if let Some(key) = get(ENV_SEARCH_KEY) {
			self.search.api_key = Some(key);
		}
		if let Some(dir) = get(ENV_DATA_DIR) {
			self.session.data_dir = Some(PathBuf::from(dir));
		}
	}

	fn validate(&self) -> Result<()> {
		if self.api.base_url.trim().is_empty() {
			return Err(ConfigError::Invalid {
				key: "api.base_url",
				reason: "must not be empty".into(),
			});
		}
		if self.api.timeout_secs == 0 {
			return Err(ConfigError::Invalid {
				key: "api.timeout_secs",
				reason: "must be positive".into(),
			});
		}
		if self.search.limit == 0 {
			return Err(ConfigError::Invalid {
				key: "search.limit",
				reason: "must be positive".into(),
			});
		}
		Ok(())
	}
}

/// Returns `$XDG_CONFIG_HOME/bioc/config.toml`, if a config directory is known.
pub fn default_config_path() -> Option<PathBuf> {
	dirs::config_dir().map(|dir| dir.join("bioc").join("config.toml"))
}

#[cfg(test)]
mod tests;
