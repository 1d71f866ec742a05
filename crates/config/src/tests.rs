use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use pretty_assertions::assert_eq;

use super::*;

#[test]
fn empty_input_yields_defaults() {
	let config = Config::parse("").unwrap();
	assert_eq!(config, Config::default());
	assert_eq!(config.api.base_url, "http://localhost:8080");
	assert_eq!(config.api.timeout(), Duration::from_secs(30));
	assert_eq!(config.search.limit, 10);
	assert_eq!(config.search.taxon_min_chars, 2);
	assert_eq!(config.search.trait_min_chars, 0);
	assert_eq!(config.list.debounce(), Duration::from_millis(300));
	assert_eq!(config.form.update_redirect_delay(), Duration::from_millis(1500));
	assert_eq!(config.session.data_dir, None);
}

#[test]
fn partial_sections_keep_other_defaults() {
	let config = Config::parse(
		r#"
[api]
base_url = "https://catalog.example.org"

[search]
api_key = "k"
limit = 5
"#,
	)
	.unwrap();

	assert_eq!(config.api.base_url, "https://catalog.example.org");
	assert_eq!(config.api.timeout_secs, 30);
	assert_eq!(config.search.api_key.as_deref(), Some("k"));
	assert_eq!(config.search.limit, 5);
	assert_eq!(config.search.url, "http://localhost:7700");
}

#[test]
fn unknown_keys_are_rejected() {
	let err = Config::parse("[api]\nbase_ulr = \"x\"\n").unwrap_err();
	assert!(matches!(err, ConfigError::Toml(_)));
}

#[test]
fn zero_limit_is_invalid() {
	let err = Config::parse("[search]\nlimit = 0\n").unwrap_err();
	assert!(matches!(err, ConfigError::Invalid { key: "search.limit", .. }));
}

#[test]
fn overrides_replace_file_values() {
	let mut config = Config::default();
	let env: HashMap<&str, &str> = HashMap::from([
		(ENV_API_URL, "https://api.example.org"),
		(ENV_SEARCH_KEY, "secret"),
		(ENV_DATA_DIR, "/tmp/bioc"),
		(ENV_SEARCH_URL, "  "),
	]);

	config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

	assert_eq!(config.api.base_url, "https://api.example.org");
	assert_eq!(config.search.api_key.as_deref(), Some("secret"));
	assert_eq!(config.search.url, "http://localhost:7700");
	assert_eq!(config.session.data_dir, Some(PathBuf::from("/tmp/bioc")));
}

#[test]
fn load_reads_file_and_reports_missing_path() {
	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("config.toml");
	std::fs::write(&path, "[list]\ndebounce_ms = 50\n").unwrap();

	assert_eq!(Config::load(&path).unwrap().list.debounce_ms, 50);

	let missing = dir.path().join("nope.toml");
	match Config::load(&missing) {
		Err(ConfigError::Io { path, .. }) => assert_eq!(path, missing),
		other => panic!("expected Io error, got {other:?}"),
	}
}
