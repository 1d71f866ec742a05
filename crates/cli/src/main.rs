//! `bioc`: command-line client for the occurrence catalog.
//!
//! Each invocation restores the stored session, asks the route guard whether
//! the page behind the subcommand may be shown, and runs it. Results go to
//! stdout; logs go to stderr, or to `$BIOC_LOG_DIR/bioc.<pid>.log` when set.

mod cli;
mod commands;
mod prompt;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use bioc_app::{App, AppSettings};
use bioc_client::ApiClient;
use bioc_config::Config;
use bioc_search::MeiliSearchIndex;
use bioc_session::FileStorage;
use clap::Parser;
use cli::Cli;
use tracing::debug;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	setup_tracing(cli.verbose);

	let config = Config::discover(cli.config.as_deref())?;
	debug!(api = %config.api.base_url, search = %config.search.url, "configuration loaded");

	let api = ApiClient::http(&config.api.base_url, config.api.timeout()).context("invalid api.base_url")?;
	let index = MeiliSearchIndex::new(&config.search.url, config.search.api_key.as_deref())
		.context("invalid search settings")?;
	let storage = match &config.session.data_dir {
		Some(dir) => FileStorage::new(dir),
		None => FileStorage::in_data_dir()?,
	};

	let mut app = App::new(api, Arc::new(index), storage, AppSettings::from(&config));
	app.start();

	let mut stdout = std::io::stdout().lock();
	commands::run(&mut app, cli.command, &mut stdout).await
}

fn setup_tracing(verbose: bool) {
	use std::fs::OpenOptions;

	use tracing_subscriber::EnvFilter;
	use tracing_subscriber::prelude::*;

	let filter = || {
		EnvFilter::try_from_env("BIOC_LOG").unwrap_or_else(|_| {
			if verbose {
				EnvFilter::new("bioc=debug,warn")
			} else {
				EnvFilter::new("bioc=info,warn")
			}
		})
	};

	if let Some(log_dir) = std::env::var("BIOC_LOG_DIR").ok().map(PathBuf::from)
		&& std::fs::create_dir_all(&log_dir).is_ok()
	{
		let log_path = log_dir.join(format!("bioc.{}.log", std::process::id()));

		if let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) {
			let file_layer = tracing_subscriber::fmt::layer()
				.with_writer(file)
				.with_ansi(false)
				.with_target(true);

			tracing_subscriber::registry().with(filter()).with(file_layer).init();
			debug!(path = ?log_path, "tracing initialized");
			return;
		}
	}

	tracing_subscriber::fmt()
		.with_env_filter(filter())
		.with_writer(std::io::stderr)
		.init();
}
