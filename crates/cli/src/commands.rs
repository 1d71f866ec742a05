//! Subcommand implementations.

use std::io::Write;

use anyhow::{Context, anyhow, bail};
use bioc_app::{
	App, DELETE_LOGIN_REQUIRED, DeleteOutcome, DetailModel, DetailView, Gate, LoadState, OccurrenceForm, Route,
	SubmitOutcome,
};
use bioc_client::Transport;
use bioc_model::TaxonRef;
use bioc_search::{Lookup, LookupPolicy, PREDICATE_INDEX, TAXON_INDEX, VALUE_INDEX};
use bioc_session::SessionStorage;
use tracing::debug;

use crate::cli::{Command, LookupKind, RecordArgs};
use crate::prompt;

/// Runs `command` against `app`, writing results to `out`.
pub async fn run<T, S>(app: &mut App<T, S>, command: Command, out: &mut dyn Write) -> anyhow::Result<()>
where
	T: Transport,
	S: SessionStorage,
{
	match command {
		Command::Login { email, password } => {
			enter(app, Route::Login)?;
			let password = password_or_prompt(password)?;
			let user = app.login(&email, &password).await.map_err(|e| anyhow!(e.user_message()))?;
			writeln!(out, "logged in as {}", user.username)?;
		}
		Command::Register {
			username,
			email,
			password,
		} => {
			enter(app, Route::Register)?;
			let password = password_or_prompt(password)?;
			app.register(&username, &email, &password)
				.await
				.map_err(|e| anyhow!(e.user_message()))?;
			writeln!(out, "registered {username}; run `bioc login --email {email}` to sign in")?;
		}
		Command::Logout => {
			app.logout();
			writeln!(out, "logged out")?;
		}
		Command::Whoami => {
			enter(app, Route::Settings)?;
			let profile = app.profile().context("no session")?;
			writeln!(out, "username: {}", profile.username)?;
			writeln!(out, "email:    {}", profile.email)?;
			writeln!(out, "id:       {}", profile.user_id)?;
		}
		Command::List { mine, query, taxon } => {
			enter(app, Route::Occurrences)?;
			let view = app.list(query.as_deref().unwrap_or_default(), taxon, mine).await;
			if let LoadState::Failed(message) = view.state() {
				bail!("{message}");
			}
			let rows = view.rows(app.user());
			if rows.is_empty() {
				writeln!(out, "no occurrences")?;
			}
			for row in rows {
				let marker = if row.mine { "*" } else { " " };
				writeln!(out, "{marker} {}  {}  {}", row.short_id, row.taxon_label, row.remarks)?;
			}
		}
		Command::Show { id } => {
			enter(app, Route::Detail(id.clone()))?;
			show(app, &id, out).await?;
		}
		Command::Create(record) => {
			enter(app, Route::Create)?;
			let mut form = app.create_form();
			fill(app, &mut form, &record).await?;
			match app.submit(&mut form).await {
				SubmitOutcome::Created(Some(id)) => writeln!(out, "created {}", id.short())?,
				SubmitOutcome::Created(None) => writeln!(out, "created")?,
				other => return Err(submit_error(other)),
			}
		}
		Command::Edit {
			id,
			clear_traits,
			record,
		} => {
			enter(app, Route::Edit(id.clone()))?;
			let mut form = app.edit_form(&id).await.map_err(|state| match state {
				LoadState::Failed(message) => anyhow!(message),
				_ => anyhow!("record {id} not loaded"),
			})?;
			if clear_traits {
				form.clear_traits();
			}
			fill(app, &mut form, &record).await?;
			match app.submit(&mut form).await {
				SubmitOutcome::Updated { redirect, .. } => {
					writeln!(out, "updated {id}")?;
					if let Route::Detail(target) = redirect {
						show(app, &target, out).await?;
					}
				}
				other => return Err(submit_error(other)),
			}
		}
		Command::Delete { id, yes } => {
			enter(app, Route::Detail(id.clone()))?;
			let view = DetailView::new(id.as_str());
			let assume_yes = |_: &str| true;
			let ask = |question: &str| prompt::confirm(question);
			let outcome = if yes {
				app.delete(&view, &assume_yes).await
			} else {
				app.delete(&view, &ask).await
			};
			match outcome {
				DeleteOutcome::Deleted => writeln!(out, "deleted {id}")?,
				DeleteOutcome::Cancelled => writeln!(out, "cancelled")?,
				DeleteOutcome::LoginRequired => bail!("{DELETE_LOGIN_REQUIRED}"),
				DeleteOutcome::Failed(message) => bail!("{message}"),
			}
		}
		Command::Lookup { kind, text } => {
			enter(app, Route::Create)?;
			let form = &app.settings().form;
			let policy = match kind {
				LookupKind::Taxon => LookupPolicy::new(TAXON_INDEX, form.taxon_min_chars, form.search_limit),
				LookupKind::Predicate => LookupPolicy::new(PREDICATE_INDEX, form.trait_min_chars, form.search_limit),
				LookupKind::Value => LookupPolicy::new(VALUE_INDEX, form.trait_min_chars, form.search_limit),
			};
			let min_chars = policy.min_chars;
			let mut lookup = Lookup::new(policy);
			lookup.search(app.index(), &text).await;
			if lookup.candidates().is_empty() {
				if text.chars().count() < min_chars {
					writeln!(out, "type at least {min_chars} characters")?;
				} else {
					writeln!(out, "no matches")?;
				}
			}
			for candidate in lookup.candidates() {
				writeln!(out, "{}\t{}\t{}", candidate.id, candidate.display_label(), candidate.ontology)?;
			}
		}
	}
	Ok(())
}

/// Opens `route`, failing unless the guard lets it render.
pub fn enter<T, S>(app: &mut App<T, S>, route: Route) -> anyhow::Result<()>
where
	T: Transport,
	S: SessionStorage,
{
	debug!(%route, "entering");
	match app.open(route) {
		Gate::Render => Ok(()),
		Gate::Redirect(Route::Login) => bail!("login required"),
		Gate::Redirect(Route::Home) => {
			let name = app.user().map(|u| u.username.clone()).unwrap_or_default();
			bail!("already logged in as {name}; run `bioc logout` first")
		}
		Gate::Redirect(other) => bail!("redirected to {other}"),
		Gate::Placeholder => bail!("session not restored"),
	}
}

async fn show<T, S>(app: &App<T, S>, id: &str, out: &mut dyn Write) -> anyhow::Result<()>
where
	T: Transport,
	S: SessionStorage,
{
	let view = app.detail(id).await;
	let record = match (view.record(), view.state()) {
		(Some(record), _) => record,
		(None, LoadState::Failed(message)) => bail!("{message}"),
		(None, _) => bail!("record {id} not loaded"),
	};
	let model = DetailModel::new(record);

	writeln!(out, "{}", model.title)?;
	writeln!(out, "owner:   {}", model.owner)?;
	if let Some(created) = &model.created {
		writeln!(out, "created: {created}")?;
	}
	writeln!(out, "uri:     {}", model.uri)?;
	writeln!(out, "public:  {}", if model.is_public { "yes" } else { "no" })?;
	writeln!(out, "traits:")?;
	if model.traits.is_empty() {
		writeln!(out, "  (none)")?;
	}
	for line in &model.traits {
		writeln!(out, "  {line}")?;
	}
	writeln!(out, "remarks: {}", model.remarks)?;
	if view.is_owned_by(app.user()) {
		writeln!(out, "(you can edit or delete this record)")?;
	}
	Ok(())
}

/// Applies command-line record fields to `form`.
pub async fn fill<T, S>(app: &App<T, S>, form: &mut OccurrenceForm, record: &RecordArgs) -> anyhow::Result<()>
where
	T: Transport,
	S: SessionStorage,
{
	if let Some(text) = &record.taxon_search {
		form.search_taxon(app.index(), text).await;
		if !form.select_taxon(0) {
			bail!("no taxon matches '{text}'");
		}
	} else if let (Some(id), Some(label)) = (&record.taxon_id, &record.taxon_label) {
		form.set_taxon(TaxonRef::new(id.as_str(), label.as_str()));
	}

	for t in &record.traits {
		let composer = form.composer_mut();
		composer.predicate_mut().input(&t.predicate);
		composer.value_mut().input(&t.value);
		if !form.commit_trait() {
			debug!(predicate = %t.predicate, value = %t.value, "duplicate trait skipped");
		}
	}

	for t in &record.trait_searches {
		let composer = form.composer_mut();
		composer.search_predicate(app.index(), &t.predicate).await;
		composer.select_predicate(0);
		composer.search_value(app.index(), &t.value).await;
		composer.select_value(0);
		if !form.commit_trait() {
			debug!(predicate = %t.predicate, value = %t.value, "duplicate trait skipped");
		}
	}

	if let Some(remarks) = &record.remarks {
		form.set_remarks(remarks.as_str());
	}
	if let Some(is_public) = record.visibility() {
		form.set_public(is_public);
	}
	Ok(())
}

fn submit_error(outcome: SubmitOutcome) -> anyhow::Error {
	match outcome {
		SubmitOutcome::LoginRequired => anyhow!("login required"),
		SubmitOutcome::Invalid(error) => anyhow!("{error}; pass --taxon-id and --taxon-label or --taxon-search"),
		SubmitOutcome::Failed(message) => anyhow!(message),
		other => anyhow!("unexpected submission result: {other:?}"),
	}
}

fn password_or_prompt(password: Option<String>) -> anyhow::Result<String> {
	match password {
		Some(password) => Ok(password),
		None => prompt::read_line("Password: ").context("failed to read password"),
	}
}

#[cfg(test)]
mod tests;
