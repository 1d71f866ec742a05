use std::sync::Arc;

use bioc_app::{App, AppSettings, FormSettings};
use bioc_client::testing::RecordingTransport;
use bioc_client::{ApiClient, Method};
use bioc_search::testing::StaticIndex;
use bioc_search::{PREDICATE_INDEX, TAXON_INDEX, VALUE_INDEX};
use bioc_session::{MemoryStorage, SessionStorage, TOKEN_KEY, USER_KEY};
use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;
use crate::cli::TraitArg;

type TestApp = App<RecordingTransport, MemoryStorage>;

fn app(signed_in: bool) -> TestApp {
	let storage = MemoryStorage::new();
	if signed_in {
		storage
			.set(USER_KEY, r#"{"id":"u1","username":"saku","email":"saku@example.org"}"#)
			.unwrap();
		storage.set(TOKEN_KEY, "jwt-abc").unwrap();
	}
	let index = StaticIndex::new();
	index
		.insert(TAXON_INDEX, "ncbi:34844", "Tanuki")
		.insert(PREDICATE_INDEX, "dwc:sex", "sex")
		.insert(VALUE_INDEX, "PATO:0000383", "female");
	let settings = AppSettings {
		form: FormSettings {
			update_redirect_delay: std::time::Duration::ZERO,
			..FormSettings::default()
		},
		..AppSettings::default()
	};

	let mut app = App::new(ApiClient::new(RecordingTransport::new()), Arc::new(index), storage, settings);
	app.start();
	app
}

async fn exec(app: &mut TestApp, command: Command) -> (anyhow::Result<()>, String) {
	let mut out = Vec::new();
	let result = run(app, command, &mut out).await;
	(result, String::from_utf8(out).unwrap())
}

fn trait_arg(predicate: &str, value: &str) -> TraitArg {
	TraitArg {
		predicate: predicate.into(),
		value: value.into(),
	}
}

#[tokio::test]
async fn protected_command_without_session_reports_login_required() {
	let mut app = app(false);
	let (result, out) = exec(&mut app, Command::List {
		mine: false,
		query: None,
		taxon: None,
	})
	.await;

	assert_eq!(result.unwrap_err().to_string(), "login required");
	assert!(out.is_empty());
	assert!(app.api().transport().requests().is_empty());
}

#[tokio::test]
async fn login_when_signed_in_is_refused() {
	let mut app = app(true);
	let (result, _) = exec(&mut app, Command::Login {
		email: "saku@example.org".into(),
		password: Some("pw".into()),
	})
	.await;

	assert!(result.unwrap_err().to_string().starts_with("already logged in as saku"));
}

#[tokio::test]
async fn create_resolves_searched_terms() {
	let mut app = app(true);
	app.api()
		.transport()
		.respond(201, json!({ "message": "created", "id": "http://example.org/occ/n1" }));

	let record = RecordArgs {
		taxon_search: Some("tanu".into()),
		traits: vec![trait_arg("color", "brown"), trait_arg("color", "brown")],
		trait_searches: vec![trait_arg("sex", "fem")],
		remarks: Some("seen at dusk".into()),
		..RecordArgs::default()
	};
	let (result, out) = exec(&mut app, Command::Create(record)).await;
	result.unwrap();
	assert_eq!(out, "created n1\n");

	let sent = app.api().transport().last().unwrap();
	assert_eq!(sent.method, Method::Post);
	assert_eq!(
		sent.body.unwrap(),
		json!({
			"taxon_id": "ncbi:34844",
			"taxon_label": "Tanuki",
			"traits": [
				{ "predicate_id": "", "predicate_label": "color", "value_id": "", "value_label": "brown" },
				{ "predicate_id": "dwc:sex", "predicate_label": "sex", "value_id": "PATO:0000383", "value_label": "female" }
			],
			"remarks": "seen at dusk",
			"is_public": true
		})
	);
}

#[tokio::test]
async fn create_without_taxon_sends_nothing() {
	let mut app = app(true);
	let (result, _) = exec(&mut app, Command::Create(RecordArgs::default())).await;

	assert!(result.unwrap_err().to_string().contains("taxon"));
	assert!(app.api().transport().requests().is_empty());
}

#[tokio::test]
async fn list_marks_own_records() {
	let mut app = app(true);
	app.api().transport().respond(
		200,
		json!([
			{ "id": "http://example.org/occ/1", "taxon_label": "Tanuki", "owner_id": "u1" },
			{ "id": "http://example.org/occ/2", "taxon_label": "Vulpes vulpes", "remarks": "den", "owner_id": "u2" }
		]),
	);

	let (result, out) = exec(&mut app, Command::List {
		mine: false,
		query: None,
		taxon: None,
	})
	.await;
	result.unwrap();
	assert_eq!(out, "* 1  Tanuki  (no remarks)\n  2  Vulpes vulpes  den\n");
}

#[tokio::test]
async fn edit_replaces_fields_and_shows_record() {
	let mut app = app(true);
	let stored = json!({
		"id": "http://example.org/occ/abc",
		"taxon_id": "ncbi:34844",
		"taxon_label": "Tanuki",
		"remarks": "old",
		"traits": [{ "predicate_label": "color", "value_label": "brown" }],
		"owner_id": "u1",
		"owner_name": "saku"
	});
	app.api().transport().respond(200, stored.clone());
	app.api().transport().respond(200, json!({ "message": "updated" }));
	app.api().transport().respond(200, stored);

	let (result, out) = exec(&mut app, Command::Edit {
		id: "abc".into(),
		clear_traits: true,
		record: RecordArgs {
			remarks: Some("new".into()),
			private: true,
			..RecordArgs::default()
		},
	})
	.await;
	result.unwrap();

	let put = &app.api().transport().requests()[1];
	assert_eq!(put.path(), "/api/occurrences/abc");
	let body = put.body.clone().unwrap();
	assert_eq!(body["remarks"], "new");
	assert_eq!(body["traits"], json!([]));
	assert_eq!(body["is_public"], false);

	assert!(out.starts_with("updated abc\nTanuki\nowner:   saku\n"));
	assert!(out.ends_with("(you can edit or delete this record)\n"));
}

#[tokio::test]
async fn delete_with_yes_skips_prompt() {
	let mut app = app(true);
	app.api().transport().respond(200, json!({ "message": "deleted" }));

	let (result, out) = exec(&mut app, Command::Delete {
		id: "abc".into(),
		yes: true,
	})
	.await;
	result.unwrap();
	assert_eq!(out, "deleted abc\n");
	assert_eq!(app.api().transport().count(Method::Delete, "/api/occurrences/abc"), 1);
}

#[tokio::test]
async fn lookup_prints_candidates_or_hint() {
	let mut app = app(true);
	let (result, out) = exec(&mut app, Command::Lookup {
		kind: LookupKind::Taxon,
		text: "t".into(),
	})
	.await;
	result.unwrap();
	assert_eq!(out, "type at least 2 characters\n");

	let (result, out) = exec(&mut app, Command::Lookup {
		kind: LookupKind::Taxon,
		text: "tanu".into(),
	})
	.await;
	result.unwrap();
	assert_eq!(out, "ncbi:34844\tTanuki\t\n");
}

#[tokio::test]
async fn whoami_and_logout() {
	let mut app = app(true);
	let (result, out) = exec(&mut app, Command::Whoami).await;
	result.unwrap();
	assert_eq!(out, "username: saku\nemail:    saku@example.org\nid:       u1\n");

	let (result, out) = exec(&mut app, Command::Logout).await;
	result.unwrap();
	assert_eq!(out, "logged out\n");
	assert!(app.session().storage().snapshot().is_empty());

	let (result, _) = exec(&mut app, Command::Whoami).await;
	assert_eq!(result.unwrap_err().to_string(), "login required");
}
