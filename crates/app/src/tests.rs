use std::sync::Arc;
use std::time::{Duration, Instant};

use bioc_client::testing::RecordingTransport;
use bioc_client::{ApiClient, Method};
use bioc_model::{OccurrenceId, TaxonRef, Trait, User};
use bioc_search::TAXON_INDEX;
use bioc_search::testing::StaticIndex;
use bioc_session::{MemoryStorage, SessionStorage, TOKEN_KEY, USER_KEY};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

use super::*;

type TestApp = App<RecordingTransport, MemoryStorage>;

fn settings() -> AppSettings {
	AppSettings {
		form: FormSettings {
			update_redirect_delay: Duration::ZERO,
			..FormSettings::default()
		},
		..AppSettings::default()
	}
}

fn index() -> Arc<StaticIndex> {
	let index = StaticIndex::new();
	index
		.insert(TAXON_INDEX, "ncbi:34844", "Tanuki")
		.insert(TAXON_INDEX, "ncbi:9627", "Vulpes vulpes");
	Arc::new(index)
}

fn app_with(storage: MemoryStorage) -> TestApp {
	let mut app = App::new(ApiClient::new(RecordingTransport::new()), index(), storage, settings());
	app.start();
	app
}

fn signed_out() -> TestApp {
	app_with(MemoryStorage::new())
}

fn signed_in() -> TestApp {
	let storage = MemoryStorage::new();
	storage
		.set(USER_KEY, r#"{"id":"u1","username":"saku","email":"saku@example.org"}"#)
		.unwrap();
	storage.set(TOKEN_KEY, "jwt-abc").unwrap();
	app_with(storage)
}

fn record(id: &str, owner: &str) -> serde_json::Value {
	json!({
		"id": format!("http://example.org/occ/{id}"),
		"taxon_id": "ncbi:34844",
		"taxon_label": "Tanuki",
		"remarks": "",
		"traits": null,
		"owner_id": owner,
		"owner_name": owner,
		"created_at": "2025-06-01T18:30:00+09:00",
		"is_public": true
	})
}

fn transport(app: &TestApp) -> &RecordingTransport {
	app.api().transport()
}

#[rstest]
#[case("/", Route::Home)]
#[case("", Route::Home)]
#[case("/login", Route::Login)]
#[case("/register/", Route::Register)]
#[case("/occurrences", Route::Occurrences)]
#[case("/occurrences/detail?id=abc", Route::Detail("abc".into()))]
#[case("/occurrences/detail", Route::Detail(String::new()))]
#[case("/occurrences/edit?x=1&id=a%20b", Route::Edit("a b".into()))]
#[case("/create", Route::Create)]
#[case("/settings", Route::Settings)]
#[case("/admin", Route::NotFound("/admin".into()))]
fn routes_parse(#[case] raw: &str, #[case] expected: Route) {
	assert_eq!(Route::parse(raw), expected);
}

#[test]
fn route_paths_round_trip() {
	for route in [Route::Home, Route::Detail("1234-5678".into()), Route::Edit("a b".into()), Route::Settings] {
		assert_eq!(Route::parse(&route.path()), route);
	}
}

#[rstest]
#[case(AuthStatus::Loading, Route::Create, Gate::Placeholder)]
#[case(AuthStatus::Loading, Route::Login, Gate::Placeholder)]
#[case(AuthStatus::Unauthenticated, Route::Home, Gate::Redirect(Route::Login))]
#[case(AuthStatus::Unauthenticated, Route::Detail("x".into()), Gate::Redirect(Route::Login))]
#[case(AuthStatus::Unauthenticated, Route::NotFound("/x".into()), Gate::Redirect(Route::Login))]
#[case(AuthStatus::Unauthenticated, Route::Login, Gate::Render)]
#[case(AuthStatus::Unauthenticated, Route::Register, Gate::Render)]
#[case(AuthStatus::Authenticated, Route::Login, Gate::Redirect(Route::Home))]
#[case(AuthStatus::Authenticated, Route::Register, Gate::Redirect(Route::Home))]
#[case(AuthStatus::Authenticated, Route::Settings, Gate::Render)]
fn guard_rule(#[case] status: AuthStatus, #[case] route: Route, #[case] expected: Gate) {
	assert_eq!(RouteGuard::decide(status, &route), expected);
}

#[test]
fn guard_does_not_repeat_navigation_for_same_inputs() {
	let mut guard = RouteGuard::new();
	let first = guard.evaluate(AuthStatus::Unauthenticated, &Route::Create);
	let second = guard.evaluate(AuthStatus::Unauthenticated, &Route::Create);

	assert_eq!(first.navigate, Some(Route::Login));
	assert_eq!(second.gate, Gate::Redirect(Route::Login));
	assert_eq!(second.navigate, None);

	let other = guard.evaluate(AuthStatus::Unauthenticated, &Route::Settings);
	assert_eq!(other.navigate, Some(Route::Login));
}

#[test]
fn guard_waits_while_loading() {
	let mut guard = RouteGuard::new();
	let decision = guard.evaluate(AuthStatus::Loading, &Route::Create);
	assert_eq!(decision, Decision { gate: Gate::Placeholder, navigate: None });
}

#[test]
fn start_without_session_redirects_to_login() {
	let mut app = App::new(
		ApiClient::new(RecordingTransport::new()),
		index(),
		MemoryStorage::new(),
		settings(),
	);
	assert_eq!(app.check(), Gate::Placeholder);
	assert_eq!(app.route(), &Route::Home);

	assert_eq!(app.start(), Gate::Redirect(Route::Login));
	assert_eq!(app.route(), &Route::Login);
	assert_eq!(app.check(), Gate::Render);
	assert_eq!(app.router().history(), &[Route::Login]);
}

#[test]
fn protected_pages_redirect_once() {
	let mut app = signed_out();
	assert_eq!(app.open(Route::Create), Gate::Redirect(Route::Login));
	assert_eq!(app.route(), &Route::Login);
	assert_eq!(app.check(), Gate::Render);
	assert_eq!(app.route(), &Route::Login);
}

#[test]
fn signed_in_user_is_sent_home_from_login() {
	let mut app = signed_in();
	assert_eq!(app.route(), &Route::Home);
	assert_eq!(app.open(Route::Login), Gate::Redirect(Route::Home));
	assert_eq!(app.route(), &Route::Home);
}

#[tokio::test]
async fn login_goes_home_and_logout_goes_to_login() {
	let mut app = signed_out();
	transport(&app).respond(
		200,
		json!({ "user": { "id": "u1", "username": "saku", "email": "saku@example.org" }, "token": "jwt-abc" }),
	);

	let user = app.login("saku@example.org", "pw").await.unwrap();
	assert_eq!(user.username, "saku");
	assert_eq!(app.route(), &Route::Home);
	assert_eq!(app.header(), HeaderView::SignedIn { username: "saku".into() });

	app.logout();
	assert_eq!(app.route(), &Route::Login);
	assert!(!app.is_authenticated());
	assert!(app.session().storage().snapshot().is_empty());
	assert_eq!(app.header(), HeaderView::SignedOut);
}

#[tokio::test]
async fn failed_login_stays_on_login_page() {
	let mut app = signed_out();
	transport(&app).respond(401, json!({ "error": "invalid email or password" }));

	let err = app.login("saku@example.org", "bad").await.unwrap_err();
	assert_eq!(err.user_message(), "invalid email or password");
	assert_eq!(app.route(), &Route::Login);
}

#[tokio::test]
async fn register_goes_to_login_without_session() {
	let mut app = signed_out();
	app.open(Route::Register);
	transport(&app).respond(201, json!({ "message": "ok" }));

	app.register("saku", "saku@example.org", "longpassword").await.unwrap();
	assert_eq!(app.route(), &Route::Login);
	assert!(!app.is_authenticated());
}

#[tokio::test]
async fn create_flow_posts_payload_and_keeps_taxon() {
	let mut app = signed_in();
	app.open(Route::Create);
	transport(&app).respond(200, json!({ "message": "created", "id": "http://example.org/occ/new-1" }));

	let mut form = app.create_form();
	form.set_taxon(TaxonRef::new("ncbi:34844", "Tanuki"));
	form.set_remarks("seen at dusk");
	assert!(form.add_trait(Trait::free_text("color", "brown")));

	let outcome = app.submit(&mut form).await;
	assert_eq!(outcome, SubmitOutcome::Created(Some(OccurrenceId::new("http://example.org/occ/new-1"))));

	assert_eq!(transport(&app).count(Method::Post, "/api/occurrences"), 1);
	assert_eq!(transport(&app).requests().len(), 1);
	let sent = transport(&app).last().unwrap();
	assert_eq!(sent.bearer.as_ref().map(|c| c.as_str()), Some("jwt-abc"));
	assert_eq!(
		sent.body,
		Some(json!({
			"taxon_id": "ncbi:34844",
			"taxon_label": "Tanuki",
			"traits": [{ "predicate_id": "", "predicate_label": "color", "value_id": "", "value_label": "brown" }],
			"remarks": "seen at dusk",
			"is_public": true
		}))
	);

	assert_eq!(form.status(), &FormStatus::Success);
	assert_eq!(form.remarks(), "");
	assert!(form.traits().is_empty());
	assert_eq!(form.taxon(), &TaxonRef::new("ncbi:34844", "Tanuki"));
	assert_eq!(app.route(), &Route::Create);
}

#[test]
fn duplicate_traits_are_dropped() {
	let mut form = OccurrenceForm::create(&FormSettings::default());
	assert!(form.add_trait(Trait::free_text("color", "brown")));
	assert!(!form.add_trait(Trait {
		predicate_id: "dwc:color".into(),
		predicate_label: "color".into(),
		value_id: "PATO:0000952".into(),
		value_label: "brown".into(),
	}));
	assert_eq!(form.traits().len(), 1);

	assert_eq!(form.remove_trait(0), Some(Trait::free_text("color", "brown")));
	assert_eq!(form.remove_trait(0), None);
}

#[test]
fn composer_commits_into_trait_list() {
	let mut form = OccurrenceForm::create(&FormSettings::default());
	form.composer_mut().predicate_mut().input("color");
	form.composer_mut().value_mut().input("brown");
	assert!(form.commit_trait());

	form.composer_mut().predicate_mut().input("color");
	form.composer_mut().value_mut().input("brown");
	assert!(!form.commit_trait());
	assert_eq!(form.traits(), &[Trait::free_text("color", "brown")]);
}

#[tokio::test]
async fn taxon_search_selects_and_clears() {
	let app = signed_in();
	let mut form = app.create_form();

	form.search_taxon(app.index(), "tanu").await;
	assert_eq!(form.taxon_lookup().candidates().len(), 1);
	assert!(form.select_taxon(0));
	assert_eq!(form.taxon(), &TaxonRef::new("ncbi:34844", "Tanuki"));

	form.search_taxon(app.index(), "").await;
	assert_eq!(form.taxon(), &TaxonRef::default());
	assert_eq!(form.draft(), Err(FormError::MissingTaxon));
}

#[tokio::test]
async fn submit_without_credential_redirects_without_request() {
	let mut app = signed_out();
	let mut form = app.create_form();
	form.set_taxon(TaxonRef::new("ncbi:34844", "Tanuki"));

	assert_eq!(app.submit(&mut form).await, SubmitOutcome::LoginRequired);
	assert!(transport(&app).requests().is_empty());
	assert_eq!(app.route(), &Route::Login);
	assert_eq!(form.status(), &FormStatus::Idle);
}

#[tokio::test]
async fn submit_without_taxon_is_rejected_locally() {
	let mut app = signed_in();
	let mut form = app.create_form();

	assert_eq!(app.submit(&mut form).await, SubmitOutcome::Invalid(FormError::MissingTaxon));
	assert!(transport(&app).requests().is_empty());
	assert!(matches!(form.status(), FormStatus::Failed(_)));
}

#[tokio::test]
async fn failed_submit_is_generic_and_keeps_contents() {
	let mut app = signed_in();
	transport(&app).respond(500, json!({ "error": "db down" }));
	let mut form = app.create_form();
	form.set_taxon(TaxonRef::new("ncbi:34844", "Tanuki"));
	form.set_remarks("seen at dusk");

	assert_eq!(app.submit(&mut form).await, SubmitOutcome::Failed(SUBMIT_FAILED.into()));
	assert_eq!(form.status(), &FormStatus::Failed(SUBMIT_FAILED.into()));
	assert_eq!(form.remarks(), "seen at dusk");
}

#[tokio::test]
async fn edit_prefills_and_update_redirects_to_detail() {
	let mut app = signed_in();
	let mut stored = record("abc", "u1");
	stored["remarks"] = json!("old notes");
	stored["traits"] = json!([{ "predicate_label": "sex", "value_label": "female" }]);
	stored["is_public"] = json!(false);
	transport(&app).respond(200, stored);
	transport(&app).respond(200, json!({ "message": "updated" }));

	let mut form = app.edit_form("abc").await.unwrap();
	assert_eq!(form.mode(), &FormMode::Edit("abc".into()));
	assert_eq!(form.taxon(), &TaxonRef::new("ncbi:34844", "Tanuki"));
	assert_eq!(form.taxon_lookup().text(), "Tanuki");
	assert_eq!(form.traits(), &[Trait::free_text("sex", "female")]);
	assert_eq!(form.remarks(), "old notes");
	assert!(!form.is_public());

	form.set_remarks("new notes");
	let outcome = app.submit(&mut form).await;
	assert_eq!(
		outcome,
		SubmitOutcome::Updated {
			redirect: Route::Detail("abc".into()),
			after: Duration::ZERO
		}
	);
	assert_eq!(transport(&app).count(Method::Put, "/api/occurrences/abc"), 1);
	assert_eq!(transport(&app).last().unwrap().body.unwrap()["remarks"], "new notes");
	assert_eq!(app.route(), &Route::Detail("abc".into()));
	assert_eq!(form.remarks(), "new notes");
}

#[tokio::test]
async fn edit_of_missing_record_reports_load_failure() {
	let app = signed_in();
	transport(&app).respond(404, json!({ "error": "not found" }));

	assert!(matches!(app.edit_form("gone").await, Err(LoadState::Failed(_))));
}

#[tokio::test]
async fn delete_without_credential_redirects_without_request() {
	let mut app = signed_out();
	let view = DetailView::new("abc");
	let asked = std::cell::Cell::new(false);
	let confirm = |_: &str| {
		asked.set(true);
		true
	};

	assert_eq!(app.delete(&view, &confirm).await, DeleteOutcome::LoginRequired);
	assert_eq!(transport(&app).count(Method::Delete, "/api/occurrences/abc"), 0);
	assert!(!asked.get());
	assert_eq!(app.route(), &Route::Login);
}

#[tokio::test]
async fn declined_delete_sends_nothing() {
	let mut app = signed_in();
	let view = DetailView::new("abc");

	assert_eq!(app.delete(&view, &|_: &str| false).await, DeleteOutcome::Cancelled);
	assert!(transport(&app).requests().is_empty());
}

#[tokio::test]
async fn delete_distinguishes_unauthorized() {
	let mut app = signed_in();
	transport(&app).respond(401, json!({ "error": "Unauthorized" }));
	transport(&app).respond(500, json!({}));
	let view = DetailView::new("abc");

	assert_eq!(
		app.delete(&view, &|_: &str| true).await,
		DeleteOutcome::Failed("Authentication expired. Please log in again.".into())
	);
	assert_eq!(
		app.delete(&view, &|prompt: &str| prompt == DELETE_PROMPT).await,
		DeleteOutcome::Failed(DELETE_FAILED.into())
	);
}

#[tokio::test]
async fn delete_success_returns_to_list() {
	let mut app = signed_in();
	app.open(Route::Detail("abc".into()));
	transport(&app).respond(204, json!(null));
	let view = DetailView::new("abc");

	assert_eq!(app.delete(&view, &|_: &str| true).await, DeleteOutcome::Deleted);
	let sent = transport(&app).last().unwrap();
	assert_eq!(sent.method, Method::Delete);
	assert_eq!(sent.path(), "/api/occurrences/abc");
	assert_eq!(app.route(), &Route::Occurrences);
}

#[tokio::test]
async fn detail_renders_placeholders() {
	let app = signed_in();
	transport(&app).respond(200, record("abc", ""));

	let view = app.detail("abc").await;
	assert_eq!(view.state(), &LoadState::Loaded);
	let model = DetailModel::new(view.record().unwrap());
	assert_eq!(model.title, "Tanuki");
	assert_eq!(model.owner, "unknown");
	assert_eq!(model.created.as_deref(), Some("2025-06-01 18:30 +09:00"));
	assert_eq!(model.uri, "http://example.org/occ/abc");
	assert!(model.traits.is_empty());
	assert_eq!(model.remarks, "(none)");
	assert!(!view.is_owned_by(app.user()));
}

#[tokio::test]
async fn detail_without_id_does_not_fetch() {
	let app = signed_in();
	let view = app.detail("").await;
	assert!(matches!(view.state(), LoadState::Failed(_)));
	assert!(transport(&app).requests().is_empty());
}

#[tokio::test]
async fn list_fetches_collection_and_filters_mine() {
	let app = signed_in();
	transport(&app).respond(200, json!([record("1", "u1"), record("2", "u2")]));

	let mut view = app.list("", None, false).await;
	assert_eq!(transport(&app).count(Method::Get, "/api/occurrences"), 1);
	assert_eq!(transport(&app).last().unwrap().bearer.map(|c| c.as_str().to_string()), Some("jwt-abc".into()));
	assert_eq!(view.rows(app.user()).len(), 2);

	view.set_mine_only(true);
	let rows = view.rows(app.user());
	assert_eq!(
		rows,
		vec![ListRow {
			short_id: "1".into(),
			taxon_label: "Tanuki".into(),
			remarks: "(no remarks)".into(),
			owner_name: "u1".into(),
			mine: true,
		}]
	);
	assert_eq!(view.visible(None).count(), 0);
}

#[tokio::test]
async fn list_uses_search_when_query_or_taxon_set() {
	let app = signed_in();
	transport(&app).respond(200, json!(null));
	transport(&app).respond(200, json!([]));

	let view = app.list("brown", None, false).await;
	assert_eq!(view.state(), &LoadState::Loaded);
	app.list("", Some("ncbi:34844".into()), false).await;

	let requests = transport(&app).requests();
	assert_eq!(requests[0].path(), "/api/search");
	assert_eq!(requests[0].query, vec![("q".to_string(), "brown".to_string())]);
	assert_eq!(
		requests[1].query,
		vec![
			("q".to_string(), String::new()),
			("taxon".to_string(), "ncbi:34844".to_string())
		]
	);
}

#[tokio::test]
async fn list_search_is_debounced() {
	let app = signed_in();
	transport(&app).respond(200, json!([record("1", "u1")]));

	let mut view = ListView::new(Duration::from_millis(300));
	let start = Instant::now();
	view.type_query("a", start);
	view.type_query("ab", start + Duration::from_millis(100));
	view.type_query("abc", start + Duration::from_millis(200));
	assert_eq!(view.input(), "abc");

	assert!(!view.poll(start + Duration::from_millis(400)));
	assert!(view.poll(start + Duration::from_millis(500)));
	view.refresh(app.api(), app.credential()).await;
	assert!(!view.poll(start + Duration::from_millis(1000)));

	let requests = transport(&app).requests();
	assert_eq!(requests.len(), 1);
	assert_eq!(requests[0].query, vec![("q".to_string(), "abc".to_string())]);
	assert_eq!(view.records().len(), 1);
}

#[tokio::test]
async fn list_failure_is_reported() {
	let app = signed_out();
	transport(&app).fail("connection refused");

	let view = app.list("", None, false).await;
	assert_eq!(view.state(), &LoadState::Failed(LOAD_FAILED.into()));
	assert!(view.records().is_empty());
}

#[test]
fn profile_requires_user() {
	let app = signed_in();
	assert_eq!(
		app.profile(),
		Some(ProfileView {
			username: "saku".into(),
			email: "saku@example.org".into(),
			user_id: "u1".into(),
		})
	);
	assert_eq!(ProfileView::new(None::<&User>), None);
	assert!(signed_out().profile().is_none());
}

#[test]
fn settings_follow_config() {
	let config = bioc_config::Config::parse("[list]\ndebounce_ms = 50\n[search]\nlimit = 5\n").unwrap();
	let settings = AppSettings::from(&config);
	assert_eq!(settings.list_debounce, Duration::from_millis(50));
	assert_eq!(settings.form.search_limit, 5);
	assert_eq!(settings.form.update_redirect_delay, Duration::from_millis(1500));
}
