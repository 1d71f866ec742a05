//! Orchestrator: owns the session, router and guard and applies the
//! navigation that page operations ask for.

use std::sync::Arc;
use std::time::Duration;

use bioc_client::{ApiClient, Transport};
use bioc_config::Config;
use bioc_model::{Credential, User};
use bioc_search::SearchIndex;
use bioc_session::{SessionError, SessionState, SessionStorage, SessionStore};
use tracing::debug;

use crate::detail::{Confirm, DeleteOutcome, DetailView};
use crate::form::{FormSettings, OccurrenceForm, SubmitOutcome};
use crate::guard::{AuthStatus, Gate, RouteGuard};
use crate::list::{LoadState, ListView};
use crate::profile::{HeaderView, ProfileView};
use crate::route::Route;
use crate::router::Router;

/// Tuning shared by the pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
	/// Form widget settings.
	pub form: FormSettings,
	/// Quiet period before a list search.
	pub list_debounce: Duration,
}

impl Default for AppSettings {
	fn default() -> Self {
		Self {
			form: FormSettings::default(),
			list_debounce: bioc_search::DEFAULT_DEBOUNCE,
		}
	}
}

impl From<&Config> for AppSettings {
	fn from(config: &Config) -> Self {
		Self {
			form: FormSettings {
				search_limit: config.search.limit,
				taxon_min_chars: config.search.taxon_min_chars,
				trait_min_chars: config.search.trait_min_chars,
				update_redirect_delay: config.form.update_redirect_delay(),
			},
			list_debounce: config.list.debounce(),
		}
	}
}

/// The client: API, search index, session and navigation.
pub struct App<T, S> {
	api: ApiClient<T>,
	index: Arc<dyn SearchIndex>,
	session: SessionStore<S>,
	router: Router,
	guard: RouteGuard,
	settings: AppSettings,
}

impl<T: Transport, S: SessionStorage> App<T, S> {
	/// Creates a client at the home route with the session still loading.
	pub fn new(api: ApiClient<T>, index: Arc<dyn SearchIndex>, storage: S, settings: AppSettings) -> Self {
		Self {
			api,
			index,
			session: SessionStore::new(storage),
			router: Router::default(),
			guard: RouteGuard::new(),
			settings,
		}
	}

	/// Restores the persisted session and gates the current route.
	pub fn start(&mut self) -> Gate {
		self.session.restore();
		self.check()
	}

	/// API client.
	pub fn api(&self) -> &ApiClient<T> {
		&self.api
	}

	/// Search index.
	pub fn index(&self) -> &dyn SearchIndex {
		self.index.as_ref()
	}

	/// Session store.
	pub fn session(&self) -> &SessionStore<S> {
		&self.session
	}

	/// Router.
	pub fn router(&self) -> &Router {
		&self.router
	}

	/// Current route.
	pub fn route(&self) -> &Route {
		self.router.current()
	}

	/// Page settings.
	pub fn settings(&self) -> &AppSettings {
		&self.settings
	}

	/// Signed-in user.
	pub fn user(&self) -> Option<&User> {
		self.session.user()
	}

	/// Bearer credential.
	pub fn credential(&self) -> Option<&Credential> {
		self.session.credential()
	}

	/// Navigates to `route` and returns the guard's verdict for it.
	///
	/// A redirect verdict has already been followed when this returns.
	pub fn open(&mut self, route: Route) -> Gate {
		self.router.navigate(route);
		self.check()
	}

	/// Evaluates the guard for the current route, following a redirect once.
	pub fn check(&mut self) -> Gate {
		let status = AuthStatus::of(self.session.state());
		let decision = self.guard.evaluate(status, self.router.current());
		if let Some(target) = decision.navigate {
			debug!(from = %self.router.current(), to = %target, "guard redirect");
			self.router.replace(target);
			self.guard.evaluate(status, self.router.current());
		}
		decision.gate
	}

	/// Signs in and goes home.
	pub async fn login(&mut self, email: &str, password: &str) -> Result<User, SessionError> {
		let user = self.session.login(&self.api, email, password).await?;
		self.open(Route::Home);
		Ok(user)
	}

	/// Creates an account and goes to the login page.
	pub async fn register(&mut self, username: &str, email: &str, password: &str) -> Result<(), SessionError> {
		self.session.register(&self.api, username, email, password).await?;
		self.open(Route::Login);
		Ok(())
	}

	/// Signs out and goes to the login page.
	pub fn logout(&mut self) {
		self.session.logout();
		self.open(Route::Login);
	}

	/// Whether the session has been restored and is signed in.
	pub fn is_authenticated(&self) -> bool {
		matches!(self.session.state(), SessionState::Ready(Some(_)))
	}

	/// Fresh list page, already loaded.
	pub async fn list(&self, query: &str, taxon: Option<String>, mine_only: bool) -> ListView {
		let mut view = ListView::new(self.settings.list_debounce);
		view.set_query(query);
		view.set_taxon_filter(taxon);
		view.set_mine_only(mine_only);
		view.refresh(&self.api, self.credential()).await;
		view
	}

	/// Detail page for `id`, already loaded.
	pub async fn detail(&self, id: &str) -> DetailView {
		let mut view = DetailView::new(id);
		view.load(&self.api).await;
		view
	}

	/// Empty create form.
	pub fn create_form(&self) -> OccurrenceForm {
		OccurrenceForm::create(&self.settings.form)
	}

	/// Edit form pre-filled from the stored record.
	pub async fn edit_form(&self, id: &str) -> Result<OccurrenceForm, LoadState> {
		let view = self.detail(id).await;
		match view.record() {
			Some(record) => Ok(OccurrenceForm::edit(id, record, &self.settings.form)),
			None => Err(view.state().clone()),
		}
	}

	/// Submits `form` and follows the resulting navigation.
	///
	/// After an update the redirect delay is slept before navigating.
	pub async fn submit(&mut self, form: &mut OccurrenceForm) -> SubmitOutcome {
		let outcome = form.submit(&self.api, self.session.credential()).await;
		match &outcome {
			SubmitOutcome::LoginRequired => {
				self.open(Route::Login);
			}
			SubmitOutcome::Updated { redirect, after } => {
				tokio::time::sleep(*after).await;
				self.open(redirect.clone());
			}
			_ => {}
		}
		outcome
	}

	/// Deletes the record shown by `view` and follows the resulting navigation.
	pub async fn delete(&mut self, view: &DetailView, confirm: &dyn Confirm) -> DeleteOutcome {
		let outcome = view.delete(&self.api, self.session.credential(), confirm).await;
		match outcome {
			DeleteOutcome::LoginRequired => {
				self.open(Route::Login);
			}
			DeleteOutcome::Deleted => {
				self.open(Route::Occurrences);
			}
			_ => {}
		}
		outcome
	}

	/// Settings page contents.
	pub fn profile(&self) -> Option<ProfileView> {
		ProfileView::new(self.user())
	}

	/// Header bar contents.
	pub fn header(&self) -> HeaderView {
		HeaderView::new(self.user())
	}
}
