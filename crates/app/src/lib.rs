//! Headless occurrence catalog client.
//!
//! Pages are plain state holders driven by the caller: [`ListView`],
//! [`DetailView`], [`OccurrenceForm`], [`ProfileView`] and [`HeaderView`].
//! They never navigate on their own; operations return outcomes and [`App`]
//! turns those into route changes, re-running the [`RouteGuard`] after each one.

#![warn(missing_docs)]

mod app;
mod detail;
mod form;
mod guard;
mod list;
mod profile;
mod route;
mod router;

pub use app::{App, AppSettings};
pub use detail::{
	Confirm, DELETE_FAILED, DELETE_LOGIN_REQUIRED, DELETE_PROMPT, DeleteOutcome, DetailModel, DetailView,
};
pub use form::{FormError, FormMode, FormSettings, FormStatus, OccurrenceForm, SUBMIT_FAILED, SubmitOutcome};
pub use guard::{AuthStatus, Decision, Gate, RouteGuard};
pub use list::{LOAD_FAILED, ListRow, ListView, LoadState};
pub use profile::{HeaderView, ProfileView};
pub use route::Route;
pub use router::Router;

#[cfg(test)]
mod tests;
