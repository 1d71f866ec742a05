//! Route guard: decides whether a page may render for the current session.

use bioc_session::SessionState;

use crate::route::Route;

/// Session status as the guard sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthStatus {
	/// Persisted state not yet restored.
	Loading,
	/// A session is present.
	Authenticated,
	/// Restore finished without a session.
	Unauthenticated,
}

impl AuthStatus {
	/// Classifies a session state.
	pub fn of(state: &SessionState) -> Self {
		match state {
			SessionState::Loading => Self::Loading,
			SessionState::Ready(Some(_)) => Self::Authenticated,
			SessionState::Ready(None) => Self::Unauthenticated,
		}
	}
}

/// What to show for a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
	/// Nothing yet; session still loading.
	Placeholder,
	/// Leave for the given route instead of rendering.
	Redirect(Route),
	/// Render the page.
	Render,
}

/// Result of one guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
	/// What to show.
	pub gate: Gate,
	/// Navigation to perform now, only set when the inputs changed.
	pub navigate: Option<Route>,
}

/// Remembers its last inputs so repeated evaluation does not repeat navigation.
#[derive(Debug, Clone, Default)]
pub struct RouteGuard {
	last: Option<(AuthStatus, Route)>,
}

impl RouteGuard {
	/// Creates a guard with no history.
	pub fn new() -> Self {
		Self::default()
	}

	/// Pure transition rule.
	pub fn decide(status: AuthStatus, route: &Route) -> Gate {
		match status {
			AuthStatus::Loading => Gate::Placeholder,
			AuthStatus::Unauthenticated if !route.is_public() => Gate::Redirect(Route::Login),
			AuthStatus::Authenticated if route.is_public() => Gate::Redirect(Route::Home),
			_ => Gate::Render,
		}
	}

	/// Evaluates `route` under `status`.
	pub fn evaluate(&mut self, status: AuthStatus, route: &Route) -> Decision {
		let gate = Self::decide(status, route);
		let changed = self
			.last
			.as_ref()
			.is_none_or(|(last_status, last_route)| *last_status != status || last_route != route);
		if changed {
			self.last = Some((status, route.clone()));
		}

		let navigate = match &gate {
			Gate::Redirect(target) if changed => Some(target.clone()),
			_ => None,
		};
		Decision { gate, navigate }
	}
}
