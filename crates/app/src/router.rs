//! Navigation history.

use tracing::debug;

use crate::route::Route;

/// Stack of visited routes. Never empty.
#[derive(Debug, Clone)]
pub struct Router {
	history: Vec<Route>,
}

impl Default for Router {
	fn default() -> Self {
		Self::new(Route::Home)
	}
}

impl Router {
	/// Starts at `initial`.
	pub fn new(initial: Route) -> Self {
		Self { history: vec![initial] }
	}

	/// Current route.
	pub fn current(&self) -> &Route {
		// never empty: `replace` pushes back whenever it pops the last entry
		&self.history[self.history.len() - 1]
	}

	/// Pushes `route` unless it is already current.
	pub fn navigate(&mut self, route: Route) {
		if *self.current() != route {
			debug!(to = %route, "navigate");
			self.history.push(route);
		}
	}

	/// Replaces the current route. If the previous entry already is `route`,
	/// the current entry is dropped instead.
	pub fn replace(&mut self, route: Route) {
		debug!(to = %route, "redirect");
		self.history.pop();
		if self.history.last() != Some(&route) {
			self.history.push(route);
		}
	}

	/// Every visited route, oldest first.
	pub fn history(&self) -> &[Route] {
		&self.history
	}
}
