//! Client routes and their textual paths.

use std::fmt;

use url::form_urlencoded;

/// Page the client can show.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
	/// `/`
	Home,
	/// `/login`
	Login,
	/// `/register`
	Register,
	/// `/occurrences`
	Occurrences,
	/// `/occurrences/detail?id=`
	Detail(String),
	/// `/occurrences/edit?id=`
	Edit(String),
	/// `/create`
	Create,
	/// `/settings`
	Settings,
	/// Anything else. Still protected by the guard.
	NotFound(String),
}

impl Route {
	/// Parses a path with an optional query string.
	///
	/// A missing `id` parameter yields an empty id, which the detail and edit
	/// views report as "no record selected".
	pub fn parse(raw: &str) -> Self {
		let (path, query) = raw.split_once('?').unwrap_or((raw, ""));
		let path = match path.trim_end_matches('/') {
			"" => "/",
			trimmed => trimmed,
		};
		let id = || {
			form_urlencoded::parse(query.as_bytes())
				.find(|(key, _)| key == "id")
				.map(|(_, value)| value.into_owned())
				.unwrap_or_default()
		};

		match path {
			"/" => Self::Home,
			"/login" => Self::Login,
			"/register" => Self::Register,
			"/occurrences" => Self::Occurrences,
			"/occurrences/detail" => Self::Detail(id()),
			"/occurrences/edit" => Self::Edit(id()),
			"/create" => Self::Create,
			"/settings" => Self::Settings,
			_ => Self::NotFound(raw.to_string()),
		}
	}

	/// Returns true for pages reachable without a session.
	pub fn is_public(&self) -> bool {
		matches!(self, Self::Login | Self::Register)
	}

	/// Path including the query string.
	pub fn path(&self) -> String {
		let with_id = |base: &str, id: &str| {
			let query: String = form_urlencoded::Serializer::new(String::new())
				.append_pair("id", id)
				.finish();
			format!("{base}?{query}")
		};

		match self {
			Self::Home => "/".into(),
			Self::Login => "/login".into(),
			Self::Register => "/register".into(),
			Self::Occurrences => "/occurrences".into(),
			Self::Detail(id) => with_id("/occurrences/detail", id),
			Self::Edit(id) => with_id("/occurrences/edit", id),
			Self::Create => "/create".into(),
			Self::Settings => "/settings".into(),
			Self::NotFound(raw) => raw.clone(),
		}
	}
}

impl fmt::Display for Route {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.path())
	}
}
