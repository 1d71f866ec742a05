//! Typed operations over the occurrence and authentication endpoints.

use std::time::Duration;

use bioc_model::{Credential, Occurrence, OccurrenceDraft, OccurrenceId};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{ApiError, Result};
use crate::schema::{CreatedResponse, ErrorBody, LoginRequest, LoginResponse, RegisterRequest};
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};

const LOGIN_FALLBACK: &str = "Login failed.";
const REGISTER_FALLBACK: &str = "Registration failed.";

/// Client for the remote occurrence API.
///
/// Each call builds one request, sends it through the transport and decodes the
/// response defensively. Nothing is retried.
#[derive(Debug, Clone)]
pub struct ApiClient<T = HttpTransport> {
	transport: T,
}

impl ApiClient<HttpTransport> {
	/// Creates a client talking HTTP to `base_url`.
	pub fn http(base_url: &str, timeout: Duration) -> Result<Self> {
		Ok(Self::new(HttpTransport::new(base_url, timeout)?))
	}
}

impl<T: Transport> ApiClient<T> {
	/// Wraps a transport.
	pub fn new(transport: T) -> Self {
		Self { transport }
	}

	/// Returns the underlying transport.
	pub fn transport(&self) -> &T {
		&self.transport
	}

	/// `POST /api/auth/login`.
	///
	/// A non-success status becomes [`ApiError::Rejected`] carrying the server's
	/// reason, or a generic fallback when the body has none.
	pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
		let request = ApiRequest::new(Method::Post, ["api", "auth", "login"])
			.with_body(to_json(&LoginRequest { email, password })?);
		let response = self.transport.send(request).await?;
		if !response.is_success() {
			return Err(rejected(&response, LOGIN_FALLBACK));
		}

		let login: LoginResponse = decode(&response)?;
		if login.token.is_empty() {
			return Err(ApiError::Decode("login response carried an empty token".into()));
		}
		Ok(login)
	}

	/// `POST /api/auth/register`. The success body is not inspected.
	pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<()> {
		let request = ApiRequest::new(Method::Post, ["api", "auth", "register"]).with_body(to_json(
			&RegisterRequest {
				username,
				email,
				password,
			},
		)?);
		let response = self.transport.send(request).await?;
		if !response.is_success() {
			return Err(rejected(&response, REGISTER_FALLBACK));
		}
		Ok(())
	}

	/// `GET /api/occurrences`.
	///
	/// The credential is optional; when present the server annotates ownership and
	/// includes the caller's private records.
	pub async fn list(&self, bearer: Option<&Credential>) -> Result<Vec<Occurrence>> {
		let request = ApiRequest::new(Method::Get, ["api", "occurrences"]).with_bearer(bearer);
		let response = self.transport.send(request).await?;
		read_collection(&response)
	}

	/// `GET /api/search?q=<text>`, optionally narrowed to a taxon.
	pub async fn search(
		&self,
		query: &str,
		taxon: Option<&str>,
		bearer: Option<&Credential>,
	) -> Result<Vec<Occurrence>> {
		let mut request = ApiRequest::new(Method::Get, ["api", "search"])
			.with_query("q", query)
			.with_bearer(bearer);
		if let Some(taxon) = taxon.filter(|t| !t.is_empty()) {
			request = request.with_query("taxon", taxon);
		}
		let response = self.transport.send(request).await?;
		read_collection(&response)
	}

	/// `GET /api/occurrences/{id}`.
	pub async fn get(&self, id: &str) -> Result<Occurrence> {
		let request = ApiRequest::new(Method::Get, ["api", "occurrences", id]);
		let response = self.transport.send(request).await?;
		if !response.is_success() {
			return Err(ApiError::Status {
				status: response.status,
			});
		}
		decode(&response)
	}

	/// `POST /api/occurrences`. Returns the new id when the server reports it.
	pub async fn create(&self, draft: &OccurrenceDraft, bearer: &Credential) -> Result<Option<OccurrenceId>> {
		let request = ApiRequest::new(Method::Post, ["api", "occurrences"])
			.with_bearer(Some(bearer))
			.with_body(to_json(draft)?);
		let response = self.transport.send(request).await?;
		check_mutation(&response)?;

		let created = serde_json::from_slice::<CreatedResponse>(&response.body).unwrap_or_default();
		debug!(id = ?created.id, "occurrence created");
		Ok(created.id)
	}

	/// `PUT /api/occurrences/{id}` with full-replace semantics.
	pub async fn update(&self, id: &str, draft: &OccurrenceDraft, bearer: &Credential) -> Result<()> {
		let request = ApiRequest::new(Method::Put, ["api", "occurrences", id])
			.with_bearer(Some(bearer))
			.with_body(to_json(draft)?);
		let response = self.transport.send(request).await?;
		check_mutation(&response)
	}

	/// `DELETE /api/occurrences/{id}`.
	pub async fn delete(&self, id: &str, bearer: &Credential) -> Result<()> {
		let request = ApiRequest::new(Method::Delete, ["api", "occurrences", id]).with_bearer(Some(bearer));
		let response = self.transport.send(request).await?;
		check_mutation(&response)
	}
}

fn to_json<B: Serialize>(body: &B) -> Result<serde_json::Value> {
	serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn decode<D: DeserializeOwned>(response: &ApiResponse) -> Result<D> {
	serde_json::from_slice(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Collection endpoints answer `null` instead of `[]` when empty.
fn read_collection(response: &ApiResponse) -> Result<Vec<Occurrence>> {
	if !response.is_success() {
		warn!(status = response.status, "collection request failed");
		return Err(ApiError::Status {
			status: response.status,
		});
	}
	Ok(decode::<Option<Vec<Occurrence>>>(response)?.unwrap_or_default())
}

fn rejected(response: &ApiResponse, fallback: &str) -> ApiError {
	let message = serde_json::from_slice::<ErrorBody>(&response.body)
		.ok()
		.and_then(|body| body.error)
		.filter(|m| !m.trim().is_empty())
		.unwrap_or_else(|| fallback.to_string());
	warn!(status = response.status, %message, "authentication request rejected");
	ApiError::Rejected {
		status: response.status,
		message,
	}
}

fn check_mutation(response: &ApiResponse) -> Result<()> {
	match response.status {
		_ if response.is_success() => Ok(()),
		401 => Err(ApiError::Unauthorized),
		status => {
			warn!(status, "mutation failed");
			Err(ApiError::Status { status })
		}
	}
}
