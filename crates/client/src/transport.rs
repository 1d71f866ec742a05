//! Transport seam between request building and the network.
//!
//! [`ApiClient`](crate::ApiClient) only builds [`ApiRequest`] values and interprets
//! [`ApiResponse`] values. Everything that touches sockets lives behind
//! [`Transport`], so tests can substitute an in-process fake.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bioc_model::Credential;
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use tracing::debug;
use url::Url;

use crate::error::{ApiError, Result};

/// HTTP method subset used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
	/// `GET`
	Get,
	/// `POST`
	Post,
	/// `PUT`
	Put,
	/// `DELETE`
	Delete,
}

impl Method {
	/// Upper-case method name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Get => "GET",
			Self::Post => "POST",
			Self::Put => "PUT",
			Self::Delete => "DELETE",
		}
	}
}

/// Request description, independent of any HTTP library.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: Method,
	/// Unencoded path segments below the base URL.
	pub segments: Vec<String>,
	/// Query string parameters.
	pub query: Vec<(String, String)>,
	/// Bearer credential for the `Authorization` header.
	pub bearer: Option<Credential>,
	/// JSON body.
	pub body: Option<serde_json::Value>,
}

impl ApiRequest {
	/// Creates a request for `segments` with no query, credential or body.
	pub fn new<I, S>(method: Method, segments: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			method,
			segments: segments.into_iter().map(Into::into).collect(),
			query: Vec::new(),
			bearer: None,
			body: None,
		}
	}

	/// Adds a query parameter.
	#[must_use]
	pub fn with_query(mut self, key: &str, value: impl Into<String>) -> Self {
		self.query.push((key.to_string(), value.into()));
		self
	}

	/// Attaches a bearer credential when one is given.
	#[must_use]
	pub fn with_bearer(mut self, bearer: Option<&Credential>) -> Self {
		self.bearer = bearer.cloned();
		self
	}

	/// Attaches a JSON body.
	#[must_use]
	pub fn with_body(mut self, body: serde_json::Value) -> Self {
		self.body = Some(body);
		self
	}

	/// Slash-joined path, e.g. `/api/occurrences/abc`.
	pub fn path(&self) -> String {
		format!("/{}", self.segments.join("/"))
	}
}

/// Raw response: status and undecoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body bytes.
	pub body: Vec<u8>,
}

impl ApiResponse {
	/// Returns true for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Sends requests to the remote API.
///
/// Implementations report only transport-level failures as errors; non-success
/// statuses come back as ordinary [`ApiResponse`] values.
#[async_trait]
pub trait Transport: Send + Sync {
	/// Performs one request.
	async fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
	async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
		(**self).send(request).await
	}
}

/// reqwest-backed transport rooted at a base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
	client: Client,
	base: Url,
}

impl HttpTransport {
	/// Creates a transport for `base_url` with a per-request timeout.
	pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
		let base = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
		if base.cannot_be_a_base() {
			return Err(ApiError::InvalidUrl(base_url.to_string()));
		}

		let client = Client::builder()
			.timeout(timeout)
			.build()
			.map_err(|e| ApiError::Network(e.to_string()))?;

		Ok(Self { client, base })
	}

	/// Base URL every request path is appended to.
	pub fn base(&self) -> &Url {
		&self.base
	}

	pub(crate) fn url_for(&self, request: &ApiRequest) -> Result<Url> {
		let mut url = self.base.clone();
		url.path_segments_mut()
			.map_err(|()| ApiError::InvalidUrl(self.base.to_string()))?
			.pop_if_empty()
			.extend(&request.segments);
		if !request.query.is_empty() {
			url.query_pairs_mut().extend_pairs(&request.query);
		}
		Ok(url)
	}
}

#[async_trait]
impl Transport for HttpTransport {
	async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
		let url = self.url_for(&request)?;
		debug!(method = request.method.as_str(), %url, authorized = request.bearer.is_some(), "sending request");

		let mut builder = match request.method {
			Method::Get => self.client.get(url),
			Method::Post => self.client.post(url),
			Method::Put => self.client.put(url),
			Method::Delete => self.client.delete(url),
		};
		if let Some(bearer) = &request.bearer {
			builder = builder.header(AUTHORIZATION, bearer.bearer_header());
		}
		if let Some(body) = &request.body {
			builder = builder.json(body);
		}

		let response = builder.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
		let status = response.status().as_u16();
		let body = response
			.bytes()
			.await
			.map_err(|e| ApiError::Network(e.to_string()))?
			.to_vec();

		Ok(ApiResponse { status, body })
	}
}
