//! HTTP client for the occurrence catalog API.
//!
//! Covers the authentication endpoints and occurrence CRUD/search:
//!
//! * `POST /api/auth/login`, `POST /api/auth/register`
//! * `GET /api/occurrences`, `GET /api/search?q=`, `GET /api/occurrences/{id}`
//! * `POST /api/occurrences`, `PUT /api/occurrences/{id}`, `DELETE /api/occurrences/{id}`
//!
//! Responses are decoded into explicit schemas at the boundary and failures are
//! classified into [`ApiError`] so callers can tell a rejected login from an
//! expired credential from a generic failure.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use bioc_client::ApiClient;
//!
//! let api = ApiClient::http("http://localhost:8080", Duration::from_secs(30))?;
//! let login = api.login("user@example.org", "hunter22").await?;
//! let records = api.list(Some(&login.token)).await?;
//! ```

#![warn(missing_docs)]

mod client;
mod error;
mod schema;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
mod transport;

pub use client::ApiClient;
pub use error::{ApiError, Result};
pub use schema::{CreatedResponse, LoginRequest, LoginResponse, RegisterRequest};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, Transport};
