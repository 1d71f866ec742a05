//! Scripted in-process transport for tests.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{ApiError, Result};
use crate::transport::{ApiRequest, ApiResponse, Method, Transport};

enum Scripted {
	Reply(ApiResponse),
	NetworkFailure(String),
}

/// Transport that records every request and answers from a FIFO script.
///
/// An exhausted script answers with a network failure so a missing expectation
/// shows up as a failed call rather than a hang.
#[derive(Default)]
pub struct RecordingTransport {
	requests: Mutex<Vec<ApiRequest>>,
	script: Mutex<VecDeque<Scripted>>,
}

impl RecordingTransport {
	/// Creates a transport with an empty script.
	pub fn new() -> Self {
		Self::default()
	}

	/// Queues a JSON reply.
	pub fn respond(&self, status: u16, body: serde_json::Value) -> &Self {
		let body = serde_json::to_vec(&body).unwrap_or_default();
		self.respond_raw(status, body)
	}

	/// Queues a reply with an arbitrary body.
	pub fn respond_raw(&self, status: u16, body: impl Into<Vec<u8>>) -> &Self {
		self.script.lock().push_back(Scripted::Reply(ApiResponse {
			status,
			body: body.into(),
		}));
		self
	}

	/// Queues a transport-level failure.
	pub fn fail(&self, reason: &str) -> &Self {
		self.script.lock().push_back(Scripted::NetworkFailure(reason.to_string()));
		self
	}

	/// Returns every request sent so far.
	pub fn requests(&self) -> Vec<ApiRequest> {
		self.requests.lock().clone()
	}

	/// Counts requests matching `method` and `path`.
	pub fn count(&self, method: Method, path: &str) -> usize {
		self.requests
			.lock()
			.iter()
			.filter(|r| r.method == method && r.path() == path)
			.count()
	}

	/// Returns the most recent request.
	pub fn last(&self) -> Option<ApiRequest> {
		self.requests.lock().last().cloned()
	}
}

#[async_trait]
impl Transport for RecordingTransport {
	async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
		self.requests.lock().push(request);
		match self.script.lock().pop_front() {
			Some(Scripted::Reply(response)) => Ok(response),
			Some(Scripted::NetworkFailure(reason)) => Err(ApiError::Network(reason)),
			None => Err(ApiError::Network("no scripted response".into())),
		}
	}
}
