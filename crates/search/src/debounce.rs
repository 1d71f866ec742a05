//! Trailing-edge debounce for search-box input.
//!
//! Callers feed every keystroke through [`Debouncer::push`] and call
//! [`Debouncer::poll`] from their loop with the current time. Text is released
//! once no newer keystroke has arrived for the configured interval, so a burst
//! of typing produces a single query for the final text.

use std::time::{Duration, Instant};

/// Default quiet period before a search query is issued.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
struct PendingText {
	text: String,
	last_edit_at: Instant,
}

/// Holds the latest text until it has been stable for `interval`.
#[derive(Debug, Clone)]
pub struct Debouncer {
	interval: Duration,
	pending: Option<PendingText>,
}

impl Default for Debouncer {
	fn default() -> Self {
		Self::new(DEFAULT_DEBOUNCE)
	}
}

impl Debouncer {
	/// Creates a debouncer with the given quiet period.
	pub fn new(interval: Duration) -> Self {
		Self {
			interval,
			pending: None,
		}
	}

	/// Quiet period.
	pub fn interval(&self) -> Duration {
		self.interval
	}

	/// Records new text, restarting the quiet period.
	pub fn push(&mut self, text: impl Into<String>, now: Instant) {
		self.pending = Some(PendingText {
			text: text.into(),
			last_edit_at: now,
		});
	}

	/// Releases the pending text if its quiet period has elapsed.
	pub fn poll(&mut self, now: Instant) -> Option<String> {
		let due = self
			.pending
			.as_ref()
			.is_some_and(|p| now.saturating_duration_since(p.last_edit_at) >= self.interval);
		if due { self.pending.take().map(|p| p.text) } else { None }
	}

	/// When the pending text becomes due, if any.
	pub fn deadline(&self) -> Option<Instant> {
		self.pending.as_ref().map(|p| p.last_edit_at + self.interval)
	}

	/// Returns true while text is waiting.
	pub fn is_pending(&self) -> bool {
		self.pending.is_some()
	}

	/// Drops pending text without releasing it.
	pub fn cancel(&mut self) {
		self.pending = None;
	}
}
