//! Request sequencing for out-of-order responses.
//!
//! Typeahead queries are not cancelled when the user keeps typing, so a slow
//! response for an old prefix can arrive after the response for the current
//! text. Every query gets a [`Ticket`]; only the ticket issued last may apply
//! its result.

/// Identifies one issued query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
	/// Sequence number, starting at 1.
	pub const fn get(self) -> u64 {
		self.0
	}
}

/// Monotonic ticket issuer that remembers the latest outstanding ticket.
#[derive(Debug, Default, Clone)]
pub struct RequestSequencer {
	issued: u64,
	current: Option<u64>,
}

impl RequestSequencer {
	/// Creates a sequencer with no outstanding ticket.
	pub fn new() -> Self {
		Self::default()
	}

	/// Issues the next ticket; every earlier ticket becomes stale.
	pub fn issue(&mut self) -> Ticket {
		self.issued = self.issued.wrapping_add(1);
		self.current = Some(self.issued);
		Ticket(self.issued)
	}

	/// Marks every issued ticket stale without issuing a new one.
	pub fn invalidate(&mut self) {
		self.current = None;
	}

	/// Returns true if `ticket` is the latest outstanding ticket.
	pub fn is_current(&self, ticket: Ticket) -> bool {
		self.current == Some(ticket.0)
	}
}
