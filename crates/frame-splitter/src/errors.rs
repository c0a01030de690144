use std::fmt;

use thiserror::Error;

/// Failure reasons for [`Splitter::get`](crate::Splitter::get).
///
/// These are the "not a frame" outcomes of a `get` call, so — unlike
/// [`PutOutcome`] — modeling them as a proper `std::error::Error` is the
/// idiomatic fit, the same way `std::sync::mpsc::RecvTimeoutError` pairs
/// with `recv_timeout`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetError {
	/// No frame arrived before the deadline.
	#[error("timed out waiting for a frame")]
	Timeout,
	/// The client has been marked for deletion; no further frames will
	/// arrive. Any frames still buffered for this client were discarded.
	#[error("client reached end of stream")]
	Eos,
	/// The client id is not (or no longer) registered.
	#[error("unknown client id")]
	UnknownClient,
}

/// Outcome of [`Splitter::put`](crate::Splitter::put).
///
/// These are result codes, not exceptions: `TimedOut` still means the
/// frame was delivered to every client (slow ones via a forced drop of
/// their oldest buffered frame), so this does not implement
/// `std::error::Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PutOutcome {
	/// Every registered, non-deleted client accepted the frame within the
	/// deadline.
	Delivered,
	/// The deadline elapsed while one or more clients were still full;
	/// those clients received the frame via a forced drop of their oldest
	/// buffered frame.
	TimedOut,
	/// [`Splitter::close`](crate::Splitter::close) ran while this call was
	/// waiting on a stalled client. The frame was not delivered to clients
	/// still stalled at that moment.
	Closed,
	/// [`Splitter::flush`](crate::Splitter::flush) ran while this call was
	/// waiting on a stalled client. The frame was not delivered to clients
	/// still stalled at that moment.
	Flushed,
}

impl fmt::Display for PutOutcome {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Delivered => write!(f, "delivered to every client"),
			Self::TimedOut => write!(f, "timed out, slow clients force-dropped"),
			Self::Closed => write!(f, "splitter closed while waiting"),
			Self::Flushed => write!(f, "splitter flushed while waiting"),
		}
	}
}
