use std::collections::VecDeque;
use std::sync::{Arc, Condvar};

use crate::types::{ClientId, Frame};

/// Per-client mutable state: FIFO, drop counter, and the consumer's
/// wake channel. Lives inline in the registry map and is mutated only
/// while the registry's single lock is held — see
/// [`Splitter`](super::splitter::Splitter) for why this matters.
///
/// `pull_cv` is wrapped in `Arc` so a waiter can clone a handle to it
/// out of a registry lookup before the registry's lock guard is moved
/// into `Condvar::wait_timeout`, which otherwise cannot coexist with a
/// live borrow derived from that same guard.
pub(crate) struct ClientSlot {
	pub(crate) fifo: VecDeque<Frame>,
	pub(crate) drops: u64,
	pub(crate) pull_cv: Arc<Condvar>,
}

impl ClientSlot {
	pub(crate) fn new() -> Self {
		Self { fifo: VecDeque::new(), drops: 0, pull_cv: Arc::new(Condvar::new()) }
	}

	pub(crate) fn is_full(&self, max_buffers: usize) -> bool {
		self.fifo.len() >= max_buffers
	}

	/// Pushes `frame` onto a slot known not to be full and wakes the
	/// client's consumer.
	pub(crate) fn push_delivered(&mut self, frame: Frame) {
		self.fifo.push_back(frame);
		self.pull_cv.notify_all();
	}

	/// Pushes `frame` unconditionally, dropping oldest buffered frames
	/// as needed to stay within `max_buffers`, counting each drop.
	pub(crate) fn push_forced(&mut self, frame: Frame, max_buffers: usize) {
		self.fifo.push_back(frame);
		while self.fifo.len() > max_buffers {
			self.fifo.pop_front();
			self.drops += 1;
		}
		self.pull_cv.notify_all();
	}

	/// Discards every buffered frame, counting each as a drop.
	pub(crate) fn flush(&mut self) {
		self.drops += self.fifo.len() as u64;
		self.fifo.clear();
		self.pull_cv.notify_all();
	}
}

/// A point-in-time snapshot of one client's queue depth and drop count,
/// returned by [`ClientsIteration`](super::iter::ClientsIteration).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientInfo {
	/// The client's id.
	pub id: ClientId,
	/// Current depth of the client's FIFO (undelivered frame count).
	pub latency: usize,
	/// Total frames dropped from this client's head so far.
	pub drops: u64,
}
