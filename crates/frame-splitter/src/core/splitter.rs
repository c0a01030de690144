use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use crate::core::config::SplitterConfig;
use crate::core::iter::ClientsIteration;
use crate::core::slot::ClientSlot;
use crate::errors::{GetError, PutOutcome};
use crate::types::{ClientId, Frame};

/// One-shot teardown signal, consumed by exactly one waiting
/// [`Splitter::put`] call and reset to `Ok` immediately after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TeardownState {
	Ok,
	Closed,
	Flushed,
}

pub(crate) struct Inner {
	pub(crate) clients: BTreeMap<ClientId, ClientSlot>,
	pub(crate) state: TeardownState,
}

/// A thread-safe one-producer / many-consumer frame fan-out queue.
///
/// A single global [`Mutex`] (`inner`) guards the entire client
/// registry — every client's FIFO, drop counter, and existence — plus
/// the teardown state flag. Every blocking wait, whether the
/// producer's on `push_cv` or a consumer's on a client's own `pull_cv`,
/// suspends by releasing this same guard and re-locks it on wake. That
/// single-mutex discipline is deliberate, not incidental: a consumer's
/// pop and the producer's stall-predicate re-check must never be
/// separated by two different locks, or a pop-then-notify that lands
/// between the producer finishing its scan and entering its wait can
/// be missed entirely (the wait's "atomically unlock and begin
/// waiting" guarantee only protects against racing with *the lock it
/// is paired with* — pairing the consumer's mutation with a different
/// lock defeats it). Per-client condvars stay distinct (`Arc<Condvar>`
/// per slot) so a producer's broadcast doesn't have to wake every
/// consumer to reach the one it's stalled on.
///
/// Cloning is not supported: a `Splitter` is shared across producer and
/// consumer threads behind an `Arc<Splitter>`, the same way a
/// `std::sync::mpsc` channel's sender/receiver pair is shared, so callers
/// hold `Arc<Splitter>` rather than the type itself being `Clone`.
pub struct Splitter {
	max_buffers: usize,
	max_clients: usize,
	inner: Mutex<Inner>,
	push_cv: Condvar,
	next_client_id: AtomicU64,
}

impl Splitter {
	/// Constructs a `Splitter` with the given per-client backlog bound and
	/// client-count bound.
	///
	/// # Panics
	/// Panics if either bound is zero (see [`SplitterConfig::new`]).
	#[must_use]
	pub fn new(max_buffers: usize, max_clients: usize) -> Self {
		Self::with_config(SplitterConfig::new(max_buffers, max_clients))
	}

	/// Constructs a `Splitter` from a pre-validated [`SplitterConfig`].
	#[must_use]
	pub fn with_config(config: SplitterConfig) -> Self {
		Self {
			max_buffers: config.max_buffers,
			max_clients: config.max_clients,
			inner: Mutex::new(Inner { clients: BTreeMap::new(), state: TeardownState::Ok }),
			push_cv: Condvar::new(),
			next_client_id: AtomicU64::new(1),
		}
	}

	/// Returns the limits this `Splitter` was constructed with.
	#[must_use]
	pub fn info(&self) -> SplitterConfig {
		SplitterConfig { max_buffers: self.max_buffers, max_clients: self.max_clients }
	}

	/// Current number of registered clients.
	#[must_use]
	pub fn client_count(&self) -> usize {
		self.lock().clients.len()
	}

	fn lock(&self) -> MutexGuard<'_, Inner> {
		self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
	}

	/// Registers a new client with an empty FIFO.
	///
	/// Returns `None` if `max_clients` registered clients already exist.
	#[must_use]
	pub fn client_add(&self) -> Option<ClientId> {
		let mut inner = self.lock();
		if inner.clients.len() >= self.max_clients {
			return None;
		}
		let id = ClientId(self.next_client_id.fetch_add(1, Ordering::Relaxed));
		inner.clients.insert(id, ClientSlot::new());
		debug!(client = %id, count = inner.clients.len(), "client added");
		Some(id)
	}

	/// Removes `id` from the registry.
	///
	/// Any consumer blocked in [`Splitter::get`] for `id` is woken and
	/// returns [`GetError::Eos`]; any producer stalled waiting on `id` in
	/// [`Splitter::put`] stops counting it against the stall set. Returns
	/// `false` if `id` was not registered.
	#[must_use]
	pub fn client_remove(&self, id: ClientId) -> bool {
		let mut inner = self.lock();
		let Some(slot) = inner.clients.remove(&id) else {
			return false;
		};
		slot.pull_cv.notify_all();
		debug!(client = %id, "client removed");
		self.push_cv.notify_all();
		true
	}

	/// Acquires the global lock for a manual client walk and returns a
	/// scoped guard exposing [`ClientsIteration::count`] and
	/// [`ClientsIteration::get`].
	///
	/// The guard holds the same lock every other `Splitter` method takes
	/// to touch the registry, so an in-progress iteration excludes all
	/// concurrent add/remove/close/flush calls.
	#[must_use]
	pub fn begin_clients_iteration(&self) -> ClientsIteration<'_> {
		ClientsIteration::new(self.lock())
	}

	/// Removes every registered client, waking any consumer blocked in
	/// [`Splitter::get`] with [`GetError::Eos`], and latches the teardown
	/// state to `Closed` for the next waiting [`Splitter::put`].
	/// Idempotent: a second call finds an empty registry, so it only
	/// re-latches `Closed`.
	pub fn close(&self) {
		let mut inner = self.lock();
		for slot in inner.clients.values() {
			slot.pull_cv.notify_all();
		}
		inner.clients.clear();
		inner.state = TeardownState::Closed;
		debug!("splitter closed");
		self.push_cv.notify_all();
	}

	/// Discards every client's buffered-but-undelivered frames (counting
	/// them as drops) and latches the teardown state to `Flushed` for the
	/// next waiting [`Splitter::put`].
	pub fn flush(&self) {
		let mut inner = self.lock();
		for slot in inner.clients.values_mut() {
			slot.flush();
		}
		inner.state = TeardownState::Flushed;
		debug!("splitter flushed");
		self.push_cv.notify_all();
	}

	/// Attempts to deliver `frame` to every registered client within
	/// `timeout_ms` milliseconds.
	///
	/// On the first pass, every client whose FIFO isn't full accepts the
	/// frame immediately. Clients still full are held in a stall set;
	/// the producer then waits for stalled clients to drain, rescanning
	/// on every wake, until the stall set empties, the deadline passes,
	/// or a close/flush intervenes. Whatever is still stalled once the
	/// deadline passes is force-delivered by dropping that client's
	/// oldest buffered frame.
	///
	/// A negative `timeout_ms` is treated as zero (a single non-waiting
	/// pass before any forced drop).
	#[must_use]
	pub fn put(&self, frame: Frame, timeout_ms: i64) -> PutOutcome {
		let timeout = Duration::from_millis(timeout_ms.max(0) as u64);
		let deadline = Instant::now() + timeout;

		let mut inner = self.lock();

		// Snapshot pass: clients added after this point are not
		// retroactively handed this frame.
		let mut stalled: Vec<ClientId> = Vec::new();
		for (&id, slot) in &mut inner.clients {
			if slot.is_full(self.max_buffers) {
				stalled.push(id);
			} else {
				slot.push_delivered(frame.clone());
				trace!(client = %id, "frame delivered");
			}
		}

		let mut result = PutOutcome::Delivered;

		while !stalled.is_empty() && result != PutOutcome::TimedOut {
			let now = Instant::now();
			if now >= deadline {
				result = PutOutcome::TimedOut;
				// fall through: still rescan below so a client that just
				// drained slips off the stall list before forced drop.
			} else {
				let (guard, wait_result) = self.push_cv.wait_timeout(inner, deadline - now).unwrap_or_else(|poisoned| poisoned.into_inner());
				inner = guard;
				if wait_result.timed_out() {
					result = PutOutcome::TimedOut;
				}
			}

			if inner.state != TeardownState::Ok {
				result = match inner.state {
					TeardownState::Closed => PutOutcome::Closed,
					TeardownState::Flushed => PutOutcome::Flushed,
					TeardownState::Ok => unreachable!("checked above"),
				};
				stalled.clear();
				inner.state = TeardownState::Ok;
				break;
			}

			stalled.retain(|id| {
				// A lookup miss means the client was removed while
				// stalled: drop it from the stall set without
				// delivering, the same as a client that never accepted
				// a single byte of this frame.
				let Some(slot) = inner.clients.get_mut(id) else {
					return false;
				};
				if slot.is_full(self.max_buffers) {
					true
				} else {
					slot.push_delivered(frame.clone());
					trace!(client = %id, "frame delivered after stall");
					false
				}
			});
		}

		// Forced-drop pass for whatever is still stalled.
		for id in &stalled {
			if let Some(slot) = inner.clients.get_mut(id) {
				slot.push_forced(frame.clone(), self.max_buffers);
				warn!(client = %id, drops = slot.drops, "client force-dropped");
			}
		}

		result
	}

	/// Pops the next frame for `client_id`, waiting up to `timeout_ms`
	/// milliseconds if the FIFO is currently empty.
	///
	/// A negative `timeout_ms` is treated as zero.
	///
	/// # Errors
	/// Returns [`GetError::UnknownClient`] if `client_id` is not registered
	/// at the time of the call, [`GetError::Timeout`] if no frame arrived
	/// before the deadline, or [`GetError::Eos`] if `client_id` was removed
	/// (by [`Splitter::client_remove`] or [`Splitter::close`]) while this
	/// call was waiting — any frames still buffered for it at that point
	/// are discarded along with its registry entry.
	pub fn get(&self, client_id: ClientId, timeout_ms: i64) -> Result<Frame, GetError> {
		let timeout = Duration::from_millis(timeout_ms.max(0) as u64);
		let deadline = Instant::now() + timeout;

		let mut inner = self.lock();
		if !inner.clients.contains_key(&client_id) {
			return Err(GetError::UnknownClient);
		}

		loop {
			// A client that existed when we started waiting but is gone
			// now was removed or closed out from under us: report end
			// of stream rather than re-deriving "unknown client", which
			// is reserved for ids that were never (or no longer, as of
			// call start) registered.
			let Some(slot) = inner.clients.get(&client_id) else {
				return Err(GetError::Eos);
			};
			if !slot.fifo.is_empty() {
				break;
			}

			let now = Instant::now();
			if now >= deadline {
				return Err(GetError::Timeout);
			}
			let cv = Arc::clone(&slot.pull_cv);
			let (guard, _wait_result) = cv.wait_timeout(inner, deadline - now).unwrap_or_else(|poisoned| poisoned.into_inner());
			inner = guard;
			// Loop back around: re-check the predicate regardless of
			// whether this was a genuine or a spurious wakeup. A real
			// timeout with neither condition satisfied is caught by the
			// `now >= deadline` check at the top of the next iteration.
		}

		let slot = inner.clients.get_mut(&client_id).expect("presence just confirmed above, still under the same lock");
		let frame = slot.fifo.pop_front().expect("non-empty checked above");
		self.push_cv.notify_all();
		Ok(frame)
	}
}
