use std::sync::MutexGuard;

use crate::core::slot::ClientInfo;
use crate::core::splitter::Inner;

/// A scoped handle on the `Splitter`'s global lock, returned by
/// [`Splitter::begin_clients_iteration`](crate::Splitter::begin_clients_iteration).
///
/// While this guard is alive, [`ClientsIteration::count`] and
/// [`ClientsIteration::get`] read a consistent snapshot of the registry —
/// no concurrent `put`/`get`/`client_add`/`client_remove`/`close`/`flush`
/// call can observe or mutate it in between, since it is the very same
/// lock every other operation takes to touch the registry.
pub struct ClientsIteration<'a> {
	guard: MutexGuard<'a, Inner>,
}

impl<'a> ClientsIteration<'a> {
	pub(crate) fn new(guard: MutexGuard<'a, Inner>) -> Self {
		Self { guard }
	}

	/// Number of currently registered clients.
	#[must_use]
	pub fn count(&self) -> usize {
		self.guard.clients.len()
	}

	/// Reads `{id, latency, drops}` for the `index`-th client in ascending
	/// `ClientId` order, or `None` if `index` is out of range.
	#[must_use]
	pub fn get(&self, index: usize) -> Option<ClientInfo> {
		let (&id, slot) = self.guard.clients.iter().nth(index)?;
		Some(ClientInfo { id, latency: slot.fifo.len(), drops: slot.drops })
	}
}
