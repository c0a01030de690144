#[cfg(test)]
mod tests {
	use std::sync::Arc;
	use std::thread;
	use std::time::Duration;

	use frame_splitter::{Frame, GetError, PutOutcome, Splitter};

	#[test]
	fn close_drains_waiters_and_unblocks_a_stalled_put() {
		let splitter = Arc::new(Splitter::new(1, 1));
		let client = splitter.client_add().unwrap();

		assert_eq!(splitter.put(Frame::new(vec![0]), 0), PutOutcome::Delivered);
		// The single slot is now full; a concurrent Put must stall until
		// Close intervenes.
		let stalled_put = {
			let splitter = Arc::clone(&splitter);
			thread::spawn(move || splitter.put(Frame::new(vec![1]), 5_000))
		};

		thread::sleep(Duration::from_millis(50));
		splitter.close();

		assert_eq!(stalled_put.join().unwrap(), PutOutcome::Closed);
		assert_eq!(splitter.get(client, 0), Err(GetError::UnknownClient), "Close erases the registry outright");
	}

	#[test]
	fn close_unblocks_a_waiting_get_with_eos() {
		let splitter = Arc::new(Splitter::new(1, 1));
		let client = splitter.client_add().unwrap();

		let waiter = {
			let splitter = Arc::clone(&splitter);
			thread::spawn(move || splitter.get(client, 5_000))
		};

		thread::sleep(Duration::from_millis(50));
		splitter.close();

		assert_eq!(waiter.join().unwrap(), Err(GetError::Eos));
	}

	#[test]
	fn close_is_idempotent() {
		let splitter = Splitter::new(1, 1);
		splitter.client_add().unwrap();

		splitter.close();
		assert_eq!(splitter.client_count(), 0);
		splitter.close();
		assert_eq!(splitter.client_count(), 0);
	}

	#[test]
	fn flush_counts_buffered_frames_as_drops_and_unblocks_put() {
		let splitter = Arc::new(Splitter::new(1, 1));
		let client = splitter.client_add().unwrap();

		assert_eq!(splitter.put(Frame::new(vec![0]), 0), PutOutcome::Delivered);

		let stalled_put = {
			let splitter = Arc::clone(&splitter);
			thread::spawn(move || splitter.put(Frame::new(vec![1]), 5_000))
		};

		thread::sleep(Duration::from_millis(50));
		splitter.flush();

		assert_eq!(stalled_put.join().unwrap(), PutOutcome::Flushed);

		let iter = splitter.begin_clients_iteration();
		let info = iter.get(0).unwrap();
		assert_eq!(info.id, client);
		assert_eq!(info.drops, 1, "the one buffered frame was counted as a drop");
		assert_eq!(info.latency, 0);
	}

	#[test]
	fn flushed_state_is_consumed_by_exactly_one_waiting_put() {
		let splitter = Arc::new(Splitter::new(1, 1));
		splitter.client_add().unwrap();
		splitter.flush();

		// A fresh Put call with no stalled clients never even looks at
		// the one-shot state flag, so it should not observe `Flushed`.
		let outcome = splitter.put(Frame::new(vec![0]), 0);
		assert_eq!(outcome, PutOutcome::Delivered);
	}
}
