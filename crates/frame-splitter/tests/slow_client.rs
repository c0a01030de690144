#[cfg(test)]
mod tests {
	use std::sync::Arc;
	use std::thread;
	use std::time::{Duration, Instant};

	use frame_splitter::{Frame, PutOutcome, Splitter};

	/// A fast client keeps up with every frame while a slow one falls
	/// behind for a stretch and gets force-dropped, without blocking the
	/// fast client's delivery.
	#[test]
	fn a_stalled_client_is_force_dropped_without_blocking_a_healthy_one() {
		let splitter = Arc::new(Splitter::new(2, 2));
		let fast = splitter.client_add().unwrap();
		let slow = splitter.client_add().unwrap();

		let fast_reader = {
			let splitter = Arc::clone(&splitter);
			thread::spawn(move || {
				let mut received = Vec::new();
				for _ in 0..10 {
					match splitter.get(fast, 2_000) {
						Ok(frame) => received.push(frame),
						Err(_) => break,
					}
				}
				received
			})
		};

		let slow_reader = {
			let splitter = Arc::clone(&splitter);
			thread::spawn(move || {
				let mut received = Vec::new();
				for _ in 0..3 {
					received.push(splitter.get(slow, 2_000).unwrap());
				}
				// Fall behind long enough that several in-flight Puts
				// force-drop this client's backlog.
				thread::sleep(Duration::from_millis(500));
				while let Ok(frame) = splitter.get(slow, 200) {
					received.push(frame);
				}
				received
			})
		};

		let mut outcomes = Vec::new();
		let start = Instant::now();
		for i in 0..10u8 {
			let frame = Frame::new(vec![i]);
			outcomes.push(splitter.put(frame, 50));
			let elapsed = Instant::now().duration_since(start);
			let target = Duration::from_millis(u64::from(i + 1) * 100);
			if target > elapsed {
				thread::sleep(target - elapsed);
			}
		}

		let fast_received = fast_reader.join().unwrap();
		let slow_received = slow_reader.join().unwrap();

		assert_eq!(fast_received.len(), 10, "the healthy client must see every frame");

		let iter = splitter.begin_clients_iteration();
		let mut drops_by_id = std::collections::HashMap::new();
		for i in 0..iter.count() {
			let info = iter.get(i).unwrap();
			drops_by_id.insert(info.id, info.drops);
		}
		drop(iter);

		assert_eq!(*drops_by_id.get(&fast).unwrap(), 0, "the healthy client never drops");
		assert!(*drops_by_id.get(&slow).unwrap() > 0, "the stalled client must have dropped at least once");
		assert!(slow_received.len() < 10, "the stalled client misses a contiguous prefix while asleep");
		assert!(outcomes.contains(&PutOutcome::TimedOut), "at least one Put must have force-dropped the slow client");
	}

	#[test]
	fn forced_drop_pass_only_touches_clients_still_stalled() {
		let splitter = Splitter::new(1, 2);
		let drained = splitter.client_add().unwrap();
		let stalled = splitter.client_add().unwrap();

		let first = Frame::new(vec![0]);
		assert_eq!(splitter.put(first.clone(), 0), PutOutcome::Delivered);

		// Drain `drained`'s single slot so the next Put's snapshot pass
		// finds it directly writable, while `stalled` is left full and
		// gets force-dropped once the deadline elapses.
		assert_eq!(splitter.get(drained, 0).unwrap(), first);

		let second = Frame::new(vec![1]);
		assert_eq!(splitter.put(second.clone(), 50), PutOutcome::TimedOut);

		assert_eq!(splitter.get(drained, 0).unwrap(), second);
		assert_eq!(splitter.get(stalled, 0).unwrap(), second);

		let iter = splitter.begin_clients_iteration();
		for i in 0..iter.count() {
			let info = iter.get(i).unwrap();
			if info.id == stalled {
				assert_eq!(info.drops, 1);
			} else {
				assert_eq!(info.drops, 0);
			}
		}
	}
}
