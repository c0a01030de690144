//! Thread-safe one-producer / many-consumer frame fan-out.
//!
//! A [`Splitter`] accepts a stream of reference-counted [`Frame`] buffers
//! from a single producer thread and distributes every frame to each
//! registered [`ClientId`], buffering up to `max_buffers` undelivered
//! frames per client. A client that falls behind is given up to the
//! producer's `timeout_ms` to catch up before the producer force-drops
//! that client's oldest buffered frame to make room — a healthy fast
//! client is never held up by a stalled slow one.
//!
//! ```
//! use frame_splitter::{Frame, PutOutcome, Splitter};
//!
//! let splitter = Splitter::new(4, 8);
//! let client = splitter.client_add().expect("under max_clients");
//!
//! assert_eq!(splitter.put(Frame::new(vec![1, 2, 3]), 100), PutOutcome::Delivered);
//! let frame = splitter.get(client, 100).expect("frame was just put");
//! assert_eq!(frame.as_slice(), &[1, 2, 3]);
//! ```

pub mod core;
pub mod errors;
pub mod types;

pub use core::{ClientInfo, ClientsIteration, Splitter, SplitterConfig};
pub use errors::{GetError, PutOutcome};
pub use types::{ClientId, Frame};
