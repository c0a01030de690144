use std::fmt;
use std::sync::Arc;

/// An opaque, reference-counted, immutable frame buffer.
///
/// Cloning a `Frame` is an `O(1)` refcount bump; no payload bytes are ever
/// copied. Equality is payload *identity*, not content: two frames built
/// from identical bytes but through separate [`Frame::new`] calls are not
/// equal. This matches the contract consumers rely on — "the frame I got
/// out of `Get` is the same handle I put in."
#[derive(Clone)]
pub struct Frame(Arc<[u8]>);

impl Frame {
	/// Wraps `bytes` as a shareable frame.
	pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
		Self(bytes.into())
	}

	/// Borrows the underlying payload.
	#[must_use]
	pub fn as_slice(&self) -> &[u8] {
		&self.0
	}

	/// Payload length in bytes.
	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether the payload is empty.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl PartialEq for Frame {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl Eq for Frame {}

impl fmt::Debug for Frame {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Frame").field("len", &self.0.len()).field("ptr", &Arc::as_ptr(&self.0)).finish()
	}
}

impl From<Vec<u8>> for Frame {
	fn from(bytes: Vec<u8>) -> Self {
		Self(Arc::from(bytes))
	}
}

/// Process-wide-unique (per [`Splitter`](crate::Splitter) instance) client
/// identifier. Ids are assigned by a monotonic counter and are never reused
/// within one `Splitter`'s lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClientId(pub(crate) u64);

impl fmt::Display for ClientId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "client#{}", self.0)
	}
}
