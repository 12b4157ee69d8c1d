//! A FIFO queue of frame payloads with typed enqueue/dequeue operations.
//!
//! The typed dequeues that target a fixed-width value (little-endian
//! integers, routing identifiers, hash digests) always pop the front
//! frame, even when its width doesn't match: a peer that sends a
//! malformed frame shouldn't be able to wedge the queue by leaving a bad
//! frame in front forever. Callers observe this as `None` plus a queue
//! that is one frame shorter.

use std::collections::VecDeque;

use bytes::Bytes;

/// A ROUTER-assigned routing identifier: fixed at 5 bytes.
pub type RouteId = [u8; 5];
/// A 32-byte hash digest.
pub type HashDigest = [u8; 32];

/// An ordered queue of message frame payloads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    frames: VecDeque<Bytes>,
}

impl Message {
    /// An empty message.
    #[must_use]
    pub fn new() -> Self {
        Message::default()
    }

    /// Number of frames currently queued.
    #[must_use]
    pub fn size(&self) -> usize {
        self.frames.len()
    }

    /// True when no frames are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Drop every queued frame.
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Append an empty delimiter frame (the REQ/DEALER envelope
    /// separator between routing frames and payload).
    pub fn enqueue(&mut self) {
        self.frames.push_back(Bytes::new());
    }

    /// Append a raw byte payload.
    pub fn enqueue_bytes(&mut self, data: impl Into<Bytes>) {
        self.frames.push_back(data.into());
    }

    /// Append the UTF-8 bytes of a text payload.
    pub fn enqueue_text(&mut self, text: impl AsRef<str>) {
        self.frames
            .push_back(Bytes::copy_from_slice(text.as_ref().as_bytes()));
    }

    /// Append a 5-byte routing identifier.
    pub fn enqueue_route(&mut self, route: RouteId) {
        self.frames.push_back(Bytes::copy_from_slice(&route));
    }

    /// Append a 32-byte hash digest.
    pub fn enqueue_hash(&mut self, hash: HashDigest) {
        self.frames.push_back(Bytes::copy_from_slice(&hash));
    }

    /// Append a fixed-width little-endian integer.
    pub fn enqueue_little_endian<T: LittleEndian>(&mut self, value: T) {
        self.frames
            .push_back(Bytes::copy_from_slice(value.to_le_bytes().as_ref()));
    }

    /// Pop and return the front frame, if any.
    pub fn dequeue(&mut self) -> Option<Bytes> {
        self.frames.pop_front()
    }

    /// Push a payload back onto the front of the queue.
    ///
    /// Used by the transport layer to restore an unsent frame after a
    /// partial `send` failure.
    pub fn push_front(&mut self, data: impl Into<Bytes>) {
        self.frames.push_front(data.into());
    }

    /// Pop and return the front frame as owned bytes.
    ///
    /// Succeeds whenever the queue is non-empty, regardless of length.
    pub fn dequeue_bytes(&mut self) -> Option<Bytes> {
        self.frames.pop_front()
    }

    /// Pop and return the front frame, lossily decoded as text.
    ///
    /// Succeeds whenever the queue is non-empty, regardless of content.
    pub fn dequeue_text(&mut self) -> Option<String> {
        self.frames
            .pop_front()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Pop the front frame; succeeds only if it is exactly 5 bytes.
    pub fn dequeue_route(&mut self) -> Option<RouteId> {
        let frame = self.frames.pop_front()?;
        frame.as_ref().try_into().ok()
    }

    /// Pop the front frame; succeeds only if it is exactly 32 bytes.
    pub fn dequeue_hash(&mut self) -> Option<HashDigest> {
        let frame = self.frames.pop_front()?;
        frame.as_ref().try_into().ok()
    }

    /// Pop the front frame; succeeds only if its width matches `T`.
    pub fn dequeue_little_endian<T: LittleEndian>(&mut self) -> Option<T> {
        let frame = self.frames.pop_front()?;
        T::from_le_bytes(frame.as_ref())
    }

    /// Iterate over the queued frames without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &Bytes> {
        self.frames.iter()
    }

    /// Consume into the underlying frame sequence.
    #[must_use]
    pub fn into_frames(self) -> VecDeque<Bytes> {
        self.frames
    }

    /// Build directly from a sequence of payloads.
    #[must_use]
    pub fn from_frames(frames: impl IntoIterator<Item = Bytes>) -> Self {
        Message {
            frames: frames.into_iter().collect(),
        }
    }
}

/// A fixed-width integer that can be read from and written to a
/// little-endian byte buffer, for [`Message`]'s typed dequeues.
pub trait LittleEndian: Copy {
    /// The little-endian byte representation, matching this integer's
    /// natural width.
    type Bytes: AsRef<[u8]>;

    /// Encode `self` as little-endian bytes.
    fn to_le_bytes(self) -> Self::Bytes;

    /// Decode from a byte slice, failing if its length isn't this
    /// integer's natural width.
    fn from_le_bytes(data: &[u8]) -> Option<Self>;
}

macro_rules! impl_little_endian {
    ($t:ty) => {
        impl LittleEndian for $t {
            type Bytes = [u8; std::mem::size_of::<$t>()];

            fn to_le_bytes(self) -> Self::Bytes {
                <$t>::to_le_bytes(self)
            }

            fn from_le_bytes(data: &[u8]) -> Option<Self> {
                let array: Self::Bytes = data.try_into().ok()?;
                Some(<$t>::from_le_bytes(array))
            }
        }
    };
}

impl_little_endian!(u8);
impl_little_endian!(u16);
impl_little_endian!(u32);
impl_little_endian!(u64);
