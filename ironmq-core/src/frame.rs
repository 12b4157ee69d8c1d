//! A single physical message part.

use bytes::Bytes;

/// One frame of a multi-part message: an opaque payload plus whether
/// further frames follow it in the same logical message.
///
/// A frame is restartable: `take_payload` leaves it holding an empty
/// buffer so the same `Frame` value may be reused for a subsequent
/// receive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frame {
    payload: Bytes,
    more: bool,
}

impl Frame {
    /// An empty frame with `more = false` — used as the REQ envelope
    /// delimiter and as the default "about to receive into" value.
    #[must_use]
    pub fn empty() -> Self {
        Frame {
            payload: Bytes::new(),
            more: false,
        }
    }

    /// Build a frame from an owned payload, `more = false`.
    #[must_use]
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Frame {
            payload: payload.into(),
            more: false,
        }
    }

    /// This frame's payload.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Consume this frame, returning its payload.
    #[must_use]
    pub fn into_payload(self) -> Bytes {
        self.payload
    }

    /// Whether more frames follow this one in the same message.
    #[must_use]
    pub fn more(&self) -> bool {
        self.more
    }

    /// Set the payload and more-flag, as a receive operation would.
    pub fn set(&mut self, payload: Bytes, more: bool) {
        self.payload = payload;
        self.more = more;
    }

    /// Length of the payload, in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    /// True when the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

impl From<Bytes> for Frame {
    fn from(payload: Bytes) -> Self {
        Frame::new(payload)
    }
}

impl From<Vec<u8>> for Frame {
    fn from(payload: Vec<u8>) -> Self {
        Frame::new(payload)
    }
}
