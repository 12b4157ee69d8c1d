//! Wire a [`Frame`]/[`Message`] onto a real `zmq::Socket`.
//!
//! `ironmq-core` keeps these types free of any transport dependency;
//! this module is the seam where they learn to cross the wire.

use ironmq_core::error::{Error, Result};
use ironmq_core::frame::Frame;
use ironmq_core::message::Message;

use crate::error::map;

/// Frame-level send/receive over a `zmq::Socket`.
pub trait FrameTransport {
    /// Receive one frame, overwriting this frame's contents.
    fn receive(&mut self, socket: &zmq::Socket) -> Result<()>;

    /// Send this frame. `last` controls whether `SNDMORE` is set.
    fn send(&self, socket: &zmq::Socket, last: bool) -> Result<()>;
}

impl FrameTransport for Frame {
    fn receive(&mut self, socket: &zmq::Socket) -> Result<()> {
        let payload = map(socket.recv_bytes(0))?;
        let more = map(socket.get_rcvmore())?;
        self.set(payload.into(), more);
        Ok(())
    }

    fn send(&self, socket: &zmq::Socket, last: bool) -> Result<()> {
        let flags = if last { 0 } else { zmq::SNDMORE };
        map(socket.send(self.payload(), flags))
    }
}

/// Message-level send/receive over a `zmq::Socket`: walks the FIFO
/// queue, wrapping each payload in a frame.
pub trait MessageTransport {
    /// Send every queued frame in order, stopping at the first error.
    ///
    /// On failure the unsent remainder stays queued so the caller may
    /// retry or inspect it.
    fn send(&mut self, socket: &zmq::Socket) -> Result<()>;

    /// Clear this message, then receive frames until the peer signals
    /// no more follow.
    fn receive(&mut self, socket: &zmq::Socket) -> Result<()>;
}

impl MessageTransport for Message {
    fn send(&mut self, socket: &zmq::Socket) -> Result<()> {
        while let Some(payload) = self.dequeue() {
            let last = self.is_empty();
            let frame = Frame::new(payload);
            if let Err(err) = FrameTransport::send(&frame, socket, last) {
                self.push_front(frame.into_payload());
                return Err(err);
            }
        }
        Ok(())
    }

    fn receive(&mut self, socket: &zmq::Socket) -> Result<()> {
        self.clear();
        loop {
            let mut frame = Frame::empty();
            FrameTransport::receive(&mut frame, socket)?;
            let more = frame.more();
            self.enqueue_bytes(frame.into_payload());
            if !more {
                break;
            }
        }
        Ok(())
    }
}

/// True when `err` indicates the socket would have to block.
#[must_use]
pub fn would_block(err: Error) -> bool {
    matches!(err, Error::TryAgain)
}
