//! Wait on a set of sockets for inbound readiness.

use ironmq_core::identifiers::{Identifiers, SocketId};
use tracing::{instrument, trace};

use crate::error::from_zmq;
use crate::socket::Socket;

/// The safe upper bound applied to every wait, regardless of the
/// timeout requested.
pub const SAFE_MAX_WAIT_MILLISECONDS: i64 = 1000;

struct Watched<'a> {
    id: SocketId,
    socket: &'a Socket,
}

/// A non-thread-safe collector of sockets to poll for readability.
#[derive(Default)]
pub struct Poller<'a> {
    watched: Vec<Watched<'a>>,
    expired: bool,
    terminated: bool,
}

impl<'a> Poller<'a> {
    /// An empty poller.
    #[must_use]
    pub fn new() -> Self {
        Poller {
            watched: Vec::new(),
            expired: false,
            terminated: false,
        }
    }

    /// Add a socket to watch for inbound readability.
    pub fn add(&mut self, socket: &'a Socket) {
        self.watched.push(Watched {
            id: socket.id(),
            socket,
        });
    }

    /// True if the most recent `wait` elapsed its timeout with nothing
    /// ready.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.expired
    }

    /// True if the most recent `wait` observed the context terminating.
    #[must_use]
    pub fn terminated(&self) -> bool {
        self.terminated
    }

    /// Wait using the safe maximum timeout.
    pub fn wait(&mut self) -> Identifiers {
        self.wait_timeout(SAFE_MAX_WAIT_MILLISECONDS)
    }

    /// Wait up to `timeout_ms`, clamped to the safe maximum.
    #[instrument(skip(self))]
    pub fn wait_timeout(&mut self, timeout_ms: i64) -> Identifiers {
        self.expired = false;
        self.terminated = false;

        let clamped = timeout_ms.clamp(0, SAFE_MAX_WAIT_MILLISECONDS);

        // Hold each socket's handle locked for the duration of the poll
        // call so `zmq::PollItem` borrows stay valid; closed sockets
        // (stopped since they were added) are simply left out.
        let guards: Vec<_> = self.watched.iter().map(|w| w.socket.lock_handle()).collect();
        let mut items = Vec::with_capacity(guards.len());
        let mut ids = Vec::with_capacity(guards.len());
        for (guard, watched) in guards.iter().zip(self.watched.iter()) {
            if let Some(handle) = guard.as_ref() {
                items.push(handle.as_poll_item(zmq::POLLIN));
                ids.push(watched.id);
            }
        }

        match zmq::poll(&mut items, clamped) {
            Ok(count) if count < 0 => {
                self.terminated = true;
                Identifiers::new()
            }
            Ok(0) => {
                self.expired = true;
                Identifiers::new()
            }
            Ok(_) => {
                let mut ready = Identifiers::new();
                for (item, id) in items.iter().zip(ids.iter()) {
                    if item.is_readable() {
                        ready.insert(*id);
                    }
                }
                ready
            }
            Err(err) => {
                trace!(error = ?from_zmq(err), "poll failed");
                self.terminated = true;
                Identifiers::new()
            }
        }
    }
}
