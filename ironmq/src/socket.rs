//! A role-typed wrapper over `zmq::Socket`.

use std::sync::atomic::{AtomicUsize, Ordering};

use ironmq_core::error::{Error, Result};
use ironmq_core::identifiers::SocketId;
use ironmq_core::keypair::Keypair;
use ironmq_core::message::Message;
use ironmq_core::settings::Settings;
use parking_lot::{Mutex, MutexGuard};
use tracing::{instrument, trace, warn};

use crate::context::Context;
use crate::error::map;
use crate::transport::MessageTransport;

static NEXT_SOCKET_ID: AtomicUsize = AtomicUsize::new(1);

/// A socket's fixed role, chosen at construction and never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Bidirectional exclusive pairing, usually over `inproc://`.
    Pair,
    /// Publisher: fan-out broadcast, no flow control toward subscribers.
    Publisher,
    /// Subscriber: receives messages matching a subscribed prefix set.
    Subscriber,
    /// Requester: strict send/receive alternation.
    Requester,
    /// Replier: strict receive/send alternation.
    Replier,
    /// Dealer: asynchronous, load-balanced request/reply.
    Dealer,
    /// Router: identity-prefixed asynchronous request/reply.
    Router,
    /// Puller: receive-only half of a pipeline.
    Puller,
    /// Pusher: send-only half of a pipeline, round-robins peers.
    Pusher,
    /// Extended publisher: exposes subscription messages to the app.
    XPublisher,
    /// Extended subscriber: sends raw subscription messages.
    XSubscriber,
    /// Raw stream socket, for embedding in non-ZeroMQ protocols.
    Stream,
}

impl Role {
    fn to_zmq(self) -> zmq::SocketType {
        match self {
            Role::Pair => zmq::PAIR,
            Role::Publisher => zmq::PUB,
            Role::Subscriber => zmq::SUB,
            Role::Requester => zmq::REQ,
            Role::Replier => zmq::REP,
            Role::Dealer => zmq::DEALER,
            Role::Router => zmq::ROUTER,
            Role::Puller => zmq::PULL,
            Role::Pusher => zmq::PUSH,
            Role::XPublisher => zmq::XPUB,
            Role::XSubscriber => zmq::XSUB,
            Role::Stream => zmq::STREAM,
        }
    }
}

fn seconds_to_millis(seconds: u32) -> i32 {
    i32::try_from(seconds.saturating_mul(1000)).unwrap_or(i32::MAX)
}

/// A typed transport endpoint.
///
/// Construction applies [`Settings`] exactly once, fail-fast: if any
/// setter fails, the socket is torn down and the error is returned to
/// the caller rather than left half-configured.
///
/// The underlying `zmq::Socket` sits behind a lock so [`Socket::stop`]
/// can close it eagerly rather than waiting on this value's own `Drop`.
pub struct Socket {
    role: Role,
    handle: Mutex<Option<zmq::Socket>>,
    id: SocketId,
}

impl Socket {
    /// Build a socket of the given role on `context`, applying `settings`.
    #[instrument(skip(context, settings), fields(role = ?role))]
    pub fn new(context: &Context, role: Role, settings: Settings) -> Result<Self> {
        let handle = context.raw_socket(role.to_zmq())?;
        let id = NEXT_SOCKET_ID.fetch_add(1, Ordering::Relaxed);
        let socket = Socket {
            role,
            handle: Mutex::new(Some(handle)),
            id,
        };
        socket.apply_settings(&settings)?;
        if role == Role::Subscriber {
            socket.set_subscription(&[])?;
        }
        Ok(socket)
    }

    /// Run `f` against the live handle, failing with [`Error::InvalidSocket`]
    /// once [`Socket::stop`] has closed it.
    fn with_handle<T>(&self, f: impl FnOnce(&zmq::Socket) -> Result<T>) -> Result<T> {
        let guard = self.handle.lock();
        match guard.as_ref() {
            Some(handle) => f(handle),
            None => Err(Error::InvalidSocket),
        }
    }

    /// Lock this socket's handle for the poller, which needs a
    /// reference held across its own `zmq::poll` call.
    pub(crate) fn lock_handle(&self) -> MutexGuard<'_, Option<zmq::Socket>> {
        self.handle.lock()
    }

    fn apply_settings(&self, settings: &Settings) -> Result<()> {
        self.with_handle(|handle| {
            map(handle.set_linger(0))?;
            map(handle.set_sndhwm(settings.send_high_water() as i32))?;
            map(handle.set_rcvhwm(settings.receive_high_water() as i32))?;

            map(handle.set_handshake_ivl(seconds_to_millis(settings.handshake_seconds())))?;

            if settings.ping_seconds() > 0 {
                map(handle.set_heartbeat_ivl(seconds_to_millis(settings.ping_seconds())))?;
            }

            let max_size = if settings.message_size_limit() == 0 {
                -1
            } else {
                i64::try_from(settings.message_size_limit()).unwrap_or(i64::MAX)
            };
            map(handle.set_maxmsgsize(max_size))?;

            if settings.inactivity_seconds() > 0 {
                map(handle.set_heartbeat_timeout(seconds_to_millis(settings.inactivity_seconds())))?;
            }

            let send_timeout = if settings.send_milliseconds() == 0 {
                -1
            } else {
                i32::try_from(settings.send_milliseconds()).unwrap_or(i32::MAX)
            };
            map(handle.set_sndtimeo(send_timeout))?;

            if settings.reconnect_seconds() == 0 {
                map(handle.set_reconnect_ivl(-1))?;
            } else {
                map(handle.set_reconnect_ivl(100))?;
                map(handle.set_reconnect_ivl_max(seconds_to_millis(settings.reconnect_seconds())))?;
            }

            Ok(())
        })
    }

    /// This socket's stable, process-local identifier.
    #[must_use]
    pub fn id(&self) -> SocketId {
        self.id
    }

    /// This socket's fixed role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Bind to a local endpoint (e.g. `"tcp://*:9000"`, `"inproc://name"`).
    #[instrument(skip(self))]
    pub fn bind(&self, endpoint: &str) -> Result<()> {
        self.with_handle(|handle| map(handle.bind(endpoint)))
    }

    /// Connect to a remote endpoint.
    #[instrument(skip(self))]
    pub fn connect(&self, endpoint: &str) -> Result<()> {
        self.with_handle(|handle| map(handle.connect(endpoint)))
    }

    /// Send a message, frame by frame.
    pub fn send(&self, message: &mut Message) -> Result<()> {
        self.with_handle(|handle| MessageTransport::send(message, handle))
    }

    /// Receive a message, clearing any prior contents first.
    pub fn receive(&self, message: &mut Message) -> Result<()> {
        self.with_handle(|handle| MessageTransport::receive(message, handle))
    }

    /// Mark this socket as a CURVE server.
    pub fn set_curve_server(&self) -> Result<()> {
        self.with_handle(|handle| map(handle.set_curve_server(true)))
    }

    /// Configure this socket as a CURVE client expecting the given
    /// server public key.
    pub fn set_curve_client(&self, server_public_key: &[u8; 32]) -> Result<()> {
        self.with_handle(|handle| map(handle.set_curve_serverkey(server_public_key)))
    }

    /// Set this socket's own curve public key.
    pub fn set_public_key(&self, key: &[u8; 32]) -> Result<()> {
        self.with_handle(|handle| map(handle.set_curve_publickey(key)))
    }

    /// Set this socket's own curve private key.
    pub fn set_private_key(&self, key: &[u8; 32]) -> Result<()> {
        self.with_handle(|handle| map(handle.set_curve_secretkey(key)))
    }

    /// Apply both halves of a certificate at once.
    pub fn set_certificate(&self, keypair: &Keypair) -> Result<()> {
        self.set_public_key(keypair.public())?;
        self.set_private_key(keypair.private())
    }

    /// Advertise a ZAP domain. An empty name is a no-op.
    pub fn set_authentication_domain(&self, domain: &str) -> Result<()> {
        if domain.is_empty() {
            return Ok(());
        }
        self.with_handle(|handle| map(handle.set_zap_domain(domain)))
    }

    /// Subscribe to messages matching `prefix` (subscriber role only).
    pub fn set_subscription(&self, prefix: &[u8]) -> Result<()> {
        if self.role != Role::Subscriber {
            warn!(role = ?self.role, "set_subscription on a non-subscriber socket");
            return Err(Error::UnsupportedOperation);
        }
        self.with_handle(|handle| map(handle.set_subscribe(prefix)))
    }

    /// Remove a subscription previously set with [`Socket::set_subscription`].
    pub fn set_unsubscription(&self, prefix: &[u8]) -> Result<()> {
        if self.role != Role::Subscriber {
            return Err(Error::UnsupportedOperation);
        }
        self.with_handle(|handle| map(handle.set_unsubscribe(prefix)))
    }

    /// Route this socket's connections through a SOCKS5 proxy.
    pub fn set_socks_proxy(&self, authority: &str) -> Result<()> {
        self.with_handle(|handle| map(handle.set_socks_proxy(Some(authority))))
    }

    /// Close the socket, dropping the underlying `zmq::Socket` so the
    /// owning `Context` can observe it as closed immediately rather than
    /// whenever this value eventually drops. Safe to call more than once.
    #[instrument(skip(self))]
    pub fn stop(&self) -> Result<()> {
        if self.handle.lock().take().is_some() {
            trace!("socket closed");
        } else {
            trace!("socket already closed");
        }
        Ok(())
    }
}
