//! Closed error taxonomy for ironmq operations.
//!
//! This is deliberately a flat, closed enum rather than a free-form
//! `String`-carrying error: every transport failure this crate can
//! observe maps onto exactly one of these variants, mirroring the
//! libzmq errno surface it is built over.

use thiserror::Error;

/// The result of a fallible ironmq operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Closed taxonomy of failures a socket, context, worker, or
/// authenticator operation can report.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// The operation completed without error.
    #[error("success")]
    Success,
    /// An error occurred that does not map to a known variant.
    #[error("unknown error")]
    Unknown,
    /// The socket is in the wrong state for the requested operation
    /// (e.g. a REQ socket sending twice without an intervening receive).
    #[error("socket is in the wrong state for this operation")]
    SocketState,
    /// The owning context has been terminated.
    #[error("context has been terminated")]
    ContextTerminated,
    /// No thread could be allocated for a new socket or worker.
    #[error("no thread available")]
    NoThread,
    /// The peer speaks an incompatible version of the wire protocol.
    #[error("incompatible protocol")]
    IncompatibleProtocol,
    /// The destination host could not be reached.
    #[error("host unreachable")]
    HostUnreachable,
    /// The transport has run out of buffer space.
    #[error("no buffer space available")]
    NoBufferSpace,
    /// The requested operation is not supported by this socket role.
    #[error("unsupported operation")]
    UnsupportedOperation,
    /// The requested transport/scheme is not supported.
    #[error("unsupported protocol")]
    UnsupportedProtocol,
    /// The network is down.
    #[error("network down")]
    NetworkDown,
    /// The requested address is already in use.
    #[error("address already in use")]
    AddressInUse,
    /// The requested address could not be resolved.
    #[error("address could not be resolved")]
    ResolveFailed,
    /// A connection attempt was refused or otherwise failed to be accepted.
    #[error("connection was not accepted")]
    AcceptFailed,
    /// A non-blocking operation is still in progress.
    #[error("operation in progress")]
    InProgress,
    /// A non-blocking operation would have to block to complete.
    #[error("resource temporarily unavailable, try again")]
    TryAgain,
    /// The message could not be parsed.
    #[error("invalid message")]
    InvalidMessage,
    /// The operation was interrupted by a signal.
    #[error("interrupted")]
    Interrupted,
    /// The socket handle is invalid or already closed.
    #[error("invalid socket")]
    InvalidSocket,
}

impl Error {
    /// True when this variant represents success.
    #[must_use]
    pub fn is_success(self) -> bool {
        matches!(self, Error::Success)
    }
}

/// A malformed endpoint URI (`scheme://host[:port]`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid endpoint: {0:?}")]
pub struct EndpointParseError(pub String);

/// A malformed authority (`host[:port]`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid authority: {0:?}")]
pub struct AuthorityParseError(pub String);
