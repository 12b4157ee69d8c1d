//! Mapping from `zmq::Error` (libzmq's errno surface) onto the closed
//! taxonomy in [`ironmq_core::error::Error`].

use ironmq_core::error::Error;

/// Translate a libzmq errno into the closed taxonomy.
///
/// This is an explicit match, not a transparent wrap: the taxonomy is a
/// deliberate many-to-one reduction of libzmq's full errno surface, not
/// a passthrough.
#[must_use]
pub fn from_zmq(err: zmq::Error) -> Error {
    match err {
        zmq::Error::EFSM => Error::SocketState,
        zmq::Error::ETERM => Error::ContextTerminated,
        zmq::Error::EMTHREAD => Error::NoThread,
        zmq::Error::ENOCOMPATPROTO => Error::IncompatibleProtocol,
        zmq::Error::EHOSTUNREACH => Error::HostUnreachable,
        zmq::Error::ENOBUFS => Error::NoBufferSpace,
        zmq::Error::ENOTSUP => Error::UnsupportedOperation,
        zmq::Error::EPROTONOSUPPORT => Error::UnsupportedProtocol,
        zmq::Error::ENETDOWN => Error::NetworkDown,
        zmq::Error::EADDRINUSE => Error::AddressInUse,
        zmq::Error::EADDRNOTAVAIL => Error::ResolveFailed,
        zmq::Error::ECONNREFUSED => Error::AcceptFailed,
        zmq::Error::EINPROGRESS => Error::InProgress,
        zmq::Error::EAGAIN => Error::TryAgain,
        zmq::Error::EFAULT => Error::InvalidMessage,
        zmq::Error::EINTR => Error::Interrupted,
        zmq::Error::ENOTSOCK => Error::InvalidSocket,
        _ => Error::Unknown,
    }
}

/// Translate a libzmq `Result` into one returning the closed taxonomy.
pub fn map<T>(result: Result<T, zmq::Error>) -> Result<T, Error> {
    result.map_err(from_zmq)
}
