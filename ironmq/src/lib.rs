//! Authenticated, curve-encrypted, multi-part messaging over a
//! brokered ZeroMQ transport.
//!
//! This crate builds the socket, poller, worker, and authenticator
//! layers described by [`ironmq_core`] on top of the real `zmq` crate:
//! wire framing and curve key generation primitives are delegated to
//! libzmq, not reimplemented here.
//!
//! ```rust,no_run
//! use ironmq::context::Context;
//! use ironmq::socket::{Role, Socket};
//! use ironmq_core::message::Message;
//! use ironmq_core::settings::Settings;
//!
//! # fn example() -> ironmq_core::error::Result<()> {
//! let context = Context::new(true);
//! let pusher = Socket::new(&context, Role::Pusher, Settings::default())?;
//! pusher.bind("tcp://*:9000")?;
//!
//! let mut message = Message::new();
//! message.enqueue_text("hello world!");
//! pusher.send(&mut message)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod authenticator;
pub mod context;
pub mod dev_tracing;
pub mod error;
pub mod poller;
pub mod socket;
pub mod transport;
pub mod worker;

pub use ironmq_core as core;

/// Convenient imports for applications embedding ironmq.
pub mod prelude {
    pub use crate::authenticator::Authenticator;
    pub use crate::context::Context;
    pub use crate::poller::Poller;
    pub use crate::socket::{Role, Socket};
    pub use crate::worker::{ThreadPriority, Worker};
    pub use ironmq_core::error::{Error, Result};
    pub use ironmq_core::keypair::Keypair;
    pub use ironmq_core::message::Message;
    pub use ironmq_core::settings::Settings;
}
