//! Transport-agnostic value types for `ironmq`: the closed error
//! taxonomy, curve key pairs, message frames and queues, socket
//! identifier sets, tunable settings, and endpoint/authority parsing.
//!
//! None of these types touch a socket; the runtime layer (the `ironmq`
//! crate) builds the transport on top of them.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod authority;
pub mod endpoint;
pub mod error;
pub mod frame;
pub mod identifiers;
pub mod keypair;
pub mod message;
pub mod settings;

/// Convenient imports for embedding crates.
pub mod prelude {
    pub use crate::authority::Authority;
    pub use crate::endpoint::{Endpoint, Scheme};
    pub use crate::error::{Error, Result};
    pub use crate::frame::Frame;
    pub use crate::identifiers::{Identifiers, SocketId};
    pub use crate::keypair::Keypair;
    pub use crate::message::{HashDigest, Message, RouteId};
    pub use crate::settings::Settings;
}
