//! Process-wide transport context shared by sockets.

use std::sync::Arc;

use ironmq_core::error::Result;
use parking_lot::Mutex;
use tracing::{debug, instrument};

use crate::error::map;

struct Inner {
    handle: Mutex<Option<zmq::Context>>,
}

/// A handle to the underlying transport instance.
///
/// Cheaply cloneable; every clone shares the same underlying
/// `zmq::Context`. `stop` blocks until every socket derived from this
/// context has been closed, then the context may be started again.
#[derive(Clone)]
pub struct Context {
    inner: Arc<Inner>,
}

impl Context {
    /// Construct a context, optionally starting it immediately.
    #[must_use]
    pub fn new(started: bool) -> Self {
        let handle = if started {
            Some(zmq::Context::new())
        } else {
            None
        };
        Context {
            inner: Arc::new(Inner {
                handle: Mutex::new(handle),
            }),
        }
    }

    /// True when the context currently holds a live transport handle.
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.inner.handle.lock().is_some()
    }

    /// Start the context. A no-op (returns `Ok`) if already started.
    #[instrument(skip(self))]
    pub fn start(&self) -> Result<()> {
        let mut guard = self.inner.handle.lock();
        if guard.is_some() {
            debug!("context already started");
            return Ok(());
        }
        *guard = Some(zmq::Context::new());
        Ok(())
    }

    /// Terminate the context: blocks until every socket built on it has
    /// closed. Idempotent.
    #[instrument(skip(self))]
    pub fn stop(&self) -> Result<()> {
        let mut guard = self.inner.handle.lock();
        if let Some(ctx) = guard.take() {
            map(ctx.destroy())?;
        }
        Ok(())
    }

    /// Construct a new raw `zmq::Socket` from this context's handle.
    ///
    /// Returns `ContextTerminated` if the context is not started.
    pub(crate) fn raw_socket(&self, kind: zmq::SocketType) -> Result<zmq::Socket> {
        let guard = self.inner.handle.lock();
        let ctx = guard
            .as_ref()
            .ok_or(ironmq_core::error::Error::ContextTerminated)?;
        map(ctx.socket(kind))
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::new(true)
    }
}
