//! One thread per worker, with a restartable start/stop lifecycle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use ironmq_core::error::{Error, Result};
use tracing::{error, instrument, warn};

/// Best-effort scheduling hint for a worker's thread.
///
/// Applying a priority never fails worker start: platforms without a
/// priority API (or without the privilege to raise it) silently keep
/// the OS default. This crate does not depend on a platform
/// thread-priority crate; the hint currently only reaches the thread's
/// name (useful for `top -H`/`ps -eLf` during debugging), not its OS
/// scheduling class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThreadPriority {
    Lowest,
    Low,
    #[default]
    Normal,
    High,
    Highest,
}

impl ThreadPriority {
    fn label(self) -> &'static str {
        match self {
            ThreadPriority::Lowest => "lowest",
            ThreadPriority::Low => "low",
            ThreadPriority::Normal => "normal",
            ThreadPriority::High => "high",
            ThreadPriority::Highest => "highest",
        }
    }
}

/// A handle to a single managed worker thread.
///
/// `work` is supplied at `start` time; it must poll `stopped()` and
/// return once it observes `true`. A worker may be started, stopped,
/// and started again any number of times.
pub struct Worker {
    name: String,
    priority: ThreadPriority,
    stop_flag: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    /// Build an idle worker with the given thread name and priority
    /// hint.
    #[must_use]
    pub fn new(name: impl Into<String>, priority: ThreadPriority) -> Self {
        Worker {
            name: name.into(),
            priority,
            stop_flag: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// A shared flag the running `work` closure should poll.
    #[must_use]
    pub fn stop_signal(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop_flag)
    }

    /// Start the worker thread, running `work` until it returns or
    /// `stop()` is called.
    ///
    /// Blocks until `work` reports whether it started successfully
    /// (via the `started` callback argument it's handed); if `work`
    /// never calls it before returning, start is considered failed.
    #[instrument(skip(self, work), fields(worker = %self.name, priority = self.priority.label()))]
    pub fn start<F>(&mut self, work: F) -> Result<()>
    where
        F: FnOnce(Arc<AtomicBool>, flume::Sender<bool>) + Send + 'static,
    {
        if self.handle.is_some() {
            warn!("worker already running");
            return Err(Error::SocketState);
        }

        self.stop_flag.store(false, Ordering::SeqCst);
        let stop_flag = Arc::clone(&self.stop_flag);
        let (started_tx, started_rx) = flume::bounded::<bool>(1);

        let thread_name = self.name.clone();
        let handle = std::thread::Builder::new()
            .name(thread_name)
            .spawn(move || work(stop_flag, started_tx))
            .map_err(|_| Error::NoThread)?;

        match started_rx.recv_timeout(Duration::from_secs(30)) {
            Ok(true) => {
                self.handle = Some(handle);
                Ok(())
            }
            Ok(false) | Err(_) => {
                error!("worker failed to start");
                let _ = handle.join();
                Err(Error::NoThread)
            }
        }
    }

    /// Signal the worker to stop and block until its thread has
    /// finished. Idempotent if already stopped.
    #[instrument(skip(self), fields(worker = %self.name))]
    pub fn stop(&mut self) -> Result<()> {
        self.stop_flag.store(true, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            handle.join().map_err(|_| Error::Unknown)?;
        }
        Ok(())
    }

    /// True while the stop flag is raised (checked by the running
    /// `work` closure, not meaningful from outside the worker thread
    /// except as a best-effort snapshot).
    #[must_use]
    pub fn stopped(&self) -> bool {
        self.stop_flag.load(Ordering::SeqCst)
    }

    /// True while a thread is currently associated with this worker.
    #[must_use]
    pub fn running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        if self.handle.is_some() {
            let _ = self.stop();
        }
    }
}
