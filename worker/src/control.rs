//! Out of band control requests: snapshot and stop.
//!
//! The OS level handlers only raise flags, the stage loop looks at them at
//! record boundaries and does the actual work.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use log::debug;
use tokio::{
    signal::unix::{SignalKind, signal},
    sync::Notify,
    task::JoinHandle,
};

use crate::{Result, WorkerErr};

/// Pending control requests of a stage.
#[derive(Debug, Default)]
pub struct ControlFlags {
    snapshot: AtomicBool,
    stop: AtomicBool,
    changed: Notify,
}

impl ControlFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a snapshot request.
    pub fn request_snapshot(&self) {
        self.snapshot.store(true, Ordering::SeqCst);
        self.changed.notify_one();
    }

    /// Records a stop request.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
        self.changed.notify_one();
    }

    /// Clears the snapshot flag, returning whether it was set.
    pub fn take_snapshot(&self) -> bool {
        self.snapshot.swap(false, Ordering::SeqCst)
    }

    pub fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    /// Completes once a request is raised after the last call.
    ///
    /// A request raised while nobody waits is remembered, so it is never
    /// missed between two calls.
    pub async fn changed(&self) {
        self.changed.notified().await;
    }
}

/// Routes `SIGUSR1` to snapshot requests and `SIGTERM` to stop requests.
///
/// The handlers are registered before this returns, so signals sent from then
/// on never fall back to their default disposition.
///
/// # Errors
/// `WorkerErr::Signal` if a handler cannot be registered.
pub fn install(flags: Arc<ControlFlags>) -> Result<JoinHandle<()>> {
    let mut snapshot = signal(SignalKind::user_defined1()).map_err(WorkerErr::Signal)?;
    let mut stop = signal(SignalKind::terminate()).map_err(WorkerErr::Signal)?;

    Ok(tokio::spawn(async move {
        loop {
            tokio::select! {
                Some(()) = snapshot.recv() => {
                    debug!("received SIGUSR1");
                    flags.request_snapshot();
                }
                Some(()) = stop.recv() => {
                    debug!("received SIGTERM");
                    flags.request_stop();
                }
                else => break,
            }
        }
    }))
}
