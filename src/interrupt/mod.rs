//! Interrupt handling for a crawl invocation
//!
//! An [`InterruptSource`] turns the first SIGINT or SIGTERM delivered to the
//! process into a one-shot [`StopSignal`]. The signal is handed explicitly to
//! the phase runner and the fetcher; nothing here is global, so two crawls in
//! the same process each get their own source.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::task::JoinHandle;
#[cfg(unix)]
use tokio::signal::unix::{signal, Signal, SignalKind};
use tokio_util::sync::CancellationToken;

/// Read-only view of a one-shot stop request
///
/// Cloning is cheap. Holders can observe the signal but cannot fire it.
#[derive(Debug, Clone)]
pub struct StopSignal {
    token: CancellationToken,
}

impl StopSignal {
    /// Returns true once the owning source has fired
    pub fn is_fired(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Waits until the owning source fires
    pub async fn fired(&self) {
        self.token.cancelled().await
    }
}

/// Owner of a stop signal and, optionally, the OS signal listener feeding it
pub struct InterruptSource {
    token: CancellationToken,
    fired: Arc<AtomicBool>,
    listener: Option<JoinHandle<()>>,
}

impl InterruptSource {
    /// Starts listening for SIGINT and SIGTERM
    ///
    /// Must be called from within a tokio runtime. The OS handlers are
    /// installed before this returns, and stay installed for the rest of the
    /// process: once a source has listened, SIGINT and SIGTERM no longer
    /// terminate the process, even after the source is dropped. The listener
    /// task lives until the source is dropped and stops after the first
    /// notification.
    pub fn listen() -> Self {
        let token = CancellationToken::new();
        let fired = Arc::new(AtomicBool::new(false));

        let interrupt = OsInterrupt::register();
        let task_token = token.clone();
        let task_fired = fired.clone();
        let listener = tokio::spawn(async move {
            interrupt.recv().await;
            tracing::warn!("Interrupt signal received");
            fire_once(&task_token, &task_fired);
        });

        Self {
            token,
            fired,
            listener: Some(listener),
        }
    }

    /// Creates a source with no OS listener; it only fires through [`fire`](Self::fire)
    pub fn detached() -> Self {
        Self {
            token: CancellationToken::new(),
            fired: Arc::new(AtomicBool::new(false)),
            listener: None,
        }
    }

    /// Returns a read-only handle on this source's signal
    pub fn signal(&self) -> StopSignal {
        StopSignal {
            token: self.token.clone(),
        }
    }

    /// Fires the signal
    ///
    /// Returns true only for the call that actually moved the signal from
    /// pending to fired.
    pub fn fire(&self) -> bool {
        fire_once(&self.token, &self.fired)
    }

    /// Returns true if the signal has fired
    pub fn is_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }
}

impl Drop for InterruptSource {
    fn drop(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
    }
}

fn fire_once(token: &CancellationToken, fired: &AtomicBool) -> bool {
    if fired.swap(true, Ordering::SeqCst) {
        return false;
    }
    token.cancel();
    true
}

/// Registered SIGINT and SIGTERM streams
#[cfg(unix)]
struct OsInterrupt {
    interrupt: Option<Signal>,
    terminate: Option<Signal>,
}

#[cfg(unix)]
impl OsInterrupt {
    fn register() -> Self {
        Self {
            interrupt: register_signal(SignalKind::interrupt(), "SIGINT"),
            terminate: register_signal(SignalKind::terminate(), "SIGTERM"),
        }
    }

    async fn recv(mut self) {
        tokio::select! {
            _ = recv_signal(self.interrupt.as_mut()) => {}
            _ = recv_signal(self.terminate.as_mut()) => {}
        }
    }
}

#[cfg(unix)]
fn register_signal(kind: SignalKind, name: &str) -> Option<Signal> {
    match signal(kind) {
        Ok(stream) => Some(stream),
        Err(e) => {
            tracing::warn!("Failed to register {} handler: {}", name, e);
            None
        }
    }
}

/// Resolves on the next delivery; never resolves for a missing stream
#[cfg(unix)]
async fn recv_signal(stream: Option<&mut Signal>) {
    match stream {
        Some(stream) => {
            if stream.recv().await.is_none() {
                std::future::pending::<()>().await;
            }
        }
        None => std::future::pending::<()>().await,
    }
}

// Ctrl-C is only hooked once the listener task first runs
#[cfg(not(unix))]
struct OsInterrupt;

#[cfg(not(unix))]
impl OsInterrupt {
    fn register() -> Self {
        Self
    }

    async fn recv(self) {
        let _ = tokio::signal::ctrl_c().await;
    }
}
