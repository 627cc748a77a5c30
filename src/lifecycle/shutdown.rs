//! Signal handling for graceful shutdown

use std::io;

use tracing::debug;

#[cfg(unix)]
use tokio::signal::unix::{signal, Signal, SignalKind};

/// Resolves once SIGTERM or SIGINT arrives (Ctrl-C elsewhere)
pub struct ShutdownSignal {
    #[cfg(unix)]
    sigterm: Signal,
    #[cfg(unix)]
    sigint: Signal,
}

impl ShutdownSignal {
    /// Register the signal handlers. Must be called inside a tokio runtime.
    #[cfg(unix)]
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            sigterm: signal(SignalKind::terminate())?,
            sigint: signal(SignalKind::interrupt())?,
        })
    }

    #[cfg(not(unix))]
    pub fn new() -> io::Result<Self> {
        Ok(Self {})
    }

    /// Wait for a shutdown signal
    #[cfg(unix)]
    pub async fn wait(&mut self) {
        tokio::select! {
            _ = self.sigterm.recv() => {
                debug!("received SIGTERM");
            }
            _ = self.sigint.recv() => {
                debug!("received SIGINT");
            }
        }
    }

    #[cfg(not(unix))]
    pub async fn wait(&mut self) {
        match tokio::signal::ctrl_c().await {
            Ok(()) => debug!("received Ctrl-C"),
            Err(e) => {
                debug!(error = %e, "Ctrl-C handler failed, waiting forever");
                std::future::pending::<()>().await
            }
        }
    }
}
