//! Signal handling for graceful daemon shutdown.
//!
//! Waits for SIGINT (Ctrl+C) or, on Unix, SIGTERM and reports which one
//! arrived so the HTTP server can drain and the runtime can stop.

use tracing::{info, warn};

/// Signal types that stop the daemon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    /// SIGTERM - Graceful termination request.
    Terminate,
    /// SIGINT - Interrupt (Ctrl+C).
    Interrupt,
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalKind::Terminate => write!(f, "SIGTERM"),
            SignalKind::Interrupt => write!(f, "SIGINT"),
        }
    }
}

/// Wait for SIGINT.
///
/// If the handler cannot be installed the future never resolves, leaving
/// SIGTERM as the only way to stop.
async fn interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for SIGINT");
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{signal, SignalKind as UnixSignal};

    match signal(UnixSignal::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(e) => {
            warn!(error = %e, "Failed to listen for SIGTERM");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}

/// Resolve once a shutdown signal arrives.
pub async fn wait_for_shutdown() -> SignalKind {
    let kind = tokio::select! {
        () = interrupt() => SignalKind::Interrupt,
        () = terminate() => SignalKind::Terminate,
    };
    info!(signal = %kind, "Shutdown signal received");
    kind
}
