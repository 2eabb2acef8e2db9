// Signal handling module
//
// - SIGTERM: stop accepting and exit
// - SIGINT:  stop accepting and exit (Ctrl+C)
//
// There is no drain: in-flight connections are dropped with the process.

use crate::logger;

/// Resolve with the signal's name once a termination signal arrives.
///
/// If the handlers cannot be registered this never resolves and the
/// process runs until killed.
#[cfg(unix)]
pub async fn wait_for_shutdown() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    let (mut sigterm, mut sigint) =
        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(term), Ok(int)) => (term, int),
            (Err(e), _) | (_, Err(e)) => {
                logger::log_warning(&format!("Failed to register signal handlers: {e}"));
                return std::future::pending().await;
            }
        };

    tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    }
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub async fn wait_for_shutdown() -> &'static str {
    if let Err(e) = tokio::signal::ctrl_c().await {
        logger::log_warning(&format!("Failed to register Ctrl+C handler: {e}"));
        return std::future::pending().await;
    }
    "Ctrl+C"
}
