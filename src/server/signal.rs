// Signal handling module
//
// Supported signals:
// - SIGTERM: stop accepting connections
// - SIGINT:  stop accepting connections (Ctrl+C)

use crate::logger;

/// Resolve once a shutdown signal arrives, yielding its name
///
/// If a handler cannot be installed the failure is logged and that signal
/// is simply never observed.
#[cfg(unix)]
pub async fn shutdown_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                () = ctrl_c() => "SIGINT",
                _ = sigterm.recv() => "SIGTERM",
            }
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to install SIGTERM handler: {e}"));
            ctrl_c().await;
            "SIGINT"
        }
    }
}

#[cfg(not(unix))]
pub async fn shutdown_signal() -> &'static str {
    ctrl_c().await;
    "Ctrl+C"
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        logger::log_warning(&format!("Failed to install Ctrl+C handler: {e}"));
        std::future::pending::<()>().await;
    }
}
