// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

use std::sync::Arc;

use super::Server;
use crate::logger;

/// Stop `server` on SIGINT or SIGTERM (unix)
#[cfg(unix)]
pub fn stop_on_shutdown_signal(server: Arc<Server>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(term), Ok(int)) => (term, int),
                (Err(err), _) | (_, Err(err)) => {
                    logger::log_error(&format!("Failed to register signal handlers: {err}"));
                    return;
                }
            };

        tokio::select! {
            _ = sigterm.recv() => logger::log_warning("SIGTERM received, shutting down"),
            _ = sigint.recv() => logger::log_warning("SIGINT received, shutting down"),
        }
        server.stop();
    });
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn stop_on_shutdown_signal(server: Arc<Server>) {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            logger::log_warning("Ctrl+C received, shutting down");
            server.stop();
        }
    });
}
