//! Logger module
//!
//! Provides logging utilities for the server including:
//! - Subscriber initialization from configuration
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging

mod format;

pub use format::{AccessLogEntry, AccessLogFormat};

use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;
use crate::VERSION;

/// Initialize the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level. Calling this twice
/// is harmless; the second subscriber is ignored.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

pub fn log_greeting() {
    tracing::info!("Thanks for using Revers (v{VERSION})");
}

pub fn log_server_start(listening_url: &str, addr: &SocketAddr) {
    tracing::info!(address = %addr, "Server started: {listening_url}");
}

pub fn log_server_stopped(addr: Option<&SocketAddr>) {
    match addr {
        Some(addr) => tracing::info!(address = %addr, "Server stopped"),
        None => tracing::info!("Server stopped"),
    }
}

pub fn log_connection_error(err: &impl std::fmt::Display) {
    tracing::debug!(error = %err, "Failed to serve connection");
}

pub fn log_error(message: &str) {
    tracing::error!("{message}");
}

pub fn log_warning(message: &str) {
    tracing::warn!("{message}");
}

pub fn log_handler_error(method: &str, path: &str, err: &crate::Error) {
    tracing::error!(method, path, error = %err, "Handler failed");
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: AccessLogFormat) {
    tracing::info!(target: "access", "{}", entry.format(format));
}
