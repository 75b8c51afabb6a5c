//! Revers
//!
//! A small HTTP/HTTPS routing framework. Requests are resolved against
//! registered route patterns first, then files under the static root, then
//! a registered 404 status handler, and finally a bare `Not Found`.
//!
//! ```no_run
//! use revers::{Request, Server, ServerConfig};
//!
//! # async fn run() -> revers::Result<()> {
//! let server = Server::new(ServerConfig::default()).await?;
//! server.get("/:organization/:repo", |req: Request| async move {
//!     let params = req.params().clone();
//!     req.json(&params, None, None)
//! });
//! server.start().await
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod routing;
pub mod server;

pub use crate::config::{AppConfig, LoggingConfig, Protocol, ServerConfig};
pub use crate::error::{Error, Result};
pub use crate::handler::{Handler, Request};
pub use crate::http::{ParamValue, Params, Query};
pub use crate::routing::{RouteEntry, StatusEntry};
pub use crate::server::{Server, ServerState};

/// Crate version, sent in the `x-powered-by` header
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
