// Server module entry
// Owns configuration, the listener and the accept loop

pub mod connection;
pub mod listener;
pub mod signal;
pub mod tls;

use hyper::{Method, StatusCode};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio_rustls::TlsAcceptor;

use crate::config::{LoggingConfig, ServerConfig};
use crate::error::{Error, Result};
use crate::handler::{Dispatcher, Handler};
use crate::logger::{self, AccessLogFormat};
use crate::routing::{Registry, RouteEntry, StatusEntry};

pub use connection::accept_connection;
pub use listener::create_reusable_listener;

/// Lifecycle state of a [`Server`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Stopped,
    Started,
}

/// An HTTP or HTTPS server with its own route and status registries
///
/// The listener is bound on construction; connections queue until
/// [`Server::start`] runs the accept loop.
pub struct Server {
    config: Arc<ServerConfig>,
    registry: Arc<Registry>,
    dispatcher: Arc<Dispatcher>,
    listener: Mutex<Option<TcpListener>>,
    tls: Option<TlsAcceptor>,
    local_addr: SocketAddr,
    started: AtomicBool,
    shutdown: Notify,
}

impl Server {
    /// Bind a server for `config` with access logging in the default format.
    pub async fn new(config: ServerConfig) -> Result<Self> {
        Self::with_logging(config, &LoggingConfig::default()).await
    }

    /// Bind a server, taking access log settings from `logging`.
    pub async fn with_logging(config: ServerConfig, logging: &LoggingConfig) -> Result<Self> {
        config.validate()?;

        let tls = match (config.https, &config.cert_file, &config.key_file) {
            (true, Some(cert), Some(key)) => Some(tls::load_tls_acceptor(cert, key).await?),
            (true, _, _) => return Err(Error::MissingHttpsOption),
            (false, _, _) => None,
        };

        let addr = listener::resolve_addr(&config.hostname, config.port).await?;
        let tcp = listener::bind(addr)?;
        let local_addr = tcp.local_addr().map_err(|source| Error::Bind {
            addr: addr.to_string(),
            source,
        })?;

        let access_log = if logging.access_log {
            match logging.access_log_format.parse::<AccessLogFormat>() {
                Ok(format) => Some(format),
                Err(err) => {
                    logger::log_warning(&format!("{err}, falling back to combined"));
                    Some(AccessLogFormat::default())
                }
            }
        } else {
            None
        };

        let registry = Arc::new(Registry::new());
        let dispatcher = Dispatcher::new(&config, Arc::clone(&registry), local_addr.port())
            .with_access_log(access_log);

        logger::log_greeting();

        Ok(Self {
            config: Arc::new(config),
            registry,
            dispatcher: Arc::new(dispatcher),
            listener: Mutex::new(Some(tcp)),
            tls,
            local_addr,
            started: AtomicBool::new(false),
            shutdown: Notify::new(),
        })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Address the listener is bound to
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn state(&self) -> ServerState {
        if self.started.load(Ordering::SeqCst) {
            ServerState::Started
        } else {
            ServerState::Stopped
        }
    }

    /// `protocol://hostname:port` with the bound port
    pub fn listening_url(&self) -> String {
        format!(
            "{}://{}:{}",
            self.config.protocol(),
            self.config.hostname,
            self.local_addr.port()
        )
    }

    pub fn get(&self, pattern: &str, handler: impl Handler) {
        self.route(Method::GET, pattern, handler);
    }

    pub fn post(&self, pattern: &str, handler: impl Handler) {
        self.route(Method::POST, pattern, handler);
    }

    pub fn put(&self, pattern: &str, handler: impl Handler) {
        self.route(Method::PUT, pattern, handler);
    }

    pub fn patch(&self, pattern: &str, handler: impl Handler) {
        self.route(Method::PATCH, pattern, handler);
    }

    pub fn delete(&self, pattern: &str, handler: impl Handler) {
        self.route(Method::DELETE, pattern, handler);
    }

    pub fn options(&self, pattern: &str, handler: impl Handler) {
        self.route(Method::OPTIONS, pattern, handler);
    }

    pub fn connect(&self, pattern: &str, handler: impl Handler) {
        self.route(Method::CONNECT, pattern, handler);
    }

    pub fn trace(&self, pattern: &str, handler: impl Handler) {
        self.route(Method::TRACE, pattern, handler);
    }

    pub fn head(&self, pattern: &str, handler: impl Handler) {
        self.route(Method::HEAD, pattern, handler);
    }

    fn route(&self, method: Method, pattern: &str, handler: impl Handler) {
        self.add_route_handler([RouteEntry::new(method, pattern, handler)]);
    }

    /// Append route entries; later entries shadow earlier overlapping ones.
    pub fn add_route_handler(&self, entries: impl IntoIterator<Item = RouteEntry>) {
        self.registry.add_routes(entries);
    }

    /// Append status entries; the first entry for a code wins.
    pub fn add_status_handler(&self, entries: impl IntoIterator<Item = StatusEntry>) {
        self.registry.add_statuses(entries);
    }

    pub fn handle_status(&self, status: StatusCode, handler: impl Handler) {
        self.add_status_handler([StatusEntry::new(status, handler)]);
    }

    fn take_listener(&self) -> Option<TcpListener> {
        self.listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Run the accept loop until [`Server::stop`] is called
    ///
    /// Each connection is served in its own task, so a slow handler never
    /// blocks accepting. Returns [`Error::ListenerClosed`] when the server
    /// was stopped before starting or is already running.
    pub async fn start(&self) -> Result<()> {
        let listener = self.take_listener().ok_or(Error::ListenerClosed)?;

        self.started.store(true, Ordering::SeqCst);
        logger::log_server_start(&self.listening_url(), &self.local_addr);

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer_addr)) => accept_connection(
                        stream,
                        peer_addr,
                        self.tls.clone(),
                        Arc::clone(&self.dispatcher),
                        self.config.keep_alive,
                    ),
                    Err(err) => logger::log_error(&format!("Failed to accept connection: {err}")),
                },
                () = self.shutdown.notified() => break,
            }
        }

        drop(listener);
        self.started.store(false, Ordering::SeqCst);
        Ok(())
    }

    /// Close the listener and mark the server stopped
    ///
    /// In-flight connections finish on their own tasks.
    pub fn stop(&self) {
        if self.take_listener().is_none() {
            self.shutdown.notify_one();
        }
        self.started.store(false, Ordering::SeqCst);
        logger::log_server_stopped(Some(&self.local_addr));
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("config", &self.config)
            .field("local_addr", &self.local_addr)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
