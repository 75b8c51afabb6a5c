//! Request dispatch module
//!
//! Entry point for HTTP request processing. Resolution order per request:
//! registered route, static file, 404 status handler, bare `Not Found`.

use http_body_util::BodyExt;
use hyper::body::{Body, Bytes};
use hyper::header::{CONTENT_LENGTH, USER_AGENT};
use hyper::{Response, StatusCode};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::oneshot;

use super::request::{Request, Responder, ResponseOptions};
use super::static_files::StaticFile;
use super::SharedHandler;
use crate::config::{Protocol, ServerConfig};
use crate::http::{self, parse_location, ResponseBody};
use crate::logger::{self, AccessLogEntry, AccessLogFormat};
use crate::routing::Registry;

/// Turns hyper requests into handler invocations
#[derive(Debug)]
pub struct Dispatcher {
    registry: Arc<Registry>,
    options: Arc<ResponseOptions>,
    protocol: Protocol,
    hostname: String,
    port: u16,
    access_log: Option<AccessLogFormat>,
}

impl Dispatcher {
    /// `port` is the bound port, which differs from the configured one when
    /// binding to port 0.
    pub fn new(config: &ServerConfig, registry: Arc<Registry>, port: u16) -> Self {
        Self {
            registry,
            options: Arc::new(ResponseOptions {
                powered_by: config.powered_by,
                static_path: config.static_path.clone(),
            }),
            protocol: config.protocol(),
            hostname: config.hostname.clone(),
            port,
            access_log: None,
        }
    }

    #[must_use]
    pub const fn with_access_log(mut self, format: Option<AccessLogFormat>) -> Self {
        self.access_log = format;
        self
    }

    /// Resolve and answer one request
    ///
    /// Never fails: handler errors, panics and handlers that finish without
    /// responding all produce a 500.
    pub async fn dispatch<B>(
        &self,
        req: hyper::Request<B>,
        remote_addr: Option<SocketAddr>,
    ) -> Response<ResponseBody>
    where
        B: Body<Data = Bytes, Error = hyper::Error> + Send + Sync + 'static,
    {
        let started = Instant::now();
        let mut entry = self.access_log.map(|_| {
            let mut entry = AccessLogEntry::new(
                remote_addr.map_or_else(|| "-".to_string(), |addr| addr.to_string()),
                req.method().to_string(),
                req.uri().to_string(),
            );
            entry.http_version = format!("{:?}", req.version())
                .trim_start_matches("HTTP/")
                .to_string();
            entry.user_agent = req
                .headers()
                .get(USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string);
            entry
        });

        let response = self.resolve(req, remote_addr).await;

        if let (Some(entry), Some(format)) = (entry.as_mut(), self.access_log) {
            entry.status = response.status().as_u16();
            entry.body_bytes = response
                .headers()
                .get(CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
            logger::log_access(entry, format);
        }

        response
    }

    async fn resolve<B>(
        &self,
        req: hyper::Request<B>,
        remote_addr: Option<SocketAddr>,
    ) -> Response<ResponseBody>
    where
        B: Body<Data = Bytes, Error = hyper::Error> + Send + Sync + 'static,
    {
        let table = self.registry.snapshot();
        let (parts, body) = req.into_parts();
        let target = parts
            .uri
            .path_and_query()
            .map_or("/", |pq| pq.as_str())
            .to_string();

        let matched = table.find_route(&parts.method, &target);
        let location = match parse_location(
            self.protocol,
            &self.hostname,
            self.port,
            &target,
            matched.as_ref().map(|(_, m)| m),
        ) {
            Ok(location) => location,
            Err(err) => {
                logger::log_warning(&format!("Rejected request target '{target}': {err}"));
                return http::build_400_response();
            }
        };

        let (tx, rx) = oneshot::channel();
        let responder = Responder::new(tx, Arc::clone(&self.options), Arc::clone(&table));
        let request = Request::new(parts, body.boxed(), remote_addr, location, responder);

        if let Some((route, _)) = matched {
            spawn_handler(Arc::clone(&route.handler), request);
        } else if let Some(file) = self.find_static(&request).await {
            if let Err(err) = request.serve_static(file) {
                logger::log_connection_error(&err);
            }
        } else if let Some(status) = table.find_status(StatusCode::NOT_FOUND) {
            spawn_handler(Arc::clone(&status.handler), request);
        } else if let Err(err) = request.send("Not Found", Some(StatusCode::NOT_FOUND), None) {
            logger::log_connection_error(&err);
        }

        rx.await.unwrap_or_else(|_| http::build_500_response())
    }

    async fn find_static(&self, request: &Request) -> Option<StaticFile> {
        let root = self.options.static_path.as_deref()?;
        StaticFile::lookup(root, request.location().path()).await
    }
}

/// Run a handler in its own task
///
/// A panicking or failing handler drops its request, which the dispatcher
/// observes as a closed channel.
fn spawn_handler(handler: SharedHandler, request: Request) {
    let method = request.method().to_string();
    let path = request.location().path().to_string();
    tokio::spawn(async move {
        if let Err(err) = handler.call(request).await {
            logger::log_handler_error(&method, &path, &err);
        }
    });
}
