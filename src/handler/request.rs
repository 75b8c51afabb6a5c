//! Augmented request module
//!
//! A [`Request`] carries the parsed request plus the response helpers for
//! exactly one request-response cycle. Every helper consumes the request,
//! so a response can only be produced once.

use http_body_util::{BodyExt, Empty};
use hyper::body::Bytes;
use hyper::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use hyper::http::request::Parts;
use hyper::{Method, Response, StatusCode, Uri, Version};
use serde::Serialize;
use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::oneshot;
use url::Url;

use super::static_files::{resolve, StaticFile};
use crate::error::{Error, Result};
use crate::http::response::powered_by_value;
use crate::http::{body, build_response, Location, ParamValue, Params, Query, RequestBody, ResponseBody, POWERED_BY};
use crate::routing::RouteTable;

/// Server options the response helpers need
#[derive(Debug, Clone, Default)]
pub struct ResponseOptions {
    pub powered_by: bool,
    pub static_path: Option<PathBuf>,
}

/// Where a request's response goes
pub(crate) struct Responder {
    tx: oneshot::Sender<Response<ResponseBody>>,
    options: Arc<ResponseOptions>,
    table: Arc<RouteTable>,
}

impl Responder {
    pub(crate) fn new(
        tx: oneshot::Sender<Response<ResponseBody>>,
        options: Arc<ResponseOptions>,
        table: Arc<RouteTable>,
    ) -> Self {
        Self { tx, options, table }
    }

    fn write(self, response: Response<ResponseBody>) -> Result<()> {
        self.tx.send(response).map_err(|_| Error::ResponseDropped)
    }
}

/// An incoming request augmented with its parsed location and the
/// response helpers
pub struct Request {
    method: Method,
    uri: Uri,
    version: Version,
    headers: HeaderMap,
    body: RequestBody,
    remote_addr: Option<SocketAddr>,
    location: Location,
    responder: Responder,
}

impl Request {
    pub(crate) fn new(
        parts: Parts,
        body: RequestBody,
        remote_addr: Option<SocketAddr>,
        location: Location,
        responder: Responder,
    ) -> Self {
        Self {
            method: parts.method,
            uri: parts.uri,
            version: parts.version,
            headers: parts.headers,
            body,
            remote_addr,
            location,
            responder,
        }
    }

    pub const fn method(&self) -> &Method {
        &self.method
    }

    pub const fn uri(&self) -> &Uri {
        &self.uri
    }

    pub const fn version(&self) -> Version {
        self.version
    }

    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub const fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }

    /// Absolute location of the request
    pub const fn location(&self) -> &Url {
        &self.location.url
    }

    pub const fn params(&self) -> &Params {
        &self.location.params
    }

    pub fn param(&self, name: &str) -> Option<&ParamValue> {
        self.location.params.get(name)
    }

    pub const fn query(&self) -> &Query {
        &self.location.query
    }

    /// Collect the full request body
    ///
    /// The body can be read once; later calls return empty bytes.
    pub async fn bytes(&mut self) -> Result<Bytes> {
        let body = std::mem::replace(
            &mut self.body,
            Empty::<Bytes>::new().map_err(|never| match never {}).boxed(),
        );
        Ok(body.collect().await?.to_bytes())
    }

    pub async fn text(&mut self) -> Result<String> {
        let bytes = self.bytes().await?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }

    /// Send a prepared response, adding `x-powered-by` when enabled
    pub fn respond(self, mut response: Response<ResponseBody>) -> Result<()> {
        if self.responder.options.powered_by {
            response
                .headers_mut()
                .insert(POWERED_BY, powered_by_value());
        }
        self.responder.write(response)
    }

    /// Send `body` with an optional status (200 by default) and headers
    pub fn send(
        self,
        body: impl Into<Bytes>,
        status: Option<StatusCode>,
        headers: Option<HeaderMap>,
    ) -> Result<()> {
        let response = build_response(status.unwrap_or(StatusCode::OK), headers, body::full(body));
        self.respond(response)
    }

    /// Send a file from the static root
    ///
    /// Fails with [`Error::MissingStaticFileOption`] when no static root is
    /// configured and [`Error::FileReadFailure`] when the file cannot be
    /// opened. The file is streamed and closed once the body is done.
    pub async fn file(
        self,
        path: impl AsRef<Path>,
        status: Option<StatusCode>,
        headers: Option<HeaderMap>,
    ) -> Result<()> {
        let options = Arc::clone(&self.responder.options);
        let root = options
            .static_path
            .as_deref()
            .ok_or(Error::MissingStaticFileOption)?;

        let path = path.as_ref();
        let Some(full_path) = resolve(root, path) else {
            return Err(Error::FileReadFailure {
                path: root.join(path),
                source: io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "path escapes the static root",
                ),
            });
        };

        let file = StaticFile::open(full_path).await?;
        self.respond(file.into_response(status.unwrap_or(StatusCode::OK), headers))
    }

    /// Send `value` as JSON
    ///
    /// `content-type` is always `application/json`. No `x-powered-by`
    /// header is added.
    pub fn json<T: Serialize + ?Sized>(
        self,
        value: &T,
        status: Option<StatusCode>,
        headers: Option<HeaderMap>,
    ) -> Result<()> {
        let payload = serde_json::to_vec(value)?;
        let mut headers = headers.unwrap_or_default();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let response = build_response(
            status.unwrap_or(StatusCode::OK),
            Some(headers),
            body::full(payload),
        );
        self.responder.write(response)
    }

    /// Respond with a status code
    ///
    /// Delegates to the first status handler registered for `status`;
    /// without one, sends an empty response with `status` and `headers`.
    pub async fn status(self, status: StatusCode, headers: Option<HeaderMap>) -> Result<()> {
        if let Some(entry) = self.responder.table.find_status(status) {
            return entry.handler.call(self).await;
        }
        self.responder
            .write(build_response(status, headers, body::empty()))
    }

    pub(crate) fn serve_static(self, file: StaticFile) -> Result<()> {
        self.respond(file.into_response(StatusCode::OK, None))
    }
}

impl std::fmt::Debug for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Request")
            .field("method", &self.method)
            .field("uri", &self.uri)
            .field("location", &self.location.url.as_str())
            .field("params", &self.location.params)
            .finish_non_exhaustive()
    }
}
