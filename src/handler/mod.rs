//! Request handler module
//!
//! The augmented [`Request`] handed to user code, its response helpers,
//! static file lookup, and the dispatcher that picks a handler per request.

pub mod dispatcher;
pub mod request;
pub mod static_files;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

pub use dispatcher::Dispatcher;
pub use request::Request;

use crate::error::Result;

/// Future returned by a handler invocation
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<()>> + Send + 'static>>;

/// User code invoked for a matched route or a status code
///
/// Implemented for any `Fn(Request) -> impl Future<Output = Result<()>>`.
/// A handler finishes the request by calling one of the response helpers
/// on [`Request`].
pub trait Handler: Send + Sync + 'static {
    fn call(&self, request: Request) -> HandlerFuture;
}

impl<F, Fut> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    fn call(&self, request: Request) -> HandlerFuture {
        Box::pin(self(request))
    }
}

pub type SharedHandler = Arc<dyn Handler>;
