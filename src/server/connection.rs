// Connection handling module
// Serves a single accepted TCP connection, optionally over TLS

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_rustls::TlsAcceptor;

use crate::handler::Dispatcher;
use crate::logger;

/// Handle a connection in a spawned task.
///
/// With an acceptor the TLS handshake runs first; a failed handshake only
/// drops this connection.
pub fn accept_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    tls: Option<TlsAcceptor>,
    dispatcher: Arc<Dispatcher>,
    keep_alive: bool,
) {
    tokio::spawn(async move {
        match tls {
            Some(acceptor) => match acceptor.accept(stream).await {
                Ok(tls_stream) => serve(tls_stream, peer_addr, dispatcher, keep_alive).await,
                Err(err) => logger::log_connection_error(&format!("TLS handshake with {peer_addr} failed: {err}")),
            },
            None => serve(stream, peer_addr, dispatcher, keep_alive).await,
        }
    });
}

async fn serve<S>(stream: S, peer_addr: SocketAddr, dispatcher: Arc<Dispatcher>, keep_alive: bool)
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let io = TokioIo::new(stream);

    let mut builder = http1::Builder::new();
    builder.keep_alive(keep_alive);

    let conn = builder.serve_connection(
        io,
        service_fn(move |req| {
            let dispatcher = Arc::clone(&dispatcher);
            async move { Ok::<_, Infallible>(dispatcher.dispatch(req, Some(peer_addr)).await) }
        }),
    );

    if let Err(err) = conn.await {
        logger::log_connection_error(&err);
    }
}
