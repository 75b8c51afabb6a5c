// Reusable listener module
// Resolves the configured host and binds a TCP listener with socket2

use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::error::{Error, Result};

const BACKLOG: i32 = 128;

/// Resolve `hostname:port` to the first address it names.
pub async fn resolve_addr(hostname: &str, port: u16) -> Result<SocketAddr> {
    let mut addrs = tokio::net::lookup_host((hostname, port))
        .await
        .map_err(|err| Error::InvalidAddress(format!("{hostname}:{port} ({err})")))?;
    addrs
        .next()
        .ok_or_else(|| Error::InvalidAddress(format!("{hostname}:{port}")))
}

/// Create a `TcpListener` with `SO_REUSEADDR` on unix.
///
/// A port held by a live listener still fails to bind. Must be called
/// inside a tokio runtime.
pub fn create_reusable_listener(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    #[cfg(unix)]
    socket.set_reuse_address(true)?;

    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(BACKLOG)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}

/// Bind the listener for `addr`, mapping failures to [`Error::Bind`].
pub fn bind(addr: SocketAddr) -> Result<TcpListener> {
    create_reusable_listener(addr).map_err(|source| Error::Bind {
        addr: addr.to_string(),
        source,
    })
}
