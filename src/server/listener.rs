// Listener module
// Creates the TCP listener the accept loop runs on

use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::error::ServerError;

/// Pending-connection queue length passed to `listen(2)`
const BACKLOG: i32 = 1024;

/// Create a `TcpListener` with `SO_REUSEADDR` enabled.
///
/// `SO_REUSEADDR` lets a restarted process rebind while old sockets sit in
/// `TIME_WAIT`. Must be called from within a tokio runtime.
pub fn create_listener(addr: SocketAddr) -> Result<TcpListener, ServerError> {
    bind(addr).map_err(|source| ServerError::Bind { addr, source })
}

fn bind(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(BACKLOG)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn test_bind_conflict_is_error() {
        let first = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = first.local_addr().unwrap();
        match create_listener(addr) {
            Err(ServerError::Bind { addr: failed, .. }) => assert_eq!(failed, addr),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("second bind on {addr} should fail"),
        }
    }
}
