// Connection handling module
// Serves each accepted TCP connection on its own task

use std::net::SocketAddr;
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Spawn a task that serves HTTP/1.1 on `stream` until the peer hangs up.
///
/// Keep-alive is enabled, so one task may answer several requests. The
/// task is detached: shutting down the accept loop does not cancel it.
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
) {
    logger::log_connection_accepted(&peer_addr);
    let state = Arc::clone(state);

    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let mut builder = http1::Builder::new();
        builder.keep_alive(true);

        let service = service_fn(move |req| {
            handler::handle_request(req, Arc::clone(&state), peer_addr)
        });

        if let Err(err) = builder.serve_connection(io, service).await {
            logger::log_connection_error(&err);
        }
    });
}
