// Server loop module
// Accepts connections until the shutdown future resolves

use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// Accept loop
///
/// Each accepted connection is handed to its own task. Accept errors are
/// logged and the loop keeps going; only `shutdown` ends it.
pub async fn start_server_loop<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F)
where
    F: Future<Output = &'static str>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            signal = &mut shutdown => {
                logger::log_shutdown(signal);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::registry::TenantRegistry;
    use crate::server::create_listener;
    use std::net::SocketAddr;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    async fn spawn_server() -> (SocketAddr, oneshot::Sender<()>, tokio::task::JoinHandle<()>) {
        let mut cfg = Config::load_from("/nonexistent/tenant-server-config").unwrap();
        cfg.logging.access_log = false;
        let state = Arc::new(AppState::new(&cfg, TenantRegistry::sample()));

        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(start_server_loop(listener, state, async move {
            let _ = rx.await;
            "test"
        }));
        (addr, tx, handle)
    }

    async fn raw_request(addr: SocketAddr, request: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await.unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[tokio::test]
    async fn test_serves_config_over_tcp() {
        let (addr, shutdown, handle) = spawn_server().await;

        let response = raw_request(
            addr,
            "GET /api/config HTTP/1.1\r\nHost: localhost\r\ntenant_id: tenant1\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "{response}");
        assert!(response.contains("content-type: application/json\r\n"));
        assert!(response.contains("access-control-allow-origin: *\r\n"));
        assert!(response.ends_with(
            "{\"tenant_id\":\"tenant1\",\"theme\":\"dark\",\"template\":\"template_1\",\"description\":\"Configuration for Tenant 1\"}\n"
        ));

        shutdown.send(()).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_header_over_tcp() {
        let (addr, shutdown, handle) = spawn_server().await;

        let response = raw_request(
            addr,
            "GET /api/test HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"), "{response}");
        assert!(response.ends_with("Tenant ID is required\n"));

        shutdown.send(()).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_stops_accepting() {
        let (addr, shutdown, handle) = spawn_server().await;
        shutdown.send(()).unwrap();
        handle.await.unwrap();

        // Listener was dropped with the loop
        assert!(TcpStream::connect(addr).await.is_err());
    }
}
