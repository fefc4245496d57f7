//! Inbound HTTP server passthrough.
//!
//! Thin wrapper over `tiny_http`: the connection core only needs to start a
//! server once the station is connected and stop it on teardown. Routing is
//! deliberately minimal (a set of static HTML routes), and every request
//! logs the peer address, mirroring the platform server's open/close
//! notifications.

use log::{error, info, warn};
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Method, Response, Server};

/// Default port for the inbound server.
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Static routes served by the inbound server: path → HTML body.
pub type Routes = HashMap<String, String>;

/// Inbound HTTP server handle.
///
/// Runs in a background thread; drop it (or call [`stop`](Self::stop)) to
/// shut it down.
pub struct InboundServer {
    handle: Option<thread::JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
    local_addr: SocketAddr,
}

impl InboundServer {
    /// Start the server.
    ///
    /// # Arguments
    ///
    /// * `bind_addr` - IP address to bind to (use `None` for 0.0.0.0)
    /// * `port` - port to listen on (0 picks an ephemeral port)
    /// * `routes` - static HTML routes to serve
    pub fn start(
        bind_addr: Option<IpAddr>,
        port: u16,
        routes: Routes,
    ) -> Result<Self, std::io::Error> {
        let addr = match bind_addr {
            Some(ip) => format!("{}:{}", ip, port),
            None => format!("0.0.0.0:{}", port),
        };

        let server = Server::http(&addr)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::AddrInUse, format!("{}", e)))?;
        let local_addr = match server.server_addr().to_ip() {
            Some(ip_addr) => ip_addr,
            None => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::AddrNotAvailable,
                    "server bound to a non-IP address",
                ))
            }
        };

        info!("Inbound server listening on http://{}/", local_addr);

        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_flag = shutdown.clone();
        let handle = thread::spawn(move || {
            Self::serve(server, routes, shutdown_flag);
        });

        Ok(Self {
            handle: Some(handle),
            shutdown,
            local_addr,
        })
    }

    /// The address the server actually bound.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    fn serve(server: Server, routes: Routes, shutdown: Arc<AtomicBool>) {
        let content_type = Header::from_bytes(&b"Content-Type"[..], &b"text/html"[..])
            .expect("static header");
        let allow_get = Header::from_bytes(&b"Allow"[..], &b"GET"[..]).expect("static header");

        loop {
            if shutdown.load(Ordering::Acquire) {
                info!("Inbound server shutting down");
                break;
            }

            match server.recv_timeout(Duration::from_millis(100)) {
                Ok(Some(request)) => {
                    match request.remote_addr() {
                        Some(peer) => info!("Client connected: {}", peer),
                        None => info!("Client connected (no peer address)"),
                    }

                    if request.method() != &Method::Get {
                        let response = Response::from_string("Method Not Allowed")
                            .with_status_code(405)
                            .with_header(allow_get.clone());
                        let _ = request.respond(response);
                        continue;
                    }

                    let path = request.url().trim_end_matches('/');
                    let path = if path.is_empty() { "/" } else { path };

                    if let Some(body) = routes.get(path) {
                        let response = Response::from_string(body.clone())
                            .with_header(content_type.clone())
                            .with_status_code(200);
                        if let Err(e) = request.respond(response) {
                            warn!("Failed to send response: {}", e);
                        }
                    } else {
                        let response = Response::from_string("Not Found").with_status_code(404);
                        if let Err(e) = request.respond(response) {
                            warn!("Failed to send 404: {}", e);
                        }
                    }
                }
                Ok(None) => {
                    // Timeout, check shutdown flag and continue
                }
                Err(e) => {
                    error!("Inbound server error: {}", e);
                    break;
                }
            }
        }
    }

    /// Stop the server.
    ///
    /// Note: may take up to 100ms due to the polling interval.
    pub fn stop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for InboundServer {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::{Ipv4Addr, TcpStream};

    fn request(addr: SocketAddr, path: &str) -> String {
        let mut stream = TcpStream::connect(addr).unwrap();
        write!(
            stream,
            "GET {} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
            path
        )
        .unwrap();
        let mut reply = String::new();
        stream.read_to_string(&mut reply).unwrap();
        reply
    }

    fn test_routes() -> Routes {
        let mut routes = Routes::new();
        routes.insert("/".to_string(), "<h1>Hello World!</h1>".to_string());
        routes
    }

    #[test]
    fn test_serves_registered_route() {
        let mut server = InboundServer::start(
            Some(IpAddr::V4(Ipv4Addr::LOCALHOST)),
            0,
            test_routes(),
        )
        .unwrap();

        let reply = request(server.local_addr(), "/");
        assert!(reply.starts_with("HTTP/1.1 200"));
        assert!(reply.contains("<h1>Hello World!</h1>"));

        server.stop();
    }

    #[test]
    fn test_unknown_path_is_404() {
        let mut server = InboundServer::start(
            Some(IpAddr::V4(Ipv4Addr::LOCALHOST)),
            0,
            test_routes(),
        )
        .unwrap();

        let reply = request(server.local_addr(), "/missing");
        assert!(reply.starts_with("HTTP/1.1 404"));

        server.stop();
    }

    #[test]
    fn test_stop_joins_cleanly() {
        let mut server = InboundServer::start(
            Some(IpAddr::V4(Ipv4Addr::LOCALHOST)),
            0,
            Routes::new(),
        )
        .unwrap();
        server.stop();
        // A second stop is a no-op.
        server.stop();
    }
}
