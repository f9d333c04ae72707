//! ProxyServer and its accept loop.

use super::handler::ProxyHandler;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info};

/// HTTP/1.1 listener in front of a [`ProxyHandler`].
pub struct ProxyServer {
    addr: SocketAddr,
    handler: Arc<ProxyHandler>,
}

impl ProxyServer {
    pub fn new(addr: SocketAddr, handler: Arc<ProxyHandler>) -> Self {
        Self { addr, handler }
    }

    /// Bind the configured address and serve until the process stops.
    pub async fn run(self) -> Result<(), anyhow::Error> {
        let listener = TcpListener::bind(self.addr).await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener.
    pub async fn serve(self, listener: TcpListener) -> Result<(), anyhow::Error> {
        info!("Proxy listening on http://{}", listener.local_addr()?);
        info!(
            "Starting in {} mode",
            self.handler.state().mode.get().as_str()
        );

        loop {
            let (stream, remote_addr) = listener.accept().await?;
            let io = TokioIo::new(stream);
            let handler = Arc::clone(&self.handler);

            tokio::spawn(async move {
                let service = service_fn(move |req| {
                    let handler = Arc::clone(&handler);
                    async move { Ok::<_, Infallible>(handler.handle(req).await) }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    debug!("Error serving connection from {}: {}", remote_addr, err);
                }
            });
        }
    }
}
