//! Server Module
//!
//! TCP server speaking the line protocol. One task per connection; all
//! connections share one `Store` and its expiration sweeper.

mod config;
mod handler;

pub use config::Config;
pub use handler::Handler;

use crate::metrics::Metrics;
use crate::protocol::LineCodec;
use crate::storage::{ExpirationSweeper, Store};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::codec::Framed;
use tracing::{error, info};

/// tandb server
pub struct Server {
    config: Config,
    store: Store,
    metrics: Arc<Metrics>,
}

impl Server {
    /// Create a new server with the given configuration
    pub fn new(config: Config) -> Self {
        Self {
            config,
            store: Store::new(),
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Bind the configured address and serve until ctrl-c
    pub async fn run(self) -> std::io::Result<()> {
        let addr = self.config.addr();
        let listener = TcpListener::bind(&addr).await?;

        info!("tandb server listening on {}", addr);

        self.serve(listener, async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for ctrl-c: {}", e);
            }
        })
        .await
    }

    /// Accept connections on `listener` until `shutdown` resolves
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()>,
    ) -> std::io::Result<()> {
        let sweeper = ExpirationSweeper::spawn(self.store.clone(), self.config.sweep_interval);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((socket, peer_addr)) => {
                        info!("New connection from {}", peer_addr);

                        let store = self.store.clone();
                        let metrics = self.metrics.clone();
                        let codec = LineCodec::new(self.config.max_line_length);

                        tokio::spawn(async move {
                            let framed = Framed::new(socket, codec);
                            let handler = Handler::new(store, metrics);

                            if let Err(e) = handler.run(framed).await {
                                error!("Connection error from {}: {}", peer_addr, e);
                            }

                            info!("Connection closed: {}", peer_addr);
                        });
                    }
                    Err(e) => {
                        error!("Accept error: {}", e);
                    }
                },
                _ = &mut shutdown => {
                    info!("Shutdown requested, no longer accepting connections");
                    break;
                }
            }
        }

        sweeper.shutdown().await;
        info!("{}", self.metrics.summary());
        Ok(())
    }
}
