use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::broker::{BrokerLink, ConnectionManager};
use crate::core::{Config, ServerState};

/// Grace period for the broker worker on shutdown.
const SHUTDOWN_GRACE_SECS: u64 = 10;

/// 服务器 - broker worker + HTTP API 的生命周期管理
pub struct Server {
    config: Config,
    state: ServerState,
    broker: BrokerLink,
}

impl Server {
    pub fn with_state(config: Config, state: ServerState, broker: BrokerLink) -> Self {
        Self {
            config,
            state,
            broker,
        }
    }

    /// Run until ctrl-c: spawns the broker worker, serves the HTTP API, then
    /// shuts both down through the shared cancellation token.
    pub async fn run(self) -> anyhow::Result<()> {
        let shutdown = CancellationToken::new();

        let manager = ConnectionManager::new(self.state.clone(), self.broker, shutdown.clone());
        let broker_task = tokio::spawn(manager.run());

        let app = crate::api::router(self.state.clone());
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, "HTTP API listening");

        let http_shutdown = shutdown.clone();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("Shutdown signal received");
                    }
                    _ = http_shutdown.cancelled() => {}
                }
            })
            .await?;

        // HTTP is down; stop the broker worker with a bounded grace period.
        shutdown.cancel();
        if tokio::time::timeout(Duration::from_secs(SHUTDOWN_GRACE_SECS), broker_task)
            .await
            .is_err()
        {
            tracing::warn!("Broker worker did not stop within grace period");
        }

        Ok(())
    }
}
