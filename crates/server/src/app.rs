use anyhow::Context;
use tracing::instrument;

use crate::{
    AppState,
    auth::{AuthService, BattleNetProvider},
    config::ServerConfig,
    routes,
};

pub struct Server;

impl Server {
    #[instrument(
        name = "arcade_server",
        skip(config),
        fields(listen_addr = %config.listen_addr, region = %config.battlenet.region().as_str())
    )]
    pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
        let listen_addr = config.listen_addr.clone();

        let provider =
            BattleNetProvider::new(&config.battlenet).context("failed to build provider client")?;
        let auth = AuthService::new(provider, config.public_base_url.clone());
        let state = AppState::new(config, auth);

        let app = routes::router(state);

        let listener = tokio::net::TcpListener::bind(&listen_addr)
            .await
            .with_context(|| format!("failed to bind {listen_addr}"))?;

        tracing::info!("server running on http://{}", listener.local_addr()?);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("server error")?;

        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let terminate = async {
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
            } else {
                tracing::error!("Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        };

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await;
    }
}
