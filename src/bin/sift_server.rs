//! Search gateway server binary.
//!
//! Reads configuration from the TOML file named by `SIFT_CONFIG` (defaults
//! otherwise), serves until Ctrl-C, and logs to stderr. Set `RUST_LOG` to
//! adjust verbosity; query text only appears at `trace`.

use sift::{SearchServer, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::load().map_err(|e| anyhow::anyhow!("failed to load config: {e}"))?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid config: {e}"))?;

    let server = SearchServer::start(&config)
        .await
        .map_err(|e| anyhow::anyhow!("sift-server failed to start: {e}"))?;
    tracing::info!(port = server.port(), "sift-server started");

    tokio::signal::ctrl_c().await?;

    server.shutdown();
    tracing::info!("sift-server shut down cleanly");
    Ok(())
}
