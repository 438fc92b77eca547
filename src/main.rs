use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use westward_client::config::ClientConfig;
use westward_client::game::wander::WanderInput;
use westward_client::metrics::ClientMetrics;
use westward_client::net::game_session::{bootstrap, run_game_loop};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    info!("Westward Client v{}", env!("CARGO_PKG_VERSION"));

    let config = ClientConfig::load_or_default();
    config.validate().map_err(anyhow::Error::msg)?;
    info!(
        "Configuration loaded: relay {}, map {}x{}, {} Hz, {} enemies",
        config.server_addr, config.map_width, config.map_height, config.tick_rate, config.enemy_count
    );

    let metrics = Arc::new(ClientMetrics::new());

    let (mut session, inbox) = bootstrap(&config, WanderInput::new(), metrics.clone()).await?;

    let shutdown = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        ticks = run_game_loop(&mut session, &inbox, config.tick_duration(), None) => {
            info!("Game loop ended after {} ticks", ticks);
        }
        _ = shutdown => {
            info!("Shutting down...");
        }
    }

    info!("Final metrics:\n{}", metrics.to_json());
    info!("Client stopped");

    Ok(())
}
