//! Penguin Hacker Game Server
//!
//! Long-running relay hub process. Session endpoints and the world
//! generator live in the library; this binary hosts the realtime
//! presence hub the browser clients connect to.

use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use penguin_hacker::{HubConfig, RelayHub, VERSION};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    let config = HubConfig::from_env();
    info!("Penguin Hacker Server v{}", VERSION);
    info!("Relay hub address: {}", config.bind_addr);
    info!("Client capacity: {}", config.max_clients);

    let hub = Arc::new(RelayHub::new(config));
    let serving = Arc::clone(&hub);
    let server = tokio::spawn(async move { serving.run().await });

    tokio::signal::ctrl_c().await?;
    info!("Interrupt received, shutting down");
    hub.shutdown();
    server.await??;

    Ok(())
}
