use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fabric_bridge::config::{load_config, BridgeConfig};
use fabric_bridge::gateway::FabricConnector;
use fabric_bridge::http::HttpServer;
use fabric_bridge::lifecycle::Shutdown;

#[derive(Parser)]
#[command(name = "fabric-bridge")]
#[command(about = "HTTP bridge for submitting transactions to a Fabric gateway peer", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "bridge.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fabric_bridge=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("fabric-bridge v0.1.0 starting");

    let cli = Cli::parse();
    let config = if cli.config.exists() {
        load_config(&cli.config)?
    } else {
        tracing::warn!(path = %cli.config.display(), "config file not found, using defaults");
        BridgeConfig::default()
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        gateway_endpoint = %config.gateway.endpoint,
        credential_root = %config.credentials.root_path,
        commit_budget_secs = config.timeouts.commit_status_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(address = %local_addr, "Listening for connections");

    let connector = Arc::new(FabricConnector::new(config.clone()));
    let server = HttpServer::new(config, connector);

    let shutdown = Shutdown::new();
    let trigger = shutdown.trigger_on_ctrl_c();
    tokio::spawn(trigger);

    server.run(listener, &shutdown).await?;

    Ok(())
}
