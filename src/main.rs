use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vclock_rpc::api;
use vclock_rpc::cli;
use vclock_rpc::node::NodeAgent;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vclock_rpc=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse args and env vars
    let settings = cli::Cli::parse().into_settings();
    let socket_address = settings.socket_address()?;

    // The server's one clock lives in this agent and is shared by every handler
    let agent = NodeAgent::server(settings.node_name()?.as_str())?;

    let role = agent.role();

    // Build Axum Router
    let api = api::api_with_timeout(agent, settings.request_timeout()).await?;

    // Start server
    info!(
        "Starting vclock-rpc {} node '{}' on {}",
        role, settings.node_id, socket_address
    );
    let listener = tokio::net::TcpListener::bind(socket_address).await?;
    axum::serve(listener, api).await?;

    Ok(())
}
