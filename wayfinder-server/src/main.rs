use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use wayfinder_core::navigator::Navigator;
use wayfinder_server::state::reap_idle_sessions;
use wayfinder_server::{AppState, Config, app};

#[derive(Parser, Debug)]
#[command(version, about = "Location resolution and route computation service")]
struct Args {
    /// Path to a TOML config file with [server] and [engine] sections
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, overriding the config file
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Routing provider API key, overriding the config file
    #[arg(long, env = "WAYFINDER_ROUTING_API_KEY", hide_env_values = true)]
    routing_api_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let args = Args::parse();
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(listen) = args.listen {
        config.server.listen = listen;
    }
    if args.routing_api_key.is_some() {
        config.engine.routing_api_key = args.routing_api_key;
    }

    let navigator = Navigator::from_config(&config.engine)?;
    let state = Arc::new(AppState::new(navigator, &config.server));
    let sweep_period = config.server.session_ttl().min(Duration::from_secs(60));
    tokio::spawn(reap_idle_sessions(Arc::clone(&state), sweep_period));
    let router = app(state, &config.server);

    let listener = tokio::net::TcpListener::bind(config.server.listen).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Cannot listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
}
