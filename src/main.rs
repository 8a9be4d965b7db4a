use anyhow::{Context, Result};
use clap::Parser;
use framesight::{create_router, AppState, BackendClient, Config};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "framesight", about = "Video analysis playback service")]
struct Args {
    /// Path to the configuration file (without extension)
    #[arg(short, long, default_value = "config/framesight")]
    config: String,

    /// Override the vision backend base URL
    #[arg(long)]
    backend_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    let backend_url = args.backend_url.unwrap_or_else(|| cfg.backend.base_url.clone());

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!("Vision backend: {}", backend_url);

    let backend = Arc::new(BackendClient::new(backend_url)?);
    let state = AppState::new(backend, cfg.playback);
    let router = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .await
        .context("HTTP server failed")?;

    Ok(())
}
