use anyhow::Context;
use clap::Parser;
use grouppost_server::{config::AppConfig, routes, state::AppState};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging from RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "grouppost_server=info,grouppost_core=info,tower_http=info".into()),
        )
        .init();

    let config = AppConfig::parse();
    config.validate()?;

    let core = config.build_app()?;
    let app = routes::app(AppState::new(core), &config.static_dir);

    let addr = config.bind_addr()?;
    info!(
        root = %config.normalized_root(),
        static_dir = %config.static_dir.display(),
        "Listening on http://{}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind TCP listener")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install CTRL+C handler");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, stopping server...");
}
