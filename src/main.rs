use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pdf_summary_api::{
    create_router,
    db::{self, PgRepository},
    services::HttpSummarizer,
    AppState, Config,
};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "pdf_summary_api=debug,tower_http=debug,axum::rejection=trace".into());

    if env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let config = Config::from_env()?;

    tracing::info!("Starting PDF Summary API");
    tracing::info!("Max upload size: {}MB", config.max_upload_size_mb);
    tracing::info!(
        "Rate limit: {} requests per {}s",
        config.rate_limit_requests,
        config.rate_limit_window_seconds
    );

    let pool = db::connect(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to connect to database")?;
    if config.auto_migrate {
        db::schema::migrate(&pool)
            .await
            .context("Failed to run database migrations")?;
    }

    let summarizer =
        HttpSummarizer::new(config.summarizer_url.clone(), config.summarizer_timeout())?;
    tracing::info!(endpoint = summarizer.endpoint(), "Summarization service configured");

    let state = AppState::new(
        config.clone(),
        Arc::new(PgRepository::new(pool)),
        Arc::new(summarizer),
    );
    let sweeper = state
        .rate_limiter()
        .clone()
        .spawn_sweeper(Duration::from_secs(config.rate_limit_sweep_seconds));

    let app = create_router(state);

    // Railway-style platforms hand us PORT
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(config.server_port);
    let addr = format!("{}:{}", config.server_host, port);

    tracing::info!("Server listening on {}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    sweeper.abort();
    tracing::info!("Server stopped");
    Ok(())
}
