//! Creates (or recreates) the database schema.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pdf_summary_api::config::DEFAULT_DATABASE_URL;
use pdf_summary_api::db;

#[derive(Parser, Debug)]
#[command(name = "migrate", about = "Create the pdfs and summaries tables")]
struct Args {
    /// Connection string; falls back to DATABASE_URL, then the local default.
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    database_url: String,

    /// Drop both tables before recreating them. Deletes all data.
    #[arg(long)]
    fresh: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pdf_summary_api=info,migrate=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args = Args::parse();

    let pool = db::connect(&args.database_url, 1)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    if args.fresh {
        tracing::warn!("Dropping existing tables before migrating");
        db::schema::reset(&pool).await.context("Drop & migrate failed")?;
    } else {
        db::schema::migrate(&pool).await.context("Migration failed")?;
    }

    pool.close().await;
    tracing::info!("Migration completed successfully");
    Ok(())
}
