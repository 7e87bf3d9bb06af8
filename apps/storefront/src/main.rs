//! Storefront server entry point.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use aisle_db::{Database, DbConfig};
use aisle_storefront::{router, AppState, StorefrontConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = StorefrontConfig::load()?;
    info!(port = config.http_port, db = %config.database_path, "Starting storefront");

    let db = Database::new(DbConfig::new(&config.database_path)).await?;

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    let app = router(AppState::new(db, config));
    axum::serve(listener, app).await?;

    Ok(())
}
