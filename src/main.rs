// src/main.rs

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use techflow_api::{build_router, catalog::Catalog, config::AppConfig, db, mailer::LogMailer, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = AppConfig::from_env()?;

    let catalog = match &config.catalog_path {
        Some(path) => Catalog::from_file(path)?,
        None => Catalog::default(),
    };
    tracing::info!(services = catalog.all().len(), "catalog loaded");

    let db = db::open(config.data_path.clone()).await?;
    let state = AppState { db, catalog: Arc::new(catalog), mailer: Arc::new(LogMailer) };

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "API listening");

    axum::serve(listener, build_router(state).into_make_service()).await?;
    Ok(())
}
