mod airtable;
mod config;
mod draft;
mod errors;
mod extraction;
mod optimize;
mod page;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::airtable::{AirtableClient, MemoryResumeStore, ResumeStore};
use crate::config::{Config, ResumeStoreConfig};
use crate::draft::store::spawn_expiry_sweeper;
use crate::routes::build_router;
use crate::state::AppState;

const DRAFT_SWEEP_EVERY: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting NextJob API v{}", env!("CARGO_PKG_VERSION"));

    let resume_store = build_resume_store(&config.resume_store)?;
    info!("Resume store initialized (backend: {})", resume_store.backend());

    let optimize_delay = Duration::from_millis(config.optimize_delay_ms);
    info!("Optimize delay: {}ms", optimize_delay.as_millis());

    let state = AppState::new(resume_store, optimize_delay);

    let draft_ttl = Duration::from_secs(config.draft_ttl_secs);
    spawn_expiry_sweeper(state.drafts.clone(), draft_ttl, DRAFT_SWEEP_EVERY);
    info!("Draft expiry: {}s idle", draft_ttl.as_secs());

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Picks the resume backend named by RESUME_STORE.
fn build_resume_store(config: &ResumeStoreConfig) -> Result<Arc<dyn ResumeStore>> {
    let store: Arc<dyn ResumeStore> = match config {
        ResumeStoreConfig::Airtable(airtable) => {
            info!(
                "Using Airtable base {} table {}",
                airtable.base_id, airtable.table
            );
            Arc::new(AirtableClient::new(airtable)?)
        }
        ResumeStoreConfig::Memory => Arc::new(MemoryResumeStore::new()),
    };
    Ok(store)
}
