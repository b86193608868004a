mod ats;
mod auth;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod routes;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ats::service::AtsService;
use crate::ats::tips::{LlmTipWriter, RuleTipWriter, TipWriter};
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::postgres::PgAnalysisStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ATS API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs migrations)
    let db = create_pool(&config.database_url, config.db_max_connections).await?;
    let store = Arc::new(PgAnalysisStore::new(db));

    let tips = build_tip_writer(&config)?;

    let state = AppState {
        ats: AtsService::new(store, tips),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Picks the improvement tip writer. The LLM client, when used, is built
/// here once and owned by the writer.
fn build_tip_writer(config: &Config) -> Result<Arc<dyn TipWriter>> {
    match (&config.anthropic_api_key, config.enable_llm_tips) {
        (Some(key), true) => {
            let llm = LlmClient::new(key.clone())?;
            info!("LLM tip writer enabled (model: {})", llm_client::MODEL);
            Ok(Arc::new(LlmTipWriter(llm)))
        }
        (None, true) => {
            warn!("ENABLE_LLM_TIPS is set but ANTHROPIC_API_KEY is missing; using rule-based tips");
            Ok(Arc::new(RuleTipWriter))
        }
        _ => {
            info!("Using rule-based improvement tips");
            Ok(Arc::new(RuleTipWriter))
        }
    }
}
