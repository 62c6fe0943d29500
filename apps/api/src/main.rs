mod analytics;
mod candidates;
mod config;
mod db;
mod errors;
mod extraction;
mod jobs;
mod matching;
mod models;
mod routes;
mod state;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::extraction::lexicon::SkillLexicon;
use crate::matching::orchestrator::MatchOrchestrator;
use crate::matching::store::{MatchStore, PgMatchStore};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting hiring API v{}", env!("CARGO_PKG_VERSION"));

    let db = create_pool(&config.database_url).await?;

    let lexicon = match &config.skill_lexicon_path {
        Some(path) => SkillLexicon::from_file(Path::new(path))?,
        None => SkillLexicon::builtin(),
    };
    info!(
        "Skill lexicon {} loaded ({} skills)",
        lexicon.version(),
        lexicon.len()
    );

    let store: Arc<dyn MatchStore> = Arc::new(PgMatchStore::new(db.clone()));
    let matcher = Arc::new(MatchOrchestrator::new(
        store.clone(),
        config.recompute_concurrency,
    ));
    info!(
        "Match orchestrator ready (recompute concurrency {})",
        config.recompute_concurrency
    );

    let state = AppState {
        db,
        config: config.clone(),
        store,
        matcher,
        lexicon: Arc::new(lexicon),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict allowed origins once the dashboard host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
