use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::extraction::lexicon::SkillLexicon;
use crate::matching::orchestrator::MatchOrchestrator;
use crate::matching::store::MatchStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    /// Storage behind the matching engine. Postgres in production.
    pub store: Arc<dyn MatchStore>,
    /// Shares `store` with the handlers above.
    pub matcher: Arc<MatchOrchestrator>,
    pub lexicon: Arc<SkillLexicon>,
}
