use anyhow::{bail, Context, Result};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
const DEFAULT_RECOMPUTE_CONCURRENCY: usize = 8;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    /// JSON lexicon file; the built-in skill list is used when unset.
    pub skill_lexicon_path: Option<String>,
    /// Upper bound on candidates scored at once during a job-wide recompute.
    pub recompute_concurrency: usize,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let recompute_concurrency =
            parse_env("RECOMPUTE_CONCURRENCY", DEFAULT_RECOMPUTE_CONCURRENCY)?;
        if recompute_concurrency == 0 {
            bail!("RECOMPUTE_CONCURRENCY must be at least 1");
        }

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            skill_lexicon_path: std::env::var("SKILL_LEXICON_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty()),
            recompute_concurrency,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
