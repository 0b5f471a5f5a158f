use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

const DEFAULT_API_URL: &str = "http://localhost:8080/api/users/search";
const DEFAULT_TOKEN_ENV: &str = "ROSTER_API_TOKEN";
const DEFAULT_DB_PATH: &str = "data/roster.sqlite";

/// Everything a stage needs to run. Stages never look up connections or
/// credentials on their own; the CLI loads this once and passes it down.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Roster endpoint, queried with a single POST.
    pub api_url: String,
    /// Name of the environment variable holding the bearer token.
    pub token_env: String,
    /// SQLite database file shared by both stages.
    pub db_path: String,
}

impl Settings {
    /// Defaults overridden by `ROSTER_*` environment variables
    /// (ROSTER_API_URL, ROSTER_TOKEN_ENV, ROSTER_DB_PATH).
    pub fn load() -> Result<Self> {
        let cfg = Config::builder()
            .set_default("api_url", DEFAULT_API_URL)?
            .set_default("token_env", DEFAULT_TOKEN_ENV)?
            .set_default("db_path", DEFAULT_DB_PATH)?
            .add_source(Environment::with_prefix("ROSTER"))
            .build()?;
        cfg.try_deserialize().context("Invalid pipeline settings")
    }

    /// Resolve the bearer token from the variable named by `token_env`.
    pub fn bearer_token(&self) -> Result<String> {
        std::env::var(&self.token_env)
            .with_context(|| format!("{} environment variable must be set", self.token_env))
    }
}
