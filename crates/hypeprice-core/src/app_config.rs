use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    /// Filter used when `HYPEPRICE_LOG_LEVEL` is unset.
    #[must_use]
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Environment::Development => "info",
            Environment::Test | Environment::Production => "warn",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Deployment environment; selects the default log filter.
    pub env: Environment,
    /// Base URL of the search backend; the client appends `api/search`.
    pub api_url: String,
    pub log_level: String,
    /// JSON file backing the persisted view and cost settings.
    pub settings_path: PathBuf,
    pub user_agent: String,
    /// Lifetime of cached search responses. `0` disables caching.
    pub cache_ttl_secs: u64,
}
