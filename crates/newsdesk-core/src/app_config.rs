use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
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

/// Process-wide configuration shared by the server and CLI.
///
/// Component credentials (news API keys, model endpoints, the generative
/// model key) are deliberately NOT here: each component reads its own
/// `*Config::from_env()` so a missing credential is fatal only to the
/// component that needs it.
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    /// Cosine-distance neighborhood radius for story clustering.
    pub cluster_eps: f32,
    /// Minimum neighborhood size (self included) for a clustering core point.
    pub cluster_min_samples: usize,
    pub highlight_top_k: usize,
    /// Only articles published within this many hours qualify as highlights.
    pub highlight_window_hours: i64,
    /// When `true`, `GET /highlights` returns the per-category mapping shape
    /// instead of the flat "Top Stories" list.
    pub highlights_per_category: bool,
    pub ingest_min_results: usize,
    pub ingest_request_timeout_secs: u64,
    pub ingest_user_agent: String,
    pub ingest_max_retries: u32,
    pub ingest_retry_backoff_base_ms: u64,
    /// Optional cron expression for the server's background ingest refresh.
    pub ingest_cron: Option<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("cluster_eps", &self.cluster_eps)
            .field("cluster_min_samples", &self.cluster_min_samples)
            .field("highlight_top_k", &self.highlight_top_k)
            .field("highlight_window_hours", &self.highlight_window_hours)
            .field("highlights_per_category", &self.highlights_per_category)
            .field("ingest_min_results", &self.ingest_min_results)
            .field(
                "ingest_request_timeout_secs",
                &self.ingest_request_timeout_secs,
            )
            .field("ingest_user_agent", &self.ingest_user_agent)
            .field("ingest_max_retries", &self.ingest_max_retries)
            .field(
                "ingest_retry_backoff_base_ms",
                &self.ingest_retry_backoff_base_ms,
            )
            .field("ingest_cron", &self.ingest_cron)
            .finish()
    }
}
