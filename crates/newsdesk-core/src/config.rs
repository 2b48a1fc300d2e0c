use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup — no
/// `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default =
        |var: &str, default: &str| -> String { lookup(var).unwrap_or_else(|_| default.to_string()) };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_i64 = |var: &str, default: &str| -> Result<i64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<i64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_f32 = |var: &str, default: &str| -> Result<f32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<f32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        let raw = or_default(var, default);
        match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            other => Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: format!("expected a boolean, got '{other}'"),
            }),
        }
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("NEWSDESK_ENV", "development"))?;

    let bind_addr = parse_addr("NEWSDESK_BIND_ADDR", "0.0.0.0:8000")?;
    let log_level = or_default("NEWSDESK_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("NEWSDESK_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("NEWSDESK_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("NEWSDESK_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let cluster_eps = parse_f32("NEWSDESK_CLUSTER_EPS", "0.3")?;
    let cluster_min_samples = parse_usize("NEWSDESK_CLUSTER_MIN_SAMPLES", "2")?;

    let highlight_top_k = parse_usize("NEWSDESK_HIGHLIGHT_TOP_K", "10")?;
    let highlight_window_hours = parse_i64("NEWSDESK_HIGHLIGHT_WINDOW_HOURS", "24")?;
    let highlights_per_category = parse_bool("NEWSDESK_HIGHLIGHTS_PER_CATEGORY", "false")?;

    let ingest_min_results = parse_usize("NEWSDESK_INGEST_MIN_RESULTS", "100")?;
    let ingest_request_timeout_secs = parse_u64("NEWSDESK_INGEST_REQUEST_TIMEOUT_SECS", "30")?;
    let ingest_user_agent = or_default(
        "NEWSDESK_INGEST_USER_AGENT",
        "newsdesk/0.1 (news-aggregation)",
    );
    let ingest_max_retries = parse_u32("NEWSDESK_INGEST_MAX_RETRIES", "3")?;
    let ingest_retry_backoff_base_ms = parse_u64("NEWSDESK_INGEST_RETRY_BACKOFF_BASE_MS", "1000")?;
    let ingest_cron = lookup("NEWSDESK_INGEST_CRON").ok();

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        cluster_eps,
        cluster_min_samples,
        highlight_top_k,
        highlight_window_hours,
        highlights_per_category,
        ingest_min_results,
        ingest_request_timeout_secs,
        ingest_user_agent,
        ingest_max_retries,
        ingest_retry_backoff_base_ms,
        ingest_cron,
    })
}

fn parse_environment(raw: &str) -> Result<Environment, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "development" | "dev" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" | "prod" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "NEWSDESK_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}
