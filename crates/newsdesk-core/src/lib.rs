mod app_config;
mod config;
pub mod models;
pub mod types;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use models::{Classifier, Embedder, GenerativeModel, ModelError};
pub use types::{Article, CATEGORIES, HIGHLIGHT_KEYWORDS, KEYWORD_WEIGHT, NOISE_CLUSTER_ID};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
