//! News ingestion for newsdesk.
//!
//! Pulls raw articles from the configured third-party news APIs (Newsdata.io
//! and World News API), with pagination and transient-error retry, then
//! normalizes the heterogeneous schemas into the canonical article shape,
//! dropping incomplete records and deduplicating by URL.

pub mod collect;
pub mod error;
pub mod newsdata;
pub mod normalize;
pub mod types;
pub mod worldnews;

mod retry;

pub use collect::collect_articles;
pub use error::IngestError;
pub use newsdata::NewsdataClient;
pub use normalize::{normalize_batch, parse_authors, parse_publish_date, NormalizationStats};
pub use worldnews::WorldNewsClient;

/// Source credentials and query scope for an ingestion run.
#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub newsdata_api_key: Option<String>,
    pub worldnews_api_key: Option<String>,
    /// Source country filter passed to both APIs.
    pub country: String,
    /// Language filter passed to both APIs.
    pub language: String,
}

impl IngestConfig {
    /// Build config from environment variables.
    ///
    /// Each source key is optional individually, but at least one of
    /// `NEWSDATA_API_KEY` / `WORLDNEWS_API_KEY` must be set; an ingestion
    /// run with zero sources can only produce an empty batch.
    ///
    /// # Errors
    ///
    /// Returns an error string naming the missing variables if no source is
    /// configured.
    pub fn from_env() -> Result<Self, String> {
        let get = |key: &str| -> Option<String> { std::env::var(key).ok() };

        let newsdata_api_key = get("NEWSDATA_API_KEY");
        let worldnews_api_key = get("WORLDNEWS_API_KEY");

        if newsdata_api_key.is_none() && worldnews_api_key.is_none() {
            return Err(
                "no news source configured: set NEWSDATA_API_KEY and/or WORLDNEWS_API_KEY"
                    .to_string(),
            );
        }

        Ok(Self {
            newsdata_api_key,
            worldnews_api_key,
            country: get("NEWSDESK_SOURCE_COUNTRY").unwrap_or_else(|| "au".to_string()),
            language: get("NEWSDESK_SOURCE_LANGUAGE").unwrap_or_else(|| "en".to_string()),
        })
    }
}
