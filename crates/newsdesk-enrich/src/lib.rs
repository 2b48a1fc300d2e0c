//! AI feature enrichment for newsdesk.
//!
//! Classifies articles into the fixed category set, embeds their text via the
//! embedding service, groups near-duplicate stories with density-based
//! clustering over cosine distance, and scores/ranks the resulting clusters
//! into highlights.

pub mod classify;
pub mod cluster;
pub mod embeddings;
pub mod error;
pub mod pipeline;
pub mod rank;

pub use classify::ZeroShotClient;
pub use cluster::{cluster_embeddings, ClusterConfig};
pub use embeddings::EmbedClient;
pub use error::EnrichError;
pub use pipeline::enrich_articles;
pub use rank::{rank, rank_by_category, Highlight, RankConfig, RepresentativePick};

/// Endpoints of the model inference services.
#[derive(Debug, Clone)]
pub struct EnrichConfig {
    pub embed_url: String,
    pub classify_url: String,
}

impl EnrichConfig {
    /// Build config from environment variables.
    ///
    /// Returns an error string listing any missing variables.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any required env var is not set.
    pub fn from_env() -> Result<Self, String> {
        let mut missing = Vec::new();

        let get = |key: &str| -> Option<String> { std::env::var(key).ok() };

        let embed_url = get("NEWSDESK_EMBED_URL");
        let classify_url = get("NEWSDESK_CLASSIFY_URL");

        if embed_url.is_none() {
            missing.push("NEWSDESK_EMBED_URL");
        }
        if classify_url.is_none() {
            missing.push("NEWSDESK_CLASSIFY_URL");
        }

        if !missing.is_empty() {
            return Err(format!("missing enrichment env vars: {}", missing.join(", ")));
        }

        Ok(Self {
            embed_url: embed_url.unwrap_or_default(),
            classify_url: classify_url.unwrap_or_default(),
        })
    }
}
