//! Multi-source collection orchestration.
//!
//! Fetches raw batches from every configured source, continuing past
//! individual source failures so one outage never empties the pipeline, then
//! normalizes and deduplicates the merged batch.

use newsdesk_core::{AppConfig, Article};

use crate::newsdata::NewsdataClient;
use crate::normalize::{normalize_batch, NormalizationStats};
use crate::types::{NewsdataArticle, WorldNewsArticle};
use crate::worldnews::WorldNewsClient;
use crate::IngestConfig;

/// Fetch from all configured sources and normalize into canonical articles.
///
/// Per-source fetch failures are logged and skipped; the batch proceeds with
/// whatever the remaining sources returned. An unconfigured source (missing
/// API key) is skipped silently at debug level.
///
/// # Errors
///
/// Returns [`crate::IngestError`] only if a client cannot be constructed;
/// fetch failures never abort the batch.
pub async fn collect_articles(
    app: &AppConfig,
    sources: &IngestConfig,
) -> Result<(Vec<Article>, NormalizationStats), crate::IngestError> {
    let mut newsdata_raw: Vec<NewsdataArticle> = Vec::new();
    let mut worldnews_raw: Vec<WorldNewsArticle> = Vec::new();

    if let Some(api_key) = sources.newsdata_api_key.as_deref() {
        let client = NewsdataClient::new(
            api_key,
            app.ingest_request_timeout_secs,
            &app.ingest_user_agent,
        )?
        .with_retry_policy(app.ingest_max_retries, app.ingest_retry_backoff_base_ms);

        match client
            .fetch_latest(&sources.country, &sources.language, app.ingest_min_results)
            .await
        {
            Ok(articles) => {
                tracing::info!(count = articles.len(), "collected Newsdata articles");
                newsdata_raw = articles;
            }
            Err(e) => {
                tracing::warn!(source = "newsdata", error = %e, "Newsdata fetch failed");
            }
        }
    } else {
        tracing::debug!("NEWSDATA_API_KEY not set; skipping Newsdata source");
    }

    if let Some(api_key) = sources.worldnews_api_key.as_deref() {
        let client = WorldNewsClient::new(
            api_key,
            app.ingest_request_timeout_secs,
            &app.ingest_user_agent,
        )?
        .with_retry_policy(app.ingest_max_retries, app.ingest_retry_backoff_base_ms);

        match client
            .fetch_latest(&sources.country, &sources.language, app.ingest_min_results)
            .await
        {
            Ok(articles) => {
                tracing::info!(count = articles.len(), "collected World News articles");
                worldnews_raw = articles;
            }
            Err(e) => {
                tracing::warn!(source = "worldnews", error = %e, "World News fetch failed");
            }
        }
    } else {
        tracing::debug!("WORLDNEWS_API_KEY not set; skipping World News source");
    }

    Ok(normalize_batch(newsdata_raw, worldnews_raw))
}
