use std::collections::BTreeMap;

use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::{json, Value};

use newsdesk_core::{Article, CATEGORIES};
use newsdesk_enrich::{rank, rank_by_category, Highlight, RankConfig};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, AppState};

/// One entry in the highlights response: the cluster's representative article
/// plus its aggregate signals. Field names match the persisted record shape
/// the dashboard already consumes; the embedding vector is never serialized.
#[derive(Debug, Serialize)]
pub(super) struct HighlightEntry {
    /// Store id, serialized as a string.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub article_url: String,
    pub title: String,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_text: Option<String>,
    pub source: String,
    pub published_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub authors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub cluster_id: i32,
    pub sources: Vec<String>,
    pub frequency: usize,
    pub score: usize,
}

impl From<Highlight> for HighlightEntry {
    fn from(highlight: Highlight) -> Self {
        let Highlight {
            article,
            sources,
            frequency,
            score,
            cluster_id,
            ..
        } = highlight;

        Self {
            id: article.id.map(|id| id.to_string()),
            article_url: article.url,
            title: article.title,
            summary: article.summary,
            full_text: article.full_text,
            source: article.source,
            published_date: article.published_at,
            image_url: article.image_url,
            authors: article.authors,
            category: article.category,
            cluster_id,
            sources,
            frequency,
            score,
        }
    }
}

/// `GET /highlights`
///
/// Default shape: a flat ranked list under `"Top Stories"`. With
/// `NEWSDESK_HIGHLIGHTS_PER_CATEGORY=true`, a mapping from every fixed
/// category to its own top-k list, empty lists included. An empty store
/// yields the well-formed empty variant of whichever shape is active.
pub(super) async fn get_highlights(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<Value>, ApiError> {
    let since = Utc::now() - Duration::hours(state.config.highlight_window_hours);
    let rows = newsdesk_db::list_clustered_since(&state.pool, since)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let articles: Vec<Article> = rows.into_iter().map(Article::from).collect();
    let rank_config = RankConfig {
        top_k: state.config.highlight_top_k,
        ..RankConfig::default()
    };

    let payload = if state.config.highlights_per_category {
        per_category_payload(&articles, &rank_config)
    } else {
        top_stories_payload(&articles, &rank_config)
    }
    .map_err(|e| {
        tracing::error!(error = %e, "highlight ranking failed");
        ApiError::new(req_id.0, "internal_error", "highlight ranking failed")
    })?;

    Ok(Json(payload))
}

fn top_stories_payload(
    articles: &[Article],
    config: &RankConfig,
) -> Result<Value, newsdesk_enrich::EnrichError> {
    let entries: Vec<HighlightEntry> = rank(articles, config)?
        .into_iter()
        .map(HighlightEntry::from)
        .collect();
    Ok(json!({ "Top Stories": entries }))
}

fn per_category_payload(
    articles: &[Article],
    config: &RankConfig,
) -> Result<Value, newsdesk_enrich::EnrichError> {
    let partitions = rank_by_category(articles, config, &CATEGORIES)?;
    let mapped: BTreeMap<String, Vec<HighlightEntry>> = partitions
        .into_iter()
        .map(|(category, highlights)| {
            (
                category,
                highlights.into_iter().map(HighlightEntry::from).collect(),
            )
        })
        .collect();
    Ok(json!(mapped))
}
