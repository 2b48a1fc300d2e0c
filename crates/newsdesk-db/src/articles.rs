//! Database operations for the `articles` table.
//!
//! Articles are keyed by URL: writes are upserts, so re-running an ingestion
//! batch is idempotent and re-enrichment overwrites category/embedding/cluster
//! fields in place.

use chrono::{DateTime, Utc};
use newsdesk_core::Article;
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `articles` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ArticleRow {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub summary: String,
    pub full_text: Option<String>,
    pub source: String,
    pub published_at: DateTime<Utc>,
    pub image_url: Option<String>,
    pub authors: Vec<String>,
    pub category: Option<String>,
    pub embedding: Option<Vec<f32>>,
    pub cluster_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ArticleRow> for Article {
    fn from(row: ArticleRow) -> Self {
        Article {
            id: Some(row.id),
            url: row.url,
            title: row.title,
            summary: row.summary,
            full_text: row.full_text,
            source: row.source,
            published_at: row.published_at,
            image_url: row.image_url,
            authors: row.authors,
            category: row.category,
            embedding: row.embedding,
            cluster_id: row.cluster_id,
        }
    }
}

const SELECT_COLUMNS: &str = "id, url, title, summary, full_text, source, published_at, \
     image_url, authors, category, embedding, cluster_id, created_at, updated_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Upsert a batch of articles keyed on `url`, returning the number written.
///
/// Conflicting rows are fully overwritten (last write wins), including the
/// enrichment fields, so re-running a pipeline batch refreshes stale
/// category/embedding/cluster assignments. All writes happen in one
/// transaction: a batch either lands completely or not at all.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if any statement in the batch fails.
pub async fn upsert_articles(pool: &PgPool, articles: &[Article]) -> Result<usize, DbError> {
    if articles.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;

    for article in articles {
        sqlx::query(
            "INSERT INTO articles \
                 (url, title, summary, full_text, source, published_at, \
                  image_url, authors, category, embedding, cluster_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             ON CONFLICT (url) DO UPDATE SET \
                 title = EXCLUDED.title, \
                 summary = EXCLUDED.summary, \
                 full_text = EXCLUDED.full_text, \
                 source = EXCLUDED.source, \
                 published_at = EXCLUDED.published_at, \
                 image_url = EXCLUDED.image_url, \
                 authors = EXCLUDED.authors, \
                 category = EXCLUDED.category, \
                 embedding = EXCLUDED.embedding, \
                 cluster_id = EXCLUDED.cluster_id, \
                 updated_at = now()",
        )
        .bind(&article.url)
        .bind(&article.title)
        .bind(&article.summary)
        .bind(&article.full_text)
        .bind(&article.source)
        .bind(article.published_at)
        .bind(&article.image_url)
        .bind(&article.authors)
        .bind(&article.category)
        .bind(&article.embedding)
        .bind(article.cluster_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(articles.len())
}

/// List articles published since `since` that belong to a story cluster
/// (cluster id present and not the noise sentinel).
///
/// Ordered by `id ASC` (insertion order) so "first in cluster" picks are
/// stable across reads.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_clustered_since(
    pool: &PgPool,
    since: DateTime<Utc>,
) -> Result<Vec<ArticleRow>, DbError> {
    let rows = sqlx::query_as::<_, ArticleRow>(&format!(
        "SELECT {SELECT_COLUMNS} \
         FROM articles \
         WHERE published_at >= $1 \
           AND cluster_id IS NOT NULL \
           AND cluster_id <> $2 \
         ORDER BY id ASC"
    ))
    .bind(since)
    .bind(newsdesk_core::NOISE_CLUSTER_ID)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// List the most recently published articles that carry an embedding,
/// newest first. Feeds the chat retriever's candidate pool.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_recent_embedded(
    pool: &PgPool,
    limit: i64,
) -> Result<Vec<ArticleRow>, DbError> {
    let rows = sqlx::query_as::<_, ArticleRow>(&format!(
        "SELECT {SELECT_COLUMNS} \
         FROM articles \
         WHERE embedding IS NOT NULL \
         ORDER BY published_at DESC, id DESC \
         LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Total number of persisted articles.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn count_articles(pool: &PgPool) -> Result<i64, DbError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
