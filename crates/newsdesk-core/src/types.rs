use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The closed category set assigned by zero-shot classification.
///
/// Enrichment always classifies into exactly one of these labels; the
/// per-category highlight response contains one key per entry, present even
/// when its list is empty.
pub const CATEGORIES: [&str; 6] = [
    "sports",
    "lifestyle",
    "music",
    "finance",
    "technology",
    "general news",
];

/// Title keywords that signal breaking-news urgency when ranking clusters.
pub const HIGHLIGHT_KEYWORDS: [&str; 5] = ["breaking", "urgent", "alert", "exclusive", "update"];

/// Score contribution of a single keyword occurrence across a cluster's titles.
pub const KEYWORD_WEIGHT: usize = 5;

/// Cluster label for articles that joined no story group (singleton reports).
pub const NOISE_CLUSTER_ID: i32 = -1;

/// A single news article, canonical across all ingestion sources.
///
/// Created by normalization with `url`, `title`, `summary`, `source`, and
/// `published_at` populated; enrichment fills `category`, `embedding`, and
/// `cluster_id` in place before the record is upserted. `url` is the identity
/// key: loading the same URL twice overwrites the earlier document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// Store-assigned id; `None` until the article has been persisted.
    pub id: Option<i64>,
    pub url: String,
    pub title: String,
    pub summary: String,
    pub full_text: Option<String>,
    pub source: String,
    pub published_at: DateTime<Utc>,
    pub image_url: Option<String>,
    pub authors: Vec<String>,
    /// One of [`CATEGORIES`] once enriched.
    pub category: Option<String>,
    pub embedding: Option<Vec<f32>>,
    /// Non-negative story cluster id, or [`NOISE_CLUSTER_ID`] for a story
    /// reported by only one source. `None` before enrichment.
    pub cluster_id: Option<i32>,
}

impl Article {
    /// The single text field fed to classification and embedding:
    /// `"{title}. {summary}"`. An absent summary contributes an empty string,
    /// never the literal `"None"`.
    #[must_use]
    pub fn enrichment_text(&self) -> String {
        format!("{}. {}", self.title, self.summary)
    }

    /// `true` if enrichment grouped this article into a multi-report story.
    #[must_use]
    pub fn is_clustered(&self) -> bool {
        matches!(self.cluster_id, Some(id) if id != NOISE_CLUSTER_ID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn article() -> Article {
        Article {
            id: None,
            url: "https://example.com/a".to_string(),
            title: "Title".to_string(),
            summary: "Summary".to_string(),
            full_text: None,
            source: "example".to_string(),
            published_at: Utc::now(),
            image_url: None,
            authors: vec![],
            category: None,
            embedding: None,
            cluster_id: None,
        }
    }

    #[test]
    fn enrichment_text_joins_title_and_summary() {
        assert_eq!(article().enrichment_text(), "Title. Summary");
    }

    #[test]
    fn enrichment_text_with_empty_summary_keeps_separator() {
        let mut a = article();
        a.summary = String::new();
        assert_eq!(a.enrichment_text(), "Title. ");
    }

    #[test]
    fn is_clustered_distinguishes_noise_and_unenriched() {
        let mut a = article();
        assert!(!a.is_clustered());
        a.cluster_id = Some(NOISE_CLUSTER_ID);
        assert!(!a.is_clustered());
        a.cluster_id = Some(0);
        assert!(a.is_clustered());
    }

    #[test]
    fn article_round_trips_through_json() {
        let mut a = article();
        a.authors = vec!["John Doe".to_string(), "Jane Smith".to_string()];
        a.embedding = Some(vec![0.25, -0.5]);
        a.cluster_id = Some(3);

        let json = serde_json::to_string(&a).unwrap();
        let back: Article = serde_json::from_str(&json).unwrap();
        assert_eq!(back.url, a.url);
        assert_eq!(back.authors, a.authors);
        assert_eq!(back.embedding, a.embedding);
        assert_eq!(back.cluster_id, Some(3));
    }
}
