//! Normalization of raw source records into canonical articles.
//!
//! Each source arrives with its own field names; this module maps both onto
//! [`Article`], drops records that are unusable (missing title/url/summary,
//! unparseable publish date), and deduplicates by URL keeping the first
//! occurrence. Drops are counted and logged, never raised: one bad record
//! must not block the batch.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use newsdesk_core::Article;

use crate::types::{NewsdataArticle, WorldNewsArticle};

/// Per-batch counters for records dropped during normalization.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizationStats {
    pub input: usize,
    pub missing_fields: usize,
    pub bad_timestamps: usize,
    pub duplicates: usize,
    pub kept: usize,
}

/// Normalize and merge raw batches from all sources into canonical articles.
///
/// Records are processed in input order (Newsdata first, then World News) so
/// URL deduplication keeps the first occurrence deterministically.
#[must_use]
pub fn normalize_batch(
    newsdata: Vec<NewsdataArticle>,
    worldnews: Vec<WorldNewsArticle>,
) -> (Vec<Article>, NormalizationStats) {
    let mut stats = NormalizationStats {
        input: newsdata.len() + worldnews.len(),
        ..NormalizationStats::default()
    };

    let mut articles: Vec<Article> = Vec::new();
    let mut seen_urls: HashSet<String> = HashSet::new();

    let candidates = newsdata
        .into_iter()
        .map(normalize_newsdata)
        .chain(worldnews.into_iter().map(normalize_worldnews));

    for candidate in candidates {
        let article = match candidate {
            Ok(article) => article,
            Err(reason) => {
                match reason {
                    DropReason::MissingField => stats.missing_fields += 1,
                    DropReason::BadTimestamp => stats.bad_timestamps += 1,
                }
                continue;
            }
        };
        if seen_urls.insert(article.url.clone()) {
            articles.push(article);
        } else {
            stats.duplicates += 1;
        }
    }

    stats.kept = articles.len();
    tracing::debug!(
        input = stats.input,
        kept = stats.kept,
        missing_fields = stats.missing_fields,
        bad_timestamps = stats.bad_timestamps,
        duplicates = stats.duplicates,
        "normalized ingestion batch"
    );

    (articles, stats)
}

enum DropReason {
    MissingField,
    BadTimestamp,
}

fn normalize_newsdata(raw: NewsdataArticle) -> Result<Article, DropReason> {
    let title = non_empty(raw.title).ok_or(DropReason::MissingField)?;
    let url = non_empty(raw.link).ok_or(DropReason::MissingField)?;
    let summary = non_empty(raw.description).ok_or(DropReason::MissingField)?;
    let published_at =
        parse_publish_date(raw.pub_date.as_deref().unwrap_or("")).ok_or(DropReason::BadTimestamp)?;

    Ok(Article {
        id: None,
        url,
        title,
        // The description stands in for the full text on this source.
        full_text: Some(summary.clone()),
        summary,
        source: raw.source_id.unwrap_or_else(|| "newsdata".to_string()),
        published_at,
        image_url: non_empty(raw.image_url),
        authors: parse_authors(raw.creator.as_ref()),
        category: None,
        embedding: None,
        cluster_id: None,
    })
}

fn normalize_worldnews(raw: WorldNewsArticle) -> Result<Article, DropReason> {
    let title = non_empty(raw.title).ok_or(DropReason::MissingField)?;
    let url = non_empty(raw.url).ok_or(DropReason::MissingField)?;
    let full_text = non_empty(raw.text);
    let summary = non_empty(raw.summary)
        .or_else(|| full_text.clone())
        .ok_or(DropReason::MissingField)?;
    let published_at = parse_publish_date(raw.publish_date.as_deref().unwrap_or(""))
        .ok_or(DropReason::BadTimestamp)?;

    Ok(Article {
        id: None,
        url,
        title,
        summary,
        full_text,
        source: raw.source_country.unwrap_or_else(|| "worldnews".to_string()),
        published_at,
        image_url: non_empty(raw.image),
        authors: parse_authors(raw.authors.as_ref()),
        category: None,
        embedding: None,
        cluster_id: None,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Parses a publish timestamp as RFC 3339 or `YYYY-MM-DD HH:MM:SS`.
///
/// Naive timestamps are treated as UTC (both upstream APIs document UTC
/// publish times). Returns `None` for anything unparseable.
#[must_use]
pub fn parse_publish_date(s: &str) -> Option<DateTime<Utc>> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(naive.and_utc());
        }
    }
    None
}

/// Coerces a raw author field into an ordered list of author names.
///
/// Handles the three shapes sources actually send:
/// - a JSON array of strings,
/// - a stringified list such as `"['John Doe', 'Jane Smith']"`,
/// - a plain free-text name.
///
/// Absent or empty input yields an empty list.
#[must_use]
pub fn parse_authors(value: Option<&Value>) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string)
            .collect(),
        Some(Value::String(s)) => parse_author_string(s),
        Some(_) => Vec::new(),
    }
}

fn parse_author_string(s: &str) -> Vec<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    // A stringified list: "['John Doe', 'Jane Smith']".
    if trimmed.starts_with('[') && trimmed.ends_with(']') {
        return trimmed[1..trimmed.len() - 1]
            .split(',')
            .map(|part| part.trim().trim_matches(|c| c == '\'' || c == '"').trim())
            .filter(|part| !part.is_empty())
            .map(ToString::to_string)
            .collect();
    }

    vec![trimmed.to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn newsdata_raw() -> NewsdataArticle {
        NewsdataArticle {
            title: Some("Flood warning issued".to_string()),
            link: Some("https://example.com/flood".to_string()),
            description: Some("Heavy rain expected".to_string()),
            source_id: Some("example_news".to_string()),
            pub_date: Some("2026-08-07 06:30:00".to_string()),
            image_url: Some("https://example.com/flood.jpg".to_string()),
            creator: Some(json!(["John Doe"])),
        }
    }

    fn worldnews_raw() -> WorldNewsArticle {
        WorldNewsArticle {
            title: Some("Markets rally".to_string()),
            text: Some("Long body text.".to_string()),
            summary: Some("Shares climbed".to_string()),
            url: Some("https://example.com/markets".to_string()),
            image: None,
            publish_date: Some("2026-08-07 08:00:00".to_string()),
            authors: Some(json!("Jane Smith")),
            source_country: Some("au".to_string()),
        }
    }

    #[test]
    fn parse_authors_list_like_string() {
        let value = json!("['John Doe', 'Jane Smith']");
        assert_eq!(
            parse_authors(Some(&value)),
            vec!["John Doe".to_string(), "Jane Smith".to_string()]
        );
    }

    #[test]
    fn parse_authors_plain_string() {
        let value = json!("Just a String");
        assert_eq!(parse_authors(Some(&value)), vec!["Just a String".to_string()]);
    }

    #[test]
    fn parse_authors_missing_yields_empty() {
        assert!(parse_authors(None).is_empty());
        assert!(parse_authors(Some(&Value::Null)).is_empty());
        assert!(parse_authors(Some(&json!(""))).is_empty());
    }

    #[test]
    fn parse_authors_json_array() {
        let value = json!(["A. Writer", "  B. Reporter  "]);
        assert_eq!(
            parse_authors(Some(&value)),
            vec!["A. Writer".to_string(), "B. Reporter".to_string()]
        );
    }

    #[test]
    fn parse_publish_date_accepts_both_formats() {
        assert!(parse_publish_date("2026-08-07 06:30:00").is_some());
        assert!(parse_publish_date("2026-08-07T06:30:00Z").is_some());
        assert!(parse_publish_date("2026-08-07T06:30:00+10:00").is_some());
        assert!(parse_publish_date("last tuesday").is_none());
        assert!(parse_publish_date("").is_none());
    }

    #[test]
    fn normalize_batch_maps_both_sources() {
        let (articles, stats) = normalize_batch(vec![newsdata_raw()], vec![worldnews_raw()]);
        assert_eq!(articles.len(), 2);
        assert_eq!(stats.kept, 2);

        let flood = &articles[0];
        assert_eq!(flood.source, "example_news");
        assert_eq!(flood.summary, "Heavy rain expected");
        assert_eq!(flood.full_text.as_deref(), Some("Heavy rain expected"));
        assert_eq!(flood.authors, vec!["John Doe".to_string()]);

        let markets = &articles[1];
        assert_eq!(markets.source, "au");
        assert_eq!(markets.full_text.as_deref(), Some("Long body text."));
        assert_eq!(markets.authors, vec!["Jane Smith".to_string()]);
    }

    #[test]
    fn normalize_batch_drops_missing_required_fields() {
        let mut no_title = newsdata_raw();
        no_title.title = None;
        let mut no_url = newsdata_raw();
        no_url.link = None;
        let mut no_summary = worldnews_raw();
        no_summary.summary = None;
        no_summary.text = None;

        let (articles, stats) = normalize_batch(vec![no_title, no_url], vec![no_summary]);
        assert!(articles.is_empty());
        assert_eq!(stats.missing_fields, 3);
    }

    #[test]
    fn normalize_batch_drops_unparseable_timestamps() {
        let mut bad_date = newsdata_raw();
        bad_date.pub_date = Some("yesterday-ish".to_string());

        let (articles, stats) = normalize_batch(vec![bad_date], vec![]);
        assert!(articles.is_empty());
        assert_eq!(stats.bad_timestamps, 1);
    }

    #[test]
    fn normalize_batch_dedups_by_url_keeping_first() {
        let first = newsdata_raw();
        let mut second = worldnews_raw();
        second.url = first.link.clone();
        second.title = Some("Same story, other source".to_string());

        let (articles, stats) = normalize_batch(vec![first], vec![second]);
        assert_eq!(articles.len(), 1);
        assert_eq!(stats.duplicates, 1);
        assert_eq!(articles[0].title, "Flood warning issued");
    }

    #[test]
    fn worldnews_summary_falls_back_to_text() {
        let mut raw = worldnews_raw();
        raw.summary = None;
        let (articles, _) = normalize_batch(vec![], vec![raw]);
        assert_eq!(articles[0].summary, "Long body text.");
    }
}
