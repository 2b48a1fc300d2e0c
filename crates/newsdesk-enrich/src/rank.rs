//! Highlight scoring and ranking over clustered articles.
//!
//! A story cluster scores `frequency + keyword_weight × keyword_count`:
//! frequency is the member count (independent-reporting strength) and
//! keyword_count tallies urgency keywords across member titles. One engine
//! serves both query shapes: a single global top-k list, or independent
//! top-k lists per category.

use std::collections::BTreeMap;

use newsdesk_core::{Article, HIGHLIGHT_KEYWORDS, KEYWORD_WEIGHT};

use crate::error::EnrichError;

/// Which member of a cluster fronts the highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepresentativePick {
    /// The first member in storage order (lowest row id / first loaded).
    FirstInCluster,
    /// The member with the latest publish timestamp; ties keep the first
    /// encountered.
    MostRecent,
}

/// Ranking parameters.
#[derive(Debug, Clone)]
pub struct RankConfig {
    /// Urgency keywords matched case-insensitively as substrings of titles.
    pub keywords: Vec<String>,
    /// Score contribution per keyword occurrence.
    pub keyword_weight: usize,
    /// Maximum highlights returned (per partition, when partitioned).
    pub top_k: usize,
    pub representative: RepresentativePick,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            keywords: HIGHLIGHT_KEYWORDS.iter().map(ToString::to_string).collect(),
            keyword_weight: KEYWORD_WEIGHT,
            top_k: 10,
            representative: RepresentativePick::FirstInCluster,
        }
    }
}

/// A ranked, user-facing projection of one story cluster. Presentation
/// layers decide which article fields to expose; the embedding never leaves
/// through a highlight.
#[derive(Debug, Clone)]
pub struct Highlight {
    /// The cluster's representative article.
    pub article: Article,
    /// Distinct member sources, in first-seen order.
    pub sources: Vec<String>,
    /// Member article count.
    pub frequency: usize,
    pub keyword_score: usize,
    /// `frequency + keyword_score`.
    pub score: usize,
    pub cluster_id: i32,
}

/// Produce the global highlight ranking: descending by score, ties broken by
/// ascending cluster id, truncated to `top_k`.
///
/// Articles without a cluster (or labeled noise) never qualify; an input with
/// no qualifying articles yields an empty list, not an error.
///
/// # Errors
///
/// Returns [`EnrichError::InvalidConfig`] if `top_k` is zero.
pub fn rank(articles: &[Article], config: &RankConfig) -> Result<Vec<Highlight>, EnrichError> {
    validate(config)?;
    let mut highlights = score_clusters(articles, config);
    highlights.truncate(config.top_k);
    Ok(highlights)
}

/// Produce independent top-k rankings per category.
///
/// The partition key is the representative article's category. Every entry of
/// `categories` is present in the output, with an empty list when no cluster
/// landed there; categories encountered outside the fixed set are kept too.
///
/// # Errors
///
/// Returns [`EnrichError::InvalidConfig`] if `top_k` is zero.
pub fn rank_by_category(
    articles: &[Article],
    config: &RankConfig,
    categories: &[&str],
) -> Result<BTreeMap<String, Vec<Highlight>>, EnrichError> {
    validate(config)?;

    let mut partitions: BTreeMap<String, Vec<Highlight>> = categories
        .iter()
        .map(|c| ((*c).to_string(), Vec::new()))
        .collect();

    for highlight in score_clusters(articles, config) {
        let Some(category) = highlight.article.category.clone() else {
            tracing::warn!(
                cluster_id = highlight.cluster_id,
                "representative article has no category; dropping from partitioned ranking"
            );
            continue;
        };
        partitions.entry(category).or_default().push(highlight);
    }

    for list in partitions.values_mut() {
        // score_clusters emits in global rank order, so each partition is
        // already sorted; only the per-partition truncation remains.
        list.truncate(config.top_k);
    }

    Ok(partitions)
}

fn validate(config: &RankConfig) -> Result<(), EnrichError> {
    if config.top_k == 0 {
        return Err(EnrichError::InvalidConfig(
            "top_k must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Score every qualifying cluster and return highlights sorted descending by
/// score. Grouping iterates clusters in ascending id order and the sort is
/// stable, so equal scores fall back to ascending cluster id deterministically.
fn score_clusters(articles: &[Article], config: &RankConfig) -> Vec<Highlight> {
    let mut clusters: BTreeMap<i32, Vec<&Article>> = BTreeMap::new();
    for article in articles {
        if !article.is_clustered() {
            continue;
        }
        if let Some(id) = article.cluster_id {
            clusters.entry(id).or_default().push(article);
        }
    }

    let mut highlights: Vec<Highlight> = clusters
        .into_iter()
        .map(|(cluster_id, members)| {
            let frequency = members.len();
            let keyword_score = config.keyword_weight * keyword_count(&members, &config.keywords);

            let mut sources: Vec<String> = Vec::new();
            for member in &members {
                if !sources.contains(&member.source) {
                    sources.push(member.source.clone());
                }
            }

            let representative = match config.representative {
                RepresentativePick::FirstInCluster => members[0],
                RepresentativePick::MostRecent => members
                    .iter()
                    .copied()
                    .fold(members[0], |best, candidate| {
                        if candidate.published_at > best.published_at {
                            candidate
                        } else {
                            best
                        }
                    }),
            };

            Highlight {
                article: representative.clone(),
                sources,
                frequency,
                keyword_score,
                score: frequency + keyword_score,
                cluster_id,
            }
        })
        .collect();

    highlights.sort_by(|a, b| b.score.cmp(&a.score));
    highlights
}

/// Number of (title, keyword) pairs where the keyword occurs in the title,
/// case-insensitively. A title containing two distinct keywords counts twice.
fn keyword_count(members: &[&Article], keywords: &[String]) -> usize {
    members
        .iter()
        .map(|article| {
            let title = article.title.to_lowercase();
            keywords
                .iter()
                .filter(|keyword| title.contains(&keyword.to_lowercase()))
                .count()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn article(url: &str, title: &str, cluster_id: Option<i32>) -> Article {
        Article {
            id: None,
            url: url.to_string(),
            title: title.to_string(),
            summary: "summary".to_string(),
            full_text: None,
            source: format!("source-{url}"),
            published_at: Utc::now(),
            image_url: None,
            authors: vec![],
            category: Some("general news".to_string()),
            embedding: None,
            cluster_id,
        }
    }

    fn cluster_of(id: i32, titles: &[&str]) -> Vec<Article> {
        titles
            .iter()
            .enumerate()
            .map(|(i, t)| article(&format!("https://example.com/{id}/{i}"), t, Some(id)))
            .collect()
    }

    #[test]
    fn empty_input_yields_empty_ranking() {
        let highlights = rank(&[], &RankConfig::default()).unwrap();
        assert!(highlights.is_empty());
    }

    #[test]
    fn zero_top_k_is_invalid() {
        let config = RankConfig {
            top_k: 0,
            ..RankConfig::default()
        };
        assert!(matches!(
            rank(&[], &config),
            Err(EnrichError::InvalidConfig(_))
        ));
    }

    #[test]
    fn noise_and_unenriched_articles_never_qualify() {
        let articles = vec![
            article("https://example.com/noise", "Alone", Some(-1)),
            article("https://example.com/raw", "Unenriched", None),
        ];
        let highlights = rank(&articles, &RankConfig::default()).unwrap();
        assert!(highlights.is_empty());
    }

    #[test]
    fn frequency_orders_clusters() {
        let mut articles = cluster_of(0, &["a", "b"]);
        articles.extend(cluster_of(1, &["c", "d", "e"]));

        let highlights = rank(&articles, &RankConfig::default()).unwrap();
        assert_eq!(highlights.len(), 2);
        assert_eq!(highlights[0].cluster_id, 1);
        assert_eq!(highlights[0].frequency, 3);
        assert_eq!(highlights[0].score, 3);
        assert_eq!(highlights[1].frequency, 2);
    }

    #[test]
    fn keyword_breaks_frequency_ties_upward() {
        // Two 3-article clusters; the one with a "breaking" title must win.
        let mut articles = cluster_of(0, &["calm day", "quiet news", "slow tuesday"]);
        articles.extend(cluster_of(
            1,
            &["Breaking: dam fails", "dam latest", "dam coverage"],
        ));

        let highlights = rank(&articles, &RankConfig::default()).unwrap();
        assert_eq!(highlights[0].cluster_id, 1);
        assert_eq!(highlights[0].keyword_score, 5);
        assert_eq!(highlights[0].score, 8);
        assert_eq!(highlights[1].score, 3);
    }

    #[test]
    fn keyword_match_is_case_insensitive_substring() {
        let articles = cluster_of(0, &["BREAKING NEWS UPDATE", "more coverage"]);
        let highlights = rank(&articles, &RankConfig::default()).unwrap();
        // "breaking" and "update" both occur in the first title.
        assert_eq!(highlights[0].keyword_score, 10);
        assert_eq!(highlights[0].score, 12);
    }

    #[test]
    fn equal_scores_fall_back_to_ascending_cluster_id() {
        let mut articles = cluster_of(3, &["x", "y"]);
        articles.extend(cluster_of(1, &["p", "q"]));

        let highlights = rank(&articles, &RankConfig::default()).unwrap();
        assert_eq!(highlights[0].cluster_id, 1);
        assert_eq!(highlights[1].cluster_id, 3);
    }

    #[test]
    fn truncates_to_top_k() {
        let mut articles = Vec::new();
        for id in 0..5 {
            articles.extend(cluster_of(id, &["a", "b"]));
        }
        let config = RankConfig {
            top_k: 2,
            ..RankConfig::default()
        };
        let highlights = rank(&articles, &config).unwrap();
        assert_eq!(highlights.len(), 2);
    }

    #[test]
    fn representative_first_in_cluster_is_first_encountered() {
        let articles = cluster_of(0, &["first report", "second report"]);
        let highlights = rank(&articles, &RankConfig::default()).unwrap();
        assert_eq!(highlights[0].article.title, "first report");
    }

    #[test]
    fn representative_most_recent_picks_latest_publish_date() {
        let mut articles = cluster_of(0, &["older report", "newest report"]);
        articles[1].published_at = articles[0].published_at + Duration::hours(2);

        let config = RankConfig {
            representative: RepresentativePick::MostRecent,
            ..RankConfig::default()
        };
        let highlights = rank(&articles, &config).unwrap();
        assert_eq!(highlights[0].article.title, "newest report");
    }

    #[test]
    fn sources_are_distinct_in_first_seen_order() {
        let mut articles = cluster_of(0, &["a", "b"]);
        articles.push({
            let mut dup = article("https://example.com/0/2", "c", Some(0));
            dup.source = articles[0].source.clone();
            dup
        });

        let highlights = rank(&articles, &RankConfig::default()).unwrap();
        assert_eq!(highlights[0].frequency, 3);
        assert_eq!(highlights[0].sources.len(), 2);
    }

    #[test]
    fn partitioned_ranking_includes_empty_categories() {
        let mut sports = cluster_of(0, &["match report", "match recap"]);
        for a in &mut sports {
            a.category = Some("sports".to_string());
        }

        let partitions =
            rank_by_category(&sports, &RankConfig::default(), &["sports", "finance"]).unwrap();

        assert_eq!(partitions.len(), 2);
        assert_eq!(partitions["sports"].len(), 1);
        assert!(partitions["finance"].is_empty());
    }

    #[test]
    fn partitioned_ranking_truncates_per_category() {
        let mut articles = Vec::new();
        for id in 0..4 {
            let mut cluster = cluster_of(id, &["a", "b"]);
            for a in &mut cluster {
                a.category = Some("technology".to_string());
            }
            articles.extend(cluster);
        }

        let config = RankConfig {
            top_k: 2,
            ..RankConfig::default()
        };
        let partitions = rank_by_category(&articles, &config, &["technology"]).unwrap();
        assert_eq!(partitions["technology"].len(), 2);
    }

    #[test]
    fn partition_key_is_the_representative_category() {
        // First member (the representative) is sports, the rest finance: the
        // cluster lands in the sports partition.
        let mut articles = cluster_of(0, &["rep", "other", "another"]);
        articles[0].category = Some("sports".to_string());
        articles[1].category = Some("finance".to_string());
        articles[2].category = Some("finance".to_string());

        let partitions =
            rank_by_category(&articles, &RankConfig::default(), &["sports", "finance"]).unwrap();
        assert_eq!(partitions["sports"].len(), 1);
        assert!(partitions["finance"].is_empty());
    }
}
