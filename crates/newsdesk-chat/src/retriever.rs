//! Cosine-similarity retrieval over persisted article embeddings.
//!
//! The candidate pool is a windowed read of recent embedded articles; ranking
//! happens in process. Similarity values that come out non-finite (zero-norm
//! or corrupt vectors) are discarded rather than propagated.

use newsdesk_core::Article;

/// Rank `candidates` by cosine similarity to `query` and keep the top `k`.
///
/// Candidates without an embedding, with a dimensionality different from the
/// query, or with a non-finite similarity are skipped. Ties keep candidate
/// order (newest first, as loaded).
#[must_use]
pub fn top_k_similar(query: &[f32], candidates: Vec<Article>, k: usize) -> Vec<(Article, f32)> {
    let mut scored: Vec<(Article, f32)> = candidates
        .into_iter()
        .filter_map(|article| {
            let similarity = article
                .embedding
                .as_deref()
                .and_then(|embedding| cosine_similarity(query, embedding))?;
            Some((article, similarity))
        })
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(k);
    scored
}

/// Cosine similarity, or `None` when undefined (dimension mismatch, zero
/// norm) or non-finite.
fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }
    let similarity = dot / (norm_a * norm_b);
    similarity.is_finite().then_some(similarity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn article(url: &str, embedding: Option<Vec<f32>>) -> Article {
        Article {
            id: None,
            url: url.to_string(),
            title: url.to_string(),
            summary: "summary".to_string(),
            full_text: None,
            source: "test".to_string(),
            published_at: Utc::now(),
            image_url: None,
            authors: vec![],
            category: None,
            embedding,
            cluster_id: None,
        }
    }

    #[test]
    fn ranks_by_similarity_descending() {
        let candidates = vec![
            article("far", Some(vec![0.0, 1.0])),
            article("near", Some(vec![1.0, 0.05])),
            article("exact", Some(vec![1.0, 0.0])),
        ];

        let top = top_k_similar(&[1.0, 0.0], candidates, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].0.url, "exact");
        assert_eq!(top[1].0.url, "near");
    }

    #[test]
    fn skips_missing_and_mismatched_embeddings() {
        let candidates = vec![
            article("none", None),
            article("short", Some(vec![1.0])),
            article("ok", Some(vec![1.0, 0.0])),
        ];

        let top = top_k_similar(&[1.0, 0.0], candidates, 5);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].0.url, "ok");
    }

    #[test]
    fn skips_zero_norm_vectors() {
        let candidates = vec![
            article("zero", Some(vec![0.0, 0.0])),
            article("ok", Some(vec![0.5, 0.5])),
        ];

        let top = top_k_similar(&[1.0, 0.0], candidates, 5);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].0.url, "ok");
    }

    #[test]
    fn nan_similarity_is_discarded() {
        let candidates = vec![article("nan", Some(vec![f32::NAN, 0.0]))];
        let top = top_k_similar(&[1.0, 0.0], candidates, 5);
        assert!(top.is_empty());
    }

    #[test]
    fn empty_candidate_pool_yields_empty() {
        let top = top_k_similar(&[1.0, 0.0], vec![], 5);
        assert!(top.is_empty());
    }
}
