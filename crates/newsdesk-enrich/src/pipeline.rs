//! Enrichment pipeline orchestration.
//!
//! For one normalized batch:
//! 1. Derive the text field (`"{title}. {summary}"`) per article.
//! 2. Classify each text into the fixed category set.
//! 3. Embed all texts in one batched call.
//! 4. Cluster the full batch of vectors (strictly a whole-batch final step).
//! 5. Attach category, embedding, and cluster id back onto each article.
//!
//! The failure policy is fail-fast: any classify or embed error aborts the
//! batch with nothing attached. Upsert-by-URL persistence makes the re-run
//! cheap, and a partially-enriched batch would poison ranking.

use newsdesk_core::{Article, Classifier, Embedder, ModelError, CATEGORIES, NOISE_CLUSTER_ID};

use crate::cluster::{cluster_embeddings, ClusterConfig};
use crate::error::EnrichError;

/// Enrich a batch of normalized articles in place.
///
/// Returns the same articles with `category`, `embedding`, and `cluster_id`
/// populated. An empty batch is a no-op.
///
/// # Errors
///
/// - [`EnrichError::MissingField`] if any article has an empty title
///   (normalization must guarantee presence).
/// - [`EnrichError::Classify`] / [`EnrichError::Embed`] if a capability call
///   fails; fatal to the whole batch.
/// - [`EnrichError::InvalidConfig`] / [`EnrichError::InvalidInput`] from the
///   clustering step.
pub async fn enrich_articles(
    mut articles: Vec<Article>,
    classifier: &dyn Classifier,
    embedder: &dyn Embedder,
    config: &ClusterConfig,
) -> Result<Vec<Article>, EnrichError> {
    if articles.is_empty() {
        return Ok(articles);
    }

    for article in &articles {
        if article.title.trim().is_empty() {
            return Err(EnrichError::MissingField(format!(
                "title (url: {})",
                article.url
            )));
        }
    }

    let texts: Vec<String> = articles.iter().map(Article::enrichment_text).collect();
    let text_refs: Vec<&str> = texts.iter().map(String::as_str).collect();

    let mut categories = Vec::with_capacity(articles.len());
    for text in &text_refs {
        let label = classifier
            .classify(text, &CATEGORIES)
            .await
            .map_err(EnrichError::Classify)?;
        categories.push(label);
    }

    let embeddings = embedder
        .embed(&text_refs)
        .await
        .map_err(EnrichError::Embed)?;
    if embeddings.len() != articles.len() {
        return Err(EnrichError::Embed(ModelError::InvalidResponse(format!(
            "got {} embeddings for {} articles",
            embeddings.len(),
            articles.len()
        ))));
    }

    let labels = cluster_embeddings(&embeddings, config)?;

    let clustered = labels.iter().filter(|&&l| l != NOISE_CLUSTER_ID).count();
    tracing::info!(
        batch = articles.len(),
        clustered,
        singletons = articles.len() - clustered,
        "enriched article batch"
    );

    for (((article, category), embedding), label) in articles
        .iter_mut()
        .zip(categories)
        .zip(embeddings)
        .zip(labels)
    {
        article.category = Some(category);
        article.embedding = Some(embedding);
        article.cluster_id = Some(label);
    }

    Ok(articles)
}
