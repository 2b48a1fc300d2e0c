//! Capability traits for the external model services.
//!
//! Classification, embedding, and text generation are black boxes to the
//! pipeline: components receive these traits so the clustering/ranking core
//! can run against deterministic stand-ins in tests while production wires in
//! the HTTP clients.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model request failed: {0}")]
    Request(String),
    #[error("model returned an invalid response: {0}")]
    InvalidResponse(String),
    #[error("missing model credentials: {0}")]
    MissingCredentials(String),
}

/// Zero-shot text classification: `text -> one of candidate_labels`.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify `text` into exactly one of `candidate_labels`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if the backing service fails or answers with a
    /// label outside the candidate set.
    async fn classify(&self, text: &str, candidate_labels: &[&str]) -> Result<String, ModelError>;
}

/// Text embedding: `text -> fixed-length float vector`.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, returning one vector per input in order.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if the backing service fails or returns a
    /// vector count that does not match the input count.
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, ModelError>;
}

/// Generative chat model: `prompt -> text`.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Generate a completion for `prompt`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if the backing service fails or returns an
    /// empty candidate list.
    async fn generate(&self, prompt: &str) -> Result<String, ModelError>;
}
