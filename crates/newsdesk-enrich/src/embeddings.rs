//! HTTP client for the text-embedding inference service.
//!
//! Speaks the TEI-style `/embed` contract: POST a batch of texts, receive one
//! fixed-length vector per text in the same order.

use serde::Serialize;

use newsdesk_core::{Embedder, ModelError};

/// Maximum number of texts per /embed call.
const BATCH_SIZE: usize = 64;

/// Embedding service HTTP client.
pub struct EmbedClient {
    client: reqwest::Client,
    url: String,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    inputs: &'a [&'a str],
}

impl EmbedClient {
    /// Create a new `EmbedClient` against the service base URL.
    #[must_use]
    pub fn new(embed_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: format!("{}/embed", embed_url.trim_end_matches('/')),
        }
    }

    /// Generate embeddings for a batch of texts.
    ///
    /// Texts are batched into groups of [`BATCH_SIZE`] (64) per request.
    /// Returns one embedding vector per input text, in the same order.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if a request fails, the response cannot be
    /// parsed, or the service returns a vector count that does not match the
    /// inputs.
    pub async fn embed_texts(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, ModelError> {
        let mut all_embeddings = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(BATCH_SIZE) {
            let request = EmbedRequest { inputs: chunk };
            let response = self
                .client
                .post(&self.url)
                .json(&request)
                .send()
                .await
                .map_err(|e| ModelError::Request(format!("embed request failed: {e}")))?;

            if !response.status().is_success() {
                return Err(ModelError::Request(format!(
                    "embed service returned status {}",
                    response.status()
                )));
            }

            let embeddings: Vec<Vec<f32>> = response
                .json()
                .await
                .map_err(|e| ModelError::InvalidResponse(format!("embed parse error: {e}")))?;

            if embeddings.len() != chunk.len() {
                return Err(ModelError::InvalidResponse(format!(
                    "embed service returned {} vectors for {} inputs",
                    embeddings.len(),
                    chunk.len()
                )));
            }

            all_embeddings.extend(embeddings);
        }

        Ok(all_embeddings)
    }
}

#[async_trait::async_trait]
impl Embedder for EmbedClient {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, ModelError> {
        self.embed_texts(texts).await
    }
}
