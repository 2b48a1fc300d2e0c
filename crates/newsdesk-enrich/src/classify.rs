//! HTTP client for the zero-shot classification inference service.
//!
//! POST `{"inputs": text, "candidate_labels": [...]}` to `/classify`; the
//! service answers with labels ordered best-first plus their scores, and only
//! the top label is kept.

use serde::{Deserialize, Serialize};

use newsdesk_core::{Classifier, ModelError};

/// Zero-shot classification service HTTP client.
pub struct ZeroShotClient {
    client: reqwest::Client,
    url: String,
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    inputs: &'a str,
    candidate_labels: &'a [&'a str],
}

#[derive(Deserialize)]
struct ClassifyResponse {
    /// Candidate labels ordered by descending score.
    labels: Vec<String>,
}

impl ZeroShotClient {
    /// Create a new `ZeroShotClient` against the service base URL.
    #[must_use]
    pub fn new(classify_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: format!("{}/classify", classify_url.trim_end_matches('/')),
        }
    }

    /// Classify `text` into the best-scoring candidate label.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if the request fails, the response cannot be
    /// parsed, or the top label is not one of the candidates.
    pub async fn classify_text(
        &self,
        text: &str,
        candidate_labels: &[&str],
    ) -> Result<String, ModelError> {
        let request = ClassifyRequest {
            inputs: text,
            candidate_labels,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ModelError::Request(format!("classify request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ModelError::Request(format!(
                "classify service returned status {}",
                response.status()
            )));
        }

        let parsed: ClassifyResponse = response
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(format!("classify parse error: {e}")))?;

        let top = parsed
            .labels
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::InvalidResponse("empty label list".to_string()))?;

        if !candidate_labels.contains(&top.as_str()) {
            return Err(ModelError::InvalidResponse(format!(
                "label '{top}' is not one of the candidates"
            )));
        }

        Ok(top)
    }
}

#[async_trait::async_trait]
impl Classifier for ZeroShotClient {
    async fn classify(&self, text: &str, candidate_labels: &[&str]) -> Result<String, ModelError> {
        self.classify_text(text, candidate_labels).await
    }
}
