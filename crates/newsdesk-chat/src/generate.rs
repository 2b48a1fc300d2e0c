//! HTTP client for the Gemini `generateContent` endpoint.
//!
//! Wraps `reqwest` with API key management and typed response
//! deserialization, implementing the [`GenerativeModel`] capability.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use newsdesk_core::{GenerativeModel, ModelError};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";

/// Client for the Gemini generative-language REST API.
///
/// Use [`GeminiClient::new`] for production or
/// [`GeminiClient::with_base_url`] to point at a mock server in tests.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: Url,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GeminiClient {
    /// Creates a new client pointed at the production Gemini API.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Request`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, ModelError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Request`] if the client cannot be constructed or
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ModelError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ModelError::Request(format!("failed to build HTTP client: {e}")))?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| ModelError::Request(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            base_url,
        })
    }

    /// Sends a prompt to `models/{model}:generateContent` and returns the
    /// first candidate's text.
    ///
    /// # Errors
    ///
    /// - [`ModelError::Request`] on network failure or non-2xx status.
    /// - [`ModelError::InvalidResponse`] if the body cannot be parsed or
    ///   contains no candidates.
    pub async fn generate_text(&self, prompt: &str) -> Result<String, ModelError> {
        let mut url = self
            .base_url
            .join(&format!("models/{}:generateContent", self.model))
            .map_err(|e| ModelError::Request(format!("invalid model name: {e}")))?;
        url.query_pairs_mut().append_pair("key", &self.api_key);

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ModelError::Request(format!("generate request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ModelError::Request(format!(
                "generate endpoint returned status {}",
                response.status()
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(format!("generate parse error: {e}")))?;

        let text = parsed
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ModelError::InvalidResponse("no candidates returned".to_string()))?;

        Ok(text)
    }
}

#[async_trait::async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        self.generate_text(prompt).await
    }
}
