//! HTTP client for the Newsdata.io `latest` endpoint.
//!
//! Wraps `reqwest` with API key management, token-based pagination, and typed
//! response deserialization. The API signals application-level failures via a
//! `"status"` field in the envelope; those surface as [`IngestError::Api`].

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::IngestError;
use crate::retry::retry_with_backoff;
use crate::types::{NewsdataArticle, NewsdataResponse};

const DEFAULT_BASE_URL: &str = "https://newsdata.io/api/1/";

/// Client for the Newsdata.io REST API.
///
/// Use [`NewsdataClient::new`] for production or
/// [`NewsdataClient::with_base_url`] to point at a mock server in tests.
pub struct NewsdataClient {
    client: Client,
    api_key: String,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl NewsdataClient {
    /// Creates a new client pointed at the production Newsdata API.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, IngestError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`IngestError::Api`] if `base_url` is not a
    /// valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, IngestError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // joined paths append rather than replace the last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| IngestError::Api(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            max_retries: 3,
            backoff_base_ms: 1_000,
        })
    }

    /// Overrides the transient-error retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Fetches latest articles until at least `min_results` are collected or
    /// the API runs out of pages.
    ///
    /// A failure after the first page is logged and the partial result is
    /// returned; later pages going missing should not discard articles
    /// already in hand.
    ///
    /// # Errors
    ///
    /// Returns an error only if the **first** page cannot be fetched.
    pub async fn fetch_latest(
        &self,
        country: &str,
        language: &str,
        min_results: usize,
    ) -> Result<Vec<NewsdataArticle>, IngestError> {
        let mut all_articles: Vec<NewsdataArticle> = Vec::new();
        let mut next_page: Option<String> = None;

        while all_articles.len() < min_results {
            let page = match self.latest_page(country, language, next_page.as_deref()).await {
                Ok(page) => page,
                Err(e) if all_articles.is_empty() => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        collected = all_articles.len(),
                        error = %e,
                        "Newsdata pagination failed mid-run — returning partial results"
                    );
                    break;
                }
            };

            if page.results.is_empty() {
                break;
            }
            all_articles.extend(page.results);

            match page.next_page {
                Some(token) => next_page = Some(token),
                None => break,
            }
        }

        Ok(all_articles)
    }

    /// Fetches a single page of the `latest` endpoint.
    ///
    /// # Errors
    ///
    /// - [`IngestError::Api`] if the envelope status is not `"success"`.
    /// - [`IngestError::Http`] on network failure or non-2xx HTTP status.
    /// - [`IngestError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn latest_page(
        &self,
        country: &str,
        language: &str,
        page: Option<&str>,
    ) -> Result<NewsdataResponse, IngestError> {
        let mut params = vec![("country", country), ("language", language)];
        if let Some(token) = page {
            params.push(("page", token));
        }
        let url = self.build_url("latest", &params);

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            let this = self;
            async move { this.latest_page_once(&url, country).await }
        })
        .await
    }

    /// A single `latest` attempt: request, envelope status check, parse.
    async fn latest_page_once(
        &self,
        url: &Url,
        country: &str,
    ) -> Result<NewsdataResponse, IngestError> {
        let body = self.request_json(url).await?;

        let status = body
            .get("status")
            .and_then(serde_json::Value::as_str)
            .unwrap_or("");
        if status != "success" {
            let msg = body
                .get("results")
                .and_then(|r| r.get("message"))
                .and_then(serde_json::Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            return Err(IngestError::Api(msg));
        }

        serde_json::from_value(body).map_err(|e| IngestError::Deserialize {
            context: format!("latest(country={country})"),
            source: e,
        })
    }

    /// Builds the full request URL with properly percent-encoded query
    /// parameters, including the API key.
    fn build_url(&self, endpoint: &str, extra: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(&format!("{}{}", url.path(), endpoint));
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("apikey", &self.api_key);
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Sends a GET request, asserts a 2xx HTTP status, and parses the body as
    /// JSON.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Http`] on network failure or non-2xx status,
    /// or [`IngestError::Deserialize`] if the body is not valid JSON.
    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, IngestError> {
        let response = self.client.get(url.clone()).send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| IngestError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }
}
