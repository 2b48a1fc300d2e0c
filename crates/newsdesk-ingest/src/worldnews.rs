//! HTTP client for the World News API `search-news` endpoint.
//!
//! Authenticates with an `x-api-key` header and pages by offset, requesting
//! the maximum page size and stopping on the first short page.

use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use reqwest::{header::HeaderValue, Client, Url};

use crate::error::IngestError;
use crate::retry::retry_with_backoff;
use crate::types::{WorldNewsArticle, WorldNewsResponse};

const DEFAULT_BASE_URL: &str = "https://api.worldnewsapi.com/";

/// Maximum number of results the API returns per page.
const PAGE_SIZE: usize = 100;

/// Client for the World News REST API.
///
/// Use [`WorldNewsClient::new`] for production or
/// [`WorldNewsClient::with_base_url`] to point at a mock server in tests.
pub struct WorldNewsClient {
    client: Client,
    api_key: String,
    base_url: Url,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl WorldNewsClient {
    /// Creates a new client pointed at the production World News API.
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

    /// Fetches articles published since yesterday until at least
    /// `min_results` are collected or the API runs out of results.
    ///
    /// A failure after the first page is logged and the partial result is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns an error only if the **first** page cannot be fetched.
    pub async fn fetch_latest(
        &self,
        source_country: &str,
        language: &str,
        min_results: usize,
    ) -> Result<Vec<WorldNewsArticle>, IngestError> {
        let earliest = (Utc::now() - ChronoDuration::days(1))
            .format("%Y-%m-%d")
            .to_string();

        let mut all_articles: Vec<WorldNewsArticle> = Vec::new();

        while all_articles.len() < min_results {
            let offset = all_articles.len();
            let page = match self
                .search_page(source_country, language, &earliest, offset)
                .await
            {
                Ok(page) => page,
                Err(e) if all_articles.is_empty() => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        collected = all_articles.len(),
                        error = %e,
                        "World News pagination failed mid-run — returning partial results"
                    );
                    break;
                }
            };

            if page.news.is_empty() {
                break;
            }
            let page_len = page.news.len();
            all_articles.extend(page.news);

            // A short page means the API has no further results.
            if page_len < PAGE_SIZE {
                break;
            }
        }

        Ok(all_articles)
    }

    /// Fetches a single page of `search-news`, newest first.
    ///
    /// # Errors
    ///
    /// - [`IngestError::Http`] on network failure or non-2xx HTTP status.
    /// - [`IngestError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn search_page(
        &self,
        source_country: &str,
        language: &str,
        earliest_publish_date: &str,
        offset: usize,
    ) -> Result<WorldNewsResponse, IngestError> {
        let number = PAGE_SIZE.to_string();
        let offset_str = offset.to_string();
        let params: Vec<(&str, &str)> = vec![
            ("source-country", source_country),
            ("language", language),
            ("earliest-publish-date", earliest_publish_date),
            ("sort", "publish-time"),
            ("sort-direction", "DESC"),
            ("number", &number),
            ("offset", &offset_str),
        ];
        let url = self.build_url("search-news", &params);

        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            let url = url.clone();
            let this = self;
            async move { this.search_page_once(url, offset).await }
        })
        .await
    }

    /// A single `search-news` attempt: authenticated request plus parse.
    async fn search_page_once(
        &self,
        url: Url,
        offset: usize,
    ) -> Result<WorldNewsResponse, IngestError> {
        let api_key = HeaderValue::from_str(&self.api_key)
            .map_err(|e| IngestError::Api(format!("API key is not a valid header value: {e}")))?;

        let response = self
            .client
            .get(url)
            .header("x-api-key", api_key)
            .send()
            .await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| IngestError::Deserialize {
            context: format!("search-news(offset={offset})"),
            source: e,
        })
    }

    fn build_url(&self, endpoint: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(&format!("{}{}", url.path(), endpoint));
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        url
    }
}
