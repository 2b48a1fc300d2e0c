use thiserror::Error;

/// Errors returned by the news source clients and the normalizer.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A news API answered with an application-level error payload.
    #[error("news API error: {0}")]
    Api(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
