use newsdesk_core::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnrichError {
    /// Clustering or ranking was configured with out-of-range parameters.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The clustering input was malformed (mixed vector dimensionality).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An article reached enrichment without a required field.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// The classification capability failed; fatal to the batch.
    #[error("classification failed: {0}")]
    Classify(#[source] ModelError),

    /// The embedding capability failed; fatal to the batch.
    #[error("embedding failed: {0}")]
    Embed(#[source] ModelError),
}
