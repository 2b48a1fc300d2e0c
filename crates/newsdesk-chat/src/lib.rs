//! Retrieval-augmented chatbot for newsdesk.
//!
//! Embeds the user's question, retrieves the closest stored articles by
//! cosine similarity, and asks the generative model to answer from that
//! context only. Model failures stay inside the answer channel; only store
//! failures surface as errors.

pub mod error;
pub mod generate;
pub mod retriever;
pub mod service;

pub use error::ChatError;
pub use generate::GeminiClient;
pub use retriever::top_k_similar;
pub use service::{answer_with_context, ChatService, EMPTY_QUESTION_REPLY};

/// Generative model credentials and model selection.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub api_key: String,
    pub model: String,
    pub request_timeout_secs: u64,
}

impl ChatConfig {
    /// Build config from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error string if `GEMINI_API_KEY` is not set. The chatbot is
    /// the only component that needs it; highlight serving works without.
    pub fn from_env() -> Result<Self, String> {
        let get = |key: &str| -> Option<String> { std::env::var(key).ok() };

        let Some(api_key) = get("GEMINI_API_KEY") else {
            return Err("missing chat env var: GEMINI_API_KEY".to_string());
        };

        Ok(Self {
            api_key,
            model: get("NEWSDESK_CHAT_MODEL").unwrap_or_else(|| "gemini-flash-latest".to_string()),
            request_timeout_secs: get("NEWSDESK_CHAT_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        })
    }
}
