//! Retrieval-augmented chat over the persisted article corpus.

use std::sync::Arc;

use sqlx::PgPool;

use newsdesk_core::{Article, Embedder, GenerativeModel};

use crate::error::ChatError;
use crate::retriever::top_k_similar;

/// Fixed reply for an empty question: a nudge, not an error.
pub const EMPTY_QUESTION_REPLY: &str = "Please ask a question.";

/// How many recent embedded articles form the retrieval candidate pool.
const CANDIDATE_POOL_SIZE: i64 = 200;

/// How many retrieved articles go into the prompt context.
const CONTEXT_TOP_K: usize = 5;

/// Answers user questions from retrieved article context.
pub struct ChatService {
    pool: PgPool,
    embedder: Arc<dyn Embedder>,
    model: Arc<dyn GenerativeModel>,
}

impl ChatService {
    #[must_use]
    pub fn new(pool: PgPool, embedder: Arc<dyn Embedder>, model: Arc<dyn GenerativeModel>) -> Self {
        Self {
            pool,
            embedder,
            model,
        }
    }

    /// Answer a question against the stored corpus.
    ///
    /// Empty questions get a fixed prompt-to-ask reply. Model failures
    /// (embedding the question, generating the answer) come back as error
    /// text in the answer, keeping the channel answer-shaped.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Database`] only if the candidate pool cannot be
    /// read from the store.
    pub async fn ask(&self, question: &str) -> Result<String, ChatError> {
        if question.trim().is_empty() {
            return Ok(EMPTY_QUESTION_REPLY.to_string());
        }

        let rows = newsdesk_db::list_recent_embedded(&self.pool, CANDIDATE_POOL_SIZE).await?;
        let candidates: Vec<Article> = rows.into_iter().map(Article::from).collect();

        Ok(answer_with_context(
            question,
            candidates,
            self.embedder.as_ref(),
            self.model.as_ref(),
        )
        .await)
    }
}

/// Retrieve context for `question` and generate an answer.
///
/// Never fails: any model error is folded into the returned answer text.
pub async fn answer_with_context(
    question: &str,
    candidates: Vec<Article>,
    embedder: &dyn Embedder,
    model: &dyn GenerativeModel,
) -> String {
    let query_embedding = match embedder.embed(&[question]).await {
        Ok(mut vectors) if !vectors.is_empty() => vectors.remove(0),
        Ok(_) => {
            tracing::warn!("embedder returned no vector for the question");
            return "Sorry, I could not process that question right now.".to_string();
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to embed chat question");
            return format!("Sorry, I could not process that question right now: {e}");
        }
    };

    let retrieved = top_k_similar(&query_embedding, candidates, CONTEXT_TOP_K);
    let context = retrieved
        .iter()
        .map(|(article, _)| format!("Title: {}. {}", article.title, article.summary))
        .collect::<Vec<_>>()
        .join("\n\n");

    let prompt = build_prompt(&context, question);

    match model.generate(&prompt).await {
        Ok(answer) => answer,
        Err(e) => {
            tracing::warn!(error = %e, "chat generation failed");
            format!("Sorry, I could not generate an answer right now: {e}")
        }
    }
}

/// Context-only prompt: the model must answer from the retrieved articles or
/// admit it cannot.
fn build_prompt(context: &str, question: &str) -> String {
    format!(
        "Answer the following question based ONLY on the context provided.\n\
         If the context does not contain the answer, say \"I don't have enough information to answer that.\"\n\
         \n\
         CONTEXT:\n\
         {context}\n\
         \n\
         QUESTION:\n\
         {question}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use newsdesk_core::ModelError;
    use std::sync::Mutex;

    struct StubEmbedder;

    #[async_trait]
    impl Embedder for StubEmbedder {
        async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, ModelError> {
            Ok(vec![vec![1.0, 0.0]; texts.len()])
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed(&self, _: &[&str]) -> Result<Vec<Vec<f32>>, ModelError> {
            Err(ModelError::Request("embedder down".to_string()))
        }
    }

    /// Records the prompt it was handed and echoes a canned answer.
    struct RecordingModel {
        prompts: Mutex<Vec<String>>,
    }

    impl RecordingModel {
        fn new() -> Self {
            Self {
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl GenerativeModel for RecordingModel {
        async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok("A fine answer.".to_string())
        }
    }

    struct FailingModel;

    #[async_trait]
    impl GenerativeModel for FailingModel {
        async fn generate(&self, _: &str) -> Result<String, ModelError> {
            Err(ModelError::Request("model down".to_string()))
        }
    }

    fn article(url: &str, title: &str, embedding: Vec<f32>) -> Article {
        Article {
            id: None,
            url: url.to_string(),
            title: title.to_string(),
            summary: "summary".to_string(),
            full_text: None,
            source: "test".to_string(),
            published_at: Utc::now(),
            image_url: None,
            authors: vec![],
            category: None,
            embedding: Some(embedding),
            cluster_id: None,
        }
    }

    #[tokio::test]
    async fn retrieved_titles_land_in_the_prompt() {
        let model = RecordingModel::new();
        let candidates = vec![
            article("https://example.com/close", "Close story", vec![1.0, 0.01]),
            article("https://example.com/far", "Far story", vec![0.0, 1.0]),
        ];

        let answer =
            answer_with_context("what happened?", candidates, &StubEmbedder, &model).await;
        assert_eq!(answer, "A fine answer.");

        let prompts = model.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Title: Close story"));
        assert!(prompts[0].contains("QUESTION:\nwhat happened?"));
    }

    #[tokio::test]
    async fn generation_failure_is_answer_shaped() {
        let answer =
            answer_with_context("what happened?", vec![], &StubEmbedder, &FailingModel).await;
        assert!(answer.contains("could not generate an answer"));
        assert!(answer.contains("model down"));
    }

    #[tokio::test]
    async fn embedding_failure_is_answer_shaped() {
        let model = RecordingModel::new();
        let answer =
            answer_with_context("what happened?", vec![], &FailingEmbedder, &model).await;
        assert!(answer.contains("could not process that question"));
        assert!(model.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_context_still_generates() {
        let model = RecordingModel::new();
        let answer = answer_with_context("anything new?", vec![], &StubEmbedder, &model).await;
        assert_eq!(answer, "A fine answer.");

        let prompts = model.prompts.lock().unwrap();
        assert!(prompts[0].contains("CONTEXT:\n\n"));
    }

    #[test]
    fn prompt_pins_the_context_only_instruction() {
        let prompt = build_prompt("Title: A. b", "why?");
        assert!(prompt.starts_with("Answer the following question based ONLY"));
        assert!(prompt.contains("I don't have enough information to answer that."));
    }
}
