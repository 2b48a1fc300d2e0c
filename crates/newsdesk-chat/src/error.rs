use thiserror::Error;

/// Errors the chat service surfaces to its caller.
///
/// Only store failures propagate; model failures are folded into the answer
/// text so the channel stays answer-shaped.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("database error: {0}")]
    Database(#[from] newsdesk_db::DbError),
}
