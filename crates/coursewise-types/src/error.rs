use thiserror::Error;

/// Errors from session store operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session not found")]
    NotFound,

    #[error("storage error: {0}")]
    Storage(String),
}

/// Errors from loading the course catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog file error: {0}")]
    Io(String),

    #[error("invalid catalog JSON: {0}")]
    Parse(String),

    #[error("invalid catalog shape: {0}")]
    InvalidShape(String),
}

/// Errors from embedding or vector index operations.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("embedding error: {0}")]
    Embedding(String),

    #[error("index error: {0}")]
    Index(String),
}

/// Input-validation failures rejected before the turn engine runs.
///
/// Collaborator failures (extractor, generator) never surface here; the
/// engine recovers them locally with fallback replies.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TurnError {
    #[error("grade must be set before chatting")]
    GradeMissing,

    #[error("message must not be empty")]
    EmptyMessage,
}
