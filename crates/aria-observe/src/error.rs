//! Error types for the audit layer.

/// Errors that can occur during journal and audit-log operations.
#[derive(Debug, thiserror::Error)]
pub enum ObserveError {
    /// A database operation failed.
    #[error("observe database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// JSON serialization of tool parameters failed.
    #[error("observe serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A feedback note outside the 1–5 satisfaction scale.
    #[error("feedback note out of range (1-5): {0}")]
    InvalidFeedbackNote(i64),
}
