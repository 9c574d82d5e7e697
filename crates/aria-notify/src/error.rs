//! Error types for the notification side-channels.

/// Errors that can occur when sending email or creating calendar events.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// Credentials or addresses missing from configuration.
    #[error("notification service not configured: {0}")]
    NotConfigured(&'static str),

    /// The target has no usable address.
    #[error("no recipient address on file")]
    NoRecipient,

    /// The HTTP request itself failed.
    #[error("notification transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("notification provider rejected the request: status {0}")]
    Rejected(u16),
}
