/// Error types shared across the quiz crates.
///
/// These errors represent failures in infrastructure components (the remote database
/// client, payload serialization) that both the build and the client runtime can hit.
/// Application-specific errors should be defined in each crate and wrap `CommonError`
/// via `#[from]`.
use crate::notion::NotionError;

#[derive(Debug, thiserror::Error)]
pub enum CommonError {
    #[error("notion error: {0}")]
    Notion(#[from] NotionError),

    #[error("payload serialization failed: {0}")]
    Payload(#[from] serde_json::Error),
}
