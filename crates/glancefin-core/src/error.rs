use thiserror::Error;

/// Errors surfaced by the session fetch and enrichment pipeline.
#[derive(Debug, Error)]
pub enum GlancefinError {
    #[error("no access token available")]
    MissingToken,

    #[error("HTTP error (status {0})")]
    Http(u16),

    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
