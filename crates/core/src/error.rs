#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Malformed document JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
