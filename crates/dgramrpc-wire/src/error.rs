/// Errors that can occur while encoding requests.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// JSON serialization of a request failed.
    #[error("request encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WireError>;
