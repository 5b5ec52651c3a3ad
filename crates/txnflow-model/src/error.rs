pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Transaction JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid transaction at {path}: {message}")]
    InvalidTransaction { path: String, message: String },
}
