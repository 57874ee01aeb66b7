pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("host payload JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid color: {value:?}")]
    InvalidColor { value: String },

    #[error("invalid format string {format:?}: {message}")]
    InvalidFormat { format: String, message: String },
}
