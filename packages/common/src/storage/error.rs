use thiserror::Error;

/// Errors that can occur during paste storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No paste is stored under the requested fingerprint.
    #[error("paste not found: {0}")]
    NotFound(String),

    /// The caller-supplied key is not a well-formed fingerprint.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// A different paste already occupies this fingerprint.
    #[error("fingerprint collision: {0} already holds different content")]
    Collision(String),

    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),
}
