use thiserror::Error;

#[derive(Debug, Error)]
/// Represents errors that can occur within an options store.
///
/// This enum consolidates the failure conditions of the file-backed store:
/// I/O errors while reading or replacing the options file, and malformed
/// option documents.
pub enum OptionsStoreError {
    #[error("Options store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Options store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Options file is not a JSON object: {0}")]
    Malformed(String),
}
