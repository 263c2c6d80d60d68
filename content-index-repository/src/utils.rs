//! Utility functions for the content index repository.

use crate::errors::SearchIndexError;

/// Characters OpenSearch rejects in index names.
const FORBIDDEN_INDEX_CHARS: &[char] = &['\\', '/', '*', '?', '"', '<', '>', '|', ' ', ',', '#', ':'];

/// Maximum index name length in bytes.
const MAX_INDEX_NAME_BYTES: usize = 255;

/// Validate an index name before it is sent to the backend.
///
/// Index names must be non-empty, lowercase, at most 255 bytes, must not
/// start with `-`, `_` or `+`, must not be `.` or `..`, and must not contain
/// any of `\ / * ? " < > | , # :` or spaces.
///
/// # Arguments
///
/// * `name` - The index name to validate
///
/// # Returns
///
/// * `Ok(())` - If the name is acceptable
/// * `Err(SearchIndexError)` - If the name is invalid
///
/// # Example
///
/// ```
/// use content_index_repository::validate_index_name;
///
/// assert!(validate_index_name("content_primary").is_ok());
/// assert!(validate_index_name("Content").is_err());
/// ```
pub fn validate_index_name(name: &str) -> Result<(), SearchIndexError> {
    if name.is_empty() {
        return Err(SearchIndexError::validation("Index name is required"));
    }

    if name.len() > MAX_INDEX_NAME_BYTES {
        return Err(SearchIndexError::validation(format!(
            "Index name '{}' exceeds {} bytes",
            name, MAX_INDEX_NAME_BYTES
        )));
    }

    if name == "." || name == ".." {
        return Err(SearchIndexError::validation(format!(
            "Index name '{}' is reserved",
            name
        )));
    }

    if name.starts_with(['-', '_', '+']) {
        return Err(SearchIndexError::validation(format!(
            "Index name '{}' must not start with '-', '_' or '+'",
            name
        )));
    }

    if name.chars().any(|c| c.is_uppercase()) {
        return Err(SearchIndexError::validation(format!(
            "Index name '{}' must be lowercase",
            name
        )));
    }

    if let Some(c) = name.chars().find(|c| FORBIDDEN_INDEX_CHARS.contains(c)) {
        return Err(SearchIndexError::validation(format!(
            "Index name '{}' contains invalid character '{}'",
            name, c
        )));
    }

    Ok(())
}
