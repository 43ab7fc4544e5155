//! Error types for report extraction

use thiserror::Error;

/// Result type alias for extraction
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

/// Reasons the structured report could not be recovered from runner output.
///
/// These never reach the caller of [`crate::extract`]; they select the
/// raw-text fallback and are logged.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("no JSON object start found in output")]
    NoJsonStart,

    #[error("unbalanced braces: object opened at byte {start} never closes")]
    Unbalanced { start: usize },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}
