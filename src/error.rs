//! Error types for sigshim

use thiserror::Error;

/// Main error type for signature decoding operations
#[derive(Debug, Error)]
pub enum ShimError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Player fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Script error: {0}")]
    Script(String),
}

impl ShimError {
    /// Check if the failure happened before the player script was available
    pub fn is_player_unavailable(&self) -> bool {
        matches!(
            self,
            ShimError::InvalidUrl(_) | ShimError::Fetch(_) | ShimError::Io(_) | ShimError::Url(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ShimError::Extraction("nsig function name not found".to_string());
        assert_eq!(
            err.to_string(),
            "Extraction error: nsig function name not found"
        );

        let err = ShimError::Script("result is not a string".to_string());
        assert_eq!(err.to_string(), "Script error: result is not a string");
    }

    #[test]
    fn test_is_player_unavailable() {
        assert!(ShimError::InvalidUrl("".to_string()).is_player_unavailable());
        assert!(ShimError::Io(std::io::Error::from(std::io::ErrorKind::NotFound))
            .is_player_unavailable());
        assert!(!ShimError::Extraction("x".to_string()).is_player_unavailable());
        assert!(!ShimError::Script("x".to_string()).is_player_unavailable());
    }
}
