//! Error types for Dripcast

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DripcastError>;

#[derive(Error, Debug)]
pub enum DripcastError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl DripcastError {
    /// Returns the appropriate exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            DripcastError::InvalidInput(_) => 3,
            DripcastError::Platform(PlatformError::Authentication(_)) => 2,
            DripcastError::Platform(_) => 1,
            DripcastError::Config(_) => 1,
            DripcastError::Media(_) => 1,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Failed to read post definitions: {0}")]
    PostStoreRead(std::io::Error),

    #[error("Failed to parse post definitions: {0}")]
    PostStoreParse(#[from] serde_json::Error),

    #[error("Post store must be a JSON array of post definitions")]
    PostStoreNotASequence,

    #[error("Invalid post definition at index {index}: {reason}")]
    InvalidPost { index: usize, reason: String },
}

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Unsupported media type for {path}")]
    UnsupportedType { path: String },

    #[error("Failed to read media file {path}: {source}")]
    ReadError {
        path: String,
        source: std::io::Error,
    },

    #[error("Too many attachments: {count} exceeds the limit of {limit}")]
    TooManyAttachments { count: usize, limit: usize },

    #[error("Media file {path} is too large: {size} bytes exceeds the limit of {limit}")]
    TooLarge { path: String, size: u64, limit: u64 },
}

#[derive(Error, Debug, Clone)]
pub enum PlatformError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Posting failed: {0}")]
    Posting(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_invalid_input() {
        let error = DripcastError::InvalidInput("Bad delay".to_string());
        assert_eq!(error.exit_code(), 3);
    }

    #[test]
    fn test_exit_code_authentication_error() {
        let error = DripcastError::Platform(PlatformError::Authentication("No session".to_string()));
        assert_eq!(error.exit_code(), 2);
    }

    #[test]
    fn test_exit_code_posting_error() {
        let error = DripcastError::Platform(PlatformError::Posting("Rejected".to_string()));
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_config_error() {
        let error = DripcastError::Config(ConfigError::MissingField("session.file".to_string()));
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_media_error() {
        let error = DripcastError::Media(MediaError::UnsupportedType {
            path: "image.bmp".to_string(),
        });
        assert_eq!(error.exit_code(), 1);
    }

    #[test]
    fn test_error_message_formatting_invalid_post() {
        let error = DripcastError::Config(ConfigError::InvalidPost {
            index: 2,
            reason: "missing or empty content".to_string(),
        });
        assert_eq!(
            format!("{}", error),
            "Configuration error: Invalid post definition at index 2: missing or empty content"
        );
    }

    #[test]
    fn test_error_message_formatting_media() {
        let error = DripcastError::Media(MediaError::UnsupportedType {
            path: "clip.bmp".to_string(),
        });
        assert_eq!(format!("{}", error), "Media error: Unsupported media type for clip.bmp");
    }

    #[test]
    fn test_error_conversion_from_platform_error() {
        let platform_error = PlatformError::Network("Connection refused".to_string());
        let error: DripcastError = platform_error.into();

        match error {
            DripcastError::Platform(PlatformError::Network(_)) => {}
            _ => panic!("Expected DripcastError::Platform"),
        }
    }

    #[test]
    fn test_all_platform_error_variants_have_exit_codes() {
        let auth = DripcastError::Platform(PlatformError::Authentication("test".to_string()));
        assert_eq!(auth.exit_code(), 2, "Authentication errors should exit with code 2");

        let posting = DripcastError::Platform(PlatformError::Posting("test".to_string()));
        assert_eq!(posting.exit_code(), 1, "Posting errors should exit with code 1");

        let network = DripcastError::Platform(PlatformError::Network("test".to_string()));
        assert_eq!(network.exit_code(), 1, "Network errors should exit with code 1");

        let rate_limit = DripcastError::Platform(PlatformError::RateLimit("test".to_string()));
        assert_eq!(rate_limit.exit_code(), 1, "Rate limit errors should exit with code 1");
    }
}
