//! Core types for Dripcast

use serde::{Deserialize, Serialize};

/// A single pre-defined post, loaded from the post-definition store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDefinition {
    /// Post text. Mandatory and non-empty; enforced at load time.
    pub content: String,
    /// Local media file paths, published in order alongside the content.
    #[serde(default)]
    pub media: Vec<String>,
}

impl PostDefinition {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            media: Vec::new(),
        }
    }

    pub fn with_media(content: impl Into<String>, media: Vec<String>) -> Self {
        Self {
            content: content.into(),
            media,
        }
    }
}

/// Supported media types for attachments
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MediaType {
    Jpeg,
    Png,
    Gif,
    WebP,
}

impl MediaType {
    /// Detect media type from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Get the MIME type string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::WebP => "image/webp",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw media bytes with their resolved content type, ready to publish.
#[derive(Debug, Clone)]
pub struct MediaAttachment {
    pub path: String,
    pub media_type: MediaType,
    pub bytes: Vec<u8>,
}

/// Cached proof-of-authentication: opaque tokens plus issuance time.
///
/// A record is never mutated in place; a refresh writes a whole new record
/// over the old one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionRecord {
    /// Opaque, ordered credential tokens as handed out by the platform.
    pub tokens: Vec<String>,
    /// Issuance timestamp in epoch milliseconds.
    pub issued_at: i64,
}

impl SessionRecord {
    /// Create a record issued now.
    pub fn new(tokens: Vec<String>) -> Self {
        Self {
            tokens,
            issued_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// True iff the record was issued less than `max_age_ms` before `now_ms`.
    pub fn is_fresh(&self, max_age_ms: i64, now_ms: i64) -> bool {
        now_ms - self.issued_at < max_age_ms
    }
}
