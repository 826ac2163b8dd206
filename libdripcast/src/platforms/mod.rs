//! Remote platform clients
//!
//! `PostClient` is the seam between the dispatch core and a concrete remote
//! platform. The core treats publishing as a black box and never retries a
//! call: the operation is not idempotent, and a retried publish may create a
//! duplicate post.

use async_trait::async_trait;

use crate::credentials::Credentials;
use crate::error::Result;
use crate::types::{MediaAttachment, SessionRecord};

pub mod bluesky;

// Mock client is available for all builds to support integration tests
pub mod mock;

#[async_trait]
pub trait PostClient: Send + Sync {
    /// Perform a full credential login.
    ///
    /// Only called when no usable cached session exists. On success the
    /// client holds a live session that [`PostClient::session`] can expose
    /// for caching.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Authentication` on bad or missing
    /// credentials; this is the only stage where an authentication failure
    /// is fatal to the run.
    async fn login(&mut self, credentials: &Credentials) -> Result<()>;

    /// Apply a cached session record.
    ///
    /// An error here is recoverable: the caller degrades to [`PostClient::login`]
    /// rather than aborting.
    async fn resume(&mut self, record: &SessionRecord) -> Result<()>;

    /// The current session in cacheable form, if the client holds one.
    async fn session(&self) -> Option<SessionRecord>;

    /// Publish a single post with its attachments.
    ///
    /// Returns the platform-specific post id. The dispatcher suspends until
    /// this resolves; there is never more than one publish in flight.
    async fn publish(&self, content: &str, attachments: &[MediaAttachment]) -> Result<String>;

    /// Lowercase platform identifier for logs.
    fn name(&self) -> &str;

    /// Maximum number of attachments allowed per post.
    fn max_attachments(&self) -> usize {
        4
    }

    /// Maximum size of a single attachment in bytes.
    fn max_attachment_size(&self) -> u64 {
        1_000_000
    }
}
