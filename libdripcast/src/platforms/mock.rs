//! Mock client implementation for testing
//!
//! A configurable client that can simulate login, resume, and publish
//! behavior without credentials or network access, and records its calls so
//! tests can verify ordering and counts.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::credentials::Credentials;
use crate::error::{PlatformError, Result};
use crate::platforms::PostClient;
use crate::types::{MediaAttachment, SessionRecord};

/// Configuration for mock client behavior
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Platform name (e.g., "mock-bluesky")
    pub name: String,

    /// Whether credential login should succeed
    pub login_succeeds: bool,

    /// Whether applying a cached session should succeed
    pub resume_succeeds: bool,

    /// Publish calls fail once this many have succeeded (None = never fail)
    pub publish_fail_after: Option<usize>,

    /// Session record exposed after a successful login or resume
    pub session: Option<SessionRecord>,

    /// Attachment limits reported to the dispatcher
    pub max_attachments: usize,
    pub max_attachment_size: u64,

    /// Number of times login has been called
    pub login_calls: Arc<Mutex<usize>>,

    /// Number of times resume has been called
    pub resume_calls: Arc<Mutex<usize>>,

    /// Content that has been published (for verification)
    pub published: Arc<Mutex<Vec<String>>>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            name: "mock".to_string(),
            login_succeeds: true,
            resume_succeeds: true,
            publish_fail_after: None,
            session: Some(SessionRecord::new(vec!["mock-token".to_string()])),
            max_attachments: 4,
            max_attachment_size: 1_000_000,
            login_calls: Arc::new(Mutex::new(0)),
            resume_calls: Arc::new(Mutex::new(0)),
            published: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

/// Mock client for testing
pub struct MockClient {
    config: MockConfig,
    authenticated: bool,
    login_error: Option<String>,
}

impl MockClient {
    pub fn new(config: MockConfig) -> Self {
        Self {
            config,
            authenticated: false,
            login_error: None,
        }
    }

    /// A client where every operation succeeds.
    pub fn succeeding(name: &str) -> Self {
        Self::new(MockConfig {
            name: name.to_string(),
            ..Default::default()
        })
    }

    /// A succeeding client that is already authenticated.
    pub fn authenticated(name: &str) -> Self {
        let mut client = Self::succeeding(name);
        client.authenticated = true;
        client
    }

    /// A client that rejects credential login.
    pub fn login_failure(name: &str, error: &str) -> Self {
        let mut client = Self::new(MockConfig {
            name: name.to_string(),
            login_succeeds: false,
            session: None,
            ..Default::default()
        });
        client.login_error = Some(error.to_string());
        client
    }

    /// A client that rejects cached sessions but accepts credential login.
    pub fn resume_failure(name: &str) -> Self {
        Self::new(MockConfig {
            name: name.to_string(),
            resume_succeeds: false,
            ..Default::default()
        })
    }

    /// A client whose publish fails after `successes` successful calls.
    pub fn publish_failure_after(name: &str, successes: usize) -> Self {
        let mut client = Self::new(MockConfig {
            name: name.to_string(),
            publish_fail_after: Some(successes),
            ..Default::default()
        });
        client.authenticated = true;
        client
    }

    pub fn login_calls(&self) -> usize {
        *self.config.login_calls.lock().unwrap()
    }

    pub fn resume_calls(&self) -> usize {
        *self.config.resume_calls.lock().unwrap()
    }

    pub fn published_content(&self) -> Vec<String> {
        self.config.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl PostClient for MockClient {
    async fn login(&mut self, _credentials: &Credentials) -> Result<()> {
        *self.config.login_calls.lock().unwrap() += 1;

        if self.config.login_succeeds {
            self.authenticated = true;
            Ok(())
        } else {
            let message = self
                .login_error
                .clone()
                .unwrap_or_else(|| "Mock login failed".to_string());
            Err(PlatformError::Authentication(message).into())
        }
    }

    async fn resume(&mut self, _record: &SessionRecord) -> Result<()> {
        *self.config.resume_calls.lock().unwrap() += 1;

        if self.config.resume_succeeds {
            self.authenticated = true;
            Ok(())
        } else {
            Err(PlatformError::Authentication("Mock session rejected".to_string()).into())
        }
    }

    async fn session(&self) -> Option<SessionRecord> {
        if self.authenticated {
            self.config.session.clone()
        } else {
            None
        }
    }

    async fn publish(&self, content: &str, _attachments: &[MediaAttachment]) -> Result<String> {
        if !self.authenticated {
            return Err(PlatformError::Authentication("Not authenticated".to_string()).into());
        }

        let mut published = self.config.published.lock().unwrap();
        if let Some(limit) = self.config.publish_fail_after {
            if published.len() >= limit {
                return Err(PlatformError::Posting("Mock publish failed".to_string()).into());
            }
        }

        published.push(content.to_string());
        Ok(format!("{}:mock-{}", self.config.name, uuid::Uuid::new_v4()))
    }

    fn name(&self) -> &str {
        &self.config.name
    }

    fn max_attachments(&self) -> usize {
        self.config.max_attachments
    }

    fn max_attachment_size(&self) -> u64 {
        self.config.max_attachment_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_credentials() -> Credentials {
        Credentials::new(None, None, None)
    }

    #[tokio::test]
    async fn test_mock_login_and_publish() {
        let mut client = MockClient::succeeding("test");

        client.login(&no_credentials()).await.unwrap();
        assert_eq!(client.login_calls(), 1);
        assert!(client.session().await.is_some());

        let post_id = client.publish("Hello", &[]).await.unwrap();
        assert!(post_id.starts_with("test:mock-"));
        assert_eq!(client.published_content(), vec!["Hello"]);
    }

    #[tokio::test]
    async fn test_mock_requires_authentication() {
        let client = MockClient::succeeding("test");

        let result = client.publish("Hello", &[]).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Not authenticated"));
    }

    #[tokio::test]
    async fn test_mock_login_failure() {
        let mut client = MockClient::login_failure("test", "Invalid credentials");

        let result = client.login(&no_credentials()).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid credentials"));
        assert!(client.session().await.is_none());
    }

    #[tokio::test]
    async fn test_mock_resume_failure() {
        let mut client = MockClient::resume_failure("test");
        let record = SessionRecord::new(vec!["stale".to_string()]);

        assert!(client.resume(&record).await.is_err());
        assert_eq!(client.resume_calls(), 1);

        // Credential login still works afterwards.
        client.login(&no_credentials()).await.unwrap();
        assert!(client.session().await.is_some());
    }

    #[tokio::test]
    async fn test_mock_publish_fail_after() {
        let client = MockClient::publish_failure_after("test", 1);

        client.publish("first", &[]).await.unwrap();
        let result = client.publish("second", &[]).await;
        assert!(result.is_err());
        assert_eq!(client.published_content(), vec!["first"]);
    }
}
