//! Bluesky platform client
//!
//! Sessions are cached as a four-token record (DID, handle, access JWT,
//! refresh JWT). Resuming rebuilds the agent from that record; the build
//! fails if the PDS rejects the tokens, which callers treat as a recoverable
//! signal to fall back to credential login.

use async_trait::async_trait;
use bsky_sdk::agent::config::Config as AgentConfig;
use bsky_sdk::BskyAgent;
use serde_json::json;

use crate::config::BlueskyConfig;
use crate::credentials::Credentials;
use crate::error::{PlatformError, Result};
use crate::platforms::PostClient;
use crate::types::{MediaAttachment, SessionRecord};

type AtpSession = bsky_sdk::api::com::atproto::server::create_session::Output;

/// Number of token strings in a cached Bluesky session record.
const SESSION_TOKENS: usize = 4;

/// Map bsky-sdk/AT Protocol errors onto the platform error taxonomy.
///
/// AT Protocol errors surface as strings with embedded status codes and
/// error names (e.g. "InvalidRequest", "ExpiredToken"), so classification
/// is pattern matching over the rendered error.
fn map_bluesky_error<E: std::fmt::Display + std::fmt::Debug>(
    error: E,
    context: &str,
) -> PlatformError {
    let error_msg = format!("{}", error);
    let debug_msg = format!("{:?}", error);

    if error_msg.contains("401")
        || error_msg.contains("403")
        || error_msg.contains("AuthenticationRequired")
        || error_msg.contains("InvalidToken")
        || error_msg.contains("ExpiredToken")
        || error_msg.contains("InvalidCredentials")
        || error_msg.contains("AccountNotFound")
        || debug_msg.contains("Unauthorized")
        || debug_msg.contains("Forbidden")
    {
        return PlatformError::Authentication(format!(
            "Bluesky {} failed: {}",
            context, error_msg
        ));
    }

    if error_msg.contains("429")
        || error_msg.contains("RateLimitExceeded")
        || error_msg.contains("TooManyRequests")
        || debug_msg.contains("RateLimit")
    {
        return PlatformError::RateLimit(format!(
            "Bluesky rate limit hit during {}: {}",
            context, error_msg
        ));
    }

    if error_msg.contains("connection")
        || error_msg.contains("network")
        || error_msg.contains("timeout")
        || error_msg.contains("unreachable")
        || error_msg.contains("dns")
        || debug_msg.contains("Connect")
        || debug_msg.contains("Timeout")
    {
        return PlatformError::Network(format!(
            "Network error during Bluesky {}: {}",
            context, error_msg
        ));
    }

    PlatformError::Posting(format!("Bluesky {} failed: {}", context, error_msg))
}

fn record_from_session(session: &AtpSession) -> SessionRecord {
    SessionRecord::new(vec![
        session.did.as_str().to_string(),
        session.handle.as_str().to_string(),
        session.access_jwt.clone(),
        session.refresh_jwt.clone(),
    ])
}

fn session_from_record(record: &SessionRecord) -> Result<AtpSession> {
    if record.tokens.len() != SESSION_TOKENS {
        return Err(PlatformError::Authentication(format!(
            "Cached session has {} token(s), expected {}",
            record.tokens.len(),
            SESSION_TOKENS
        ))
        .into());
    }

    serde_json::from_value(json!({
        "did": record.tokens[0],
        "handle": record.tokens[1],
        "accessJwt": record.tokens[2],
        "refreshJwt": record.tokens[3],
    }))
    .map_err(|e| {
        PlatformError::Authentication(format!("Cached session is not usable: {}", e)).into()
    })
}

pub struct BlueskyClient {
    agent: BskyAgent,
    service: String,
}

impl BlueskyClient {
    /// Create an unauthenticated client against the configured service.
    pub async fn new(config: &BlueskyConfig) -> Result<Self> {
        let agent = BskyAgent::builder()
            .config(AgentConfig {
                endpoint: config.service.clone(),
                ..Default::default()
            })
            .build()
            .await
            .map_err(|e| map_bluesky_error(e, "client setup"))?;

        Ok(Self {
            agent,
            service: config.service.clone(),
        })
    }
}

#[async_trait]
impl PostClient for BlueskyClient {
    async fn login(&mut self, credentials: &Credentials) -> Result<()> {
        let (identifier, password) = credentials.require_login()?;
        tracing::debug!("Logging in to {} as {}", self.service, identifier);

        self.agent
            .login(identifier, password)
            .await
            .map_err(|e| map_bluesky_error(e, "login"))?;

        Ok(())
    }

    async fn resume(&mut self, record: &SessionRecord) -> Result<()> {
        let session = session_from_record(record)?;
        tracing::debug!("Resuming cached session against {}", self.service);

        let agent = BskyAgent::builder()
            .config(AgentConfig {
                endpoint: self.service.clone(),
                session: Some(session),
                ..Default::default()
            })
            .build()
            .await
            .map_err(|e| map_bluesky_error(e, "session resume"))?;

        self.agent = agent;
        Ok(())
    }

    async fn session(&self) -> Option<SessionRecord> {
        self.agent
            .to_config()
            .await
            .session
            .as_ref()
            .map(record_from_session)
    }

    async fn publish(&self, content: &str, attachments: &[MediaAttachment]) -> Result<String> {
        use bsky_sdk::api::app::bsky::embed::images::{ImageData, MainData};
        use bsky_sdk::api::app::bsky::feed::post::{RecordData, RecordEmbedRefs};
        use bsky_sdk::api::types::string::Datetime;
        use bsky_sdk::api::types::Union;

        let embed = if attachments.is_empty() {
            None
        } else {
            let mut images = Vec::with_capacity(attachments.len());
            for attachment in attachments {
                tracing::debug!(
                    "Uploading {} ({} bytes, {})",
                    attachment.path,
                    attachment.bytes.len(),
                    attachment.media_type
                );

                let output = self
                    .agent
                    .api
                    .com
                    .atproto
                    .repo
                    .upload_blob(attachment.bytes.clone())
                    .await
                    .map_err(|e| map_bluesky_error(e, "media upload"))?;

                images.push(
                    ImageData {
                        alt: String::new(),
                        aspect_ratio: None,
                        image: output.data.blob,
                    }
                    .into(),
                );
            }
            Some(Union::Refs(RecordEmbedRefs::AppBskyEmbedImagesMain(
                Box::new(MainData { images }.into()),
            )))
        };

        let record = RecordData {
            created_at: Datetime::now(),
            embed,
            entities: None,
            facets: None,
            labels: None,
            langs: None,
            reply: None,
            tags: None,
            text: content.to_string(),
        };

        let response = self
            .agent
            .create_record(record)
            .await
            .map_err(|e| map_bluesky_error(e, "publish"))?;

        let at_uri = response.uri.to_string();
        tracing::debug!("Published to Bluesky: {}", at_uri);

        Ok(at_uri)
    }

    fn name(&self) -> &str {
        "bluesky"
    }

    fn max_attachments(&self) -> usize {
        4
    }

    fn max_attachment_size(&self) -> u64 {
        1_000_000
    }
}
