//! Session caching and cache-first authentication
//!
//! The store owns the on-disk record's lifecycle: it is read at most once
//! and written at most once per run, and a refresh replaces the record
//! wholesale. Cache-load failure is the one recoverable condition in the
//! whole run; everything funnels into the credential login path instead of
//! erroring.

use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::credentials::Credentials;
use crate::error::Result;
use crate::platforms::PostClient;
use crate::types::SessionRecord;

/// Default maximum cached-session age in hours.
pub const DEFAULT_MAX_AGE_HOURS: u64 = 24;

/// On-disk store for the cached session record.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the persisted record.
    ///
    /// A missing file, unreadable file, or corrupt content all yield `None`:
    /// an absent cache is the normal first-run state, not a fault.
    pub fn load_cached(&self) -> Option<SessionRecord> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                debug!("No cached session at {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(
                    "Ignoring corrupt session cache at {}: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    /// Persist a record, replacing any prior cache wholesale.
    pub fn save(&self, record: &SessionRecord) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(record)?;
        std::fs::write(&self.path, json)?;

        // The tokens grant full account access; keep them owner-only.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }
}

/// Cache-first authentication for a post client.
pub struct SessionManager {
    store: SessionStore,
    max_age_ms: i64,
}

impl SessionManager {
    pub fn new(store: SessionStore, max_age_hours: u64) -> Self {
        Self {
            store,
            max_age_ms: (max_age_hours * 3_600_000) as i64,
        }
    }

    /// Authenticate the client, preferring the cached session.
    ///
    /// A fresh cached record is applied without any network login; an
    /// absent, stale, or rejected record degrades to the credential login
    /// path, and the session obtained there overwrites the cache. Only a
    /// failed credential login is fatal.
    pub async fn authenticate(
        &self,
        client: &mut dyn PostClient,
        credentials: &Credentials,
    ) -> Result<()> {
        let now_ms = chrono::Utc::now().timestamp_millis();

        if let Some(record) = self.store.load_cached() {
            if record.is_fresh(self.max_age_ms, now_ms) {
                match client.resume(&record).await {
                    Ok(()) => {
                        info!("Resumed cached session for {}", client.name());
                        return Ok(());
                    }
                    Err(e) => {
                        warn!("Cached session rejected by {}: {}", client.name(), e);
                    }
                }
            } else {
                debug!(
                    "Cached session is stale (issued {}s ago)",
                    (now_ms - record.issued_at) / 1000
                );
            }
        }

        client.login(credentials).await?;
        info!("Logged in to {} with credentials", client.name());

        match client.session().await {
            Some(record) => {
                if let Err(e) = self.store.save(&record) {
                    warn!("Failed to persist session cache: {}", e);
                }
            }
            None => warn!("{} exposed no session to cache", client.name()),
        }

        Ok(())
    }
}
