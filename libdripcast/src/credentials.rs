//! Login credentials supplied at startup
//!
//! The secrets are gathered once at process start and threaded explicitly
//! into authentication. Individual fields are only required when the
//! credential-login fallback path is actually taken, so a run that resumes a
//! cached session never needs them.

use secrecy::{ExposeSecret, SecretString};

use crate::error::{PlatformError, Result};

/// The three externally supplied secrets for full credential login.
#[derive(Debug)]
pub struct Credentials {
    pub username: Option<String>,
    password: Option<SecretString>,
    pub email: Option<String>,
}

impl Credentials {
    pub fn new(username: Option<String>, password: Option<String>, email: Option<String>) -> Self {
        Self {
            username,
            password: password.map(SecretString::from),
            email,
        }
    }

    /// The username/password pair for the login path.
    ///
    /// Missing credentials surface as an authentication failure, not a usage
    /// error: they are only a problem once the cached session could not be
    /// used.
    pub fn require_login(&self) -> Result<(&str, &str)> {
        let username = self.username.as_deref().ok_or_else(|| {
            PlatformError::Authentication(
                "No username configured; set DRIPCAST_USERNAME or pass --username".to_string(),
            )
        })?;
        let password = self
            .password
            .as_ref()
            .map(|p| p.expose_secret())
            .ok_or_else(|| {
                PlatformError::Authentication(
                    "No password configured; set DRIPCAST_PASSWORD or pass --password".to_string(),
                )
            })?;
        Ok((username, password))
    }
}
