//! OAuth2 credential store for the Gmail console
//!
//! Manages a single on-disk token record. The flow is deliberately linear:
//! load the persisted token if one exists, otherwise hand back an
//! authorization URL so the user can fetch a one-time code, then exchange
//! that code at the provider token endpoint and persist the result. There is
//! no refresh or revocation handling - an expired token simply fails against
//! the remote API with the provider's own authorization error.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::Config;
use crate::error::{GmailError, Result};

/// Scopes requested during authorization: read plus modify mailbox access
pub const REQUIRED_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/gmail.readonly",
    "https://www.googleapis.com/auth/gmail.modify",
];

/// Google's OAuth2 authorization endpoint
const AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Google's OAuth2 token endpoint
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// Timeout applied to the token exchange request
const EXCHANGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Bearer-token bundle issued by the provider's token endpoint
///
/// Persisted verbatim as the sole content of the token file and fully
/// overwritten by each successful exchange, never mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
    pub token_type: Option<String>,
    pub scope: Option<String>,
}

/// Outcome of the startup authentication attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStatus {
    /// A persisted token was found and installed
    Authorized,
    /// No usable token on disk; the user must visit the URL and paste the code
    ConsentRequired { auth_url: String },
}

/// Manages the single persisted credential and the authorization exchange
pub struct CredentialStore {
    config: Config,
    token_path: PathBuf,
    token_endpoint: String,
    http: reqwest::Client,
    token: Option<StoredToken>,
}

impl CredentialStore {
    /// Create a store reading and writing the token file at `token_path`
    pub fn new(config: Config, token_path: impl Into<PathBuf>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(EXCHANGE_TIMEOUT)
            .build()?;

        Ok(Self {
            config,
            token_path: token_path.into(),
            token_endpoint: TOKEN_ENDPOINT.to_string(),
            http,
            token: None,
        })
    }

    /// Override the token endpoint (used by tests against a local server)
    pub fn with_token_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.token_endpoint = endpoint.into();
        self
    }

    /// Attempt to load and install the persisted token
    ///
    /// Never blocks waiting for user input: if the file is absent or
    /// unreadable, returns `ConsentRequired` carrying the authorization URL
    /// for the caller to display.
    pub async fn ensure_authenticated(&mut self) -> Result<AuthStatus> {
        match tokio::fs::read_to_string(&self.token_path).await {
            Ok(raw) => match serde_json::from_str::<StoredToken>(&raw) {
                Ok(token) => {
                    debug!("Using existing token from {:?}", self.token_path);
                    self.token = Some(token);
                    Ok(AuthStatus::Authorized)
                }
                Err(e) => {
                    warn!("Token file {:?} is unreadable: {}", self.token_path, e);
                    Ok(AuthStatus::ConsentRequired {
                        auth_url: self.authorization_url()?,
                    })
                }
            },
            Err(e) => {
                debug!("No token file at {:?}: {}", self.token_path, e);
                Ok(AuthStatus::ConsentRequired {
                    auth_url: self.authorization_url()?,
                })
            }
        }
    }

    /// Exchange a one-time authorization code for a token, install it, and
    /// persist it to disk (overwriting any existing file)
    pub async fn complete_authorization(&mut self, code: &str) -> Result<()> {
        let params = [
            ("code", code),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];

        let response = self
            .http
            .post(&self.token_endpoint)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GmailError::AuthError(format!(
                "Token exchange failed (HTTP {}): {}",
                status.as_u16(),
                body
            )));
        }

        let token: StoredToken = response.json().await?;
        self.persist(&token).await?;
        self.token = Some(token);
        info!("Token stored at {:?}", self.token_path);
        Ok(())
    }

    /// The authorization URL the user must visit to obtain a one-time code
    pub fn authorization_url(&self) -> Result<String> {
        let scope = REQUIRED_SCOPES.join(" ");
        let url = Url::parse_with_params(
            AUTH_ENDPOINT,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", scope.as_str()),
                ("access_type", "offline"),
            ],
        )
        .map_err(|e| GmailError::AuthError(format!("Invalid authorization URL: {}", e)))?;
        Ok(url.into())
    }

    /// The installed access token, if authenticated
    pub fn access_token(&self) -> Option<&str> {
        self.token.as_ref().map(|t| t.access_token.as_str())
    }

    async fn persist(&self, token: &StoredToken) -> Result<()> {
        if let Some(parent) = self.token_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let serialized = serde_json::to_string(token)?;
        tokio::fs::write(&self.token_path, serialized).await?;
        secure_token_file(&self.token_path).await?;
        Ok(())
    }
}

/// Secure token file permissions on Unix systems
///
/// Sets file permissions to 0600 (read/write for owner only)
/// to prevent unauthorized access to OAuth2 tokens
#[cfg(unix)]
pub async fn secure_token_file(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut perms = tokio::fs::metadata(path).await?.permissions();
    perms.set_mode(0o600);
    tokio::fs::set_permissions(path, perms).await?;
    Ok(())
}

/// Secure token file on Windows (stub implementation)
///
/// Windows uses ACLs instead of Unix permissions
#[cfg(windows)]
pub async fn secure_token_file(_path: &Path) -> Result<()> {
    Ok(())
}
