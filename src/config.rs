//! OAuth2 client configuration loaded from the process environment

use std::env;

use crate::error::{GmailError, Result};

/// Default redirect URI when GMAIL_REDIRECT_URI is not set
const DEFAULT_REDIRECT_URI: &str = "http://localhost:8080";

/// OAuth2 client settings for the Gmail console
///
/// The three values are supplied via the process environment; they are not
/// validated locally beyond presence - an invalid client id or secret is
/// rejected by the provider during the authorization exchange.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// # Environment Variables
    /// - `GMAIL_CLIENT_ID`: OAuth2 client ID
    /// - `GMAIL_CLIENT_SECRET`: OAuth2 client secret
    /// - `GMAIL_REDIRECT_URI`: Redirect URI (optional, defaults to http://localhost:8080)
    pub fn from_env() -> Result<Self> {
        let client_id = env::var("GMAIL_CLIENT_ID")
            .map_err(|_| GmailError::ConfigError("GMAIL_CLIENT_ID not set".to_string()))?;
        let client_secret = env::var("GMAIL_CLIENT_SECRET")
            .map_err(|_| GmailError::ConfigError("GMAIL_CLIENT_SECRET not set".to_string()))?;
        let redirect_uri = env::var("GMAIL_REDIRECT_URI")
            .unwrap_or_else(|_| DEFAULT_REDIRECT_URI.to_string());

        Ok(Self {
            client_id,
            client_secret,
            redirect_uri,
        })
    }
}
