//! Gmail Console
//!
//! An interactive command-line client for a Gmail mailbox: list, inspect,
//! and search messages, manage labels, and archive or unarchive mail.
//!
//! # Overview
//!
//! The crate has three components:
//! - **Credential store**: loads a single persisted OAuth2 token at startup
//!   and can exchange a one-time authorization code for a fresh token
//! - **Mailbox client**: stateless wrappers mapping one local operation to
//!   one Gmail REST call each, with classified errors
//! - **Interactive shell**: a line-oriented command loop dispatching to the
//!   client and rendering plain-text summaries
//!
//! # Example Usage
//!
//! ```no_run
//! use gmail_console::auth::CredentialStore;
//! use gmail_console::client::{GmailRestClient, MailboxClient};
//! use gmail_console::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let mut store = CredentialStore::new(config, "token.json")?;
//!     store.ensure_authenticated().await?;
//!
//!     let token = store.access_token().unwrap_or_default().to_string();
//!     let client = GmailRestClient::new(token)?;
//!     let ids = client.list_recent(10).await?;
//!     println!("{} messages", ids.len());
//!     Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`auth`] - OAuth2 credential store and authorization exchange
//! - [`cli`] - Command-line argument parsing
//! - [`client`] - Gmail REST API client
//! - [`config`] - OAuth2 client settings from the environment
//! - [`error`] - Error types and result aliases
//! - [`models`] - Wire types and the normalized display model
//! - [`shell`] - Interactive command loop

pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod shell;

// Re-export commonly used types for convenience
pub use error::{GmailError, Result};

pub use auth::{AuthStatus, CredentialStore, StoredToken};
pub use client::{GmailRestClient, MailboxClient, INBOX_LABEL};
pub use config::Config;
pub use models::{Label, MessageSummary};
pub use shell::{Command, InteractiveShell};
