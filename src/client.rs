//! Gmail API client: stateless request wrappers over the REST surface
//!
//! Each operation maps to exactly one remote call and normalizes the response.
//! There is no pagination past the first page, no retry, and no backoff - the
//! caller sees exactly the remote API's first response, classified into a
//! `GmailError` on failure.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{classify_status, GmailError, Result};
use crate::models::{
    CreateLabelRequest, Label, LabelList, Message, MessageList, MessageSummary,
    ModifyMessageRequest,
};

/// The reserved label whose membership defines "in the inbox"
///
/// Archiving is a label-membership convention of the remote system, not a
/// distinct message state.
pub const INBOX_LABEL: &str = "INBOX";

const DEFAULT_BASE_URL: &str = "https://gmail.googleapis.com/gmail/v1";

/// Timeout applied to every outbound request so a hung remote call cannot
/// hang the whole CLI
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Mailbox operations as seen by the interactive shell
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailboxClient: Send + Sync {
    /// List identifiers of the most recent messages, first page only
    async fn list_recent(&self, limit: u32) -> Result<Vec<String>>;

    /// Fetch the normalized display record for one message
    async fn get_details(&self, message_id: &str) -> Result<MessageSummary>;

    /// List identifiers of messages matching an opaque provider query,
    /// passed through verbatim
    async fn filter(&self, query: &str, limit: u32) -> Result<Vec<String>>;

    /// Convenience wrapper building a `from:` query
    async fn search_by_sender(&self, sender: &str, limit: u32) -> Result<Vec<String>> {
        self.filter(&format!("from:{}", sender), limit).await
    }

    /// Convenience wrapper building a `subject:` query
    async fn search_by_subject(&self, subject: &str, limit: u32) -> Result<Vec<String>> {
        self.filter(&format!("subject:{}", subject), limit).await
    }

    /// Convenience wrapper building a `label:` query
    async fn search_by_label(&self, label_name: &str, limit: u32) -> Result<Vec<String>> {
        self.filter(&format!("label:{}", label_name), limit).await
    }

    /// Convenience wrapper for the `is:unread` query
    async fn search_unread(&self, limit: u32) -> Result<Vec<String>> {
        self.filter("is:unread", limit).await
    }

    /// List all labels in the account
    async fn list_labels(&self) -> Result<Vec<Label>>;

    /// Create a new label with fixed visibility options
    async fn create_label(&self, name: &str) -> Result<Label>;

    /// Add one label to one message
    async fn add_label(&self, message_id: &str, label_id: &str) -> Result<()>;

    /// Remove one label from one message
    async fn remove_label(&self, message_id: &str, label_id: &str) -> Result<()>;

    /// Archive a message by removing the INBOX label
    async fn archive(&self, message_id: &str) -> Result<()> {
        self.remove_label(message_id, INBOX_LABEL).await
    }

    /// Unarchive a message by re-adding the INBOX label
    async fn unarchive(&self, message_id: &str) -> Result<()> {
        self.add_label(message_id, INBOX_LABEL).await
    }
}

/// Production client issuing HTTPS calls against the Gmail REST endpoints
///
/// Holds the installed access token as an explicit session value; there is
/// no ambient credential state.
pub struct GmailRestClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl GmailRestClient {
    /// Create a client against the production Gmail endpoint
    pub fn new(access_token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(access_token, DEFAULT_BASE_URL)
    }

    /// Create a client against an explicit base URL (used by tests)
    pub fn with_base_url(
        access_token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        debug!("GET {} {:?}", path, query);
        let response = self
            .http
            .get(self.url(path))
            .query(query)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        debug!("POST {}", path);
        let response = self
            .http
            .post(self.url(path))
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(classify_status(status, body))
        }
    }

    /// Issue one additive or subtractive label modification for one message
    async fn modify(&self, message_id: &str, body: &ModifyMessageRequest) -> Result<()> {
        let path = format!("/users/me/messages/{}/modify", message_id);
        debug!("POST {}", path);
        let response = self
            .http
            .post(self.url(&path))
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(classify_status(status, text))
        }
    }

    /// Shared list/search call; `query` is passed through verbatim when set
    async fn message_ids(&self, query: Option<&str>, limit: u32) -> Result<Vec<String>> {
        let mut params: Vec<(&str, String)> = vec![("maxResults", limit.to_string())];
        if let Some(q) = query {
            params.push(("q", q.to_string()));
        }

        let list: MessageList = self.get_json("/users/me/messages", &params).await?;
        let mut ids: Vec<String> = list
            .messages
            .unwrap_or_default()
            .into_iter()
            .map(|m| m.id)
            .collect();
        // The server honors maxResults, but never hand back more than asked
        ids.truncate(limit as usize);

        debug!("Found {} messages", ids.len());
        Ok(ids)
    }
}

#[async_trait]
impl MailboxClient for GmailRestClient {
    async fn list_recent(&self, limit: u32) -> Result<Vec<String>> {
        self.message_ids(None, limit).await
    }

    async fn get_details(&self, message_id: &str) -> Result<MessageSummary> {
        let path = format!("/users/me/messages/{}", message_id);
        let message: Message = self.get_json(&path, &[]).await?;
        Ok(MessageSummary::from(message))
    }

    async fn filter(&self, query: &str, limit: u32) -> Result<Vec<String>> {
        self.message_ids(Some(query), limit).await
    }

    async fn list_labels(&self) -> Result<Vec<Label>> {
        let list: LabelList = self.get_json("/users/me/labels", &[]).await?;
        Ok(list.labels.unwrap_or_default())
    }

    async fn create_label(&self, name: &str) -> Result<Label> {
        if name.trim().is_empty() {
            return Err(GmailError::LabelError(
                "Label name must not be empty".to_string(),
            ));
        }
        self.post_json("/users/me/labels", &CreateLabelRequest::new(name))
            .await
    }

    async fn add_label(&self, message_id: &str, label_id: &str) -> Result<()> {
        self.modify(message_id, &ModifyMessageRequest::add(label_id))
            .await
    }

    async fn remove_label(&self, message_id: &str, label_id: &str) -> Result<()> {
        self.modify(message_id, &ModifyMessageRequest::remove(label_id))
            .await
    }
}
