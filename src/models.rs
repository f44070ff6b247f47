//! Wire types for the Gmail REST API and the normalized display model

use serde::{Deserialize, Serialize};

/// Placeholder shown when a message carries no Subject header
pub const NO_SUBJECT: &str = "No Subject";
/// Placeholder shown when a message carries no From header
pub const UNKNOWN_SENDER: &str = "Unknown Sender";
/// Placeholder shown when a message carries no Date header
pub const UNKNOWN_DATE: &str = "Unknown Date";

/// Response of `GET /users/me/messages`
///
/// The `messages` field is absent entirely when no message matches.
#[derive(Debug, Deserialize)]
pub struct MessageList {
    pub messages: Option<Vec<MessageRef>>,
    #[serde(rename = "resultSizeEstimate")]
    pub result_size_estimate: Option<u32>,
}

/// A bare message reference from a list response
#[derive(Debug, Clone, Deserialize)]
pub struct MessageRef {
    pub id: String,
}

/// Response of `GET /users/me/messages/{id}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub thread_id: Option<String>,
    pub label_ids: Option<Vec<String>>,
    pub snippet: Option<String>,
    pub payload: Option<MessagePart>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessagePart {
    pub headers: Option<Vec<Header>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Header {
    pub name: Option<String>,
    pub value: Option<String>,
}

/// Response of `GET /users/me/labels`
#[derive(Debug, Deserialize)]
pub struct LabelList {
    pub labels: Option<Vec<Label>>,
}

/// A Gmail label (remote mailbox category)
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Label {
    pub id: String,
    pub name: String,
}

/// Request body for `POST /users/me/messages/{id}/modify`
///
/// Exactly one of the two lists is populated per call; the other is omitted
/// from the serialized body.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ModifyMessageRequest {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub add_label_ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub remove_label_ids: Vec<String>,
}

impl ModifyMessageRequest {
    pub fn add(label_id: &str) -> Self {
        Self {
            add_label_ids: vec![label_id.to_string()],
            ..Default::default()
        }
    }

    pub fn remove(label_id: &str) -> Self {
        Self {
            remove_label_ids: vec![label_id.to_string()],
            ..Default::default()
        }
    }
}

/// Request body for `POST /users/me/labels`
///
/// Visibility options are fixed: created labels always show in both the
/// label list and the message list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLabelRequest {
    pub name: String,
    pub label_list_visibility: String,
    pub message_list_visibility: String,
}

impl CreateLabelRequest {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            label_list_visibility: "labelShow".to_string(),
            message_list_visibility: "show".to_string(),
        }
    }
}

/// Normalized display record for a single message
///
/// Built from a `Message` response; missing headers fall back to fixed
/// placeholder strings. Never persisted, immutable once returned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSummary {
    pub id: String,
    pub subject: String,
    pub from: String,
    pub date: String,
    pub snippet: String,
    pub labels: Vec<String>,
}

impl From<Message> for MessageSummary {
    fn from(msg: Message) -> Self {
        let headers = msg
            .payload
            .and_then(|p| p.headers)
            .unwrap_or_default();

        let header_value = |wanted: &str| -> Option<String> {
            headers
                .iter()
                .find(|h| h.name.as_deref() == Some(wanted))
                .and_then(|h| h.value.clone())
        };

        Self {
            id: msg.id,
            subject: header_value("Subject").unwrap_or_else(|| NO_SUBJECT.to_string()),
            from: header_value("From").unwrap_or_else(|| UNKNOWN_SENDER.to_string()),
            date: header_value("Date").unwrap_or_else(|| UNKNOWN_DATE.to_string()),
            snippet: msg.snippet.unwrap_or_default(),
            labels: msg.label_ids.unwrap_or_default(),
        }
    }
}
