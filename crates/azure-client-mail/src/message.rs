//! Message payloads exchanged with the Graph mail API.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

const FILE_ATTACHMENT_TYPE: &str = "#microsoft.graph.fileAttachment";

/// An email address with an optional display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    /// Address, e.g. `user@example.com`.
    pub address: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A message recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
    /// The recipient's address.
    pub email_address: EmailAddress,
}

impl Recipient {
    /// Creates a recipient without display name.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            email_address: EmailAddress {
                address: address.into(),
                name: None,
            },
        }
    }
}

/// Message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemBody {
    /// `HTML` or `Text`.
    pub content_type: String,
    /// The body itself.
    pub content: String,
}

/// A file attached to a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    #[serde(rename = "@odata.type")]
    odata_type: &'static str,
    /// File name shown to the recipient.
    pub name: String,
    /// Base64-encoded file content.
    pub content_bytes: String,
}

impl Attachment {
    /// Creates a file attachment from raw bytes.
    #[must_use]
    pub fn file(name: impl Into<String>, content: &[u8]) -> Self {
        Self {
            odata_type: FILE_ATTACHMENT_TYPE,
            name: name.into(),
            content_bytes: STANDARD.encode(content),
        }
    }

    /// Reads `path` and attaches it under its file name.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::file(name, &content))
    }
}

/// A new message to be saved in the drafts folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    /// Subject line.
    pub subject: String,
    /// HTML body.
    pub body: ItemBody,
    /// Recipients.
    pub to_recipients: Vec<Recipient>,
    /// File attachments.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl Draft {
    /// Creates a draft with an HTML body and no recipients.
    #[must_use]
    pub fn new(subject: impl Into<String>, html_body: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            body: ItemBody {
                content_type: "HTML".to_string(),
                content: html_body.into(),
            },
            to_recipients: Vec::new(),
            attachments: Vec::new(),
        }
    }

    /// Adds a recipient.
    #[must_use]
    pub fn to(mut self, address: impl Into<String>) -> Self {
        self.to_recipients.push(Recipient::new(address));
        self
    }

    /// Adds an attachment.
    #[must_use]
    pub fn attach(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }
}

/// A message as returned by the list endpoints.
///
/// Only the fields requested with `$select` are present; anything not
/// modelled here ends up in [`Message::extra`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Message identifier.
    pub id: String,
    /// Subject line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Whether the message is still a draft.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_draft: Option<bool>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date_time: Option<DateTime<Utc>>,
    /// Reception time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received_date_time: Option<DateTime<Utc>>,
    /// Recipients.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to_recipients: Vec<Recipient>,
    /// Other returned properties.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
