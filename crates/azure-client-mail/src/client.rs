//! Graph mail REST client.

use reqwest::header::CONTENT_LENGTH;
use serde::Deserialize;
use tracing::debug;

use azure_client_oauth::{AzureAuth, ProviderError};

use crate::error::{Error, Result};
use crate::message::{Draft, Message};
use crate::query::{ListQuery, MessagePage};

/// Default Graph API root.
pub const GRAPH_BASE_URL: &str = "https://graph.microsoft.com/beta";

/// Mail client authenticated with a bearer token.
///
/// `user_id` arguments are path prefixes: `me`, `users/{address}` or
/// `users/{object-id}@{tenant-id}`.
#[derive(Debug, Clone)]
pub struct MailClient {
    base_url: String,
    access_token: String,
    http_client: reqwest::Client,
}

impl MailClient {
    /// Creates a client for the default Graph endpoint.
    #[must_use]
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            base_url: GRAPH_BASE_URL.to_string(),
            access_token: access_token.into(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Creates a client using the coordinator's current access token.
    #[must_use]
    pub fn from_auth(auth: &AzureAuth) -> Self {
        Self::new(auth.access_token())
    }

    /// Uses another API root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Uses a custom HTTP client.
    #[must_use]
    pub fn with_http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = http_client;
        self
    }

    /// Returns the API root.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Creates a draft and returns its message id.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response has no id.
    pub async fn create_draft(&self, user_id: &str, draft: &Draft) -> Result<String> {
        #[derive(Deserialize)]
        struct Created {
            id: Option<String>,
        }

        debug!(
            user_id,
            recipients = draft.to_recipients.len(),
            attachments = draft.attachments.len(),
            "Creating draft"
        );
        let response = self
            .http_client
            .post(format!("{}/{user_id}/messages", self.base_url))
            .bearer_auth(&self.access_token)
            .json(draft)
            .send()
            .await?;
        let body = check(response).await?.text().await?;
        let created: Created = serde_json::from_str(&body)?;
        created
            .id
            .ok_or_else(|| Error::InvalidResponse("created message has no id".to_string()))
    }

    /// Lists one page of messages in a folder.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn get_emails(
        &self,
        user_id: &str,
        folder_id: &str,
        query: &ListQuery,
    ) -> Result<MessagePage> {
        let url = self.folder_messages_url(user_id, folder_id);
        self.fetch_page(&url, &query.to_pairs()).await
    }

    /// Lists every message in a folder, one page at a time.
    #[must_use]
    pub fn get_all_emails(&self, user_id: &str, folder_id: &str, query: ListQuery) -> MessagePages<'_> {
        MessagePages {
            client: self,
            next: Some(PageRequest::First {
                url: self.folder_messages_url(user_id, folder_id),
                query,
            }),
        }
    }

    /// Sends a previously created draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn send_email(&self, user_id: &str, id: &str) -> Result<()> {
        debug!(user_id, id, "Sending message");
        let response = self
            .http_client
            .post(format!("{}/{user_id}/messages/{id}/send", self.base_url))
            .bearer_auth(&self.access_token)
            .header(CONTENT_LENGTH, 0)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    /// Deletes a message.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete_email(&self, user_id: &str, id: &str) -> Result<()> {
        debug!(user_id, id, "Deleting message");
        let response = self
            .http_client
            .delete(format!("{}/{user_id}/messages/{id}", self.base_url))
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    fn folder_messages_url(&self, user_id: &str, folder_id: &str) -> String {
        format!("{}/{user_id}/MailFolders/{folder_id}/messages", self.base_url)
    }

    async fn fetch_page(&self, url: &str, query: &[(&str, String)]) -> Result<MessagePage> {
        debug!(url, "Fetching messages");
        let response = self
            .http_client
            .get(url)
            .bearer_auth(&self.access_token)
            .query(query)
            .send()
            .await?;
        let body = check(response).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(ProviderError::from_response(response).await.into())
    }
}

enum PageRequest {
    First { url: String, query: ListQuery },
    Link(String),
}

/// Pager over a folder listing that follows `@odata.nextLink`.
///
/// A failed page ends the listing.
pub struct MessagePages<'a> {
    client: &'a MailClient,
    next: Option<PageRequest>,
}

impl MessagePages<'_> {
    /// Fetches the next page, or `None` once the listing is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn next_page(&mut self) -> Result<Option<Vec<Message>>> {
        let Some(request) = self.next.take() else {
            return Ok(None);
        };

        let page = match request {
            PageRequest::First { url, query } => {
                self.client.fetch_page(&url, &query.to_pairs()).await?
            }
            PageRequest::Link(url) => self.client.fetch_page(&url, &[]).await?,
        };

        self.next = page.next_link.map(PageRequest::Link);
        Ok(Some(page.value))
    }

    /// Drains every remaining page.
    ///
    /// # Errors
    ///
    /// Returns the first request error.
    pub async fn collect_all(mut self) -> Result<Vec<Message>> {
        let mut messages = Vec::new();
        while let Some(page) = self.next_page().await? {
            messages.extend(page);
        }
        Ok(messages)
    }
}
