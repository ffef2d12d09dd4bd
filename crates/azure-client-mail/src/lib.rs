//! # azure-client-mail
//!
//! Outlook mail operations on the Microsoft Graph API, authenticated with
//! an access token from `azure-client-oauth`.
//!
//! ## Quick Start
//!
//! ```ignore
//! use azure_client_mail::{Draft, ListQuery, MailClient};
//!
//! let client = MailClient::from_auth(&auth);
//! let id = client
//!     .create_draft("me", &Draft::new("Hello", "<p>Hi</p>").to("a@example.com"))
//!     .await?;
//! client.send_email("me", &id).await?;
//!
//! let mut pages = client.get_all_emails("me", "Drafts", ListQuery::new().select(["id"]));
//! while let Some(page) = pages.next_page().await? {
//!     for message in page {
//!         client.delete_email("me", &message.id).await?;
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod message;
mod query;

pub use client::{GRAPH_BASE_URL, MailClient, MessagePages};
pub use error::{Error, ProviderError, Result};
pub use message::{Attachment, Draft, EmailAddress, ItemBody, Message, Recipient};
pub use query::{ListQuery, MessagePage};
