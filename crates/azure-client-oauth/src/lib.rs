//! # azure-client-oauth
//!
//! `OAuth2` authorization-code login and token refresh against the Microsoft
//! identity platform, with credentials persisted to a JSON file.
//!
//! ## Features
//!
//! - **Interactive login**: drives a browser session to the consent page and
//!   waits for the redirect carrying the authorization code
//! - **Token exchange**: authorization code and refresh token grants
//! - **Credential file**: tolerant JSON load, atomic save
//! - **Error bodies**: both the `OAuth2` and the Graph error shapes
//!
//! ## Quick Start
//!
//! ```ignore
//! use azure_client_oauth::{AppRegistration, AzureAuth, Scope, get_or_create_credentials};
//! use azure_client_oauth::browser::ChromiumSession;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registration = AppRegistration {
//!         client_id: "client-id".into(),
//!         client_secret: "client-secret".into(),
//!         scope: Scope::from_list(["offline_access", "mail.readwrite"]),
//!         tenant: "common".into(),
//!         redirect_uri: "http://localhost/".into(),
//!     };
//!
//!     // Logs in through the browser the first time, refreshes afterwards.
//!     let path = azure_client_oauth::default_credentials_path("credentials.json")?;
//!     let auth = get_or_create_credentials(
//!         AzureAuth::new(),
//!         ChromiumSession::launch,
//!         &registration,
//!         &path,
//!     )
//!     .await?;
//!
//!     println!("Access token: {}", auth.access_token());
//!     Ok(())
//! }
//! ```
//!
//! ## Concurrency
//!
//! Every operation runs to completion on the calling task: network calls are
//! not retried and the interactive login blocks until the redirect is seen or
//! the wait times out. An [`AzureAuth`] must not be driven by two flows at once.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod auth;
pub mod browser;
mod credentials;
pub mod endpoint;
mod error;
pub mod flow;
mod scope;
pub mod token;

pub use auth::{
    AUTH_DIRECTORY, AppRegistration, AzureAuth, DEFAULT_CREDENTIALS_FILE,
    default_credentials_path, get_or_create_credentials,
};
pub use browser::BrowserSession;
pub use credentials::Credentials;
pub use endpoint::Authority;
pub use error::{Error, ErrorBody, ProviderError, Result};
pub use flow::{InteractiveConfig, TokenClient};
pub use scope::Scope;
pub use token::TokenPair;
