//! Example: interactive login through a Chromium window.
//!
//! Opens the Microsoft consent page in Chromium, waits for the redirect to
//! `REDIRECT_URI`, exchanges the code and stores the credentials in
//! `~/.azure_auth/example_auth.json`. Running it again refreshes the token
//! instead of logging in.
//!
//! ## Prerequisites
//!
//! 1. Register an application in Azure AD with a web redirect URI of
//!    `http://localhost/` and create a client secret.
//! 2. Set environment variables:
//!    ```bash
//!    export AZURE_CLIENT_ID="your-client-id"
//!    export AZURE_CLIENT_SECRET="your-client-secret"
//!    export AZURE_TENANT="common"
//!    ```
//!
//! ## Running
//!
//! ```bash
//! cargo run --package azure-client-oauth --features chromium --example browser_login
//! ```

#![allow(clippy::expect_used)]

use std::env;

use azure_client_oauth::browser::ChromiumSession;
use azure_client_oauth::{
    AppRegistration, AzureAuth, Scope, default_credentials_path, get_or_create_credentials,
};

const REDIRECT_URI: &str = "http://localhost/";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let registration = AppRegistration {
        client_id: env::var("AZURE_CLIENT_ID").expect("AZURE_CLIENT_ID not set"),
        client_secret: env::var("AZURE_CLIENT_SECRET").expect("AZURE_CLIENT_SECRET not set"),
        scope: Scope::from_list(["offline_access", "mail.readwrite"]),
        tenant: env::var("AZURE_TENANT").unwrap_or_else(|_| "common".to_string()),
        redirect_uri: REDIRECT_URI.to_string(),
    };

    let path = default_credentials_path("example_auth.json")?;
    println!("Credentials file: {}", path.display());

    let auth = get_or_create_credentials(
        AzureAuth::new(),
        ChromiumSession::launch,
        &registration,
        &path,
    )
    .await?;

    let creds = auth.credentials();
    println!("✓ Access token obtained ({} chars)", creds.access_token.len());
    println!("  Has refresh token: {}", !creds.refresh_token.is_empty());
    println!("  Scope: {}", creds.scope);

    Ok(())
}
