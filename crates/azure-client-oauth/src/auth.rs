//! Authentication coordinator.
//!
//! [`AzureAuth`] owns the credential set and decides between a full
//! interactive login and a refresh. It is not meant to be shared between
//! concurrent flows: every mutating operation takes `&mut self`.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::browser::BrowserSession;
use crate::credentials::{Credentials, redact};
use crate::error::{Error, Result};
use crate::flow::{InteractiveConfig, TokenClient, request_authorization_code};
use crate::scope::Scope;

/// Directory under the home directory holding credential files.
pub const AUTH_DIRECTORY: &str = ".azure_auth";

/// Default credential file name.
pub const DEFAULT_CREDENTIALS_FILE: &str = "credentials.json";

/// Application registration used to start a login.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct AppRegistration {
    /// Application (client) ID.
    pub client_id: String,
    /// Application secret.
    #[serde(alias = "private_key")]
    pub client_secret: String,
    /// Requested scopes.
    pub scope: Scope,
    /// Directory identifier, `common` or `organizations`.
    pub tenant: String,
    /// Redirect URI; must match the application registration exactly.
    pub redirect_uri: String,
}

impl fmt::Debug for AppRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppRegistration")
            .field("client_id", &self.client_id)
            .field("client_secret", &redact(&self.client_secret))
            .field("scope", &self.scope)
            .field("tenant", &self.tenant)
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

/// Holds the credential set and keeps its tokens current.
#[derive(Debug, Clone, Default)]
pub struct AzureAuth {
    credentials: Credentials,
    client: TokenClient,
    interactive: InteractiveConfig,
}

impl AzureAuth {
    /// Creates a coordinator with an empty credential set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a custom token client.
    #[must_use]
    pub fn with_client(mut self, client: TokenClient) -> Self {
        self.client = client;
        self
    }

    /// Uses custom interactive login timings.
    #[must_use]
    pub const fn with_interactive_config(mut self, config: InteractiveConfig) -> Self {
        self.interactive = config;
        self
    }

    /// Returns the current credential set.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Returns the bearer token for REST calls.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.credentials.access_token
    }

    /// Runs the interactive authorization-code flow.
    ///
    /// The registration is stored on the credential set first; the tokens
    /// are only replaced once the code exchange succeeded.
    ///
    /// # Errors
    ///
    /// Returns any browser, timeout or token exchange error.
    pub async fn authenticate<S, F>(
        &mut self,
        driver_generator: F,
        registration: &AppRegistration,
    ) -> Result<()>
    where
        S: BrowserSession,
        F: AsyncFnOnce() -> Result<S>,
    {
        info!("Authenticating the user");

        let creds = &mut self.credentials;
        creds.client_id.clone_from(&registration.client_id);
        creds.client_secret.clone_from(&registration.client_secret);
        creds.scope = registration.scope.as_str().to_string();
        creds.tenant.clone_from(&registration.tenant);
        creds.redirect_uri.clone_from(&registration.redirect_uri);

        let code = request_authorization_code(
            driver_generator,
            self.client.authority(),
            &creds.client_id,
            &creds.scope,
            &creds.tenant,
            &creds.redirect_uri,
            self.interactive,
        )
        .await?;

        let tokens = self
            .client
            .exchange_code(
                &creds.client_id,
                &creds.client_secret,
                &code,
                &creds.tenant,
                &creds.redirect_uri,
            )
            .await?;

        creds.access_token = tokens.access_token;
        creds.refresh_token = tokens.refresh_token;
        debug!(
            has_refresh_token = !creds.refresh_token.is_empty(),
            "Authorization code exchanged"
        );
        Ok(())
    }

    /// Renews the access token with the stored refresh token.
    ///
    /// On failure the stored tokens are left untouched.
    ///
    /// # Errors
    ///
    /// Returns any token exchange error.
    pub async fn refresh_access_token(&mut self) -> Result<()> {
        info!("Refreshing the token");

        let creds = &self.credentials;
        let tokens = self
            .client
            .refresh(
                &creds.client_id,
                &creds.client_secret,
                &creds.refresh_token,
                &creds.tenant,
                &creds.redirect_uri,
            )
            .await?;

        self.credentials.access_token = tokens.access_token;
        self.credentials.refresh_token = tokens.refresh_token;
        Ok(())
    }

    /// Saves the credential set to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn save_auth(&self, path: impl AsRef<Path>) -> Result<()> {
        self.credentials.save(path).await
    }

    /// Replaces the credential set with the one stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub async fn get_auth_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.credentials = Credentials::load(path).await?;
        Ok(())
    }
}

/// Returns `$HOME/.azure_auth/{filename}`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_credentials_path(filename: &str) -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Cannot determine home directory",
        ))
    })?;
    Ok(home.join(AUTH_DIRECTORY).join(filename))
}

/// Loads and refreshes the credentials at `path`, or logs in if there are none.
///
/// The credential file is rewritten only after a successful exchange.
///
/// # Errors
///
/// Returns any error of the login, the refresh, or the file operations.
pub async fn get_or_create_credentials<S, F>(
    auth: AzureAuth,
    driver_generator: F,
    registration: &AppRegistration,
    path: impl AsRef<Path>,
) -> Result<AzureAuth>
where
    S: BrowserSession,
    F: AsyncFnOnce() -> Result<S>,
{
    let path = path.as_ref();
    let mut auth = auth;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    if tokio::fs::try_exists(path).await? {
        debug!(path = %path.display(), "Reusing stored credentials");
        auth.get_auth_from_file(path).await?;
        auth.refresh_access_token().await?;
    } else {
        debug!(path = %path.display(), "No stored credentials");
        auth.authenticate(driver_generator, registration).await?;
    }

    auth.save_auth(path).await?;
    Ok(auth)
}
