//! Token exchanges against the `/token` endpoint.

mod code;

pub use code::{InteractiveConfig, request_authorization_code};

use crate::endpoint::Authority;
use crate::error::{ProviderError, Result};
use crate::token::{TokenPair, TokenResponse};
use reqwest::Client;
use tracing::debug;

/// Client for the two token-bearing exchanges.
///
/// Both exchanges are single form-encoded POSTs with no retry.
#[derive(Debug, Clone, Default)]
pub struct TokenClient {
    authority: Authority,
    http_client: Client,
}

impl TokenClient {
    /// Creates a client for the public Microsoft authority.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a different authority (sovereign cloud, test server).
    #[must_use]
    pub fn with_authority(mut self, authority: Authority) -> Self {
        self.authority = authority;
        self
    }

    /// Uses a preconfigured HTTP client.
    #[must_use]
    pub fn with_http_client(mut self, http_client: Client) -> Self {
        self.http_client = http_client;
        self
    }

    /// Returns the authority this client talks to.
    #[must_use]
    pub const fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Exchanges an authorization code for tokens.
    ///
    /// The refresh token is empty when the provider does not issue one.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Provider`] on a non-success status and
    /// [`crate::Error::MissingField`] if no access token is returned.
    pub async fn exchange_code(
        &self,
        client_id: &str,
        client_secret: &str,
        code: &str,
        tenant: &str,
        redirect_uri: &str,
    ) -> Result<TokenPair> {
        debug!(tenant, "Exchanging authorization code");
        let params = [
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("grant_type", "authorization_code"),
        ];

        self.request_token(tenant, &params).await?.into_code_grant()
    }

    /// Exchanges a refresh token for a new access and refresh token.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Provider`] on a non-success status and
    /// [`crate::Error::MissingField`] unless both tokens are returned.
    pub async fn refresh(
        &self,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
        tenant: &str,
        redirect_uri: &str,
    ) -> Result<TokenPair> {
        debug!(tenant, "Exchanging refresh token");
        let params = [
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("refresh_token", refresh_token),
            ("redirect_uri", redirect_uri),
            ("grant_type", "refresh_token"),
        ];

        self.request_token(tenant, &params)
            .await?
            .into_refresh_grant()
    }

    async fn request_token(&self, tenant: &str, params: &[(&str, &str)]) -> Result<TokenResponse> {
        let response = self
            .http_client
            .post(self.authority.token_url(tenant)?)
            .form(params)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::from_response(response).await.into());
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_authority() {
        let client = TokenClient::new();
        assert_eq!(client.authority().base(), "https://login.microsoftonline.com");
    }

    #[test]
    fn test_custom_authority() {
        let client = TokenClient::new().with_authority(Authority::new("http://127.0.0.1:9").unwrap());
        assert_eq!(client.authority().base(), "http://127.0.0.1:9");
    }
}
