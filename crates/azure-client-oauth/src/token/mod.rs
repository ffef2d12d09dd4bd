//! Token endpoint response model.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Access and refresh token issued by one exchange.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenPair {
    /// Bearer token for REST calls.
    pub access_token: String,
    /// Token used to renew the access token; empty when none was issued.
    pub refresh_token: String,
}

/// Token response from the `/token` endpoint.
///
/// Every field is optional on the wire; which ones are required depends on
/// the grant that produced the response.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TokenResponse {
    /// Access token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Refresh token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Token type (usually "Bearer").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    /// Expires in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    /// Scope granted by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl TokenResponse {
    /// Tokens from an authorization-code grant.
    ///
    /// Some tenants do not issue a refresh token here, so its absence
    /// yields an empty string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] if `access_token` is absent or empty.
    pub fn into_code_grant(self) -> Result<TokenPair> {
        Ok(TokenPair {
            access_token: self
                .access_token
                .filter(|token| !token.is_empty())
                .ok_or(Error::MissingField("access_token"))?,
            refresh_token: self.refresh_token.unwrap_or_default(),
        })
    }

    /// Tokens from a refresh-token grant. Both tokens are required.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] if either token is absent, or if the
    /// access token is empty.
    pub fn into_refresh_grant(self) -> Result<TokenPair> {
        Ok(TokenPair {
            access_token: self
                .access_token
                .filter(|token| !token.is_empty())
                .ok_or(Error::MissingField("access_token"))?,
            refresh_token: self
                .refresh_token
                .ok_or(Error::MissingField("refresh_token"))?,
        })
    }
}
