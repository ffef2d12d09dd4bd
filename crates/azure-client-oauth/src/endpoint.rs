//! Microsoft identity platform endpoints.

use crate::error::Result;
use url::Url;

/// Public Microsoft identity platform authority.
pub const MICROSOFT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Tenant sentinel accepting both work/school and personal accounts.
pub const TENANT_COMMON: &str = "common";

/// Tenant sentinel accepting work/school accounts only.
pub const TENANT_ORGANIZATIONS: &str = "organizations";

/// Identity provider authority that hosts the v2.0 endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authority {
    base: String,
}

impl Authority {
    /// Creates an authority rooted at `base` (scheme and host, optional path).
    ///
    /// # Errors
    ///
    /// Returns an error if `base` is not an absolute URL.
    pub fn new(base: impl AsRef<str>) -> Result<Self> {
        let base = base.as_ref();
        Url::parse(base)?;
        Ok(Self {
            base: base.trim_end_matches('/').to_string(),
        })
    }

    /// The public Microsoft authority.
    #[must_use]
    pub fn microsoft() -> Self {
        Self {
            base: MICROSOFT_AUTHORITY.to_string(),
        }
    }

    /// Returns the base URL of the authority.
    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Builds the browser URL that starts the authorization-code flow.
    ///
    /// Values are interpolated literally; the provider accepts the scope
    /// with raw spaces and the redirect URI unencoded.
    #[must_use]
    pub fn authorize_url(
        &self,
        tenant: &str,
        client_id: &str,
        scope: &str,
        redirect_uri: &str,
    ) -> String {
        format!(
            "{base}/{tenant}/oauth2/v2.0/authorize?client_id={client_id}&scope={scope}&response_type=code&redirect_uri={redirect_uri}",
            base = self.base
        )
    }

    /// Builds the token endpoint for `tenant`.
    ///
    /// # Errors
    ///
    /// Returns an error if the tenant produces an invalid URL.
    pub fn token_url(&self, tenant: &str) -> Result<Url> {
        Ok(Url::parse(&format!(
            "{}/{tenant}/oauth2/v2.0/token",
            self.base
        ))?)
    }
}

impl Default for Authority {
    fn default() -> Self {
        Self::microsoft()
    }
}
