//! Interactive acquisition of an authorization code.

use std::time::Duration;

use tracing::{debug, info};

use crate::browser::{
    BrowserSession, DEFAULT_IMPLICIT_WAIT, PageRedirected, extract_code, wait_until, with_session,
};
use crate::endpoint::Authority;
use crate::error::Result;

/// Timing of the interactive login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractiveConfig {
    /// Implicit wait applied to the browser session.
    pub implicit_wait: Duration,
    /// How long the user has to complete the login.
    pub redirect_timeout: Duration,
    /// Delay between two checks of the browser URL.
    pub poll_interval: Duration,
}

impl InteractiveConfig {
    /// Sets the implicit wait.
    #[must_use]
    pub const fn implicit_wait(mut self, timeout: Duration) -> Self {
        self.implicit_wait = timeout;
        self
    }

    /// Sets the login timeout.
    #[must_use]
    pub const fn redirect_timeout(mut self, timeout: Duration) -> Self {
        self.redirect_timeout = timeout;
        self
    }

    /// Sets the poll interval.
    #[must_use]
    pub const fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

impl Default for InteractiveConfig {
    fn default() -> Self {
        Self {
            implicit_wait: DEFAULT_IMPLICIT_WAIT,
            redirect_timeout: Duration::from_secs(120),
            poll_interval: Duration::from_millis(500),
        }
    }
}

/// Drives a browser through the login page and returns the authorization code.
///
/// The session is closed whether or not a code was obtained.
///
/// # Errors
///
/// Returns [`crate::Error::InteractiveTimeout`] if the browser does not
/// reach `redirect_uri` in time, or any browser or redirect error.
pub async fn request_authorization_code<S, F>(
    driver_generator: F,
    authority: &Authority,
    client_id: &str,
    scope: &str,
    tenant: &str,
    redirect_uri: &str,
    config: InteractiveConfig,
) -> Result<String>
where
    S: BrowserSession,
    F: AsyncFnOnce() -> Result<S>,
{
    let authorize_url = authority.authorize_url(tenant, client_id, scope, redirect_uri);
    let condition = PageRedirected::new(redirect_uri);

    let url = with_session(
        driver_generator,
        config.implicit_wait,
        async |session: &mut S| {
            info!("Waiting for the user to log in");
            session.navigate(&authorize_url).await?;
            wait_until(
                session,
                config.redirect_timeout,
                config.poll_interval,
                async |s: &mut S| condition.check(s).await,
            )
            .await
        },
    )
    .await?;

    debug!("Redirected back to {redirect_uri}");
    extract_code(&url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::browser::testing::ScriptedSession;
    use crate::error::Error;

    #[tokio::test(start_paused = true)]
    async fn test_code_obtained_and_session_closed() {
        let session = ScriptedSession::new(&[
            "https://login.microsoftonline.com/common/oauth2/v2.0/authorize",
            "http://localhost/?code=abc123&state=xyz",
        ]);
        let log = session.log.clone();

        let code = request_authorization_code(
            async move || Ok(session),
            &Authority::microsoft(),
            "cid",
            "offline_access mail.readwrite",
            "common",
            "http://localhost/",
            InteractiveConfig::default(),
        )
        .await
        .unwrap();

        assert_eq!(code, "abc123");
        let log = log.lock().unwrap();
        assert!(log.closed);
        assert_eq!(
            log.visited,
            vec![
                "https://login.microsoftonline.com/common/oauth2/v2.0/authorize?client_id=cid&scope=offline_access mail.readwrite&response_type=code&redirect_uri=http://localhost/"
                    .to_string()
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_still_closes_session() {
        let session = ScriptedSession::new(&["https://login.microsoftonline.com/"]);
        let log = session.log.clone();

        let err = request_authorization_code(
            async move || Ok(session),
            &Authority::microsoft(),
            "cid",
            "mail.read",
            "common",
            "http://localhost/",
            InteractiveConfig::default().redirect_timeout(Duration::from_secs(3)),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, Error::InteractiveTimeout(_)));
        assert!(log.lock().unwrap().closed);
    }

    #[test]
    fn test_default_config() {
        let config = InteractiveConfig::default();
        assert_eq!(config.implicit_wait, Duration::from_secs(10));
        assert_eq!(config.redirect_timeout, Duration::from_secs(120));
        assert_eq!(config.poll_interval, Duration::from_millis(500));
    }
}
