//! Redirect detection and authorization code extraction.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;
use url::form_urlencoded;

use super::BrowserSession;
use crate::error::{Error, Result};

/// Condition satisfied once the browser lands on the expected URL.
///
/// The query string of the current URL is ignored for the comparison but
/// kept in the returned value, since it carries the authorization code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRedirected {
    expected_url: String,
}

impl PageRedirected {
    /// Creates a condition for `expected_url` (scheme, host and path, no query).
    #[must_use]
    pub fn new(expected_url: impl Into<String>) -> Self {
        Self {
            expected_url: expected_url.into(),
        }
    }

    /// Returns the full `current_url` when it matches the expected URL.
    #[must_use]
    pub fn matches(&self, current_url: &str) -> Option<String> {
        let without_query = current_url
            .split_once('?')
            .map_or(current_url, |(base, _)| base);
        (without_query == self.expected_url).then(|| current_url.to_string())
    }

    /// Evaluates the condition against the session's current URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot report its URL.
    pub async fn check<S: BrowserSession>(&self, session: &mut S) -> Result<Option<String>> {
        let current = session.current_url().await?;
        Ok(self.matches(&current))
    }
}

/// Polls `predicate` until it yields a value or `timeout` elapses.
///
/// Each evaluation is bounded by the overall deadline, so a predicate that
/// blocks cannot extend the wait.
///
/// # Errors
///
/// Returns [`Error::InteractiveTimeout`] when the deadline passes, or the
/// first error produced by `predicate`.
pub async fn wait_until<S, P, T>(
    session: &mut S,
    timeout: Duration,
    poll_interval: Duration,
    mut predicate: P,
) -> Result<T>
where
    S: BrowserSession,
    P: AsyncFnMut(&mut S) -> Result<Option<T>>,
{
    let deadline = Instant::now() + timeout;

    loop {
        match tokio::time::timeout_at(deadline, predicate(&mut *session)).await {
            Ok(Ok(Some(value))) => return Ok(value),
            Ok(Ok(None)) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(Error::InteractiveTimeout(timeout)),
        }

        tokio::time::sleep(poll_interval).await;
        if Instant::now() > deadline {
            return Err(Error::InteractiveTimeout(timeout));
        }
    }
}

/// Extracts the `code` query parameter from the redirect URL.
///
/// # Errors
///
/// Returns [`Error::Authorization`] when the provider redirected with an
/// error, or [`Error::MissingCode`] when no code is present.
pub fn extract_code(url: &str) -> Result<String> {
    let query = url
        .split_once('?')
        .map_or("", |(_, query)| query)
        .split('#')
        .next()
        .unwrap_or_default();

    let mut error = None;
    let mut description = String::new();
    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "code" if !value.is_empty() => return Ok(value.into_owned()),
            "error" if error.is_none() => error = Some(value.into_owned()),
            "error_description" if description.is_empty() => description = value.into_owned(),
            _ => {}
        }
    }

    match error {
        Some(error) => {
            debug!(%error, "Authorization redirect carried an error");
            Err(Error::Authorization { error, description })
        }
        None => Err(Error::MissingCode(url.to_string())),
    }
}
