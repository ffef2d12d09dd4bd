//! Controllable browser sessions used for interactive login.
//!
//! The login page is driven through the [`BrowserSession`] capability. A
//! session is only ever used inside [`with_session`], which guarantees it is
//! closed on every exit path.

#[cfg(feature = "chromium")]
mod chromium;
mod redirect;

#[cfg(feature = "chromium")]
pub use chromium::ChromiumSession;
pub use redirect::{PageRedirected, extract_code, wait_until};

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::Result;

/// Implicit element-wait applied to every acquired session.
pub const DEFAULT_IMPLICIT_WAIT: Duration = Duration::from_secs(10);

/// A browser that can be pointed at a URL and observed.
pub trait BrowserSession: Send {
    /// Configures how long the browser tolerates slow page loads.
    fn set_implicit_wait(&mut self, timeout: Duration) -> impl Future<Output = Result<()>> + Send;

    /// Navigates to `url`.
    fn navigate(&mut self, url: &str) -> impl Future<Output = Result<()>> + Send;

    /// Returns the URL currently displayed, including its query string.
    fn current_url(&mut self) -> impl Future<Output = Result<String>> + Send;

    /// Closes the session and releases the browser.
    fn close(self) -> impl Future<Output = Result<()>> + Send;
}

/// Runs `body` against a freshly acquired session and always closes it.
///
/// `driver_generator` is a zero-argument factory producing the session.
/// When both `body` and `close` fail, the body's error is returned and the
/// close failure is logged.
///
/// # Errors
///
/// Returns the factory error, the implicit-wait error, the body error, or
/// the close error, in that order of precedence.
pub async fn with_session<S, F, B, T>(
    driver_generator: F,
    implicit_wait: Duration,
    body: B,
) -> Result<T>
where
    S: BrowserSession,
    F: AsyncFnOnce() -> Result<S>,
    B: AsyncFnOnce(&mut S) -> Result<T>,
{
    let mut session = driver_generator().await?;
    debug!("Browser session acquired");

    let outcome = match session.set_implicit_wait(implicit_wait).await {
        Ok(()) => body(&mut session).await,
        Err(e) => Err(e),
    };

    let closed = session.close().await;
    debug!("Browser session closed");

    match (outcome, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(close_err)) => Err(close_err),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(close_err)) => {
            warn!("Failed to close browser session: {close_err}");
            Err(e)
        }
    }
}
