//! Browser sessions available to the command line.

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tracing::{debug, warn};

use azure_client_oauth::{BrowserSession, Error, Result};

/// A session backed by the system browser and the terminal.
///
/// The consent page is opened in the default browser; the user pastes the
/// URL the browser was redirected to once the login is complete.
pub struct ManualSession {
    input: Lines<BufReader<Stdin>>,
}

impl ManualSession {
    /// Creates a session reading redirected URLs from stdin.
    #[allow(clippy::unused_async, clippy::unnecessary_wraps)]
    pub async fn open() -> Result<Self> {
        Ok(Self {
            input: BufReader::new(tokio::io::stdin()).lines(),
        })
    }
}

impl BrowserSession for ManualSession {
    async fn set_implicit_wait(&mut self, timeout: Duration) -> Result<()> {
        debug!(?timeout, "Implicit wait ignored by the system browser");
        Ok(())
    }

    async fn navigate(&mut self, url: &str) -> Result<()> {
        eprintln!("Open the following page and sign in:\n\n{url}\n");
        if let Err(e) = opener::open(url) {
            warn!("Could not open the system browser: {e}");
        }
        Ok(())
    }

    async fn current_url(&mut self) -> Result<String> {
        let mut stderr = tokio::io::stderr();
        stderr
            .write_all(b"Paste the URL you were redirected to: ")
            .await?;
        stderr.flush().await?;

        match self.input.next_line().await? {
            Some(line) => Ok(line.trim().to_string()),
            None => Err(Error::browser("standard input closed before the redirect URL was pasted")),
        }
    }

    async fn close(self) -> Result<()> {
        Ok(())
    }
}
