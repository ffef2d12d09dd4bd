//! Chromium session driven over the `DevTools` protocol.

use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig, BrowserConfigBuilder};
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use super::BrowserSession;
use crate::error::{Error, Result};

/// A headed Chromium window the user can log in through.
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    implicit_wait: Duration,
}

impl ChromiumSession {
    /// Launches a visible Chromium window.
    ///
    /// # Errors
    ///
    /// Returns an error if no Chromium executable can be started.
    pub async fn launch() -> Result<Self> {
        Self::launch_with(BrowserConfig::builder().with_head()).await
    }

    /// Launches Chromium with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the browser
    /// fails to start.
    pub async fn launch_with(builder: BrowserConfigBuilder) -> Result<Self> {
        let config = builder.build().map_err(Error::Browser)?;
        let (browser, mut events) = Browser::launch(config).await.map_err(Error::browser)?;

        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if let Err(e) = event {
                    error!("CDP event handler error: {e}");
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(Error::browser)?;

        Ok(Self {
            browser,
            page,
            handler,
            implicit_wait: super::DEFAULT_IMPLICIT_WAIT,
        })
    }
}

impl BrowserSession for ChromiumSession {
    async fn set_implicit_wait(&mut self, timeout: Duration) -> Result<()> {
        self.implicit_wait = timeout;
        Ok(())
    }

    async fn navigate(&mut self, url: &str) -> Result<()> {
        // The login page keeps loading scripts; waiting past the implicit
        // timeout is not needed to observe the redirect.
        match tokio::time::timeout(self.implicit_wait, self.page.goto(url)).await {
            Ok(result) => {
                result.map_err(Error::browser)?;
            }
            Err(_) => debug!("Page still loading after {:?}", self.implicit_wait),
        }
        Ok(())
    }

    async fn current_url(&mut self) -> Result<String> {
        let url = self.page.url().await.map_err(Error::browser)?;
        Ok(url.unwrap_or_default())
    }

    async fn close(mut self) -> Result<()> {
        let closed = self.browser.close().await.map_err(Error::browser);
        if closed.is_ok() {
            self.browser.wait().await?;
        }
        self.handler.abort();
        closed.map(|_| ())
    }
}
