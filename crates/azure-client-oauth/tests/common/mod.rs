//! Shared helpers for the integration tests.

#![allow(dead_code, clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use azure_client_oauth::{Authority, AzureAuth, BrowserSession, Error, Result, TokenClient};
use wiremock::MockServer;

/// Browser that walks through a fixed list of URLs.
pub struct FakeBrowser {
    urls: VecDeque<String>,
    pub closed: Arc<Mutex<bool>>,
    pub navigated: Arc<Mutex<Vec<String>>>,
}

impl FakeBrowser {
    pub fn new(urls: &[&str]) -> Self {
        Self {
            urls: urls.iter().map(ToString::to_string).collect(),
            closed: Arc::default(),
            navigated: Arc::default(),
        }
    }
}

impl BrowserSession for FakeBrowser {
    async fn set_implicit_wait(&mut self, _timeout: Duration) -> Result<()> {
        Ok(())
    }

    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.navigated
            .lock()
            .map_err(Error::browser)?
            .push(url.to_string());
        Ok(())
    }

    async fn current_url(&mut self) -> Result<String> {
        let url = if self.urls.len() > 1 {
            self.urls.pop_front()
        } else {
            self.urls.front().cloned()
        };
        Ok(url.unwrap_or_default())
    }

    async fn close(self) -> Result<()> {
        *self.closed.lock().map_err(Error::browser)? = true;
        Ok(())
    }
}

/// Token client pointed at the mock server.
pub fn token_client(server: &MockServer) -> TokenClient {
    TokenClient::new().with_authority(Authority::new(server.uri()).unwrap())
}

/// Coordinator pointed at the mock server.
pub fn auth_for(server: &MockServer) -> AzureAuth {
    AzureAuth::new().with_client(token_client(server))
}
