//! Application settings file.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use serde::Deserialize;

use azure_client_oauth::{AppRegistration, DEFAULT_CREDENTIALS_FILE, default_credentials_path};

/// Default settings file, relative to the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "azure_ids.json";

/// Contents of `azure_ids.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Application registration used for interactive logins.
    #[serde(flatten)]
    pub registration: AppRegistration,
    /// Credential file name under `~/.azure_auth`.
    #[serde(default = "default_filename")]
    pub filename: String,
}

fn default_filename() -> String {
    DEFAULT_CREDENTIALS_FILE.to_string()
}

impl Settings {
    /// Loads the settings file.
    ///
    /// # Errors
    ///
    /// Fails if the file is missing or malformed.
    pub async fn load(path: &Path) -> anyhow::Result<Self> {
        if !tokio::fs::try_exists(path).await.unwrap_or(false) {
            bail!(
                "Please create {} before running this command (keys: client_id, client_secret, scope, tenant, redirect_uri)",
                path.display()
            );
        }
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("Invalid settings in {}", path.display()))
    }

    /// Returns where the credentials for this registration are stored.
    ///
    /// # Errors
    ///
    /// Fails if the home directory cannot be determined.
    pub fn credentials_path(&self) -> anyhow::Result<PathBuf> {
        Ok(default_credentials_path(&self.filename)?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_SETTINGS_FILE);
        tokio::fs::write(
            &path,
            r#"{
                "client_id": "cid",
                "private_key": "secret",
                "scope": "offline_access mail.readwrite",
                "tenant": "common",
                "redirect_uri": "http://localhost/",
                "filename": "work.json"
            }"#,
        )
        .await
        .unwrap();

        let settings = Settings::load(&path).await.unwrap();
        assert_eq!(settings.registration.client_secret, "secret");
        assert_eq!(
            settings.registration.scope.as_str(),
            "offline_access mail.readwrite"
        );
        assert_eq!(settings.filename, "work.json");
        assert!(
            settings
                .credentials_path()
                .unwrap()
                .ends_with(".azure_auth/work.json")
        );
    }

    #[tokio::test]
    async fn test_default_filename() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_SETTINGS_FILE);
        tokio::fs::write(
            &path,
            r#"{
                "client_id": "cid",
                "client_secret": "secret",
                "scope": ["mail.read"],
                "tenant": "organizations",
                "redirect_uri": "http://localhost/"
            }"#,
        )
        .await
        .unwrap();

        let settings = Settings::load(&path).await.unwrap();
        assert_eq!(settings.filename, "credentials.json");
    }

    #[tokio::test]
    async fn test_missing_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(&dir.path().join("azure_ids.json"))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Please create"));
    }

    #[tokio::test]
    async fn test_invalid_scope_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_SETTINGS_FILE);
        tokio::fs::write(
            &path,
            r#"{"client_id": "c", "client_secret": "s", "scope": {"a": 1}, "tenant": "t", "redirect_uri": "r"}"#,
        )
        .await
        .unwrap();

        assert!(Settings::load(&path).await.is_err());
    }
}
