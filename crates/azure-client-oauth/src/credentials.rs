//! Credential set and its JSON file.
//!
//! ```json
//! {
//!   "access_token": "...",
//!   "refresh_token": "...",
//!   "client_id": "...",
//!   "client_secret": "...",
//!   "scope": "offline_access mail.readwrite",
//!   "tenant": "common",
//!   "redirect_uri": "http://localhost/"
//! }
//! ```
//!
//! Every key is optional when reading; absent keys load as empty strings.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};

use crate::error::Result;

/// File permissions for the credential file (Unix only): owner read/write.
#[cfg(unix)]
const FILE_MODE: u32 = 0o600;

/// Everything needed to call the Graph API and renew access to it.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    /// Bearer token for REST calls; empty until obtained.
    pub access_token: String,
    /// Token used to renew the access token; may be empty.
    pub refresh_token: String,
    /// Application (client) ID.
    pub client_id: String,
    /// Application secret.
    pub client_secret: String,
    /// Space-separated scopes.
    pub scope: String,
    /// Directory identifier, `common` or `organizations`.
    pub tenant: String,
    /// Redirect URI registered for the application.
    pub redirect_uri: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_token", &redact(&self.access_token))
            .field("refresh_token", &redact(&self.refresh_token))
            .field("client_id", &self.client_id)
            .field("client_secret", &redact(&self.client_secret))
            .field("scope", &self.scope)
            .field("tenant", &self.tenant)
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

/// Placeholder printed instead of a secret; empty secrets stay visible as such.
pub(crate) const fn redact(secret: &str) -> &'static str {
    if secret.is_empty() { "" } else { "<redacted>" }
}

impl Credentials {
    /// Reads credentials from `path`, defaulting missing keys to `""`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON object
    /// of strings.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = tokio::fs::read_to_string(path.as_ref()).await?;
        let credentials = serde_json::from_str(&content)?;
        debug!("Loaded credentials");
        Ok(credentials)
    }

    /// Writes credentials to `path`, replacing any existing file.
    ///
    /// The file is written next to its destination and renamed into place,
    /// so readers never observe a half-written file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;

        let temp = temp_path(path);
        let written = match write_private(&temp, content.as_bytes()).await {
            Ok(()) => tokio::fs::rename(&temp, path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&temp).await;
            return Err(e.into());
        }

        debug!("Saved credentials");
        Ok(())
    }
}

/// Writes `content` to a new file that is owner-only from its creation.
///
/// A leftover file at `path` is removed first, since opening it would keep
/// its old permissions.
async fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    match tokio::fs::remove_file(path).await {
        Err(e) if e.kind() != std::io::ErrorKind::NotFound => return Err(e),
        _ => {}
    }

    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    options.mode(FILE_MODE);

    let mut file = options.open(path).await?;
    file.write_all(content).await?;
    file.flush().await?;
    file.sync_all().await
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> Credentials {
        Credentials {
            access_token: "at".into(),
            refresh_token: String::new(),
            client_id: "cid".into(),
            client_secret: "secret".into(),
            scope: "offline_access mail.readwrite".into(),
            tenant: "common".into(),
            redirect_uri: "http://localhost/".into(),
        }
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");

        sample().save(&path).await.unwrap();
        let loaded = Credentials::load(&path).await.unwrap();

        assert_eq!(loaded, sample());
        assert!(!temp_path(&path).exists());
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        tokio::fs::write(&path, "{\"access_token\": \"stale\", \"extra\": 1}")
            .await
            .unwrap();

        sample().save(&path).await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&tokio::fs::read_to_string(&path).await.unwrap()).unwrap();
        assert_eq!(raw["access_token"], "at");
        assert!(raw.get("extra").is_none());
        assert_eq!(raw.as_object().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_load_tolerates_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        tokio::fs::write(
            &path,
            r#"{"access_token": "at", "client_id": "cid", "tenant": "common"}"#,
        )
        .await
        .unwrap();

        let loaded = Credentials::load(&path).await.unwrap();
        assert_eq!(loaded.access_token, "at");
        assert_eq!(loaded.refresh_token, "");
        assert_eq!(loaded.client_secret, "");
        assert_eq!(loaded.redirect_uri, "");
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Credentials::load(dir.path().join("absent.json")).await;
        assert!(matches!(result, Err(crate::Error::Io(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        sample().save(&path).await.unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stale_temp_file_is_replaced() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let temp = dir.path().join("credentials.json.tmp");
        std::fs::write(&temp, "stale").unwrap();
        std::fs::set_permissions(&temp, std::fs::Permissions::from_mode(0o644)).unwrap();

        write_private(&temp, b"fresh").await.unwrap();

        let mode = std::fs::metadata(&temp).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(std::fs::read_to_string(&temp).unwrap(), "fresh");
    }

    #[cfg(unix)]
    #[tokio::test(flavor = "multi_thread")]
    async fn test_temp_file_never_readable_by_others() {
        use std::os::unix::fs::PermissionsExt;
        use std::sync::Arc;
        use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        let temp = temp_path(&path);

        let done = Arc::new(AtomicBool::new(false));
        let widest = Arc::new(AtomicU32::new(0));
        let watcher = {
            let done = Arc::clone(&done);
            let widest = Arc::clone(&widest);
            std::thread::spawn(move || {
                while !done.load(Ordering::Relaxed) {
                    if let Ok(meta) = std::fs::metadata(&temp) {
                        widest.fetch_or(meta.permissions().mode() & 0o077, Ordering::Relaxed);
                    }
                }
            })
        };

        for _ in 0..200 {
            sample().save(&path).await.unwrap();
        }
        done.store(true, Ordering::Relaxed);
        watcher.join().unwrap();

        assert_eq!(widest.load(Ordering::Relaxed), 0);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failed_save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::create_dir(&path).unwrap();

        assert!(sample().save(&path).await.is_err());
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let mut creds = sample();
        creds.refresh_token = "rt-secret".into();
        let printed = format!("{creds:?}");

        assert!(printed.contains("cid"));
        assert!(printed.contains("<redacted>"));
        assert!(!printed.contains("\"secret\""));
        assert!(!printed.contains("rt-secret"));
        assert!(!printed.contains("\"at\""));
    }
}
