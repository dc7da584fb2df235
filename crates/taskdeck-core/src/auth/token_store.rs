use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Credential file name in the application data directory
const CREDENTIALS_FILE: &str = "credentials.json";

/// On-disk form of the credential pair. Both fields are optional so that an
/// externally edited file (token without username, or the reverse) still
/// reads back; partial states are not validated here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredCredentials {
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
}

/// Durable storage for the server-issued access token and username.
///
/// Plain JSON on disk, no encryption, no expiry metadata. Concurrent writers
/// (two taskdeck processes) are last-write-wins: the store only caches
/// server-issued state, the server remains the source of truth.
#[derive(Debug, Clone)]
pub struct TokenStore {
    dir: PathBuf,
}

impl TokenStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Write both values durably. They are always set together.
    pub fn set(&self, token: &str, username: &str) -> Result<()> {
        let path = self.credentials_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create credential directory")?;
        }
        let creds = StoredCredentials {
            token: Some(token.to_string()),
            username: Some(username.to_string()),
        };
        let contents = serde_json::to_string_pretty(&creds)?;
        std::fs::write(&path, contents).context("Failed to write credential file")?;
        Ok(())
    }

    /// Read the current values. Either may be absent; a missing or unreadable
    /// file reads as fully absent.
    pub fn get(&self) -> (Option<String>, Option<String>) {
        let path = self.credentials_path();
        let contents = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(_) => return (None, None),
        };
        match serde_json::from_str::<StoredCredentials>(&contents) {
            Ok(creds) => (creds.token, creds.username),
            Err(e) => {
                debug!(error = %e, "Unparseable credential file, treating as empty");
                (None, None)
            }
        }
    }

    /// Remove both values. Succeeds when nothing is stored.
    pub fn clear(&self) -> Result<()> {
        let path = self.credentials_path();
        if path.exists() {
            std::fs::remove_file(&path).context("Failed to remove credential file")?;
        }
        Ok(())
    }

    fn credentials_path(&self) -> PathBuf {
        self.dir.join(CREDENTIALS_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static DIR_SEQ: AtomicUsize = AtomicUsize::new(0);

    fn temp_store() -> TokenStore {
        let dir = std::env::temp_dir().join(format!(
            "taskdeck-store-test-{}-{}",
            std::process::id(),
            DIR_SEQ.fetch_add(1, Ordering::SeqCst)
        ));
        TokenStore::new(dir)
    }

    #[test]
    fn set_then_get_returns_exact_pair() {
        let store = temp_store();
        store.set("tok-123", "alice").unwrap();
        assert_eq!(
            store.get(),
            (Some("tok-123".to_string()), Some("alice".to_string()))
        );
        store.clear().unwrap();
    }

    #[test]
    fn get_on_empty_store_is_fully_absent() {
        let store = temp_store();
        assert_eq!(store.get(), (None, None));
    }

    #[test]
    fn clear_removes_both_and_is_idempotent() {
        let store = temp_store();
        store.set("tok", "bob").unwrap();
        store.clear().unwrap();
        assert_eq!(store.get(), (None, None));
        // clearing an already-empty store succeeds
        store.clear().unwrap();
    }

    #[test]
    fn set_overwrites_previous_pair() {
        let store = temp_store();
        store.set("old", "alice").unwrap();
        store.set("new", "bob").unwrap();
        assert_eq!(
            store.get(),
            (Some("new".to_string()), Some("bob".to_string()))
        );
        store.clear().unwrap();
    }

    #[test]
    fn tampered_file_with_only_token_reads_partial() {
        let store = temp_store();
        store.set("tok", "carol").unwrap();
        let path = store.credentials_path();
        std::fs::write(&path, r#"{"token":"tok"}"#).unwrap();
        assert_eq!(store.get(), (Some("tok".to_string()), None));
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let store = temp_store();
        store.set("tok", "dave").unwrap();
        let path = store.credentials_path();
        std::fs::write(&path, "not json").unwrap();
        assert_eq!(store.get(), (None, None));
        store.clear().unwrap();
    }
}
