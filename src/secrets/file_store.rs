//! secrets::file_store
//!
//! File-based secret storage.
//!
//! # Security
//!
//! - Values are stored in `~/.githunts/secrets.toml`
//! - File permissions are set to 0600 on Unix (owner read/write only)
//! - All writes are atomic (write to temp file, then rename)

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use super::traits::{SecretError, SecretStore};

/// File-based secret storage.
///
/// Every operation re-reads the file, so two processes (for example
/// `githunts auth login` and a running `githunts dashboard`) observe each
/// other's writes.
#[derive(Debug)]
pub struct FileSecretStore {
    path: PathBuf,
}

impl FileSecretStore {
    /// Create a store at the default location, `~/.githunts/secrets.toml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, SecretError> {
        let home = dirs::home_dir()
            .ok_or_else(|| SecretError::ReadError("cannot determine home directory".into()))?;
        Ok(Self {
            path: home.join(".githunts").join("secrets.toml"),
        })
    }

    /// Create a store at a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, SecretError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| SecretError::ReadError(format!("cannot read secrets file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| SecretError::ReadError(format!("cannot parse secrets file: {}", e)))
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<(), SecretError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| SecretError::WriteError(format!("cannot create directory: {}", e)))?;
        }

        let content = toml::to_string_pretty(values)
            .map_err(|e| SecretError::WriteError(format!("cannot serialize secrets: {}", e)))?;

        let temp_path = self.path.with_extension("tmp");
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| SecretError::WriteError(format!("cannot create temp file: {}", e)))?;

            // Restrict before any content lands on disk.
            #[cfg(unix)]
            file.set_permissions(fs::Permissions::from_mode(0o600))
                .map_err(|e| SecretError::WriteError(format!("cannot set permissions: {}", e)))?;

            file.write_all(content.as_bytes())
                .map_err(|e| SecretError::WriteError(format!("cannot write secrets: {}", e)))?;
            file.sync_all()
                .map_err(|e| SecretError::WriteError(format!("cannot sync to disk: {}", e)))?;
        }

        fs::rename(&temp_path, &self.path)
            .map_err(|e| SecretError::WriteError(format!("cannot rename temp file: {}", e)))
    }
}

impl SecretStore for FileSecretStore {
    fn get(&self, key: &str) -> Result<Option<String>, SecretError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SecretError> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values)
    }

    fn delete(&self, key: &str) -> Result<(), SecretError> {
        let mut values = self.read_all()?;
        if values.remove(key).is_none() {
            return Ok(());
        }
        self.write_all(&values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, FileSecretStore) {
        let temp = TempDir::new().expect("create temp dir");
        let store = FileSecretStore::with_path(temp.path().join("secrets.toml"));
        (temp, store)
    }

    #[test]
    fn get_nonexistent_returns_none() {
        let (_temp, store) = create_test_store();
        assert!(store.get("account.v1").expect("get").is_none());
    }

    #[test]
    fn set_get_and_overwrite() {
        let (_temp, store) = create_test_store();

        store.set("session.v1", "first").expect("set");
        store.set("session.v1", "second").expect("overwrite");

        assert_eq!(
            store.get("session.v1").expect("get"),
            Some("second".to_string())
        );
    }

    #[test]
    fn delete_is_idempotent() {
        let (_temp, store) = create_test_store();

        store.set("account.v1", "value").expect("set");
        store.delete("account.v1").expect("delete");
        store.delete("account.v1").expect("delete again");

        assert!(!store.exists("account.v1").expect("exists"));
    }

    #[test]
    fn keys_are_independent() {
        let (_temp, store) = create_test_store();

        store.set("account.v1", "a").expect("set account");
        store.set("session.v1", "s").expect("set session");
        store.delete("account.v1").expect("delete account");

        assert_eq!(store.get("session.v1").expect("get"), Some("s".to_string()));
    }

    #[test]
    fn creates_directory_if_missing() {
        let temp = TempDir::new().expect("create temp dir");
        let path = temp.path().join("nested").join("secrets.toml");
        let store = FileSecretStore::with_path(path.clone());

        store.set("key", "value").expect("set");

        assert!(path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn permissions_0600_on_unix() {
        let (_temp, store) = create_test_store();
        store.set("key", "value").expect("set");

        let mode = fs::metadata(store.path()).expect("metadata").permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[test]
    fn json_values_survive_round_trip() {
        let (_temp, store) = create_test_store();
        let json = r#"{"kind":"githunts.session","email":"a@b.c","note":"line\nbreak"}"#;

        store.set("session.v1", json).expect("set");

        assert_eq!(store.get("session.v1").expect("get").as_deref(), Some(json));
    }

    #[test]
    fn corrupt_file_is_read_error() {
        let (_temp, store) = create_test_store();
        fs::write(store.path(), "invalid = [unclosed").expect("write bad toml");

        let err = store.get("key").unwrap_err();
        assert!(matches!(err, SecretError::ReadError(_)));
    }
}
