//! secrets::traits
//!
//! Secret storage trait definition.
//!
//! # Design
//!
//! The `SecretStore` trait is a small key-value interface. Each identity
//! provider owns one versioned key (`account.v1`, `session.v1`) and stores a
//! JSON record under it.
//!
//! Implementations MUST:
//! - Never log, print, or include stored values in error messages
//! - Be thread-safe (Send + Sync)

use thiserror::Error;

/// Errors from secret storage operations.
///
/// Messages carry the key or the I/O cause, never the stored value.
#[derive(Debug, Error)]
pub enum SecretError {
    /// Failed to read from secret storage.
    #[error("failed to read secret: {0}")]
    ReadError(String),

    /// Failed to write to secret storage.
    #[error("failed to write secret: {0}")]
    WriteError(String),

    /// Provider not available or not configured.
    #[error("secret provider not available: {0}")]
    ProviderNotAvailable(String),
}

/// Trait for secret storage providers.
///
/// # Example
///
/// ```
/// use githunts::secrets::{MemorySecretStore, SecretStore};
///
/// let store = MemorySecretStore::new();
/// store.set("session.v1", "{}").unwrap();
/// assert!(store.exists("session.v1").unwrap());
///
/// store.delete("session.v1").unwrap();
/// assert_eq!(store.get("session.v1").unwrap(), None);
/// ```
pub trait SecretStore: Send + Sync {
    /// Get a value by key. `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> Result<Option<String>, SecretError>;

    /// Set a value, overwriting any existing one.
    fn set(&self, key: &str, value: &str) -> Result<(), SecretError>;

    /// Delete a value. Deleting an absent key succeeds.
    fn delete(&self, key: &str) -> Result<(), SecretError>;

    /// Check if a key exists.
    fn exists(&self, key: &str) -> Result<bool, SecretError> {
        Ok(self.get(key)?.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = SecretError::ReadError("disk full".into());
        assert!(err.to_string().contains("read"));

        let err = SecretError::WriteError("permission denied".into());
        assert!(err.to_string().contains("write"));

        let err = SecretError::ProviderNotAvailable("vault".into());
        assert!(err.to_string().contains("provider"));
    }
}
