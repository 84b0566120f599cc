//! secrets
//!
//! Secret storage for identity records.
//!
//! # Architecture
//!
//! Secrets are stored through the `SecretStore` trait:
//!
//! - [`FileSecretStore`]: `~/.githunts/secrets.toml` (default)
//! - [`MemorySecretStore`]: process-local, for tests
//!
//! The account provider stores its signed-in record (which includes the
//! personal access token) and the session provider stores its session
//! record here. Neither value is ever logged.

mod file_store;
mod memory_store;
mod traits;

pub use file_store::FileSecretStore;
pub use memory_store::MemorySecretStore;
pub use traits::{SecretError, SecretStore};

/// The default secret store provider name.
pub const DEFAULT_PROVIDER: &str = "file";

/// Create a secret store based on the provider name.
///
/// # Errors
///
/// Returns `SecretError::ProviderNotAvailable` for unknown providers.
pub fn create_store(provider: &str) -> Result<Box<dyn SecretStore>, SecretError> {
    match provider {
        "file" => Ok(Box::new(FileSecretStore::new()?)),
        other => Err(SecretError::ProviderNotAvailable(format!(
            "unknown secret provider: '{}' (valid: file)",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_unknown_provider() {
        match create_store("keychain") {
            Err(SecretError::ProviderNotAvailable(msg)) => assert!(msg.contains("keychain")),
            Err(e) => panic!("unexpected error type: {:?}", e),
            Ok(_) => panic!("expected error"),
        }
    }

    #[test]
    fn default_provider_constant() {
        assert_eq!(DEFAULT_PROVIDER, "file");
    }
}
