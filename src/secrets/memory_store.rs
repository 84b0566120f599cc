//! secrets::memory_store
//!
//! In-memory secret storage for tests and ephemeral runs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::traits::{SecretError, SecretStore};

/// Process-local secret store.
///
/// Clones share the same map. `fail_reads` makes every `get` fail, which
/// lets tests exercise provider error paths.
#[derive(Debug, Clone, Default)]
pub struct MemorySecretStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    values: HashMap<String, String>,
    fail_reads: bool,
}

impl MemorySecretStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent reads fail (or succeed again).
    pub fn fail_reads(&self, fail: bool) {
        self.lock().fail_reads = fail;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        // A poisoned lock only means a panicking test; the map is still usable.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl SecretStore for MemorySecretStore {
    fn get(&self, key: &str) -> Result<Option<String>, SecretError> {
        let inner = self.lock();
        if inner.fail_reads {
            return Err(SecretError::ReadError(format!("read of '{}' refused", key)));
        }
        Ok(inner.values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SecretError> {
        self.lock()
            .values
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), SecretError> {
        self.lock().values.remove(key);
        Ok(())
    }
}
