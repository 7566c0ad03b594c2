//! Durable persistence for the serialized authentication response.
//!
//! SYSTEM CONTEXT
//! ==============
//! Only the session layer writes here. Reads fail soft: a missing entry, an
//! unavailable `localStorage`, or any storage exception all read as "nothing
//! stored", because losing a token only forces the user to sign in again.

#[cfg(test)]
#[path = "token_store_test.rs"]
mod token_store_test;

use std::sync::{Arc, Mutex, PoisonError};

/// Origin-scoped key/value slot holding at most one serialized credential.
pub trait TokenStore: Send + Sync {
    /// Store `payload`, replacing any previous value. No validation happens here.
    fn write(&self, payload: &str);

    /// Return the stored payload, or `None` when absent or unreadable.
    fn read(&self) -> Option<String>;

    /// Remove the stored payload. Clearing an empty store is not an error.
    fn clear(&self);
}

/// Browser `localStorage` store keyed by a single entry name.
///
/// Without the `csr` feature there is no browser storage, so every read is
/// empty and writes are dropped.
#[derive(Clone, Debug)]
pub struct LocalStorageTokenStore {
    key: String,
}

impl LocalStorageTokenStore {
    pub fn new(key: &str) -> Self {
        Self { key: key.to_owned() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    #[cfg(feature = "csr")]
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok().flatten())
    }
}

impl TokenStore for LocalStorageTokenStore {
    fn write(&self, payload: &str) {
        #[cfg(feature = "csr")]
        {
            let Some(storage) = Self::storage() else {
                log::warn!("token store: localStorage unavailable, credential not persisted");
                return;
            };
            if storage.set_item(&self.key, payload).is_err() {
                log::warn!("token store: write to {} failed", self.key);
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = payload;
        }
    }

    fn read(&self) -> Option<String> {
        #[cfg(feature = "csr")]
        {
            let storage = Self::storage()?;
            storage.get_item(&self.key).ok().flatten()
        }
        #[cfg(not(feature = "csr"))]
        {
            None
        }
    }

    fn clear(&self) {
        #[cfg(feature = "csr")]
        {
            if let Some(storage) = Self::storage() {
                let _ = storage.remove_item(&self.key);
            }
        }
    }
}

/// In-process store used by native builds and tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryTokenStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `payload` already persisted, as after a page reload.
    pub fn with_payload(payload: &str) -> Self {
        let store = Self::default();
        store.write(payload);
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn write(&self, payload: &str) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(payload.to_owned());
    }

    fn read(&self) -> Option<String> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn clear(&self) {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).take();
    }
}

/// Store appropriate for the current build: `localStorage` in the browser,
/// memory otherwise.
pub fn platform_store(key: &str) -> Arc<dyn TokenStore> {
    #[cfg(feature = "csr")]
    {
        Arc::new(LocalStorageTokenStore::new(key))
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = key;
        Arc::new(MemoryTokenStore::new())
    }
}
