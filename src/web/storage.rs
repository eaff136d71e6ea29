//! `localStorage` adapter for the score cache.

use web_sys::Storage;

use crate::error::StorageError;
use crate::score::KeyValueStore;

/// Resolves `window.localStorage` on every call so a page that revokes
/// access later degrades to logged errors instead of stale handles.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStore;

impl LocalStore {
    fn storage() -> Result<Storage, StorageError> {
        let window = web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".into()))?;
        match window.local_storage() {
            Ok(Some(store)) => Ok(store),
            Ok(None) => Err(StorageError::Unavailable("localStorage is disabled".into())),
            Err(e) => Err(StorageError::Unavailable(format!("{e:?}"))),
        }
    }
}

impl KeyValueStore for LocalStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::Write(format!("{e:?}")))
    }
}
