//! Best-score cache.
//!
//! One storage key holds a JSON object mapping section name to the best score
//! ever reached. Writes are monotonic and never surface errors to callers.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

use crate::error::StorageError;
use crate::section::Section;

pub type ScoreMap = BTreeMap<String, u32>;

/// Minimal string key-value storage (`localStorage` in the browser).
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-process store used by native tests and as a stand-in when the browser
/// denies storage access.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Read the persisted map. Missing or corrupt data reads as empty.
pub fn load_scores(store: &dyn KeyValueStore, key: &str) -> ScoreMap {
    match store.get_item(key) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            log::warn!("discarding unreadable score map under '{key}': {e}");
            ScoreMap::new()
        }),
        Ok(None) => ScoreMap::new(),
        Err(e) => {
            log::error!("Error reading scores: {e}");
            ScoreMap::new()
        }
    }
}

/// Merge `score` into the persisted best for `section`. Never lowers a stored
/// value; failures are logged and otherwise ignored.
pub fn save_score(store: &dyn KeyValueStore, key: &str, section: Section, score: u32) {
    if let Err(e) = try_save_score(store, key, section, score) {
        log::error!("Error saving score: {e}");
    }
}

fn try_save_score(
    store: &dyn KeyValueStore,
    key: &str,
    section: Section,
    score: u32,
) -> Result<(), StorageError> {
    let mut scores = match store.get_item(key)? {
        Some(raw) => serde_json::from_str::<ScoreMap>(&raw).unwrap_or_default(),
        None => ScoreMap::new(),
    };
    let best = scores.entry(section.name().to_string()).or_insert(0);
    *best = (*best).max(score);
    let serialized = serde_json::to_string(&scores)?;
    store.set_item(key, &serialized)
}
