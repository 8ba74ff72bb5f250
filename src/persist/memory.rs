//! Process-local key/value sink.

use std::sync::{Arc, Mutex};

use hashbrown::HashMap;

use super::{CartSink, PersistError, PersistResult};

/// In-memory storage shared by every clone.
///
/// Two handles built from clones of the same sink see each other's writes,
/// which is how a "reload" is simulated in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryCartSink {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryCartSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw record currently stored under `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    /// Removes `key`, as a user clearing site storage would.
    pub fn remove(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|mut entries| entries.remove(key))
    }
}

impl CartSink for MemoryCartSink {
    fn load(&self, key: &str) -> PersistResult<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| PersistError::Backend("memory sink poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn store(&mut self, key: &str, record: &str) -> PersistResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| PersistError::Backend("memory sink poisoned".to_string()))?;
        entries.insert(key.to_string(), record.to_string());
        Ok(())
    }
}
