use std::collections::HashMap;

use paas_application::KeyValueStorage;
use paas_core::AppResult;
use parking_lot::RwLock;

/// Process-local key/value storage; nothing outlives the process.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryKeyValueStorage {
    /// Creates an empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for InMemoryKeyValueStorage {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.entries.write().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        self.entries.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use paas_application::KeyValueStorage;

    use super::InMemoryKeyValueStorage;

    #[test]
    fn set_get_remove() {
        let storage = InMemoryKeyValueStorage::new();
        assert!(storage.set("paas_user", "{}").is_ok());
        assert_eq!(storage.get("paas_user").ok().flatten().as_deref(), Some("{}"));
        assert!(storage.remove("paas_user").is_ok());
        assert_eq!(storage.get("paas_user").ok().flatten(), None);
    }
}
