use std::collections::HashMap;

/// Flat string key-value storage holding account preferences.
pub trait PreferenceStore {
    /// Every key currently stored, in no particular order.
    fn keys(&self) -> Vec<String>;

    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str);

    fn remove(&mut self, key: &str);
}

#[derive(Debug, Clone, Default)]
/// In-memory [`PreferenceStore`].
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<K, V> FromIterator<(K, V)> for MemoryStore
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl PreferenceStore for MemoryStore {
    fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_owned(), value.to_owned());
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_values() {
        let mut store = MemoryStore::new();
        store.set("a", "1");
        store.set("b", "2");
        assert_eq!(store.get("a").as_deref(), Some("1"));

        store.remove("a");
        assert_eq!(store.get("a"), None);
        assert_eq!(store.keys(), vec!["b".to_owned()]);
    }
}
