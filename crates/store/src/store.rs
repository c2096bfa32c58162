use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;

use crate::events::{StoreEvents, TracingEvents};
use crate::metrics;

/// Simulated database connection backed by an in-memory map.
///
/// The map is owned by the instance and created with it. Writes replace the
/// whole `String` under the shard lock, so a concurrent `get` sees either the
/// old or the new value, never a mix.
pub struct SharedStore<K> {
    data: DashMap<K, String>,
    events: Arc<dyn StoreEvents>,
}

/// Outcome of [`SharedStore::get`]. A missing key is a normal result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<K> {
    Found { key: K, value: String },
    NotFound { key: K },
}

impl<K> Lookup<K> {
    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found { .. })
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Lookup::Found { value, .. } => Some(value),
            Lookup::NotFound { .. } => None,
        }
    }

    pub fn key(&self) -> &K {
        match self {
            Lookup::Found { key, .. } | Lookup::NotFound { key } => key,
        }
    }
}

impl<K: fmt::Display> fmt::Display for Lookup<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lookup::Found { key, value } => write!(f, "Data for Key {key}: {value}"),
            Lookup::NotFound { key } => write!(f, "No Data found for Key {key}"),
        }
    }
}

impl<K> SharedStore<K>
where
    K: Eq + Hash + Clone + fmt::Display,
{
    /// Build a store that reports through `tracing`.
    pub fn new() -> Self {
        Self::with_events(Arc::new(TracingEvents))
    }

    /// Build a store with custom notification hooks.
    pub fn with_events(events: Arc<dyn StoreEvents>) -> Self {
        let store = Self { data: DashMap::new(), events };
        metrics::CONSTRUCTIONS_TOTAL.inc();
        store.events.on_created();
        store
    }

    /// Insert or overwrite the value for `key`. Last writer wins.
    pub fn save(&self, key: K, value: impl Into<String>) {
        let value = value.into();
        let rendered = key.to_string();
        self.data.insert(key, value.clone());
        metrics::SAVES_TOTAL.inc();
        self.events.on_saved(&rendered, &value);
    }

    pub fn get(&self, key: &K) -> Lookup<K> {
        let found = self.data.get(key).map(|entry| entry.value().clone());
        metrics::record_lookup(found.is_some());
        match found {
            Some(value) => Lookup::Found { key: key.clone(), value },
            None => Lookup::NotFound { key: key.clone() },
        }
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.data.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Snapshot of all entries; order is unspecified.
    pub fn entries(&self) -> Vec<(K, String)> {
        self.data.iter().map(|e| (e.key().clone(), e.value().clone())).collect()
    }
}

impl<K> Default for SharedStore<K>
where
    K: Eq + Hash + Clone + fmt::Display,
{
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::recording::RecordingEvents;
    use std::collections::HashMap;
    use std::thread;

    fn recorded() -> (Arc<RecordingEvents>, SharedStore<u64>) {
        let events = Arc::new(RecordingEvents::default());
        let store = SharedStore::with_events(events.clone());
        (events, store)
    }

    #[test]
    fn read_after_write_returns_found_result() {
        let store = SharedStore::<u64>::new();
        store.save(7, "Data from worker 7");

        let lookup = store.get(&7);
        assert!(lookup.is_found());
        assert_eq!(lookup.value(), Some("Data from worker 7"));
        assert_eq!(lookup.to_string(), "Data for Key 7: Data from worker 7");
    }

    #[test]
    fn missing_key_is_not_an_error() {
        let store = SharedStore::<u64>::new();
        let lookup = store.get(&42);
        assert_eq!(lookup, Lookup::NotFound { key: 42 });
        assert_eq!(*lookup.key(), 42);
        assert_eq!(lookup.value(), None);
        assert_eq!(lookup.to_string(), "No Data found for Key 42");
    }

    #[test]
    fn overwrite_keeps_last_value() {
        let store = SharedStore::<String>::new();
        store.save("alpha".to_string(), "v1");
        store.save("alpha".to_string(), "v2");

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&"alpha".to_string()).to_string(), "Data for Key alpha: v2");
    }

    #[test]
    fn notifications_fire_once_on_create_and_per_save() {
        let (events, store) = recorded();
        assert_eq!(events.created(), 1);

        store.save(1, "one");
        store.save(1, "uno");
        store.get(&1);

        assert_eq!(events.created(), 1);
        assert_eq!(
            events.saved(),
            vec![("1".to_string(), "one".to_string()), ("1".to_string(), "uno".to_string())]
        );
    }

    #[test]
    fn concurrent_disjoint_writes_are_all_kept() {
        const WRITERS: u64 = 16;
        const PER_WRITER: u64 = 200;
        let store = SharedStore::<u64>::new();

        thread::scope(|s| {
            for w in 0..WRITERS {
                let store = &store;
                s.spawn(move || {
                    for i in 0..PER_WRITER {
                        let key = w * PER_WRITER + i;
                        store.save(key, format!("value-{key}"));
                    }
                });
            }
        });

        assert_eq!(store.len() as u64, WRITERS * PER_WRITER);
        let entries: HashMap<u64, String> = store.entries().into_iter().collect();
        for key in 0..WRITERS * PER_WRITER {
            assert_eq!(entries.get(&key), Some(&format!("value-{key}")));
        }
    }

    #[test]
    fn racing_reads_never_see_torn_values() {
        let store = SharedStore::<u64>::new();
        let a = "a".repeat(4096);
        let b = "b".repeat(4096);
        store.save(0, a.clone());

        thread::scope(|s| {
            for n in 0..4 {
                let (store, a, b) = (&store, &a, &b);
                s.spawn(move || {
                    for i in 0..500 {
                        let v = if (i + n) % 2 == 0 { a } else { b };
                        store.save(0, v.as_str());
                    }
                });
            }
            for _ in 0..4 {
                let (store, a, b) = (&store, &a, &b);
                s.spawn(move || {
                    for _ in 0..500 {
                        let lookup = store.get(&0);
                        let v = lookup.value().unwrap_or_default();
                        assert!(v == a.as_str() || v == b.as_str(), "torn read");
                    }
                });
            }
        });

        assert_eq!(store.len(), 1);
    }

    #[test]
    fn same_key_race_settles_on_one_write() {
        let store = SharedStore::<u64>::new();
        thread::scope(|s| {
            for n in 0..8 {
                let store = &store;
                s.spawn(move || store.save(5, format!("writer-{n}")));
            }
        });

        let value = store.get(&5).value().map(str::to_string).unwrap_or_default();
        assert!((0..8).any(|n| value == format!("writer-{n}")));
    }
}
