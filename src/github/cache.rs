// src/github/cache.rs
//! Time-based revalidation for successful GitHub responses.
//!
//! Entries are served for at most `ttl` after they were stored; anything older is
//! dropped on lookup. Failures are never cached.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct ResponseCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, (Instant, Value)>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        let mut entries = self.lock();
        match entries.get(key) {
            Some((stored_at, value)) if stored_at.elapsed() < self.ttl => Some(value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: String, value: Value) {
        let mut entries = self.lock();
        // Sweep stale entries so the map stays bounded by what is live.
        let ttl = self.ttl;
        entries.retain(|_, (stored_at, _)| stored_at.elapsed() < ttl);
        entries.insert(key, (Instant::now(), value));
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, (Instant, Value)>> {
        match self.entries.lock() {
            Ok(g) => g,
            Err(poison) => poison.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fresh_entry_is_served() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        assert_eq!(cache.ttl(), Duration::from_secs(60));
        cache.insert("/repos/o/r".into(), json!({"stargazers_count": 5}));
        assert_eq!(
            cache.get("/repos/o/r"),
            Some(json!({"stargazers_count": 5}))
        );
        assert_eq!(cache.get("/repos/o/other"), None);
    }

    #[test]
    fn stale_entry_is_evicted() {
        let cache = ResponseCache::new(Duration::from_millis(5));
        cache.insert("k".into(), json!(1));
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn insert_sweeps_expired_entries() {
        let cache = ResponseCache::new(Duration::from_millis(5));
        cache.insert("a".into(), json!(1));
        cache.insert("b".into(), json!(2));
        std::thread::sleep(Duration::from_millis(30));
        cache.insert("c".into(), json!(3));
        assert_eq!(cache.len(), 1);
    }
}
