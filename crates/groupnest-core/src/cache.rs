use std::collections::HashMap;
use std::time::{Duration, Instant};

// ---------------------------------------------------------------------------
// Store abstraction
// ---------------------------------------------------------------------------

/// A cached value with its expiry deadline
#[derive(Debug, Clone)]
pub struct CachedEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CachedEntry<V> {
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Where cached evaluations live. The default is the in-process map below;
/// hosts with their own cache tier implement this instead.
pub trait CacheStore {
    type Value;

    fn insert(&mut self, key: String, entry: CachedEntry<Self::Value>);
    fn lookup(&self, key: &str) -> Option<&CachedEntry<Self::Value>>;
    fn remove(&mut self, key: &str) -> Option<CachedEntry<Self::Value>>;
    fn clear(&mut self);
}

/// Plain process-local store
#[derive(Debug, Default)]
pub struct InMemoryStore<V> {
    entries: HashMap<String, CachedEntry<V>>,
}

impl<V> InMemoryStore<V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> CacheStore for InMemoryStore<V> {
    type Value = V;

    fn insert(&mut self, key: String, entry: CachedEntry<V>) {
        self.entries.insert(key, entry);
    }

    fn lookup(&self, key: &str) -> Option<&CachedEntry<V>> {
        self.entries.get(key)
    }

    fn remove(&mut self, key: &str) -> Option<CachedEntry<V>> {
        self.entries.remove(key)
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

// ---------------------------------------------------------------------------
// TTL cache
// ---------------------------------------------------------------------------

/// TTL cache over an injected store. Expiry is lazy: an entry past its
/// deadline is dropped on the read that finds it.
#[derive(Debug)]
pub struct InsightCache<S: CacheStore> {
    store: S,
    ttl: Duration,
}

/// The common case: TTL cache over the process-local store
pub type MemoryInsightCache<V> = InsightCache<InMemoryStore<V>>;

impl<S: CacheStore> InsightCache<S> {
    pub fn new(store: S, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Fresh hit or nothing. An expired entry is removed on the way out.
    pub fn get(&mut self, key: &str) -> Option<S::Value>
    where
        S::Value: Clone,
    {
        let expired = match self.store.lookup(key) {
            Some(entry) => entry.is_expired(Instant::now()),
            None => return None,
        };
        if expired {
            self.store.remove(key);
            return None;
        }
        self.store.lookup(key).map(|entry| entry.value.clone())
    }

    pub fn put(&mut self, key: impl Into<String>, value: S::Value) {
        self.store.insert(
            key.into(),
            CachedEntry {
                value,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Drop one key, typically on a trigger that invalidates the snapshot.
    /// Reports whether an entry was present.
    pub fn invalidate(&mut self, key: &str) -> bool {
        self.store.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Serve a fresh hit, otherwise compute, store and return. A failed
    /// computation caches nothing.
    pub fn get_or_compute<E, F>(&mut self, key: &str, compute: F) -> Result<S::Value, E>
    where
        S::Value: Clone,
        F: FnOnce() -> Result<S::Value, E>,
    {
        if let Some(hit) = self.get(key) {
            return Ok(hit);
        }
        let value = compute()?;
        self.put(key, value.clone());
        Ok(value)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
