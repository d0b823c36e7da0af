//! In-memory cache backend.
//!
//! Keeps every store in a process-local map. Suitable for tests and for
//! deployments that only want caching for the lifetime of the process.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CacheBackend, CachedEntry};
use crate::error::Error;

/// Transient backend over `HashMap`s guarded by a tokio `RwLock`.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    stores: RwLock<HashMap<String, HashMap<String, CachedEntry>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn put(&self, store: &str, entry_key: &str, entry: CachedEntry) -> Result<(), Error> {
        let mut stores = self.stores.write().await;
        stores
            .entry(store.to_string())
            .or_default()
            .insert(entry_key.to_string(), entry);
        Ok(())
    }

    async fn lookup(&self, store: &str, entry_key: &str) -> Result<Option<CachedEntry>, Error> {
        let stores = self.stores.read().await;
        Ok(stores.get(store).and_then(|s| s.get(entry_key)).cloned())
    }

    async fn delete_store(&self, store: &str) -> Result<bool, Error> {
        let mut stores = self.stores.write().await;
        Ok(stores.remove(store).is_some())
    }

    async fn store_names(&self) -> Result<Vec<String>, Error> {
        let stores = self.stores.read().await;
        let mut names: Vec<String> = stores.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Request;
    use crate::response::Response;
    use crate::store::request_key;
    use url::Url;

    fn make_entry(url: &str, body: &str) -> (String, CachedEntry) {
        let request = Request::get(Url::parse(url).unwrap());
        let key = request_key(&request);
        let entry = CachedEntry::new(&request, Response::new(200).body(body.to_string()));
        (key, entry)
    }

    #[tokio::test]
    async fn test_put_and_lookup() {
        let backend = MemoryBackend::new();
        let (key, entry) = make_entry("https://app.test/", "hello");
        backend.put("cache-v1", &key, entry).await.unwrap();

        let found = backend.lookup("cache-v1", &key).await.unwrap().unwrap();
        assert_eq!(found.response.body.as_ref(), b"hello");
        assert_eq!(found.url, "https://app.test/");
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let backend = MemoryBackend::new();
        let (key, old) = make_entry("https://app.test/", "old");
        let (_, new) = make_entry("https://app.test/", "new");
        backend.put("cache-v1", &key, old).await.unwrap();
        backend.put("cache-v1", &key, new).await.unwrap();

        let found = backend.lookup("cache-v1", &key).await.unwrap().unwrap();
        assert_eq!(found.response.body.as_ref(), b"new");
    }

    #[tokio::test]
    async fn test_lookup_missing() {
        let backend = MemoryBackend::new();
        let found = backend.lookup("cache-v1", "nope").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_stores_are_isolated() {
        let backend = MemoryBackend::new();
        let (key, entry) = make_entry("https://app.test/", "hello");
        backend.put("cache-v1", &key, entry).await.unwrap();

        let found = backend.lookup("cache-v2", &key).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_delete_store() {
        let backend = MemoryBackend::new();
        let (key, entry) = make_entry("https://app.test/", "hello");
        backend.put("cache-v1", &key, entry).await.unwrap();

        assert!(backend.delete_store("cache-v1").await.unwrap());
        assert!(!backend.delete_store("cache-v1").await.unwrap());
        assert!(backend.lookup("cache-v1", &key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_store_names_sorted() {
        let backend = MemoryBackend::new();
        let (key, entry) = make_entry("https://app.test/", "hello");
        backend.put("cache-v2", &key, entry.clone()).await.unwrap();
        backend.put("cache-v1", &key, entry).await.unwrap();

        let names = backend.store_names().await.unwrap();
        assert_eq!(names, vec!["cache-v1".to_string(), "cache-v2".to_string()]);
    }
}
