//! Cache backends for the offline proxy.
//!
//! The proxy never touches a concrete storage engine directly; it talks to
//! the [`CacheBackend`] trait. Two implementations are provided:
//!
//! - [`MemoryBackend`]: transient, used in tests and for in-process caching
//! - [`SqliteBackend`]: persistent, SQLite with async access via
//!   tokio-rusqlite, WAL mode, and automatic schema migrations
//!
//! A backend holds any number of named stores (one per cache generation).
//! Entries are keyed by request identity, so every put is an idempotent
//! overwrite and concurrent handlers never interfere with each other.

pub mod key;
pub mod memory;
pub mod migrations;
pub mod sqlite;

use async_trait::async_trait;

use crate::error::Error;
use crate::request::Request;
use crate::response::Response;

pub use key::request_key;
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

/// A cached request/response pair plus the metadata needed to re-key it.
#[derive(Debug, Clone)]
pub struct CachedEntry {
    pub method: String,
    pub url: String,
    pub response: Response,
    /// RFC 3339 timestamp of when the entry was written.
    pub stored_at: String,
}

impl CachedEntry {
    /// Build an entry for a request/response pair, stamped with the current time.
    pub fn new(request: &Request, response: Response) -> Self {
        Self {
            method: request.method.as_str().to_string(),
            url: request.url.to_string(),
            response,
            stored_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Injected cache capability: a set of named key-value stores.
///
/// Stores are created implicitly on first put, matching the open-on-demand
/// behavior of browser cache storage.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Insert or overwrite an entry in the named store.
    async fn put(&self, store: &str, entry_key: &str, entry: CachedEntry) -> Result<(), Error>;

    /// Exact-key lookup in the named store.
    async fn lookup(&self, store: &str, entry_key: &str) -> Result<Option<CachedEntry>, Error>;

    /// Delete a whole store and everything in it. Returns whether it existed.
    async fn delete_store(&self, store: &str) -> Result<bool, Error>;

    /// Names of all stores, sorted.
    async fn store_names(&self) -> Result<Vec<String>, Error>;
}
