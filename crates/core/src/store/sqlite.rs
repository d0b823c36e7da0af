//! SQLite-backed cache backend.
//!
//! Persists cache stores across restarts using SQLite with async access via
//! tokio-rusqlite. WAL mode allows handlers for distinct requests to read
//! and write concurrently; every put is an UPSERT keyed by request identity.

use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use tokio_rusqlite::{Connection, params};
use tokio_rusqlite::rusqlite;

use super::{CacheBackend, CachedEntry, migrations};
use crate::error::Error;
use crate::response::Response;

/// Persistent backend over a tokio-rusqlite connection that runs database
/// operations on a background thread.
#[derive(Clone, Debug)]
pub struct SqliteBackend {
    conn: Connection,
}

impl SqliteBackend {
    /// Open a database at the specified path.
    ///
    /// Creates the file if it doesn't exist, applies performance pragmas,
    /// and runs any pending migrations.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let conn = Connection::open(path).await.map_err(|e| Error::Store(e.into()))?;
        Self::init(conn).await
    }

    /// Open an in-memory database for testing.
    pub async fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| Error::Store(e.into()))?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self, Error> {
        conn.call(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode=WAL;
                 PRAGMA synchronous=NORMAL;
                 PRAGMA temp_store=MEMORY;
                 PRAGMA foreign_keys=ON;",
            )?;
            Ok(())
        })
        .await
        .map_err(Error::Store)?;

        migrations::run(&conn).await?;

        Ok(Self { conn })
    }
}

fn headers_to_json(headers: &[(String, String)]) -> Result<String, Error> {
    serde_json::to_string(headers).map_err(|e| Error::Serialization(e.to_string()))
}

fn headers_from_json(json: &str) -> Vec<(String, String)> {
    serde_json::from_str(json).unwrap_or_default()
}

#[async_trait]
impl CacheBackend for SqliteBackend {
    async fn put(&self, store: &str, entry_key: &str, entry: CachedEntry) -> Result<(), Error> {
        let store = store.to_string();
        let entry_key = entry_key.to_string();
        let headers_json = headers_to_json(&entry.response.headers)?;
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT OR IGNORE INTO stores (name, created_at) VALUES (?1, ?2)",
                    params![store, entry.stored_at],
                )?;
                conn.execute(
                    "INSERT INTO entries (
                        store_name, entry_key, method, url,
                        status, status_text, headers_json, body, stored_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                    ON CONFLICT(store_name, entry_key) DO UPDATE SET
                        method = excluded.method,
                        url = excluded.url,
                        status = excluded.status,
                        status_text = excluded.status_text,
                        headers_json = excluded.headers_json,
                        body = excluded.body,
                        stored_at = excluded.stored_at",
                    params![
                        store,
                        entry_key,
                        entry.method,
                        entry.url,
                        entry.response.status,
                        entry.response.status_text,
                        headers_json,
                        entry.response.body.as_ref(),
                        entry.stored_at,
                    ],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    async fn lookup(&self, store: &str, entry_key: &str) -> Result<Option<CachedEntry>, Error> {
        let store = store.to_string();
        let entry_key = entry_key.to_string();
        self.conn
            .call(move |conn| -> Result<Option<CachedEntry>, Error> {
                let result = conn.query_row(
                    "SELECT method, url, status, status_text, headers_json, body, stored_at
                     FROM entries WHERE store_name = ?1 AND entry_key = ?2",
                    params![store, entry_key],
                    |row| {
                        let headers_json: String = row.get(4)?;
                        let body: Vec<u8> = row.get(5)?;
                        Ok(CachedEntry {
                            method: row.get(0)?,
                            url: row.get(1)?,
                            response: Response {
                                status: row.get(2)?,
                                status_text: row.get(3)?,
                                headers: headers_from_json(&headers_json),
                                body: Bytes::from(body),
                            },
                            stored_at: row.get(6)?,
                        })
                    },
                );

                match result {
                    Ok(entry) => Ok(Some(entry)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    async fn delete_store(&self, store: &str) -> Result<bool, Error> {
        let store = store.to_string();
        self.conn
            .call(move |conn| -> Result<bool, Error> {
                let deleted = conn.execute("DELETE FROM stores WHERE name = ?1", params![store])?;
                Ok(deleted > 0)
            })
            .await
            .map_err(Error::from)
    }

    async fn store_names(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT name FROM stores ORDER BY name")?;
                let names = stmt
                    .query_map([], |row| row.get::<_, String>(0))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(names)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Request;
    use crate::store::request_key;
    use url::Url;

    fn make_entry(url: &str, body: &str) -> (String, CachedEntry) {
        let request = Request::get(Url::parse(url).unwrap());
        let key = request_key(&request);
        let response = Response::new(200)
            .status_text("OK")
            .header("content-type", "text/html")
            .body(body.to_string());
        (key, CachedEntry::new(&request, response))
    }

    #[tokio::test]
    async fn test_put_and_lookup_round_trip() {
        let backend = SqliteBackend::open_in_memory().await.unwrap();
        let (key, entry) = make_entry("https://app.test/", "hello");
        backend.put("cache-v1", &key, entry).await.unwrap();

        let found = backend.lookup("cache-v1", &key).await.unwrap().unwrap();
        assert_eq!(found.method, "GET");
        assert_eq!(found.url, "https://app.test/");
        assert_eq!(found.response.status, 200);
        assert_eq!(found.response.status_text, "OK");
        assert_eq!(found.response.headers, vec![("content-type".to_string(), "text/html".to_string())]);
        assert_eq!(found.response.body.as_ref(), b"hello");
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let backend = SqliteBackend::open_in_memory().await.unwrap();
        let (key, old) = make_entry("https://app.test/", "old");
        let (_, new) = make_entry("https://app.test/", "new");
        backend.put("cache-v1", &key, old).await.unwrap();
        backend.put("cache-v1", &key, new).await.unwrap();

        let found = backend.lookup("cache-v1", &key).await.unwrap().unwrap();
        assert_eq!(found.response.body.as_ref(), b"new");
    }

    #[tokio::test]
    async fn test_lookup_missing() {
        let backend = SqliteBackend::open_in_memory().await.unwrap();
        let found = backend.lookup("cache-v1", "nonexistent").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_delete_store_cascades() {
        let backend = SqliteBackend::open_in_memory().await.unwrap();
        let (key, entry) = make_entry("https://app.test/", "hello");
        backend.put("cache-v1", &key, entry).await.unwrap();

        assert!(backend.delete_store("cache-v1").await.unwrap());
        assert!(backend.lookup("cache-v1", &key).await.unwrap().is_none());
        assert!(backend.store_names().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_store() {
        let backend = SqliteBackend::open_in_memory().await.unwrap();
        assert!(!backend.delete_store("never-existed").await.unwrap());
    }

    #[tokio::test]
    async fn test_store_names_sorted() {
        let backend = SqliteBackend::open_in_memory().await.unwrap();
        let (key, entry) = make_entry("https://app.test/", "hello");
        backend.put("cache-v2", &key, entry.clone()).await.unwrap();
        backend.put("cache-v1", &key, entry).await.unwrap();

        let names = backend.store_names().await.unwrap();
        assert_eq!(names, vec!["cache-v1".to_string(), "cache-v2".to_string()]);
    }
}
