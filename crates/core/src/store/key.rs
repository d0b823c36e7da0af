//! Entry key generation from request identity.

use sha2::{Digest, Sha256};

use crate::request::Request;

/// Compute the cache entry key for a method/URL pair.
pub fn entry_key(method: &str, url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(method.as_bytes());
    hasher.update(b"\n");
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compute the cache entry key for a request.
pub fn request_key(request: &Request) -> String {
    entry_key(request.method.as_str(), request.url.as_str())
}
