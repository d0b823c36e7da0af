//! Response representation shared by the network and cache layers.

use bytes::Bytes;

/// A response as seen by the page: status line, headers, and body.
///
/// Bodies are [`Bytes`], so cloning a response is cheap and the same
/// instance can be handed to the page and written to the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl Response {
    /// Create an empty response with the given status.
    pub fn new(status: u16) -> Self {
        Self { status, status_text: String::new(), headers: Vec::new(), body: Bytes::new() }
    }

    /// Set the status text.
    pub fn status_text(mut self, text: impl Into<String>) -> Self {
        self.status_text = text.into();
        self
    }

    /// Set the body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Append a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// The synthetic last-resort response returned when the network is down
    /// and nothing usable is cached: 503 with status text and body "Offline".
    pub fn offline() -> Self {
        Self::new(503).status_text("Offline").body(Bytes::from_static(b"Offline"))
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_response() {
        let resp = Response::offline();
        assert_eq!(resp.status, 503);
        assert_eq!(resp.status_text, "Offline");
        assert_eq!(resp.body.as_ref(), b"Offline");
        assert!(!resp.is_success());
    }

    #[test]
    fn test_is_success_bounds() {
        assert!(Response::new(200).is_success());
        assert!(Response::new(299).is_success());
        assert!(!Response::new(199).is_success());
        assert!(!Response::new(300).is_success());
        assert!(!Response::new(404).is_success());
    }

    #[test]
    fn test_builder() {
        let resp = Response::new(200)
            .status_text("OK")
            .header("content-type", "text/html")
            .body("<!doctype html>");
        assert_eq!(resp.status_text, "OK");
        assert_eq!(resp.headers.len(), 1);
        assert_eq!(resp.body.as_ref(), b"<!doctype html>");
    }
}
