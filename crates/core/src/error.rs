//! Unified error types for shltr.

use tokio_rusqlite::rusqlite;

/// Unified error types for the offline cache proxy.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// URL could not be parsed or resolved against the origin.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Cache store operation failed.
    #[error("store error: {0}")]
    Store(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("store migration failed: {0}")]
    MigrationFailed(String),

    /// Entry metadata could not be (de)serialized.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Transport-level network failure (no response at all).
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    /// Response body exceeded the configured size cap.
    #[error("response too large: {0}")]
    ResponseTooLarge(String),

    /// App-shell pre-caching failed; the worker cannot activate.
    #[error("install failed: {0}")]
    InstallFailed(String),

    /// Lifecycle state transition not permitted.
    #[error("invalid lifecycle transition: {from} -> {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Store(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Store(tokio_rusqlite::Error::Close(c)),
            _ => Error::Store(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Store(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Store(tokio_rusqlite::Error::Error(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NetworkUnreachable("connection refused".to_string());
        assert!(err.to_string().contains("network unreachable"));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn test_transition_error_names_states() {
        let err = Error::InvalidTransition { from: "parsed", to: "activated" };
        assert_eq!(err.to_string(), "invalid lifecycle transition: parsed -> activated");
    }
}
