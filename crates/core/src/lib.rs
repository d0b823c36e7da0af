//! Core types and shared functionality for shltr.
//!
//! This crate provides:
//! - Request/response types for intercepted traffic
//! - Cache backend abstraction with in-memory and SQLite implementations
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod error;
pub mod request;
pub mod response;
pub mod store;

pub use config::WorkerConfig;
pub use error::Error;
pub use request::{Destination, Method, Mode, Request};
pub use response::Response;
pub use store::{CacheBackend, CachedEntry, MemoryBackend, SqliteBackend};
