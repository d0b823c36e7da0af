//! Offline cache proxy for shltr.
//!
//! This crate provides the worker itself: the lifecycle state machine,
//! request classification, the network-first interception strategy, and the
//! network capability trait with its reqwest-backed implementation.

pub mod fetch;
pub mod proxy;

pub use fetch::{FetchConfig, HttpFetcher, Network};
pub use proxy::{OfflineProxy, SKIP_WAITING, Verdict, WorkerState};

#[cfg(test)]
pub(crate) mod testsupport;
