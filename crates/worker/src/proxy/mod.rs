//! The offline cache proxy.
//!
//! Decides, for each outgoing request from the page, whether to let it pass
//! through untouched, serve it fresh from the network (caching a copy), or
//! fall back to the cache, and keeps exactly one cache generation alive.
//!
//! The proxy holds no ambient listeners; a host environment drives it
//! through four entry points: [`OfflineProxy::on_install`],
//! [`OfflineProxy::on_activate`], [`OfflineProxy::on_intercept`], and
//! [`OfflineProxy::on_message`]. Both the cache and the network are
//! injected capabilities, so the whole component runs under test with an
//! in-memory store and a scripted transport.

pub mod classify;
pub mod lifecycle;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use shltr_core::store::request_key;
use shltr_core::{CacheBackend, CachedEntry, Error, Request, Response, WorkerConfig};
use tokio::sync::RwLock;
use url::Url;

use crate::fetch::Network;

pub use lifecycle::WorkerState;

/// The one message the worker recognizes: activate now instead of waiting.
pub const SKIP_WAITING: &str = "SKIP_WAITING";

/// Outcome of routing one intercepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Not our traffic; the host forwards the request untouched.
    PassThrough,
    /// The proxy produced a response for the page.
    Respond(Response),
}

/// Offline cache proxy for one page origin and one cache generation.
pub struct OfflineProxy {
    config: WorkerConfig,
    origin: Url,
    shell_url: Url,
    store_name: String,
    backend: Arc<dyn CacheBackend>,
    network: Arc<dyn Network>,
    state: RwLock<WorkerState>,
    skip_waiting: AtomicBool,
    claimed: AtomicBool,
}

impl OfflineProxy {
    /// Construct a proxy for the given configuration and capabilities.
    pub fn new(
        config: WorkerConfig,
        backend: Arc<dyn CacheBackend>,
        network: Arc<dyn Network>,
    ) -> Result<Self, Error> {
        let origin = Url::parse(&config.origin).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        let shell_url = origin.join("/").map_err(|e| Error::InvalidUrl(e.to_string()))?;
        let store_name = config.store_name();

        Ok(Self {
            config,
            origin,
            shell_url,
            store_name,
            backend,
            network,
            state: RwLock::new(WorkerState::Parsed),
            skip_waiting: AtomicBool::new(false),
            claimed: AtomicBool::new(false),
        })
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> WorkerState {
        *self.state.read().await
    }

    /// Name of the current generation's cache store.
    pub fn store_name(&self) -> &str {
        &self.store_name
    }

    /// Whether the proxy asked to activate without waiting for tabs to close.
    pub fn skip_waiting_requested(&self) -> bool {
        self.skip_waiting.load(Ordering::SeqCst)
    }

    /// Whether the proxy has claimed control of all open clients.
    pub fn controls_clients(&self) -> bool {
        self.claimed.load(Ordering::SeqCst)
    }

    /// Install phase: pre-cache the app shell, all-or-nothing.
    ///
    /// Every shell resource must be fetched fresh and come back 2xx before
    /// anything is written to the store. On any failure the worker becomes
    /// redundant and the install attempt is over; the host may retry with a
    /// new instance. On success the proxy requests immediate activation.
    pub async fn on_install(&self) -> Result<(), Error> {
        self.transition(WorkerState::Installing).await?;

        match self.precache_shell().await {
            Ok(count) => {
                self.transition(WorkerState::Installed).await?;
                self.skip_waiting.store(true, Ordering::SeqCst);
                tracing::debug!(store = %self.store_name, entries = count, "app shell pre-cached");
                Ok(())
            }
            Err(err) => {
                self.make_redundant().await;
                Err(err)
            }
        }
    }

    async fn precache_shell(&self) -> Result<usize, Error> {
        let mut fetched = Vec::with_capacity(self.config.app_shell.len());
        for path in &self.config.app_shell {
            let url = self.origin.join(path).map_err(|e| Error::InvalidUrl(e.to_string()))?;
            let request = Request::get(url);
            let response = self
                .network
                .fetch(&request)
                .await
                .map_err(|e| Error::InstallFailed(format!("shell fetch {path}: {e}")))?;
            if !response.is_success() {
                return Err(Error::InstallFailed(format!(
                    "shell fetch {path}: status {}",
                    response.status
                )));
            }
            fetched.push((request, response));
        }

        // Nothing is written until every shell resource is in hand.
        let count = fetched.len();
        for (request, response) in fetched {
            let key = request_key(&request);
            self.backend
                .put(&self.store_name, &key, CachedEntry::new(&request, response))
                .await?;
        }
        Ok(count)
    }

    /// Activation phase: purge every store from another generation, then
    /// claim all open clients.
    pub async fn on_activate(&self) -> Result<(), Error> {
        self.transition(WorkerState::Activating).await?;

        match self.purge_stale_stores().await {
            Ok(removed) => {
                self.transition(WorkerState::Activated).await?;
                self.claimed.store(true, Ordering::SeqCst);
                tracing::debug!(store = %self.store_name, stale_removed = removed, "activated");
                Ok(())
            }
            Err(err) => {
                self.make_redundant().await;
                Err(err)
            }
        }
    }

    async fn purge_stale_stores(&self) -> Result<usize, Error> {
        let mut removed = 0;
        for name in self.backend.store_names().await? {
            if name != self.store_name {
                self.backend.delete_store(&name).await?;
                tracing::debug!(store = %name, "deleted stale cache store");
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Message channel: recognizes exactly [`SKIP_WAITING`].
    ///
    /// An installed-but-not-yet-active proxy activates immediately instead
    /// of waiting for all controlled tabs to close. Any other message, or
    /// any other state, is a no-op.
    pub async fn on_message(&self, message: &str) -> Result<(), Error> {
        if message != SKIP_WAITING {
            return Ok(());
        }
        self.skip_waiting.store(true, Ordering::SeqCst);
        if *self.state.read().await == WorkerState::Installed {
            return self.on_activate().await;
        }
        Ok(())
    }

    /// Route one outgoing request.
    ///
    /// Same-origin GET navigations and static assets get the network-first
    /// policy: live fetch, cache the copy, and on transport failure fall
    /// back to the exact cached entry, then the cached root document for
    /// navigations, then a synthetic 503. Everything else passes through
    /// untouched, as does all traffic before activation completes.
    pub async fn on_intercept(&self, request: &Request) -> Result<Verdict, Error> {
        if !classify::should_intercept(request, &self.origin) {
            return Ok(Verdict::PassThrough);
        }
        if *self.state.read().await != WorkerState::Activated {
            return Ok(Verdict::PassThrough);
        }

        let key = request_key(request);
        match self.network.fetch(request).await {
            Ok(response) => {
                // Best-effort cache update off the response path; the page
                // gets its fresh response without waiting for the write,
                // and a store failure never costs it either.
                let entry = CachedEntry::new(request, response.clone());
                let backend = Arc::clone(&self.backend);
                let store = self.store_name.clone();
                let entry_key = key.clone();
                let url = request.url.clone();
                tokio::spawn(async move {
                    if let Err(err) = backend.put(&store, &entry_key, entry).await {
                        tracing::warn!(url = %url, error = %err, "failed to cache fresh response");
                    }
                });
                Ok(Verdict::Respond(response))
            }
            Err(err) => {
                tracing::debug!(url = %request.url, error = %err, "network failed, consulting cache");
                if let Some(entry) = self.backend.lookup(&self.store_name, &key).await? {
                    return Ok(Verdict::Respond(entry.response));
                }
                if request.is_navigation() {
                    let shell = Request::get(self.shell_url.clone());
                    if let Some(entry) =
                        self.backend.lookup(&self.store_name, &request_key(&shell)).await?
                    {
                        return Ok(Verdict::Respond(entry.response));
                    }
                }
                Ok(Verdict::Respond(Response::offline()))
            }
        }
    }

    async fn transition(&self, to: WorkerState) -> Result<(), Error> {
        let mut state = self.state.write().await;
        lifecycle::transition(&mut state, to)
    }

    async fn make_redundant(&self) {
        let mut state = self.state.write().await;
        if let Err(err) = lifecycle::transition(&mut state, WorkerState::Redundant) {
            tracing::warn!(error = %err, "could not retire worker");
        }
    }
}
