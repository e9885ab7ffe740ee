/// Lazily fetching data source with in-flight request coalescing.
///
/// Lookups consult the node cache first. On a miss the first caller for a
/// key registers an [`InFlight`] slot and starts a worker thread running the
/// [`Fetcher`]; later callers for the same key find the slot and wait on it
/// instead of fetching again. Every waiter is woken once the worker stores
/// its outcome. Waits are bounded by [`CachingConfig::timeout`]; a key whose
/// fetch fails or times out is remembered as crashed and answered from the
/// compiled-in data for the lifetime of the source.
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Condvar, Mutex, PoisonError, RwLock};
use std::thread;
use std::time::Duration;

use crate::lookup_key::LookupKey;
use crate::node_data::NodeData;

use super::{BootstrapDataSource, DataSource, Fetcher, collect_nodes};

/// Default bound on how long a lookup waits for its fetch.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

/// Configuration of a [`CachingDataSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachingConfig {
    /// Maximum time a lookup waits for an in-flight fetch.
    pub timeout: Duration,
}

impl Default for CachingConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

// ---------------------------------------------------------------------------
// In-flight registry
// ---------------------------------------------------------------------------

#[derive(Debug)]
enum FetchState {
    Pending,
    /// The fetch finished; `None` when it failed or the payload lacked the
    /// requested node.
    Done(Option<NodeData>),
}

/// One outstanding fetch, shared by every caller waiting on its key.
#[derive(Debug)]
struct InFlight {
    state: Mutex<FetchState>,
    ready: Condvar,
}

impl InFlight {
    fn new() -> Self {
        Self {
            state: Mutex::new(FetchState::Pending),
            ready: Condvar::new(),
        }
    }

    fn complete(&self, node: Option<NodeData>) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        *state = FetchState::Done(node);
        self.ready.notify_all();
    }

    /// Waits for the outcome. The outer `None` means the wait timed out.
    fn wait(&self, timeout: Duration) -> Option<Option<NodeData>> {
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let (state, _) = self
            .ready
            .wait_timeout_while(state, timeout, |s| matches!(s, FetchState::Pending))
            .unwrap_or_else(PoisonError::into_inner);
        match &*state {
            FetchState::Pending => None,
            FetchState::Done(node) => Some(node.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// CachingDataSource
// ---------------------------------------------------------------------------

/// State shared between the source and its fetch workers.
struct Shared<F> {
    fetcher: F,
    cache: RwLock<HashMap<String, NodeData>>,
    in_flight: Mutex<HashMap<String, Arc<InFlight>>>,
    crashed: Mutex<HashSet<String>>,
}

impl<F: Fetcher> Shared<F> {
    fn cached(&self, key: &str) -> Option<NodeData> {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn is_crashed(&self, key: &str) -> bool {
        self.crashed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }

    fn mark_crashed(&self, key: &str) {
        self.crashed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned());
    }

    /// Runs the fetch for `key` and publishes the outcome to `slot`.
    ///
    /// The cache is written before the slot leaves the registry, so a caller
    /// that misses the registry always finds the node in the cache.
    fn run_fetch(&self, key: &LookupKey, slot: &InFlight) {
        tracing::debug!(key = %key, "fetching");
        let node = match self.fetcher.fetch(key) {
            Ok(payload) => {
                let mut nodes = HashMap::new();
                collect_nodes(key.as_str(), &payload, &mut nodes);
                let node = nodes.get(key.as_str()).cloned();
                tracing::debug!(key = %key, nodes = nodes.len(), "fetched");
                self.cache
                    .write()
                    .unwrap_or_else(PoisonError::into_inner)
                    .extend(nodes);
                node
            }
            Err(e) => {
                if e.is_not_found() {
                    tracing::debug!(key = %key, "no data to fetch");
                } else {
                    tracing::warn!(key = %key, error = %e, "fetch failed");
                }
                self.mark_crashed(key.as_str());
                None
            }
        };
        let mut registry = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        registry.remove(key.as_str());
        drop(registry);
        slot.complete(node);
    }
}

/// A [`DataSource`] that fetches nodes on demand and caches them.
pub struct CachingDataSource<F> {
    shared: Arc<Shared<F>>,
    config: CachingConfig,
    bootstrap: BootstrapDataSource,
}

impl<F: Fetcher + 'static> CachingDataSource<F> {
    /// Creates a source with the default five second timeout.
    pub fn new(fetcher: F) -> Self {
        Self::with_config(fetcher, CachingConfig::default())
    }

    pub fn with_config(fetcher: F, config: CachingConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                fetcher,
                cache: RwLock::new(HashMap::new()),
                in_flight: Mutex::new(HashMap::new()),
                crashed: Mutex::new(HashSet::new()),
            }),
            config,
            bootstrap: BootstrapDataSource::new(),
        }
    }

    pub fn config(&self) -> CachingConfig {
        self.config
    }

    /// Returns `true` if a node is cached under `key`.
    pub fn is_cached(&self, key: &str) -> bool {
        self.shared.cached(key).is_some()
    }

    /// Returns `true` if fetching `key` failed or timed out.
    pub fn is_crashed(&self, key: &str) -> bool {
        self.shared.is_crashed(key)
    }

    fn fallback(&self, key: &str) -> Option<NodeData> {
        self.bootstrap.get(key)
    }

    /// Returns the slot for `key`, registering one and starting its worker
    /// if no fetch is outstanding. `Err` carries a node that appeared in the
    /// cache while the registry lock was being acquired.
    fn slot_for(&self, key: LookupKey) -> Result<Arc<InFlight>, NodeData> {
        let mut registry = self
            .shared
            .in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(slot) = registry.get(key.as_str()) {
            tracing::trace!(key = %key, "joining in-flight fetch");
            return Ok(Arc::clone(slot));
        }
        if let Some(node) = self.shared.cached(key.as_str()) {
            return Err(node);
        }
        let slot = Arc::new(InFlight::new());
        registry.insert(key.as_str().to_owned(), Arc::clone(&slot));
        drop(registry);

        let shared = Arc::clone(&self.shared);
        let worker_slot = Arc::clone(&slot);
        thread::spawn(move || shared.run_fetch(&key, &worker_slot));
        Ok(slot)
    }
}

impl<F: Fetcher + 'static> DataSource for CachingDataSource<F> {
    fn default_data(&self, key: &str) -> NodeData {
        self.bootstrap.default_data(key)
    }

    fn get(&self, key: &str) -> Option<NodeData> {
        if let Some(node) = self.shared.cached(key) {
            return Some(node);
        }
        if self.shared.is_crashed(key) {
            return self.fallback(key);
        }
        let lookup_key = match LookupKey::parse(key) {
            Ok(k) => k,
            Err(e) => {
                tracing::debug!(key, error = %e, "not a lookup key");
                return None;
            }
        };
        let slot = match self.slot_for(lookup_key) {
            Ok(slot) => slot,
            Err(node) => return Some(node),
        };
        match slot.wait(self.config.timeout) {
            Some(Some(node)) => Some(node),
            Some(None) => self.fallback(key),
            None => {
                tracing::warn!(key, timeout = ?self.config.timeout, "fetch timed out");
                self.shared.mark_crashed(key);
                self.fallback(key)
            }
        }
    }
}

impl<F> std::fmt::Debug for CachingDataSource<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachingDataSource")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
