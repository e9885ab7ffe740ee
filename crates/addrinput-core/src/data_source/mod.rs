/// Resolution of lookup keys to region node data.
///
/// [`DataSource`] is the seam between the address engine and wherever region
/// metadata lives. It is injected into the verifier and the form controller
/// as `Arc<dyn DataSource>`, keeping the core free of network and file I/O.
///
/// Three implementations are provided:
///
/// - [`BootstrapDataSource`]: compiled-in country metadata only.
/// - [`MapDataSource`]: nodes preloaded in memory, typically from a bundle.
/// - [`CachingDataSource`]: lazily fetches nodes through a [`Fetcher`],
///   caching results and coalescing concurrent requests for the same key.
pub mod bootstrap;
pub mod caching;
pub mod fetcher;
pub mod map;

use std::collections::HashMap;

use crate::jso::JsoMap;
use crate::lookup_key::LookupKey;
use crate::node_data::NodeData;

pub use bootstrap::BootstrapDataSource;
pub use caching::{CachingConfig, CachingDataSource, DEFAULT_TIMEOUT};
pub use fetcher::{DirectoryFetcher, FetchError, Fetcher};
pub use map::MapDataSource;


/// Supplies node data for lookup keys.
///
/// The trait is object-safe; consumers hold it as `Arc<dyn DataSource>` and
/// may call it from several threads at once.
pub trait DataSource: Send + Sync {
    /// Returns bundled metadata for the country of `key`.
    ///
    /// Never blocks on I/O. The root key `data` yields the list of known
    /// countries; deeper keys are normalised to their country key with the
    /// language suffix dropped. Unknown regions yield an empty node.
    fn default_data(&self, key: &str) -> NodeData;

    /// Returns the node stored under `key`.
    ///
    /// May block until a fetch completes or times out. Returns `None` when
    /// no data exists for the key; a missing key is never an error.
    fn get(&self, key: &str) -> Option<NodeData>;
}

/// Returns `true` if `s` parses as a lookup key.
pub(crate) fn is_lookup_key(s: &str) -> bool {
    LookupKey::parse(s).is_ok()
}

/// Flattens a node payload into `out`.
///
/// The string entries of `jso` become the node stored under `key` (skipped
/// when there are none); nested objects whose names are lookup keys are
/// collected recursively under their own names, so bundles and
/// parent-with-children payloads are both cached per node.
pub(crate) fn collect_nodes(key: &str, jso: &JsoMap, out: &mut HashMap<String, NodeData>) {
    let node = NodeData::from_jso(jso);
    if !node.is_empty() {
        out.insert(key.to_owned(), node);
    }
    for (child_key, child) in jso.object_entries() {
        if is_lookup_key(child_key) {
            collect_nodes(child_key, child, out);
        } else {
            tracing::trace!(child_key, "skipping nested object that is not a lookup key");
        }
    }
}
