/// In-memory data source over a preloaded set of nodes.
use std::collections::HashMap;

use crate::jso::{JsoError, JsoMap};
use crate::node_data::NodeData;

use super::{BootstrapDataSource, DataSource, collect_nodes};

/// Nodes held in memory, falling back to compiled-in country data.
///
/// A bundle is a JSON object mapping keys to node objects:
///
/// ```json
/// {"data/US": {"id": "data/US", "sub_keys": "CA~NY"},
///  "data/US/CA": {"id": "data/US/CA", "key": "CA", "name": "California"}}
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapDataSource {
    nodes: HashMap<String, NodeData>,
    bootstrap: BootstrapDataSource,
}

impl MapDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a source from a parsed bundle.
    pub fn from_bundle(bundle: &JsoMap) -> Self {
        let mut nodes = HashMap::new();
        collect_nodes("", bundle, &mut nodes);
        nodes.remove("");
        tracing::debug!(nodes = nodes.len(), "loaded data bundle");
        Self {
            nodes,
            bootstrap: BootstrapDataSource::new(),
        }
    }

    /// Parses bundle JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`JsoError`] when the text is not a JSON object.
    pub fn parse_bundle(text: &str) -> Result<Self, JsoError> {
        JsoMap::parse(text).map(|bundle| Self::from_bundle(&bundle))
    }

    /// Stores `node` under `key`, replacing any previous node.
    pub fn insert(&mut self, key: &str, node: NodeData) {
        self.nodes.insert(key.to_owned(), node);
    }

    /// Builder-style [`insert`][Self::insert].
    pub fn with(mut self, key: &str, node: NodeData) -> Self {
        self.insert(key, node);
        self
    }

    /// Number of preloaded nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl DataSource for MapDataSource {
    fn default_data(&self, key: &str) -> NodeData {
        self.bootstrap.default_data(key)
    }

    fn get(&self, key: &str) -> Option<NodeData> {
        self.nodes
            .get(key)
            .cloned()
            .or_else(|| self.bootstrap.get(key))
    }
}
