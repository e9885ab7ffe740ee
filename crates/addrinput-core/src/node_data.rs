/// Typed view of the metadata carried by one node of the region tree.
use std::collections::BTreeMap;

use crate::data_key::AddressDataKey;
use crate::jso::JsoMap;
use crate::util::split_data;

/// Raw metadata of exactly one region node, keyed by [`AddressDataKey`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeData {
    map: BTreeMap<AddressDataKey, String>,
}

impl NodeData {
    /// Creates an empty node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a node from the string entries of a [`JsoMap`].
    ///
    /// Entry names are matched case-insensitively; unrecognised names and
    /// nested objects are ignored.
    pub fn from_jso(jso: &JsoMap) -> Self {
        let mut map = BTreeMap::new();
        for (name, value) in jso.string_entries() {
            match AddressDataKey::from_name(name) {
                Some(key) => {
                    map.insert(key, value.to_owned());
                }
                None => tracing::trace!(name, "ignoring unknown metadata key"),
            }
        }
        Self { map }
    }

    /// Returns the raw value stored for `key`.
    pub fn get(&self, key: AddressDataKey) -> Option<&str> {
        self.map.get(&key).map(String::as_str)
    }

    /// Returns the `~`-separated list stored for `key`; absent or empty
    /// values yield an empty list.
    pub fn get_list(&self, key: AddressDataKey) -> Vec<String> {
        split_data(self.get(key))
    }

    pub fn contains_key(&self, key: AddressDataKey) -> bool {
        self.map.contains_key(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Stores `value` under `key`, returning the node for chaining.
    pub fn with(mut self, key: AddressDataKey, value: &str) -> Self {
        self.insert(key, value);
        self
    }

    /// Stores `value` under `key`, replacing any previous value.
    pub fn insert(&mut self, key: AddressDataKey, value: &str) {
        self.map.insert(key, value.to_owned());
    }

    /// Iterates over the entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (AddressDataKey, &str)> {
        self.map.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Converts the node back to its JSON-like form.
    pub fn to_jso(&self) -> JsoMap {
        let mut jso = JsoMap::new();
        for (key, value) in self.iter() {
            jso.put_string(key.as_str(), value);
        }
        jso
    }
}

impl FromIterator<(AddressDataKey, String)> for NodeData {
    fn from_iter<I: IntoIterator<Item = (AddressDataKey, String)>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}
