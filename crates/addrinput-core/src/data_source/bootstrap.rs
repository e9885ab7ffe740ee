/// Data source backed only by the compiled-in region constants.
use crate::data_key::AddressDataKey;
use crate::field::AddressField;
use crate::lookup_key::{KeyType, LookupKey};
use crate::node_data::NodeData;
use crate::region_constants::{self, ROOT_KEY};

use super::DataSource;

/// Answers root and country keys from compiled-in metadata.
#[derive(Debug, Clone, Copy, Default)]
pub struct BootstrapDataSource;

impl BootstrapDataSource {
    pub fn new() -> Self {
        Self
    }

    /// Region code of the country `key` belongs to, if `key` is a data key
    /// below the root.
    fn country_of(key: &str) -> Option<String> {
        let parsed = LookupKey::parse(key).ok()?;
        match parsed.key_type() {
            KeyType::Data => parsed.value(AddressField::Country).map(str::to_owned),
            KeyType::Examples => None,
        }
    }

    fn country_node(region_code: &str) -> NodeData {
        region_constants::country_data(region_code)
            .cloned()
            .unwrap_or_default()
    }
}

impl DataSource for BootstrapDataSource {
    fn default_data(&self, key: &str) -> NodeData {
        if key == ROOT_KEY {
            return region_constants::root_data();
        }
        match Self::country_of(key) {
            Some(country) => Self::country_node(&country),
            None => NodeData::new(),
        }
    }

    fn get(&self, key: &str) -> Option<NodeData> {
        if key == ROOT_KEY {
            return Some(region_constants::root_data());
        }
        let parsed = LookupKey::parse(key).ok()?;
        if !parsed.is_country_key() || parsed.language().is_some() {
            return None;
        }
        let node = region_constants::country_data(parsed.value(AddressField::Country)?)?;
        // Only exact country ids answer; `data/us` is not `data/US`.
        (node.get(AddressDataKey::Id) == Some(key)).then(|| node.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_lists_countries() {
        let source = BootstrapDataSource::new();
        let root = source.get("data").unwrap_or_default();
        assert!(
            root.get_list(AddressDataKey::Countries)
                .contains(&"US".to_owned())
        );
        assert_eq!(source.default_data("data"), root);
    }

    #[test]
    fn deeper_keys_normalize_to_country() {
        let source = BootstrapDataSource::new();
        let node = source.default_data("data/US/CA/Mountain View");
        assert_eq!(node.get(AddressDataKey::Id), Some("data/US"));
        let node = source.default_data("data/CA--fr");
        assert_eq!(node.get(AddressDataKey::Id), Some("data/CA"));
    }

    #[test]
    fn unknown_or_malformed_keys_are_empty() {
        let source = BootstrapDataSource::new();
        assert!(source.default_data("data/QQ").is_empty());
        assert!(source.default_data("nonsense").is_empty());
        assert!(source.default_data("examples/US/local/_default").is_empty());
    }

    #[test]
    fn get_answers_only_root_and_countries() {
        let source = BootstrapDataSource::new();
        assert!(source.get("data/DE").is_some());
        assert!(source.get("data/DE/Berlin").is_none());
        assert!(source.get("data/CA--fr").is_none());
        assert!(source.get("data/QQ").is_none());
    }
}
