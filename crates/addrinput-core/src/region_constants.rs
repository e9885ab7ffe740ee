/// Compiled-in country metadata.
///
/// `data/region_data.json` maps CLDR region codes to the country-level
/// metadata needed before any dynamic data is available: format strings,
/// required fields, postal code patterns and languages. The `ZZ` entry holds
/// the defaults used when a country does not define a value.
///
/// The table is parsed on first use and never mutated afterwards.
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::data_key::AddressDataKey;
use crate::jso::JsoMap;
use crate::node_data::NodeData;
use crate::util::DATA_SEPARATOR;

/// Region code of the default metadata.
pub const DEFAULT_REGION: &str = "ZZ";

/// Key of the root data node.
pub const ROOT_KEY: &str = "data";

const REGION_DATA_JSON: &str = include_str!("../data/region_data.json");

static REGION_DATA: LazyLock<BTreeMap<String, NodeData>> = LazyLock::new(load_region_data);

static EMPTY_NODE: LazyLock<NodeData> = LazyLock::new(NodeData::new);

fn load_region_data() -> BTreeMap<String, NodeData> {
    let jso = match JsoMap::parse(REGION_DATA_JSON) {
        Ok(jso) => jso,
        Err(e) => {
            tracing::warn!(error = %e, "compiled-in region data is unreadable");
            return BTreeMap::new();
        }
    };
    jso.object_entries()
        .map(|(code, entry)| {
            let mut node = NodeData::from_jso(entry);
            if code != DEFAULT_REGION {
                if !node.contains_key(AddressDataKey::Id) {
                    node.insert(AddressDataKey::Id, &format!("{ROOT_KEY}/{code}"));
                }
                if !node.contains_key(AddressDataKey::Key) {
                    node.insert(AddressDataKey::Key, code);
                }
            }
            (code.to_owned(), node)
        })
        .collect()
}

/// Returns every known region code in sorted order, excluding `ZZ`.
pub fn region_codes() -> Vec<&'static str> {
    REGION_DATA
        .keys()
        .map(String::as_str)
        .filter(|code| *code != DEFAULT_REGION)
        .collect()
}

/// Returns `true` if compiled-in metadata exists for `region_code`.
pub fn is_known_region(region_code: &str) -> bool {
    let code = region_code.to_ascii_uppercase();
    code != DEFAULT_REGION && REGION_DATA.contains_key(&code)
}

/// Returns the compiled-in node of `region_code` (case-insensitive).
pub fn country_data(region_code: &str) -> Option<&'static NodeData> {
    REGION_DATA.get(&region_code.to_ascii_uppercase())
}

/// Returns the `ZZ` defaults.
pub fn default_data() -> &'static NodeData {
    REGION_DATA.get(DEFAULT_REGION).unwrap_or(&EMPTY_NODE)
}

/// Returns the value of `key` for `region_code` without any fallback.
pub fn country_value(region_code: &str, key: AddressDataKey) -> Option<&'static str> {
    country_data(region_code).and_then(|node| node.get(key))
}

/// Returns the value of `key` for `region_code`, falling back to `ZZ`.
pub fn country_value_or_default(region_code: &str, key: AddressDataKey) -> Option<&'static str> {
    country_value(region_code, key).or_else(|| default_data().get(key))
}

/// Builds the root node: id `data` and the `~`-joined list of countries.
pub fn root_data() -> NodeData {
    let countries = region_codes().join(&DATA_SEPARATOR.to_string());
    NodeData::new()
        .with(AddressDataKey::Id, ROOT_KEY)
        .with(AddressDataKey::Countries, &countries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_present() {
        let zz = default_data();
        assert_eq!(zz.get(AddressDataKey::Fmt), Some("%N%n%O%n%A%n%C"));
        assert_eq!(zz.get(AddressDataKey::Require), Some("AC"));
    }

    #[test]
    fn countries_get_id_and_key() {
        let us = country_data("us");
        assert_eq!(us.and_then(|n| n.get(AddressDataKey::Id)), Some("data/US"));
        assert_eq!(us.and_then(|n| n.get(AddressDataKey::Key)), Some("US"));
        assert_eq!(
            country_value("US", AddressDataKey::Require),
            Some("ACSZ")
        );
    }

    #[test]
    fn fallback_to_defaults() {
        assert_eq!(country_value("AR", AddressDataKey::Require), None);
        assert_eq!(
            country_value_or_default("AR", AddressDataKey::Require),
            Some("AC")
        );
        assert_eq!(
            country_value_or_default("XX", AddressDataKey::Fmt),
            Some("%N%n%O%n%A%n%C")
        );
    }

    #[test]
    fn root_lists_countries_without_defaults() {
        let root = root_data();
        let countries = root.get_list(AddressDataKey::Countries);
        assert!(countries.iter().any(|c| c == "US"));
        assert!(countries.iter().any(|c| c == "JP"));
        assert!(!countries.iter().any(|c| c == DEFAULT_REGION));
        assert!(countries.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn known_regions() {
        assert!(is_known_region("de"));
        assert!(!is_known_region("ZZ"));
        assert!(!is_known_region("QQ"));
    }
}
