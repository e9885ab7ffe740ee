/// Loading the region data an address form needs.
///
/// [`FormController`] fetches the chain of nodes from the root down to the
/// deepest level an address names, and lists the sub-regions of a node for
/// drop-downs. Name-to-key substitution happens on copies of lookup keys;
/// stored data is never touched.
use std::sync::Arc;

use thiserror::Error;

use crate::address::AddressData;
use crate::data_key::AddressDataKey;
use crate::data_source::DataSource;
use crate::field::HIERARCHY;
use crate::lookup_key::{KeyType, LookupKey, LookupKeyBuilder, ScriptType};
use crate::region_constants::ROOT_KEY;
use crate::util::{language_subtag, split_data};

/// Error raised by [`FormController`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    /// The address has no postal country.
    #[error("address has no country")]
    MissingCountry,

    /// An examples key was passed where a data key is needed.
    #[error("{0} is not a data key")]
    NotDataKey(String),
}

/// Progress of [`FormController::request_data_for_address`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadEvent {
    Begin,
    /// Data for this key has been requested and answered.
    Loaded(LookupKey),
    End,
}

/// A selectable sub-region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionData {
    pub key: String,
    pub name: Option<String>,
}

impl RegionData {
    /// Returns `true` if `input` is this region's key or name, ignoring case.
    pub fn is_valid_name(&self, input: &str) -> bool {
        let input = input.trim().to_lowercase();
        self.key.to_lowercase() == input
            || self
                .name
                .as_deref()
                .is_some_and(|name| name.to_lowercase() == input)
    }

    /// The name, or the key when the region has none.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.key)
    }
}

/// Drives region data loading for a form.
#[derive(Clone)]
pub struct FormController {
    data_source: Arc<dyn DataSource>,
    language_code: Option<String>,
    current_country: Option<String>,
}

impl FormController {
    pub fn new(data_source: Arc<dyn DataSource>) -> Self {
        Self {
            data_source,
            language_code: None,
            current_country: None,
        }
    }

    /// Sets the language the form is displayed in. Explicit Latin-script
    /// tags select Latin sub-region names.
    pub fn set_language_code(&mut self, language_code: Option<&str>) {
        self.language_code = language_code.map(str::to_owned);
    }

    pub fn language_code(&self) -> Option<&str> {
        self.language_code.as_deref()
    }

    pub fn set_current_country(&mut self, region_code: Option<&str>) {
        self.current_country = region_code.map(str::to_ascii_uppercase);
    }

    pub fn current_country(&self) -> Option<&str> {
        self.current_country.as_deref()
    }

    /// The data key addressing the deepest hierarchy level `address` names.
    pub fn data_key_for(&self, address: &AddressData) -> LookupKey {
        LookupKeyBuilder::new(KeyType::Data)
            .set_address(address)
            .build()
    }

    /// Fetches every node from the root down to the level `address` names.
    ///
    /// At each level the next user value is matched against the
    /// sub-regions. Once a value matches nothing, or the values run out, the
    /// first sub-region is followed instead until a node without
    /// sub-regions is reached.
    ///
    /// Returns the deepest key fetched.
    ///
    /// # Errors
    ///
    /// [`FormError::MissingCountry`] if `address` has no country; no event is
    /// emitted in that case.
    pub fn request_data_for_address<L>(
        &self,
        address: &AddressData,
        mut listener: L,
    ) -> Result<LookupKey, FormError>
    where
        L: FnMut(LoadEvent),
    {
        let mut pending: Vec<&str> = HIERARCHY
            .iter()
            .map_while(|field| address.field_value(*field))
            .collect();
        if pending.is_empty() {
            return Err(FormError::MissingCountry);
        }
        pending.reverse();

        listener(LoadEvent::Begin);
        let mut key = LookupKey::root();
        loop {
            let found = self.data_source.get(key.as_str()).is_some();
            tracing::debug!(key = %key, found, "loaded region data");
            listener(LoadEvent::Loaded(key.clone()));

            let regions = self.region_data(&key)?;
            let Some(first) = regions.first() else {
                break;
            };
            let next = pending
                .pop()
                .and_then(|value| regions.iter().find(|r| r.is_valid_name(value)));
            let region = match next {
                Some(region) => region,
                None => {
                    pending.clear();
                    first
                }
            };
            let Some(child) = key.child(&region.key) else {
                break;
            };
            key = if child.is_country_key() {
                self.with_form_language(&child)
            } else {
                child
            };
        }
        listener(LoadEvent::End);
        Ok(key)
    }

    /// Lists the sub-regions below `key`.
    ///
    /// The root lists country codes. Below it, names come from the node's
    /// Latin or local name list depending on the form language.
    ///
    /// # Errors
    ///
    /// [`FormError::NotDataKey`] for examples keys.
    pub fn region_data(&self, key: &LookupKey) -> Result<Vec<RegionData>, FormError> {
        if key.key_type() != KeyType::Data {
            return Err(FormError::NotDataKey(key.to_string()));
        }
        if key.depth() == 0 {
            let countries = self
                .data_source
                .default_data(ROOT_KEY)
                .get_list(AddressDataKey::Countries);
            return Ok(countries
                .into_iter()
                .map(|code| RegionData {
                    name: Some(code.clone()),
                    key: code,
                })
                .collect());
        }

        let Some(node) = self.data_source.get(key.as_str()) else {
            return Ok(Vec::new());
        };
        let keys = node.get_list(AddressDataKey::SubKeys);
        let names_key = match self.script() {
            ScriptType::Latin => AddressDataKey::SubLnames,
            ScriptType::Local => AddressDataKey::SubNames,
        };
        let names = split_data(node.get(names_key));
        Ok(keys
            .into_iter()
            .enumerate()
            .map(|(i, key)| RegionData {
                name: names.get(i).filter(|n| !n.is_empty()).cloned(),
                key,
            })
            .collect())
    }

    /// Rewrites names in `key` to sub-region keys, level by level.
    ///
    /// Values that match nothing are kept as they are. The language suffix
    /// of `key` is preserved.
    ///
    /// # Errors
    ///
    /// [`FormError::NotDataKey`] for examples keys.
    pub fn normalize_lookup_key(&self, key: &LookupKey) -> Result<LookupKey, FormError> {
        if key.key_type() != KeyType::Data {
            return Err(FormError::NotDataKey(key.to_string()));
        }
        let mut normalized = LookupKey::root();
        for field in HIERARCHY.iter().take(key.depth()) {
            let Some(value) = key.value(*field) else {
                break;
            };
            let regions = self.region_data(&normalized)?;
            let resolved = regions
                .iter()
                .find(|r| r.is_valid_name(value))
                .map_or(value, |r| r.key.as_str());
            let Some(child) = normalized.child(resolved) else {
                break;
            };
            normalized = if child.is_country_key() {
                LookupKeyBuilder::from_key(&child)
                    .set_language(key.language())
                    .build()
            } else {
                child
            };
        }
        Ok(normalized)
    }

    /// Reports whether `language_code` is the current country's default
    /// language.
    ///
    /// The comparison checks the language subtag against itself and is
    /// therefore always `true` for a present code; see DESIGN.md.
    pub fn is_default_language(&self, language_code: Option<&str>) -> bool {
        let Some(language_code) = language_code else {
            return true;
        };
        let subtag = language_subtag(language_code);
        subtag == language_subtag(&subtag)
    }

    fn script(&self) -> ScriptType {
        self.language_code
            .as_deref()
            .map_or(ScriptType::Local, ScriptType::for_language)
    }

    /// Adds the form language to a country key unless it is the default.
    ///
    /// Dormant while [`is_default_language`][Self::is_default_language]
    /// accepts every code.
    fn with_form_language(&self, key: &LookupKey) -> LookupKey {
        match self.language_code.as_deref() {
            Some(language) if !self.is_default_language(Some(language)) => {
                LookupKeyBuilder::from_key(key)
                    .set_language(Some(language))
                    .build()
            }
            Some(_) | None => key.clone(),
        }
    }
}

impl std::fmt::Debug for FormController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormController")
            .field("language_code", &self.language_code)
            .field("current_country", &self.current_country)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::test_helpers::{fixture_arc, us_address};

    fn controller() -> FormController {
        FormController::new(fixture_arc())
    }

    fn key(s: &str) -> LookupKey {
        LookupKey::parse(s).expect("valid key")
    }

    fn loaded(address: &AddressData) -> (LookupKey, Vec<LoadEvent>) {
        let mut events = Vec::new();
        let deepest = controller()
            .request_data_for_address(address, |event| events.push(event))
            .expect("address has a country");
        (deepest, events)
    }

    #[test]
    fn fetches_chain_top_down() {
        let (deepest, events) = loaded(&us_address());
        assert_eq!(deepest, key("data/US/CA/Mountain View"));
        assert_eq!(
            events,
            vec![
                LoadEvent::Begin,
                LoadEvent::Loaded(key("data")),
                LoadEvent::Loaded(key("data/US")),
                LoadEvent::Loaded(key("data/US/CA")),
                LoadEvent::Loaded(key("data/US/CA/Mountain View")),
                LoadEvent::End,
            ]
        );
    }

    #[test]
    fn names_match_case_insensitively() {
        let address = AddressData::builder()
            .set_country("us")
            .set_admin_area("california")
            .set_locality("san francisco")
            .build();
        let (deepest, _) = loaded(&address);
        assert_eq!(deepest, key("data/US/CA/San Francisco"));
    }

    #[test]
    fn unmatched_value_follows_first_region() {
        let address = AddressData::builder()
            .set_country("US")
            .set_admin_area("Atlantis")
            .set_locality("Mountain View")
            .build();
        let (deepest, _) = loaded(&address);
        assert_eq!(deepest, key("data/US/AL"));
    }

    #[test]
    fn chain_continues_past_the_last_value() {
        let address = AddressData::builder()
            .set_country("US")
            .set_admin_area("CA")
            .build();
        let (deepest, events) = loaded(&address);
        assert_eq!(deepest, key("data/US/CA/Los Angeles"));
        assert_eq!(events.last(), Some(&LoadEvent::End));
    }

    #[test]
    fn missing_country_is_an_error() {
        let mut events = Vec::new();
        let address = AddressData::builder().set_locality("Springfield").build();
        let err = controller()
            .request_data_for_address(&address, |event| events.push(event))
            .expect_err("no country");
        assert_eq!(err, FormError::MissingCountry);
        assert!(events.is_empty());
    }

    #[test]
    fn root_lists_country_codes() {
        let regions = controller()
            .region_data(&LookupKey::root())
            .expect("data key");
        let us = regions.iter().find(|r| r.key == "US").expect("US listed");
        assert_eq!(us.display_name(), "US");
        assert!(!regions.iter().any(|r| r.key == "ZZ"));
    }

    #[test]
    fn sub_regions_carry_names() {
        let regions = controller()
            .region_data(&key("data/US"))
            .expect("data key");
        assert_eq!(regions.len(), 4);
        assert_eq!(
            regions[1],
            RegionData {
                key: "CA".to_owned(),
                name: Some("California".to_owned()),
            }
        );
        assert!(regions[1].is_valid_name("CALIFORNIA"));
        assert!(regions[1].is_valid_name("ca"));
        assert!(!regions[1].is_valid_name("Oregon"));
    }

    #[test]
    fn latin_form_language_selects_latin_names() {
        let mut controller = controller();
        let jp = key("data/JP");
        let local = controller.region_data(&jp).expect("data key");
        assert_eq!(local[0].display_name(), "東京都");
        assert_eq!(local[0].name, None);

        controller.set_language_code(Some("ja-Latn"));
        let latin = controller.region_data(&jp).expect("data key");
        assert_eq!(latin[0].display_name(), "Tokyo");
        assert_eq!(latin[0].key, "東京都");
    }

    #[test]
    fn unknown_node_has_no_regions() {
        let regions = controller()
            .region_data(&key("data/US/CA/Nowhere"))
            .expect("data key");
        assert!(regions.is_empty());
    }

    #[test]
    fn examples_keys_are_rejected() {
        let examples = key("examples/US/local/_default");
        assert!(matches!(
            controller().region_data(&examples),
            Err(FormError::NotDataKey(_))
        ));
        assert!(matches!(
            controller().normalize_lookup_key(&examples),
            Err(FormError::NotDataKey(_))
        ));
    }

    #[test]
    fn normalize_replaces_names_with_keys() {
        let controller = controller();
        assert_eq!(
            controller
                .normalize_lookup_key(&key("data/us/California/mountain view"))
                .expect("data key"),
            key("data/US/CA/Mountain View")
        );
        // Unknown values pass through.
        assert_eq!(
            controller
                .normalize_lookup_key(&key("data/US/Atlantis"))
                .expect("data key"),
            key("data/US/Atlantis")
        );
    }

    #[test]
    fn normalize_keeps_language() {
        let normalized = controller()
            .normalize_lookup_key(&key("data/CA/Québec--fr"))
            .expect("data key");
        assert_eq!(normalized.as_str(), "data/CA/QC--fr");
    }

    #[test]
    fn data_key_follows_address() {
        assert_eq!(
            controller().data_key_for(&us_address()),
            key("data/US/CA/Mountain View")
        );
    }

    #[test]
    fn default_language_check_is_always_true() {
        let mut controller = controller();
        controller.set_current_country(Some("ca"));
        assert_eq!(controller.current_country(), Some("CA"));
        assert!(controller.is_default_language(None));
        assert!(controller.is_default_language(Some("en")));
        assert!(controller.is_default_language(Some("fr")));
    }

    #[test]
    fn form_language_never_suffixes_country_keys() {
        let mut controller = controller();
        controller.set_language_code(Some("fr"));
        let deepest = controller
            .request_data_for_address(&us_address(), |_| {})
            .expect("address has a country");
        assert_eq!(deepest, key("data/US/CA/Mountain View"));
        assert_eq!(deepest.language(), None);
    }
}
