//! Shared test fixtures.
//!
//! This module is compiled only in test builds and provides a small region
//! tree (United States down to a few Californian localities, Canada with a
//! French variant, Japan with Latin names) plus address constructors used
//! across unit test modules.
//!
//! Integration tests in `crates/addrinput-core/tests/` define their own
//! local fixtures because they link against the non-test library build where
//! this module is not available.
#![allow(clippy::expect_used)]

use std::sync::Arc;

use crate::address::AddressData;
use crate::data_source::{DataSource, MapDataSource};

/// The fixture tree as a bundle.
pub const FIXTURE_BUNDLE: &str = r#"{
  "data/US": {
    "id": "data/US", "key": "US", "name": "UNITED STATES", "lang": "en", "languages": "en",
    "fmt": "%N%n%O%n%A%n%C, %S %Z", "require": "ACSZ", "upper": "CS",
    "zip": "(\\d{5})(?:[ \\-](\\d{4}))?", "zipex": "95014,22162-1010",
    "sub_keys": "AL~CA~NY~TX",
    "sub_names": "Alabama~California~New York~Texas",
    "sub_zips": "3[56]~9[0-5]|96[01]~1[0-4]|06390|00501|00544~7[5-9]|885|73301|73344"
  },
  "data/US/AL": {"id": "data/US/AL", "key": "AL", "name": "Alabama", "zip": "3[56]"},
  "data/US/CA": {
    "id": "data/US/CA", "key": "CA", "name": "California", "zip": "9[0-5]|96[01]",
    "sub_keys": "Los Angeles~Mountain View~San Francisco"
  },
  "data/US/CA/Mountain View": {"id": "data/US/CA/Mountain View", "key": "Mountain View", "zip": "940"},
  "data/US/CA/San Francisco": {"id": "data/US/CA/San Francisco", "key": "San Francisco", "zip": "941"},
  "data/US/NY": {"id": "data/US/NY", "key": "NY", "name": "New York", "zip": "1[0-4]|06390|00501|00544"},
  "data/US/TX": {"id": "data/US/TX", "key": "TX", "name": "Texas", "zip": "7[5-9]|885|73301|73344"},
  "data/CA": {
    "id": "data/CA", "key": "CA", "name": "CANADA", "lang": "en", "languages": "en~fr",
    "sub_keys": "AB~BC~QC",
    "sub_names": "Alberta~British Columbia~Quebec",
    "sub_zips": "T~V~G|H|J"
  },
  "data/CA--fr": {
    "id": "data/CA--fr", "key": "CA", "name": "CANADA", "lang": "fr",
    "sub_keys": "AB~BC~QC",
    "sub_names": "Alberta~Colombie-Britannique~Québec",
    "sub_zips": "T~V~G|H|J"
  },
  "data/CA/QC": {"id": "data/CA/QC", "key": "QC", "name": "Quebec", "zip": "G|H|J"},
  "data/CA/QC--fr": {"id": "data/CA/QC--fr", "key": "QC", "name": "Québec", "zip": "G|H|J"},
  "data/JP": {
    "id": "data/JP", "key": "JP", "name": "JAPAN", "lang": "ja", "languages": "ja",
    "sub_keys": "東京都~大阪府",
    "sub_lnames": "Tokyo~Osaka",
    "sub_zips": "1[0-2]|19|20~5[3-9]|6[01]"
  },
  "data/JP/東京都": {"id": "data/JP/東京都", "key": "東京都", "name": "東京都", "zip": "1[0-2]|19|20"},
  "data/JP/大阪府": {"id": "data/JP/大阪府", "key": "大阪府", "name": "大阪府", "zip": "5[3-9]|6[01]"}
}"#;

/// Returns the fixture tree as a [`MapDataSource`].
pub fn fixture_source() -> MapDataSource {
    MapDataSource::parse_bundle(FIXTURE_BUNDLE).expect("valid fixture bundle")
}

/// Returns the fixture tree as a shared trait object.
pub fn fixture_arc() -> Arc<dyn DataSource> {
    Arc::new(fixture_source())
}

/// A valid Mountain View address.
pub fn us_address() -> AddressData {
    AddressData::builder()
        .set_country("US")
        .set_admin_area("CA")
        .set_locality("Mountain View")
        .add_address_line("1098 Alta Ave")
        .set_postal_code("94043")
        .build()
}

