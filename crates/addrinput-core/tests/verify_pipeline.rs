//! End-to-end verification over region data fetched from disk.
//!
//! Nodes are written to a temporary directory in the layout
//! [`DirectoryFetcher`] reads, served through a [`CachingDataSource`], and
//! consumed by the form controller and the standard verifier.
#![allow(clippy::expect_used)]

use std::sync::Arc;

use addrinput_core::{
    AddressData, AddressField, AddressProblemType, CachingDataSource, DataSource,
    DirectoryFetcher, FormController, FormatInterpreter, LoadEvent, LookupKey,
    StandardAddressVerifier,
};

/// The US node with its states and one Californian city nested inside.
const US_PAYLOAD: &str = r#"{
  "id": "data/US", "key": "US", "name": "UNITED STATES", "lang": "en",
  "zip": "(\\d{5})(?:[ \\-](\\d{4}))?",
  "sub_keys": "CA~NY", "sub_names": "California~New York",
  "data/US/CA": {
    "id": "data/US/CA", "key": "CA", "name": "California", "zip": "9[0-5]|96[01]",
    "sub_keys": "Mountain View",
    "data/US/CA/Mountain View": {"id": "data/US/CA/Mountain View", "key": "Mountain View", "zip": "940"}
  },
  "data/US/NY": {"id": "data/US/NY", "key": "NY", "name": "New York", "zip": "1[0-4]"}
}"#;

fn source_in(dir: &tempfile::TempDir) -> Arc<dyn DataSource> {
    std::fs::write(dir.path().join("data_US.json"), US_PAYLOAD).expect("write payload");
    Arc::new(CachingDataSource::new(DirectoryFetcher::new(dir.path())))
}

fn address() -> AddressData {
    AddressData::builder()
        .set_country("US")
        .set_admin_area("California")
        .set_locality("Mountain View")
        .set_address("1600 Amphitheatre Pkwy")
        .set_postal_code("94043")
        .set_recipient("Jane Doe")
        .build()
}

#[test]
fn valid_address_verifies_cleanly() {
    let dir = tempfile::tempdir().expect("tempdir");
    let verifier = StandardAddressVerifier::new(source_in(&dir));
    let problems = verifier.verify(&address()).expect("verification completes");
    assert!(problems.is_empty(), "unexpected problems: {problems}");
}

#[test]
fn postal_code_is_checked_against_the_deepest_level() {
    let dir = tempfile::tempdir().expect("tempdir");
    let verifier = StandardAddressVerifier::new(source_in(&dir));
    let address = address().to_builder().set_postal_code("10001").build();
    assert_eq!(
        verifier
            .verify_field(&address, AddressField::PostalCode)
            .expect("verification completes"),
        Some(AddressProblemType::MismatchingValue)
    );
}

#[test]
fn country_without_data_falls_back_to_bundled_metadata() {
    let dir = tempfile::tempdir().expect("tempdir");
    let verifier = StandardAddressVerifier::new(source_in(&dir));
    let address = AddressData::builder()
        .set_country("DE")
        .set_address("Unter den Linden 1")
        .set_locality("Berlin")
        .set_postal_code("1011")
        .build();
    let problems = verifier.verify(&address).expect("verification completes");
    assert_eq!(
        problems.problem(AddressField::PostalCode),
        Some(AddressProblemType::InvalidFormat)
    );
    assert_eq!(problems.len(), 1);
}

#[test]
fn form_controller_loads_the_same_chain() {
    let dir = tempfile::tempdir().expect("tempdir");
    let controller = FormController::new(source_in(&dir));
    let mut loaded = Vec::new();
    let deepest = controller
        .request_data_for_address(&address(), |event| {
            if let LoadEvent::Loaded(key) = event {
                loaded.push(key.to_string());
            }
        })
        .expect("address has a country");
    assert_eq!(deepest.as_str(), "data/US/CA/Mountain View");
    assert_eq!(
        loaded,
        ["data", "data/US", "data/US/CA", "data/US/CA/Mountain View"]
    );

    let normalized = controller
        .normalize_lookup_key(&controller.data_key_for(&address()))
        .expect("data key");
    assert_eq!(
        normalized,
        LookupKey::parse("data/US/CA/Mountain View").expect("valid key")
    );
}

#[test]
fn envelope_uses_country_format() {
    let lines = FormatInterpreter::default().envelope_address(&address());
    assert_eq!(
        lines,
        [
            "Jane Doe",
            "1600 Amphitheatre Pkwy",
            "Mountain View, California 94043"
        ]
    );
}
