/// The immutable postal address value and its builder.
///
/// Every string stored in an [`AddressData`] is trimmed; blank values are
/// stored as `None`. Street address lines with embedded newlines are split
/// into separate lines and blank lines are dropped, so consumers can rely on
/// [`AddressData::address_lines`] holding one non-empty line per entry.
use serde::{Deserialize, Serialize};

use crate::field::AddressField;
use crate::util::trim_to_owned;

// ---------------------------------------------------------------------------
// AddressData
// ---------------------------------------------------------------------------

/// A normalised postal address.
///
/// Build instances through [`AddressDataBuilder`]; deserialisation goes
/// through the builder as well, so normalisation always applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "AddressDataBuilder", into = "AddressDataBuilder")]
pub struct AddressData {
    postal_country: Option<String>,
    address_lines: Vec<String>,
    administrative_area: Option<String>,
    locality: Option<String>,
    dependent_locality: Option<String>,
    postal_code: Option<String>,
    sorting_code: Option<String>,
    organization: Option<String>,
    recipient: Option<String>,
    language_code: Option<String>,
}

impl AddressData {
    /// Returns a fresh builder.
    pub fn builder() -> AddressDataBuilder {
        AddressDataBuilder::default()
    }

    /// Returns a builder seeded with this address's values.
    pub fn to_builder(&self) -> AddressDataBuilder {
        AddressDataBuilder::from(self.clone())
    }

    /// CLDR region code of the postal country, e.g. `"US"`.
    pub fn postal_country(&self) -> Option<&str> {
        self.postal_country.as_deref()
    }

    /// Street address lines, each trimmed and non-empty.
    pub fn address_lines(&self) -> &[String] {
        &self.address_lines
    }

    /// First street address line.
    pub fn address_line1(&self) -> Option<&str> {
        self.address_lines.first().map(String::as_str)
    }

    /// Second street address line.
    pub fn address_line2(&self) -> Option<&str> {
        self.address_lines.get(1).map(String::as_str)
    }

    /// State, province, prefecture or similar.
    pub fn administrative_area(&self) -> Option<&str> {
        self.administrative_area.as_deref()
    }

    /// City or town.
    pub fn locality(&self) -> Option<&str> {
        self.locality.as_deref()
    }

    /// District or suburb.
    pub fn dependent_locality(&self) -> Option<&str> {
        self.dependent_locality.as_deref()
    }

    pub fn postal_code(&self) -> Option<&str> {
        self.postal_code.as_deref()
    }

    pub fn sorting_code(&self) -> Option<&str> {
        self.sorting_code.as_deref()
    }

    pub fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }

    pub fn recipient(&self) -> Option<&str> {
        self.recipient.as_deref()
    }

    /// BCP-47 language code the address is written in, e.g. `"ja-Latn"`.
    pub fn language_code(&self) -> Option<&str> {
        self.language_code.as_deref()
    }

    /// Returns the value of a single-valued field.
    ///
    /// [`AddressField::StreetAddress`] is multi-valued and always yields
    /// `None`; use [`address_lines`][Self::address_lines] instead.
    pub fn field_value(&self, field: AddressField) -> Option<&str> {
        match field {
            AddressField::Country => self.postal_country(),
            AddressField::AdminArea => self.administrative_area(),
            AddressField::Locality => self.locality(),
            AddressField::DependentLocality => self.dependent_locality(),
            AddressField::PostalCode => self.postal_code(),
            AddressField::SortingCode => self.sorting_code(),
            AddressField::Organization => self.organization(),
            AddressField::Recipient => self.recipient(),
            AddressField::AddressLine1 => self.address_line1(),
            AddressField::AddressLine2 => self.address_line2(),
            AddressField::StreetAddress => None,
        }
    }

    /// Returns `true` if `field` holds no value. For
    /// [`AddressField::StreetAddress`] this means there are no lines.
    pub fn is_field_empty(&self, field: AddressField) -> bool {
        match field {
            AddressField::StreetAddress => self.address_lines.is_empty(),
            AddressField::Country
            | AddressField::AdminArea
            | AddressField::Locality
            | AddressField::DependentLocality
            | AddressField::PostalCode
            | AddressField::SortingCode
            | AddressField::Organization
            | AddressField::Recipient
            | AddressField::AddressLine1
            | AddressField::AddressLine2 => self.field_value(field).is_none(),
        }
    }
}

// ---------------------------------------------------------------------------
// AddressDataBuilder
// ---------------------------------------------------------------------------

/// Mutable builder for [`AddressData`].
///
/// `build` borrows the builder, so several addresses can be produced from one
/// builder, each a snapshot of the values set so far.
///
/// The builder is also the serde shape of an address:
///
/// ```json
/// {"country": "US", "address_lines": ["1098 Alta Ave"], "admin_area": "CA",
///  "locality": "Mountain View", "postal_code": "94043"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AddressDataBuilder {
    #[serde(skip_serializing_if = "Option::is_none")]
    country: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    address_lines: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    admin_area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    locality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dependent_locality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sorting_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    recipient: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    language_code: Option<String>,
}

impl AddressDataBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the postal country region code.
    pub fn set_country(&mut self, value: &str) -> &mut Self {
        self.country = trim_to_owned(value);
        self
    }

    pub fn set_admin_area(&mut self, value: &str) -> &mut Self {
        self.admin_area = trim_to_owned(value);
        self
    }

    pub fn set_locality(&mut self, value: &str) -> &mut Self {
        self.locality = trim_to_owned(value);
        self
    }

    pub fn set_dependent_locality(&mut self, value: &str) -> &mut Self {
        self.dependent_locality = trim_to_owned(value);
        self
    }

    pub fn set_postal_code(&mut self, value: &str) -> &mut Self {
        self.postal_code = trim_to_owned(value);
        self
    }

    pub fn set_sorting_code(&mut self, value: &str) -> &mut Self {
        self.sorting_code = trim_to_owned(value);
        self
    }

    pub fn set_organization(&mut self, value: &str) -> &mut Self {
        self.organization = trim_to_owned(value);
        self
    }

    pub fn set_recipient(&mut self, value: &str) -> &mut Self {
        self.recipient = trim_to_owned(value);
        self
    }

    pub fn set_language_code(&mut self, value: &str) -> &mut Self {
        self.language_code = trim_to_owned(value);
        self
    }

    /// Replaces all street address lines.
    pub fn set_address_lines<I, S>(&mut self, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.address_lines = lines.into_iter().map(|l| l.as_ref().to_owned()).collect();
        self
    }

    /// Appends one street address line (which may itself contain newlines).
    pub fn add_address_line(&mut self, line: &str) -> &mut Self {
        self.address_lines.push(line.to_owned());
        self
    }

    /// Replaces the street address with a newline-separated block of text.
    pub fn set_address(&mut self, address: &str) -> &mut Self {
        self.set_address_lines([address])
    }

    /// Sets `field` to `value`.
    ///
    /// [`AddressField::StreetAddress`] replaces all lines;
    /// [`AddressField::AddressLine1`] and [`AddressField::AddressLine2`]
    /// replace the line at that position, padding with blank lines which are
    /// dropped on build.
    pub fn set(&mut self, field: AddressField, value: &str) -> &mut Self {
        match field {
            AddressField::Country => self.set_country(value),
            AddressField::AdminArea => self.set_admin_area(value),
            AddressField::Locality => self.set_locality(value),
            AddressField::DependentLocality => self.set_dependent_locality(value),
            AddressField::PostalCode => self.set_postal_code(value),
            AddressField::SortingCode => self.set_sorting_code(value),
            AddressField::Organization => self.set_organization(value),
            AddressField::Recipient => self.set_recipient(value),
            AddressField::StreetAddress => self.set_address(value),
            AddressField::AddressLine1 => self.set_line_at(0, value),
            AddressField::AddressLine2 => self.set_line_at(1, value),
        }
    }

    fn set_line_at(&mut self, index: usize, value: &str) -> &mut Self {
        if self.address_lines.len() <= index {
            self.address_lines.resize(index + 1, String::new());
        }
        self.address_lines[index] = value.to_owned();
        self
    }

    /// Builds an immutable, normalised [`AddressData`].
    pub fn build(&self) -> AddressData {
        let clean = |v: &Option<String>| v.as_deref().and_then(trim_to_owned);
        AddressData {
            postal_country: clean(&self.country),
            address_lines: normalize_address_lines(&self.address_lines),
            administrative_area: clean(&self.admin_area),
            locality: clean(&self.locality),
            dependent_locality: clean(&self.dependent_locality),
            postal_code: clean(&self.postal_code),
            sorting_code: clean(&self.sorting_code),
            organization: clean(&self.organization),
            recipient: clean(&self.recipient),
            language_code: clean(&self.language_code),
        }
    }
}

/// Splits lines on embedded newlines, trims each piece and drops blanks.
fn normalize_address_lines(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .flat_map(|line| line.split('\n'))
        .filter_map(trim_to_owned)
        .collect()
}

impl From<AddressDataBuilder> for AddressData {
    fn from(builder: AddressDataBuilder) -> Self {
        builder.build()
    }
}

impl From<AddressData> for AddressDataBuilder {
    fn from(address: AddressData) -> Self {
        Self {
            country: address.postal_country,
            address_lines: address.address_lines,
            admin_area: address.administrative_area,
            locality: address.locality,
            dependent_locality: address.dependent_locality,
            postal_code: address.postal_code,
            sorting_code: address.sorting_code,
            organization: address.organization,
            recipient: address.recipient,
            language_code: address.language_code,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn embedded_newlines_split_into_lines() {
        let address = AddressData::builder()
            .set_country("US")
            .set_address_lines(["First line\nSecond line", "Last line"])
            .build();
        assert_eq!(
            address.address_lines(),
            ["First line", "Second line", "Last line"]
        );
    }

    #[test]
    fn blank_lines_and_whitespace_are_dropped() {
        let address = AddressData::builder()
            .set_address_lines(["  a  ", "\n \n", "", " b\n\nc "])
            .build();
        assert_eq!(address.address_lines(), ["a", "b", "c"]);
    }

    #[test]
    fn blank_values_become_none() {
        let address = AddressData::builder()
            .set_country(" US ")
            .set_locality("   ")
            .set_admin_area("")
            .build();
        assert_eq!(address.postal_country(), Some("US"));
        assert_eq!(address.locality(), None);
        assert_eq!(address.administrative_area(), None);
    }

    #[test]
    fn one_builder_builds_many_snapshots() {
        let mut builder = AddressData::builder();
        builder.set_country("US").set_locality("Springfield");
        let first = builder.build();
        builder.set_locality("Shelbyville");
        let second = builder.build();
        assert_eq!(first.locality(), Some("Springfield"));
        assert_eq!(second.locality(), Some("Shelbyville"));
    }

    #[test]
    fn to_builder_round_trips() {
        let address = AddressData::builder()
            .set_country("FR")
            .set_postal_code("75007")
            .add_address_line("7 Rue de Grenelle")
            .build();
        assert_eq!(address.to_builder().build(), address);
    }

    #[test]
    fn set_by_field() {
        let address = AddressData::builder()
            .set(AddressField::Country, "CH")
            .set(AddressField::AddressLine2, "Postfach")
            .set(AddressField::AddressLine1, "Bahnhofstrasse 1")
            .set(AddressField::Recipient, "Heidi")
            .build();
        assert_eq!(address.address_line1(), Some("Bahnhofstrasse 1"));
        assert_eq!(address.address_line2(), Some("Postfach"));
        assert_eq!(address.field_value(AddressField::Recipient), Some("Heidi"));
        assert_eq!(address.field_value(AddressField::StreetAddress), None);
        assert!(!address.is_field_empty(AddressField::StreetAddress));
    }

    #[test]
    fn deserialize_normalizes() {
        let json = r#"{"country":" US ","address_lines":["1 Main St\nApt 2"],"locality":" "}"#;
        let address: AddressData = serde_json::from_str(json).expect("valid address json");
        assert_eq!(address.postal_country(), Some("US"));
        assert_eq!(address.address_lines(), ["1 Main St", "Apt 2"]);
        assert_eq!(address.locality(), None);
    }

    #[test]
    fn serialize_skips_missing_fields() {
        let address = AddressData::builder().set_country("DE").build();
        let json = serde_json::to_string(&address).expect("serializable");
        assert_eq!(json, r#"{"country":"DE"}"#);
    }
}
