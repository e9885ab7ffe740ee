/// Caller-supplied customisation of an address form.
use std::collections::{BTreeSet, HashMap};

use thiserror::Error;

use crate::field::AddressField;

/// Error raised while configuring [`FormOptions`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormOptionsError {
    /// A custom field order named the same field twice.
    #[error("field {field} appears more than once in the custom order for {region}")]
    DuplicateField { region: String, field: AddressField },
}

/// Immutable form configuration.
///
/// Hidden, read-only and required sets are advisory for form renderers; the
/// per-region custom field order is applied by
/// [`FormatInterpreter::address_field_order`][crate::FormatInterpreter::address_field_order].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormOptions {
    hidden: BTreeSet<AddressField>,
    read_only: BTreeSet<AddressField>,
    required: BTreeSet<AddressField>,
    custom_order: HashMap<String, Vec<AddressField>>,
    server_url: Option<String>,
}

impl FormOptions {
    pub fn builder() -> FormOptionsBuilder {
        FormOptionsBuilder::default()
    }

    pub fn is_hidden(&self, field: AddressField) -> bool {
        self.hidden.contains(&field)
    }

    pub fn is_read_only(&self, field: AddressField) -> bool {
        self.read_only.contains(&field)
    }

    /// Returns `true` if the caller marked `field` as required in addition
    /// to the region's own requirements.
    pub fn is_required(&self, field: AddressField) -> bool {
        self.required.contains(&field)
    }

    pub fn hidden_fields(&self) -> &BTreeSet<AddressField> {
        &self.hidden
    }

    pub fn required_fields(&self) -> &BTreeSet<AddressField> {
        &self.required
    }

    /// Returns the custom field order registered for `region_code`.
    pub fn custom_field_order(&self, region_code: &str) -> Option<&[AddressField]> {
        self.custom_order
            .get(&region_code.to_ascii_uppercase())
            .map(Vec::as_slice)
    }

    pub fn server_url(&self) -> Option<&str> {
        self.server_url.as_deref()
    }
}

/// Builder for [`FormOptions`].
#[derive(Debug, Clone, Default)]
pub struct FormOptionsBuilder {
    options: FormOptions,
}

impl FormOptionsBuilder {
    pub fn hide(&mut self, field: AddressField) -> &mut Self {
        self.options.hidden.insert(field);
        self
    }

    pub fn read_only(&mut self, field: AddressField) -> &mut Self {
        self.options.read_only.insert(field);
        self
    }

    pub fn required(&mut self, field: AddressField) -> &mut Self {
        self.options.required.insert(field);
        self
    }

    /// Sets the field order for `region_code`.
    ///
    /// Only the named fields move; see
    /// [`FormatInterpreter::address_field_order`][crate::FormatInterpreter::address_field_order].
    ///
    /// # Errors
    ///
    /// [`FormOptionsError::DuplicateField`] if a field is listed twice.
    pub fn custom_field_order(
        &mut self,
        region_code: &str,
        fields: &[AddressField],
    ) -> Result<&mut Self, FormOptionsError> {
        let region = region_code.to_ascii_uppercase();
        let mut seen = BTreeSet::new();
        for field in fields {
            if !seen.insert(*field) {
                return Err(FormOptionsError::DuplicateField {
                    region,
                    field: *field,
                });
            }
        }
        self.options.custom_order.insert(region, fields.to_vec());
        Ok(self)
    }

    pub fn server_url(&mut self, url: &str) -> &mut Self {
        self.options.server_url = Some(url.to_owned());
        self
    }

    pub fn build(&self) -> FormOptions {
        self.options.clone()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn builder_collects_settings() {
        let options = FormOptions::builder()
            .hide(AddressField::SortingCode)
            .read_only(AddressField::Country)
            .required(AddressField::Recipient)
            .server_url("https://example.org/address")
            .build();
        assert!(options.is_hidden(AddressField::SortingCode));
        assert!(!options.is_hidden(AddressField::Country));
        assert!(options.is_read_only(AddressField::Country));
        assert!(options.is_required(AddressField::Recipient));
        assert_eq!(options.server_url(), Some("https://example.org/address"));
    }

    #[test]
    fn custom_order_is_keyed_by_region() {
        let mut builder = FormOptions::builder();
        builder
            .custom_field_order("us", &[AddressField::Locality, AddressField::Recipient])
            .expect("distinct fields");
        let options = builder.build();
        assert_eq!(
            options.custom_field_order("US"),
            Some([AddressField::Locality, AddressField::Recipient].as_slice())
        );
        assert_eq!(options.custom_field_order("CA"), None);
    }

    #[test]
    fn duplicate_field_is_rejected() {
        let err = FormOptions::builder()
            .custom_field_order(
                "US",
                &[AddressField::Locality, AddressField::Recipient, AddressField::Locality],
            )
            .map(|_| ())
            .expect_err("duplicate");
        assert_eq!(
            err,
            FormOptionsError::DuplicateField {
                region: "US".to_owned(),
                field: AddressField::Locality,
            }
        );
    }
}
