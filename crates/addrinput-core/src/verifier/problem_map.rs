/// Which checks run on which field, and in what order.
use std::collections::BTreeMap;

use crate::field::AddressField;
use crate::problems::AddressProblemType;

use AddressProblemType::{
    InvalidFormat, MismatchingValue, MissingRequiredField, UnexpectedField, UnknownValue,
};

/// Ordered checks per field. Checking a field stops at the first problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProblemMap {
    checks: BTreeMap<AddressField, Vec<AddressProblemType>>,
}

impl ProblemMap {
    /// The full set of checks.
    ///
    /// Hierarchy fields are checked for presence and known values, the
    /// postal code for presence and pattern, the remaining fields for
    /// presence only.
    pub fn standard() -> Self {
        let presence = [UnexpectedField, MissingRequiredField];
        let hierarchy = [UnexpectedField, MissingRequiredField, UnknownValue];
        let postal = [UnexpectedField, MissingRequiredField, InvalidFormat, MismatchingValue];
        let checks = [
            (AddressField::Country, hierarchy.to_vec()),
            (AddressField::AdminArea, hierarchy.to_vec()),
            (AddressField::Locality, hierarchy.to_vec()),
            (AddressField::DependentLocality, hierarchy.to_vec()),
            (AddressField::PostalCode, postal.to_vec()),
            (AddressField::StreetAddress, presence.to_vec()),
            (AddressField::SortingCode, presence.to_vec()),
            (AddressField::Organization, presence.to_vec()),
            (AddressField::Recipient, presence.to_vec()),
        ];
        Self {
            checks: checks.into_iter().collect(),
        }
    }

    /// The standard checks restricted to `fields`.
    pub fn only(fields: &[AddressField]) -> Self {
        let mut map = Self::standard();
        map.checks.retain(|field, _| fields.contains(field));
        map
    }

    /// Checks for `field`, in order. Empty for unselected fields.
    pub fn checks_for(&self, field: AddressField) -> &[AddressProblemType] {
        self.checks.get(&field).map_or(&[], Vec::as_slice)
    }

    /// Returns `true` if any check runs on `field`.
    pub fn is_selected(&self, field: AddressField) -> bool {
        self.checks.contains_key(&field)
    }

    /// Selected fields in field order.
    pub fn fields(&self) -> impl Iterator<Item = AddressField> + '_ {
        self.checks.keys().copied()
    }
}

impl Default for ProblemMap {
    fn default() -> Self {
        Self::standard()
    }
}
