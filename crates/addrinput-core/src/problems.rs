/// Verification findings.
///
/// Problems are not errors: a verifier never fails on bad user input, it
/// records at most one [`AddressProblemType`] per field in an
/// [`AddressProblems`] report for the caller to display.
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::field::AddressField;

/// Kind of problem found in one address field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AddressProblemType {
    /// A value is present in a field the region does not use.
    UnexpectedField,
    /// A field the region requires is empty.
    MissingRequiredField,
    /// The value is not one of the known sub-regions.
    UnknownValue,
    /// The postal code does not match the country's pattern.
    InvalidFormat,
    /// The postal code does not match the pattern of the selected
    /// sub-region.
    MismatchingValue,
}

impl AddressProblemType {
    /// Stable machine-readable code, e.g. `"UNEXPECTED_FIELD"`.
    pub fn code(self) -> &'static str {
        match self {
            Self::UnexpectedField => "UNEXPECTED_FIELD",
            Self::MissingRequiredField => "MISSING_REQUIRED_FIELD",
            Self::UnknownValue => "UNKNOWN_VALUE",
            Self::InvalidFormat => "INVALID_FORMAT",
            Self::MismatchingValue => "MISMATCHING_VALUE",
        }
    }

    /// Human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            Self::UnexpectedField => "this field is not used in the address's country",
            Self::MissingRequiredField => "this field is required",
            Self::UnknownValue => "this value is not recognised",
            Self::InvalidFormat => "this value has an invalid format",
            Self::MismatchingValue => "this value does not match the rest of the address",
        }
    }
}

impl fmt::Display for AddressProblemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Problems found in an address, at most one per field.
///
/// Iteration follows field declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct AddressProblems {
    problems: BTreeMap<AddressField, AddressProblemType>,
}

impl AddressProblems {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `problem` for `field`, replacing any earlier problem.
    pub fn add(&mut self, field: AddressField, problem: AddressProblemType) {
        self.problems.insert(field, problem);
    }

    /// Returns the problem recorded for `field`.
    pub fn problem(&self, field: AddressField) -> Option<AddressProblemType> {
        self.problems.get(&field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn clear(&mut self) {
        self.problems.clear();
    }

    /// Iterates over `(field, problem)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (AddressField, AddressProblemType)> + '_ {
        self.problems.iter().map(|(f, p)| (*f, *p))
    }
}

impl fmt::Display for AddressProblems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        f.write_str("{")?;
        for (field, problem) in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{field}: {problem}")?;
        }
        f.write_str("}")
    }
}
