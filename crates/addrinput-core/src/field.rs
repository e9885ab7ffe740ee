/// Address field roles and display widths.
///
/// [`AddressField`] is the closed set of semantic roles an address value can
/// play. Each role has a one-character code used by the format-string
/// mini-language (`%N`, `%A`, `%C`, ...) and by `require`/`upper` metadata
/// strings.
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::format::FormatInterpreter;

// ---------------------------------------------------------------------------
// WidthType
// ---------------------------------------------------------------------------

/// Display width class of an input field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WidthType {
    /// A full-width field.
    Long,
    /// A narrow field, e.g. a postal code.
    Short,
}

impl WidthType {
    /// Parses a width character from a `width_overrides` string.
    ///
    /// `L` is long; `S` and `N` (narrow) are short. Case-insensitive.
    pub fn from_code(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'L' => Some(Self::Long),
            'S' | 'N' => Some(Self::Short),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// AddressField
// ---------------------------------------------------------------------------

/// A semantic role within a postal address.
///
/// Variant order is the iteration order used for reports
/// ([`crate::AddressProblems`]) and field sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AddressField {
    /// Region code of the postal country (`R`).
    Country,
    /// Top-level administrative subdivision: state, province, prefecture (`S`).
    AdminArea,
    /// City or town (`C`).
    Locality,
    /// District or suburb below the locality (`D`).
    DependentLocality,
    /// Postal code (`Z`).
    PostalCode,
    /// Sorting code, e.g. the French CEDEX (`X`).
    SortingCode,
    /// Organization or company name (`O`).
    Organization,
    /// Recipient name (`N`).
    Recipient,
    /// All street address lines (`A`).
    StreetAddress,
    /// First street address line (`1`).
    #[serde(rename = "ADDRESS_LINE_1")]
    AddressLine1,
    /// Second street address line (`2`).
    #[serde(rename = "ADDRESS_LINE_2")]
    AddressLine2,
}

/// Every field in declaration order.
pub const ALL_FIELDS: [AddressField; 11] = [
    AddressField::Country,
    AddressField::AdminArea,
    AddressField::Locality,
    AddressField::DependentLocality,
    AddressField::PostalCode,
    AddressField::SortingCode,
    AddressField::Organization,
    AddressField::Recipient,
    AddressField::StreetAddress,
    AddressField::AddressLine1,
    AddressField::AddressLine2,
];

/// The region hierarchy, from the most general level to the most specific.
pub const HIERARCHY: [AddressField; 4] = [
    AddressField::Country,
    AddressField::AdminArea,
    AddressField::Locality,
    AddressField::DependentLocality,
];

impl AddressField {
    /// Returns the one-character code used in format and `require` strings.
    pub fn code(self) -> char {
        match self {
            Self::Country => 'R',
            Self::AdminArea => 'S',
            Self::Locality => 'C',
            Self::DependentLocality => 'D',
            Self::PostalCode => 'Z',
            Self::SortingCode => 'X',
            Self::Organization => 'O',
            Self::Recipient => 'N',
            Self::StreetAddress => 'A',
            Self::AddressLine1 => '1',
            Self::AddressLine2 => '2',
        }
    }

    /// Looks up the field whose code is `c`.
    pub fn from_code(c: char) -> Option<Self> {
        ALL_FIELDS.iter().copied().find(|f| f.code() == c)
    }

    /// Returns the upper-case snake name, e.g. `"ADMIN_AREA"`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Country => "COUNTRY",
            Self::AdminArea => "ADMIN_AREA",
            Self::Locality => "LOCALITY",
            Self::DependentLocality => "DEPENDENT_LOCALITY",
            Self::PostalCode => "POSTAL_CODE",
            Self::SortingCode => "SORTING_CODE",
            Self::Organization => "ORGANIZATION",
            Self::Recipient => "RECIPIENT",
            Self::StreetAddress => "STREET_ADDRESS",
            Self::AddressLine1 => "ADDRESS_LINE_1",
            Self::AddressLine2 => "ADDRESS_LINE_2",
        }
    }

    /// Parses a field from its snake name (case-insensitive) or its code.
    pub fn parse(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Self::from_code(c.to_ascii_uppercase());
        }
        ALL_FIELDS
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(s))
    }

    /// Returns the width class used when no per-region override applies.
    pub fn default_width(self) -> WidthType {
        match self {
            Self::PostalCode | Self::SortingCode => WidthType::Short,
            Self::Country
            | Self::AdminArea
            | Self::Locality
            | Self::DependentLocality
            | Self::Organization
            | Self::Recipient
            | Self::StreetAddress
            | Self::AddressLine1
            | Self::AddressLine2 => WidthType::Long,
        }
    }

    /// Returns the width class for this field in `region_code`, honouring
    /// the region's `width_overrides` metadata.
    pub fn width_for_region(self, region_code: &str) -> WidthType {
        FormatInterpreter::width_override(self, region_code).unwrap_or(self.default_width())
    }

    /// Returns the position of this field in [`HIERARCHY`], if it is a
    /// hierarchy level.
    pub fn hierarchy_level(self) -> Option<usize> {
        HIERARCHY.iter().position(|f| *f == self)
    }
}

impl fmt::Display for AddressField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for field in ALL_FIELDS {
            assert_eq!(AddressField::from_code(field.code()), Some(field));
        }
        assert_eq!(AddressField::from_code('n'), None);
        assert_eq!(AddressField::from_code('Q'), None);
    }

    #[test]
    fn parse_accepts_names_and_codes() {
        assert_eq!(AddressField::parse("admin_area"), Some(AddressField::AdminArea));
        assert_eq!(AddressField::parse("POSTAL_CODE"), Some(AddressField::PostalCode));
        assert_eq!(AddressField::parse("z"), Some(AddressField::PostalCode));
        assert_eq!(AddressField::parse("street"), None);
    }

    #[test]
    fn default_widths() {
        assert_eq!(AddressField::PostalCode.default_width(), WidthType::Short);
        assert_eq!(AddressField::SortingCode.default_width(), WidthType::Short);
        assert_eq!(AddressField::Locality.default_width(), WidthType::Long);
    }

    #[test]
    fn width_codes() {
        assert_eq!(WidthType::from_code('L'), Some(WidthType::Long));
        assert_eq!(WidthType::from_code('s'), Some(WidthType::Short));
        assert_eq!(WidthType::from_code('N'), Some(WidthType::Short));
        assert_eq!(WidthType::from_code('Q'), None);
    }

    #[test]
    fn hierarchy_levels() {
        assert_eq!(AddressField::Country.hierarchy_level(), Some(0));
        assert_eq!(AddressField::DependentLocality.hierarchy_level(), Some(3));
        assert_eq!(AddressField::PostalCode.hierarchy_level(), None);
    }

    #[test]
    fn serde_uses_snake_names() {
        let json = serde_json::to_string(&AddressField::AdminArea).unwrap_or_default();
        assert_eq!(json, "\"ADMIN_AREA\"");
    }
}
