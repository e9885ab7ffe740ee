/// Metadata keys carried by address data nodes.
///
/// Node metadata arrives as flat string maps whose keys are the lower-case
/// names of [`AddressDataKey`] variants (`fmt`, `sub_keys`, `zip`, ...).
/// Lookup by name is case-insensitive and goes through a static table built
/// on first use.
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// A metadata key of an address data node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AddressDataKey {
    /// `~`-separated list of region codes (root node only).
    Countries,
    /// Local-script format string.
    Fmt,
    /// Identifier of the node, e.g. `data/US/CA`.
    Id,
    /// ISO 3166-2 code of the node.
    Isoid,
    /// Key of the node within its parent.
    Key,
    /// Default language of the region.
    Lang,
    /// `~`-separated list of languages used in the region.
    Languages,
    /// Latin-script format string.
    Lfmt,
    /// Label type for the locality field.
    LocalityNameType,
    /// Display name of the node.
    Name,
    /// URL of the postal service's code lookup page.
    Posturl,
    /// Codes of the required fields, e.g. `ACSZ`.
    Require,
    /// Label type for the admin area field.
    StateNameType,
    /// Label type for the dependent locality field.
    SublocalityNameType,
    /// `~`-separated ISO 3166-2 codes of the children.
    SubIsoids,
    /// `~`-separated keys of the children.
    SubKeys,
    /// `~`-separated Latin-script names of the children.
    SubLnames,
    /// `~`-separated flags telling whether each child has children.
    SubMores,
    /// `~`-separated local-script names of the children.
    SubNames,
    /// `~`-separated postal code prefixes of the children.
    SubZips,
    /// `~`-separated postal code examples of the children.
    SubZipexs,
    /// Codes of fields rendered in upper case.
    Upper,
    /// Per-field width overrides, e.g. `%S:S%C:L`.
    WidthOverrides,
    /// Full postal code pattern that overrides the inherited one.
    Xzip,
    /// Postal code pattern (full match at country level, prefix below).
    Zip,
    /// Comma-separated postal code examples.
    Zipex,
    /// Label type for the postal code field.
    ZipNameType,
}

/// Every key in declaration order.
pub const ALL_DATA_KEYS: [AddressDataKey; 27] = [
    AddressDataKey::Countries,
    AddressDataKey::Fmt,
    AddressDataKey::Id,
    AddressDataKey::Isoid,
    AddressDataKey::Key,
    AddressDataKey::Lang,
    AddressDataKey::Languages,
    AddressDataKey::Lfmt,
    AddressDataKey::LocalityNameType,
    AddressDataKey::Name,
    AddressDataKey::Posturl,
    AddressDataKey::Require,
    AddressDataKey::StateNameType,
    AddressDataKey::SublocalityNameType,
    AddressDataKey::SubIsoids,
    AddressDataKey::SubKeys,
    AddressDataKey::SubLnames,
    AddressDataKey::SubMores,
    AddressDataKey::SubNames,
    AddressDataKey::SubZips,
    AddressDataKey::SubZipexs,
    AddressDataKey::Upper,
    AddressDataKey::WidthOverrides,
    AddressDataKey::Xzip,
    AddressDataKey::Zip,
    AddressDataKey::Zipex,
    AddressDataKey::ZipNameType,
];

static NAME_TABLE: LazyLock<HashMap<&'static str, AddressDataKey>> =
    LazyLock::new(|| ALL_DATA_KEYS.iter().map(|k| (k.as_str(), *k)).collect());

impl AddressDataKey {
    /// Returns the wire name of the key, e.g. `"sub_keys"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Countries => "countries",
            Self::Fmt => "fmt",
            Self::Id => "id",
            Self::Isoid => "isoid",
            Self::Key => "key",
            Self::Lang => "lang",
            Self::Languages => "languages",
            Self::Lfmt => "lfmt",
            Self::LocalityNameType => "locality_name_type",
            Self::Name => "name",
            Self::Posturl => "posturl",
            Self::Require => "require",
            Self::StateNameType => "state_name_type",
            Self::SublocalityNameType => "sublocality_name_type",
            Self::SubIsoids => "sub_isoids",
            Self::SubKeys => "sub_keys",
            Self::SubLnames => "sub_lnames",
            Self::SubMores => "sub_mores",
            Self::SubNames => "sub_names",
            Self::SubZips => "sub_zips",
            Self::SubZipexs => "sub_zipexs",
            Self::Upper => "upper",
            Self::WidthOverrides => "width_overrides",
            Self::Xzip => "xzip",
            Self::Zip => "zip",
            Self::Zipex => "zipex",
            Self::ZipNameType => "zip_name_type",
        }
    }

    /// Looks up a key by wire name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        NAME_TABLE.get(name.to_ascii_lowercase().as_str()).copied()
    }
}

impl fmt::Display for AddressDataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
