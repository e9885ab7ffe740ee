/// Hierarchical keys addressing nodes of the region data tree.
///
/// A data key is a path `data/<country>/<admin area>/<locality>/<dependent
/// locality>` with an optional `--<language>` suffix; an examples key is
/// `examples/<country>/<local|latin>/<language|_default>`. Hierarchy values
/// are stored strictly as a prefix: once a level is missing no deeper level
/// is set. Two keys are equal iff their canonical strings are equal.
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use thiserror::Error;

use crate::address::AddressData;
use crate::field::{AddressField, HIERARCHY};
use crate::util::{is_explicit_latin_script, trim_to_none};

const SLASH_DELIM: char = '/';
const DASH_DELIM: &str = "--";
const DEFAULT_LANGUAGE: &str = "_default";

// ---------------------------------------------------------------------------
// KeyType / ScriptType
// ---------------------------------------------------------------------------

/// Kind of node a key addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    /// Region metadata.
    Data,
    /// Example addresses.
    Examples,
}

impl KeyType {
    /// Returns the first path segment of keys of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Examples => "examples",
        }
    }
}

/// Script a region name or address is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptType {
    /// Latin script.
    Latin,
    /// The region's local script.
    Local,
}

impl ScriptType {
    /// Returns the path segment used by examples keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Latin => "latin",
            Self::Local => "local",
        }
    }

    /// Derives the script from a language code: explicit Latin-script tags
    /// are [`ScriptType::Latin`], everything else is local.
    pub fn for_language(language_code: &str) -> Self {
        if is_explicit_latin_script(language_code) {
            Self::Latin
        } else {
            Self::Local
        }
    }
}

// ---------------------------------------------------------------------------
// LookupKeyError
// ---------------------------------------------------------------------------

/// Errors produced when parsing or deriving lookup keys.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupKeyError {
    /// The first path segment is neither `data` nor `examples`.
    #[error("wrong key type: {0:?}")]
    WrongKeyType(String),
    /// The language suffix is not of the form `<value>--<language>`.
    #[error("wrong format: {0:?} should be <value>--<language>")]
    MalformedLanguage(String),
    /// A hierarchy operation was requested on an examples key.
    #[error("only data keys support hierarchy operations, got {0}")]
    NotDataKey(String),
}

// ---------------------------------------------------------------------------
// LookupKey
// ---------------------------------------------------------------------------

/// An immutable key into the region data tree.
#[derive(Debug, Clone)]
pub struct LookupKey {
    key_type: KeyType,
    script: ScriptType,
    /// Values for the first `nodes.len()` levels of [`HIERARCHY`].
    nodes: Vec<String>,
    language: Option<String>,
    key_string: String,
}

impl LookupKey {
    /// The root data key, `data`.
    pub fn root() -> Self {
        LookupKeyBuilder::new(KeyType::Data).build()
    }

    /// Parses a key string. Also available through [`FromStr`].
    ///
    /// Segments beyond the hierarchy depth are joined back with `/` into the
    /// dependent locality, since some locality names contain slashes.
    ///
    /// # Errors
    ///
    /// [`LookupKeyError::WrongKeyType`] when the first segment is unknown and
    /// [`LookupKeyError::MalformedLanguage`] when a data key carries more
    /// than one `--` in its last segment or nothing before it.
    pub fn parse(key: &str) -> Result<Self, LookupKeyError> {
        let joined_tail: String;
        let mut parts: Vec<&str> = key.split(SLASH_DELIM).collect();
        let key_type = match parts.first().copied() {
            Some("data") => KeyType::Data,
            Some("examples") => KeyType::Examples,
            Some(other) => return Err(LookupKeyError::WrongKeyType(other.to_owned())),
            None => return Err(LookupKeyError::WrongKeyType(String::new())),
        };

        if parts.len() > HIERARCHY.len() + 1 {
            joined_tail = parts[HIERARCHY.len()..].join("/");
            parts.truncate(HIERARCHY.len());
            parts.push(&joined_tail);
        }

        let mut builder = LookupKeyBuilder::new(key_type);
        match key_type {
            KeyType::Data => {
                let mut values: Vec<String> = parts[1..].iter().map(|p| (*p).to_owned()).collect();
                if let Some(last) = values.last_mut() {
                    if last.contains(DASH_DELIM) {
                        let split: Vec<&str> = last.split(DASH_DELIM).collect();
                        let [value, language] = split.as_slice() else {
                            return Err(LookupKeyError::MalformedLanguage(last.clone()));
                        };
                        if value.trim().is_empty() {
                            return Err(LookupKeyError::MalformedLanguage(last.clone()));
                        }
                        builder.language = trim_to_none(Some(*language)).map(str::to_owned);
                        *last = (*value).to_owned();
                    }
                }
                for value in values {
                    match trim_to_none(Some(value.as_str())) {
                        Some(v) => builder.nodes.push(v.to_owned()),
                        None => break,
                    }
                }
            }
            KeyType::Examples => {
                if let Some(country) = parts.get(1).and_then(|p| trim_to_none(Some(*p))) {
                    builder.nodes.push(country.to_owned());
                }
                if parts.get(2).copied() == Some(ScriptType::Latin.as_str()) {
                    builder.script = ScriptType::Latin;
                }
                builder.language = parts
                    .get(3)
                    .copied()
                    .filter(|l| *l != DEFAULT_LANGUAGE)
                    .and_then(|l| trim_to_none(Some(l)))
                    .map(str::to_owned);
            }
        }
        Ok(builder.build())
    }

    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    pub fn script(&self) -> ScriptType {
        self.script
    }

    /// Language suffix of the key, if any.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Returns the value stored for a hierarchy field.
    pub fn value(&self, field: AddressField) -> Option<&str> {
        field
            .hierarchy_level()
            .and_then(|level| self.nodes.get(level))
            .map(String::as_str)
    }

    /// Number of hierarchy levels set (0 for the root key).
    pub fn depth(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` for a data key addressing a country.
    pub fn is_country_key(&self) -> bool {
        self.key_type == KeyType::Data && self.nodes.len() == 1
    }

    /// Returns the canonical string form.
    pub fn as_str(&self) -> &str {
        &self.key_string
    }

    /// Returns a copy of this key truncated after `field`.
    ///
    /// Yields `Ok(None)` when `field` is not a hierarchy level or is not set
    /// in this key.
    ///
    /// # Errors
    ///
    /// [`LookupKeyError::NotDataKey`] for examples keys.
    pub fn key_for_upper_level_field(
        &self,
        field: AddressField,
    ) -> Result<Option<LookupKey>, LookupKeyError> {
        self.require_data_key()?;
        let Some(level) = field.hierarchy_level() else {
            return Ok(None);
        };
        if level >= self.nodes.len() {
            return Ok(None);
        }
        let mut builder = LookupKeyBuilder::from_key(self);
        builder.nodes.truncate(level + 1);
        Ok(Some(builder.build()))
    }

    /// Returns the key of the parent node.
    ///
    /// Country keys and the root have no parent.
    ///
    /// # Errors
    ///
    /// [`LookupKeyError::NotDataKey`] for examples keys.
    pub fn parent_key(&self) -> Result<Option<LookupKey>, LookupKeyError> {
        self.require_data_key()?;
        if self.nodes.len() <= 1 {
            return Ok(None);
        }
        let mut builder = LookupKeyBuilder::from_key(self);
        builder.nodes.pop();
        Ok(Some(builder.build()))
    }

    /// Returns the key one level below this one, keeping language and
    /// script. Values below the dependent locality are not representable and
    /// yield `None`.
    pub fn child(&self, sub_key: &str) -> Option<LookupKey> {
        if self.nodes.len() >= HIERARCHY.len() {
            return None;
        }
        let value = trim_to_none(Some(sub_key))?;
        let mut builder = LookupKeyBuilder::from_key(self);
        builder.nodes.push(value.to_owned());
        Some(builder.build())
    }

    fn require_data_key(&self) -> Result<(), LookupKeyError> {
        match self.key_type {
            KeyType::Data => Ok(()),
            KeyType::Examples => Err(LookupKeyError::NotDataKey(self.key_string.clone())),
        }
    }
}

impl FromStr for LookupKey {
    type Err = LookupKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key_string)
    }
}

impl PartialEq for LookupKey {
    fn eq(&self, other: &Self) -> bool {
        self.key_string == other.key_string
    }
}

impl Eq for LookupKey {}

impl Hash for LookupKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key_string.hash(state);
    }
}

impl PartialOrd for LookupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LookupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key_string.cmp(&other.key_string)
    }
}

// ---------------------------------------------------------------------------
// LookupKeyBuilder
// ---------------------------------------------------------------------------

/// Builder for [`LookupKey`].
#[derive(Debug, Clone)]
pub struct LookupKeyBuilder {
    key_type: KeyType,
    script: ScriptType,
    nodes: Vec<String>,
    language: Option<String>,
}

impl LookupKeyBuilder {
    /// Starts an empty key of the given type with local script.
    pub fn new(key_type: KeyType) -> Self {
        Self {
            key_type,
            script: ScriptType::Local,
            nodes: Vec::new(),
            language: None,
        }
    }

    /// Starts from an existing key.
    pub fn from_key(key: &LookupKey) -> Self {
        Self {
            key_type: key.key_type,
            script: key.script,
            nodes: key.nodes.clone(),
            language: key.language.clone(),
        }
    }

    /// Takes the hierarchy values and language of `address`.
    ///
    /// The hierarchy is walked from the country down and stops at the first
    /// missing value. An explicit Latin-script language selects
    /// [`ScriptType::Latin`].
    pub fn set_address(mut self, address: &AddressData) -> Self {
        self.nodes = HIERARCHY
            .iter()
            .map_while(|field| address.field_value(*field).map(str::to_owned))
            .collect();
        if let Some(language) = address.language_code() {
            self.script = ScriptType::for_language(language);
            self.language = Some(language.to_owned());
        }
        self
    }

    pub fn set_language(mut self, language: Option<&str>) -> Self {
        self.language = language.and_then(|l| trim_to_none(Some(l))).map(str::to_owned);
        self
    }

    pub fn set_script(mut self, script: ScriptType) -> Self {
        self.script = script;
        self
    }

    /// Builds the key and its canonical string.
    pub fn build(self) -> LookupKey {
        let mut key_string = self.key_type.as_str().to_owned();
        match self.key_type {
            KeyType::Data => {
                for node in &self.nodes {
                    key_string.push(SLASH_DELIM);
                    key_string.push_str(node);
                }
                if let Some(language) = &self.language {
                    key_string.push_str(DASH_DELIM);
                    key_string.push_str(language);
                }
            }
            KeyType::Examples => {
                if let Some(country) = self.nodes.first() {
                    key_string.push(SLASH_DELIM);
                    key_string.push_str(country);
                    key_string.push(SLASH_DELIM);
                    key_string.push_str(self.script.as_str());
                    key_string.push(SLASH_DELIM);
                    key_string.push_str(self.language.as_deref().unwrap_or(DEFAULT_LANGUAGE));
                }
            }
        }
        LookupKey {
            key_type: self.key_type,
            script: self.script,
            nodes: self.nodes,
            language: self.language,
            key_string,
        }
    }
}
