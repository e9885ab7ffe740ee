/// One level of the region hierarchy seen as a set of constraints.
///
/// A [`FieldVerifier`] knows which sub-regions exist below its node, which
/// fields the country uses and requires, and which postal code patterns
/// apply. [`FieldVerifier::refine`] descends one level; a child inherits
/// every constraint its node does not override.
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use regex::{Regex, RegexBuilder};

use crate::data_key::AddressDataKey;
use crate::data_source::DataSource;
use crate::field::AddressField;
use crate::format::{FormatInterpreter, parse_format_fields, parse_required_fields};
use crate::lookup_key::{LookupKey, LookupKeyBuilder, ScriptType};
use crate::node_data::NodeData;
use crate::problems::{AddressProblemType, AddressProblems};
use crate::region_constants::{DEFAULT_REGION, ROOT_KEY};
use crate::util::{build_name_to_key_map, language_subtag, trim_to_none};

use super::VerifierError;

const LANGUAGE_DELIM: &str = "--";

/// Constraints of one hierarchy node.
#[derive(Clone)]
pub struct FieldVerifier {
    data_source: Arc<dyn DataSource>,
    use_region_data_constants: bool,
    id: Option<String>,
    possibly_used: BTreeSet<AddressField>,
    required: BTreeSet<AddressField>,
    keys: Vec<String>,
    local_names: Vec<String>,
    latin_names: Vec<String>,
    /// Lower-cased key or name → key.
    candidate_values: HashMap<String, String>,
    /// Whole-value postal code pattern.
    format: Option<Regex>,
    /// Prefix postal code pattern.
    match_pattern: Option<Regex>,
}

impl FieldVerifier {
    /// Builds the root verifier, taking field usage from the compiled-in
    /// region metadata.
    pub fn new(data_source: Arc<dyn DataSource>) -> Self {
        Self::with_region_data_constants(data_source, true)
    }

    /// Builds the root verifier.
    ///
    /// With `use_region_data_constants` unset, the used and required fields
    /// of a country come from the data source's `fmt` and `require` entries
    /// instead.
    pub fn with_region_data_constants(
        data_source: Arc<dyn DataSource>,
        use_region_data_constants: bool,
    ) -> Self {
        let root = data_source.default_data(ROOT_KEY);
        let keys = root.get_list(AddressDataKey::Countries);
        let candidate_values = keys.iter().map(|k| (k.to_lowercase(), k.clone())).collect();
        let mut verifier = Self {
            data_source,
            use_region_data_constants,
            id: Some(ROOT_KEY.to_owned()),
            possibly_used: BTreeSet::new(),
            required: BTreeSet::new(),
            keys,
            local_names: Vec::new(),
            latin_names: Vec::new(),
            candidate_values,
            format: None,
            match_pattern: None,
        };
        verifier.populate_possible_and_required(DEFAULT_REGION);
        verifier
    }

    /// Key of the node this verifier was built from. `None` for a level
    /// that could not be resolved.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Sub-region keys below this node.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn local_names(&self) -> &[String] {
        &self.local_names
    }

    pub fn latin_names(&self) -> &[String] {
        &self.latin_names
    }

    /// Lower-cased keys and names of the sub-regions, mapped to their keys.
    pub fn candidate_values(&self) -> &HashMap<String, String> {
        &self.candidate_values
    }

    pub fn possibly_used_fields(&self) -> &BTreeSet<AddressField> {
        &self.possibly_used
    }

    pub fn required(&self) -> &BTreeSet<AddressField> {
        &self.required
    }

    /// Resolves `sublevel` to a key at the next level, if it names one.
    pub fn resolve(&self, sublevel: &str) -> Option<&str> {
        self.candidate_values
            .get(&sublevel.trim().to_lowercase())
            .map(String::as_str)
    }

    /// Returns the verifier one level below, for the sub-region named by
    /// `sublevel`.
    ///
    /// `sublevel` may be a key, a key with a `--language` suffix, a Latin
    /// name or a local name. A value that resolves to nothing yields a
    /// verifier with no sub-regions that still carries this level's field
    /// and postal code constraints.
    ///
    /// # Errors
    ///
    /// [`VerifierError::NameCountMismatch`] when the resolved node lists more
    /// names than keys.
    pub fn refine(&self, sublevel: &str) -> Result<FieldVerifier, VerifierError> {
        let Some(sublevel) = trim_to_none(Some(sublevel)) else {
            return self.child(None);
        };
        let Some(parent) = self.id.as_deref().and_then(|id| LookupKey::parse(id).ok()) else {
            return self.child(None);
        };

        let (value, language) = match sublevel.split_once(LANGUAGE_DELIM) {
            Some((value, language)) if !language.contains(LANGUAGE_DELIM) => {
                (value, trim_to_none(Some(language)))
            }
            Some(_) | None => (sublevel, None),
        };
        let region = if parent.depth() == 0 {
            Some(value)
        } else {
            parent.value(AddressField::Country)
        };
        let language = language.filter(|l| region.is_some_and(|r| self.accepts_language(r, l)));

        if let Some(found) = self.lookup(&parent, value, language) {
            return self.child(Some(found));
        }
        if let Some(index) = self
            .latin_names
            .iter()
            .position(|name| name.eq_ignore_ascii_case(value))
        {
            if let Some(found) = self
                .local_names
                .get(index)
                .and_then(|local| self.lookup(&parent, local, language))
            {
                return self.child(Some(found));
            }
        }
        if let Some(found) = self
            .resolve(value)
            .filter(|key| *key != value)
            .and_then(|key| self.lookup(&parent, key, language))
        {
            return self.child(Some(found));
        }
        tracing::trace!(id = ?self.id, sublevel, "no node for sublevel");
        self.child(None)
    }

    /// Applies one check to `value`, recording a problem on failure.
    ///
    /// Returns `false` when a problem was recorded. `script` selects the
    /// name list consulted for [`AddressProblemType::UnknownValue`]; `None`
    /// accepts keys and names in any script.
    pub fn check(
        &self,
        script: Option<ScriptType>,
        problem: AddressProblemType,
        field: AddressField,
        value: Option<&str>,
        problems: &mut AddressProblems,
    ) -> bool {
        let value = trim_to_none(value);
        let failed = match (problem, value) {
            (AddressProblemType::UnexpectedField, Some(_)) => !self.possibly_used.contains(&field),
            (AddressProblemType::MissingRequiredField, None) => self.required.contains(&field),
            (AddressProblemType::UnknownValue, Some(v)) => !self.is_known_in_script(script, v),
            (AddressProblemType::InvalidFormat, Some(v)) => {
                self.format.as_ref().is_some_and(|re| !re.is_match(v))
            }
            (AddressProblemType::MismatchingValue, Some(v)) => {
                self.match_pattern.as_ref().is_some_and(|re| !re.is_match(v))
            }
            (AddressProblemType::UnexpectedField, None)
            | (AddressProblemType::MissingRequiredField, Some(_))
            | (AddressProblemType::UnknownValue, None)
            | (AddressProblemType::InvalidFormat, None)
            | (AddressProblemType::MismatchingValue, None) => false,
        };
        if failed {
            problems.add(field, problem);
        }
        !failed
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Fetches the child `value` of `parent`. The requested language variant
    /// is tried first, then the parent's language, then no language.
    fn lookup(
        &self,
        parent: &LookupKey,
        value: &str,
        language: Option<&str>,
    ) -> Option<(String, NodeData)> {
        let base = parent.child(value)?;
        let mut candidates = Vec::with_capacity(3);
        if let Some(language) = language {
            candidates.push(
                LookupKeyBuilder::from_key(&base)
                    .set_language(Some(language))
                    .build(),
            );
        }
        if base.language().is_some() {
            let plain = LookupKeyBuilder::from_key(&base).set_language(None).build();
            candidates.push(base);
            candidates.push(plain);
        } else {
            candidates.push(base);
        }
        candidates.into_iter().find_map(|key| {
            self.data_source
                .get(key.as_str())
                .map(|node| (key.as_str().to_owned(), node))
        })
    }

    /// A language is used for lookups when the country lists it and it is
    /// not the country's default.
    fn accepts_language(&self, region_code: &str, language: &str) -> bool {
        let country = self
            .data_source
            .default_data(&format!("{ROOT_KEY}/{region_code}"));
        let subtag = language_subtag(language);
        let is_default = country
            .get(AddressDataKey::Lang)
            .is_some_and(|default| language_subtag(default) == subtag);
        !is_default
            && country
                .get_list(AddressDataKey::Languages)
                .iter()
                .any(|listed| language_subtag(listed) == subtag)
    }

    fn child(&self, found: Option<(String, NodeData)>) -> Result<FieldVerifier, VerifierError> {
        let mut child = FieldVerifier {
            data_source: Arc::clone(&self.data_source),
            use_region_data_constants: self.use_region_data_constants,
            id: None,
            possibly_used: self.possibly_used.clone(),
            required: self.required.clone(),
            keys: Vec::new(),
            local_names: Vec::new(),
            latin_names: Vec::new(),
            candidate_values: HashMap::new(),
            format: self.format.clone(),
            match_pattern: self.match_pattern.clone(),
        };
        if let Some((key, node)) = found {
            child.populate(&key, &node);
        }
        child.candidate_values =
            build_name_to_key_map(&child.keys, &child.local_names, &child.latin_names).map_err(
                |(names, keys)| VerifierError::NameCountMismatch {
                    id: child.id.clone().unwrap_or_default(),
                    names,
                    keys,
                },
            )?;
        Ok(child)
    }

    fn populate(&mut self, key: &str, node: &NodeData) {
        let id = node.get(AddressDataKey::Id).unwrap_or(key).to_owned();
        self.keys = node.get_list(AddressDataKey::SubKeys);
        self.local_names = node.get_list(AddressDataKey::SubNames);
        self.latin_names = node.get_list(AddressDataKey::SubLnames);
        if self.local_names.is_empty()
            && !self.latin_names.is_empty()
            && self.latin_names.len() == self.keys.len()
        {
            self.local_names = self.keys.clone();
        }
        if let Some(fmt) = node.get(AddressDataKey::Fmt) {
            self.possibly_used = parse_format_fields(fmt);
        }
        if let Some(require) = node.get(AddressDataKey::Require) {
            self.required = parse_required_fields(require);
        }

        let country = LookupKey::parse(&id).ok().filter(LookupKey::is_country_key);
        if let Some(xzip) = node.get(AddressDataKey::Xzip) {
            self.format = compile_anchored(xzip);
        }
        if let Some(zip) = node.get(AddressDataKey::Zip) {
            if country.is_some() {
                self.format = compile_anchored(zip);
            } else {
                self.match_pattern = compile_prefix(zip);
            }
        }
        if let Some(region) = country
            .as_ref()
            .and_then(|k| k.value(AddressField::Country))
        {
            self.populate_possible_and_required(region);
        }
        self.id = Some(id);
    }

    fn populate_possible_and_required(&mut self, region_code: &str) {
        if self.use_region_data_constants {
            let order =
                FormatInterpreter::default().address_field_order(ScriptType::Local, region_code);
            self.possibly_used = order
                .into_iter()
                .map(|field| match field {
                    AddressField::AddressLine1 | AddressField::AddressLine2 => {
                        AddressField::StreetAddress
                    }
                    AddressField::Country
                    | AddressField::AdminArea
                    | AddressField::Locality
                    | AddressField::DependentLocality
                    | AddressField::PostalCode
                    | AddressField::SortingCode
                    | AddressField::Organization
                    | AddressField::Recipient
                    | AddressField::StreetAddress => field,
                })
                .chain([AddressField::Country])
                .collect();
            self.required = FormatInterpreter::required_fields(region_code);
            return;
        }

        let node = self
            .data_source
            .default_data(&format!("{ROOT_KEY}/{region_code}"));
        let defaults = self
            .data_source
            .default_data(&format!("{ROOT_KEY}/{DEFAULT_REGION}"));
        let value = |key| {
            node.get(key)
                .or_else(|| defaults.get(key))
                .map(str::to_owned)
        };
        if let Some(fmt) = value(AddressDataKey::Fmt) {
            self.possibly_used = parse_format_fields(&fmt);
        }
        if let Some(require) = value(AddressDataKey::Require) {
            self.required = parse_required_fields(&require);
        }
    }

    fn is_known_in_script(&self, script: Option<ScriptType>, value: &str) -> bool {
        let value = value.trim();
        match script {
            None => {
                self.candidate_values.is_empty()
                    || self.candidate_values.contains_key(&value.to_lowercase())
            }
            Some(script) => {
                let names = match script {
                    ScriptType::Latin => &self.latin_names,
                    ScriptType::Local => &self.local_names,
                };
                let mut known = names.iter().chain(&self.keys).peekable();
                known.peek().is_none() || known.any(|k| k.eq_ignore_ascii_case(value))
            }
        }
    }
}

impl fmt::Debug for FieldVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldVerifier")
            .field("id", &self.id)
            .field("keys", &self.keys)
            .field("possibly_used", &self.possibly_used)
            .field("required", &self.required)
            .field("format", &self.format.as_ref().map(Regex::as_str))
            .field("match_pattern", &self.match_pattern.as_ref().map(Regex::as_str))
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Postal code patterns
// ---------------------------------------------------------------------------

/// Compiles a pattern that must cover the whole value.
fn compile_anchored(pattern: &str) -> Option<Regex> {
    compile(&format!("^(?:{pattern})$"))
}

/// Compiles a pattern that must match at the start of the value.
fn compile_prefix(pattern: &str) -> Option<Regex> {
    compile(&format!("^(?:{pattern})"))
}

fn compile(pattern: &str) -> Option<Regex> {
    match RegexBuilder::new(pattern).case_insensitive(true).build() {
        Ok(re) => Some(re),
        Err(err) => {
            tracing::warn!(pattern, error = %err, "ignoring invalid postal code pattern");
            None
        }
    }
}
