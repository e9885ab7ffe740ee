/// Small string helpers shared by the key model, the verifier and the form
/// controller.
use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// Separator of list-valued metadata entries (`sub_keys`, `languages`, ...).
pub const DATA_SEPARATOR: char = '~';

/// Language subtag reported for language codes that cannot be parsed.
pub const UNDETERMINED_LANGUAGE: &str = "und";

// ---------------------------------------------------------------------------
// Regex statics
// ---------------------------------------------------------------------------

/// Compiles a literal pattern. A pattern that fails to compile yields a
/// regex that never matches.
pub(crate) fn static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|_| {
        Regex::new("a^").unwrap_or_else(|_| unreachable!("regex engine broken"))
    })
}

/// `language[-_]Script` at the start of a tag.
static SCRIPT_TAG_RE: LazyLock<Regex> = LazyLock::new(|| static_regex(r"^\w{2,3}[-_](\w{4})"));

/// `language[-_Script][-_REGION]` covering the whole tag.
static LANGUAGE_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| static_regex(r"^(\w{2,3})(?:[-_]\w{4})?(?:[-_]\w{2})?$"));

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Trims `value` and maps empty results to `None`.
pub fn trim_to_none(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Trims `value` into an owned string, mapping empty results to `None`.
pub fn trim_to_owned(value: &str) -> Option<String> {
    trim_to_none(Some(value)).map(str::to_owned)
}

/// Splits a `~`-separated metadata value. `None` and `""` yield no items.
pub fn split_data(value: Option<&str>) -> Vec<String> {
    match value {
        Some(v) if !v.is_empty() => v.split(DATA_SEPARATOR).map(str::to_owned).collect(),
        Some(_) | None => Vec::new(),
    }
}

/// Returns `true` if the language tag names the Latin script explicitly,
/// e.g. `ja-Latn` or `zh_latn_CN`.
pub fn is_explicit_latin_script(language_code: &str) -> bool {
    SCRIPT_TAG_RE
        .captures(language_code)
        .and_then(|c| c.get(1))
        .is_some_and(|script| script.as_str().eq_ignore_ascii_case("latn"))
}

/// Returns the lower-cased language subtag of a BCP-47 style tag, or
/// [`UNDETERMINED_LANGUAGE`] when the tag has an unexpected shape.
pub fn language_subtag(language_code: &str) -> String {
    LANGUAGE_TAG_RE
        .captures(language_code)
        .and_then(|c| c.get(1))
        .map_or_else(
            || UNDETERMINED_LANGUAGE.to_owned(),
            |m| m.as_str().to_lowercase(),
        )
}

/// Builds the lower-cased name → key lookup used to resolve user input to
/// sub-region keys.
///
/// Keys map to themselves; local and Latin names map to the key at the same
/// index. Returns the offending list length when a name list is longer than
/// the key list.
pub(crate) fn build_name_to_key_map(
    keys: &[String],
    local_names: &[String],
    latin_names: &[String],
) -> Result<HashMap<String, String>, (usize, usize)> {
    let mut map = HashMap::with_capacity(keys.len() * 3);
    for key in keys {
        map.insert(key.to_lowercase(), key.clone());
    }
    for names in [local_names, latin_names] {
        if names.len() > keys.len() {
            return Err((names.len(), keys.len()));
        }
        for (name, key) in names.iter().zip(keys) {
            map.insert(name.to_lowercase(), key.clone());
        }
    }
    Ok(map)
}
