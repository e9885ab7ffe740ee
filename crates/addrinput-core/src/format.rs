/// Interpretation of per-country address format strings.
///
/// A format string such as `%N%n%O%n%A%n%C, %S %Z` describes both the order
/// of input fields and the layout of a printed envelope: `%` followed by a
/// field code is a field, `%n` is a line break and everything else is literal
/// text. Format data comes from the compiled-in region constants, so the
/// interpreter is usable before any dynamic data has been fetched.
use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::address::AddressData;
use crate::data_key::AddressDataKey;
use crate::field::{AddressField, WidthType};
use crate::form_options::FormOptions;
use crate::lookup_key::ScriptType;
use crate::region_constants;
use crate::util::static_regex;

// ---------------------------------------------------------------------------
// FormatToken
// ---------------------------------------------------------------------------

/// One token of a format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatToken {
    /// `%<code>` for a known field code.
    Field(AddressField),
    /// `%n`.
    NewLine,
    /// Literal text, kept verbatim.
    Literal(String),
}

impl FormatToken {
    fn field(&self) -> Option<AddressField> {
        match self {
            Self::Field(f) => Some(*f),
            Self::NewLine | Self::Literal(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Line normalisation
// ---------------------------------------------------------------------------

static WHITESPACE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| static_regex(r"\s+"));

static LEADING_PUNCTUATION_RE: LazyLock<Regex> = LazyLock::new(|| static_regex(r"^[-,\s]+"));

/// Collapses whitespace runs and strips leading `-`, `,` and whitespace.
fn normalize_line(line: &str) -> String {
    let collapsed = WHITESPACE_RUN_RE.replace_all(line, " ");
    LEADING_PUNCTUATION_RE
        .replace(&collapsed, "")
        .trim_end()
        .to_owned()
}

/// Accumulates envelope output lines.
#[derive(Default)]
struct LineWriter {
    lines: Vec<String>,
    current: String,
}

impl LineWriter {
    fn push_str(&mut self, s: &str) {
        self.current.push_str(s);
    }

    fn flush(&mut self) {
        let line = normalize_line(&self.current);
        if !line.is_empty() {
            self.lines.push(line);
        }
        self.current.clear();
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        self.lines
    }
}

// ---------------------------------------------------------------------------
// FormatInterpreter
// ---------------------------------------------------------------------------

/// Turns country format data into field orders and envelope lines.
#[derive(Debug, Clone, Default)]
pub struct FormatInterpreter {
    options: FormOptions,
}

impl FormatInterpreter {
    /// Creates an interpreter applying `options`.
    pub fn new(options: FormOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    /// Splits a format string into tokens.
    ///
    /// `%n` is a line break and `%<code>` a field; an unknown `%<char>` and a
    /// trailing lone `%` are kept as literal text. Adjacent literal text is
    /// merged into one token.
    pub fn tokenize(format: &str) -> Vec<FormatToken> {
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut chars = format.chars();
        while let Some(c) = chars.next() {
            if c != '%' {
                literal.push(c);
                continue;
            }
            let Some(code) = chars.next() else {
                literal.push('%');
                break;
            };
            let token = if code == 'n' {
                FormatToken::NewLine
            } else if let Some(field) = AddressField::from_code(code) {
                FormatToken::Field(field)
            } else {
                literal.push('%');
                literal.push(code);
                continue;
            };
            if !literal.is_empty() {
                tokens.push(FormatToken::Literal(std::mem::take(&mut literal)));
            }
            tokens.push(token);
        }
        if !literal.is_empty() {
            tokens.push(FormatToken::Literal(literal));
        }
        tracing::trace!(format, tokens = tokens.len(), "tokenized format");
        tokens
    }

    /// Returns the format string for `region_code` in `script`.
    ///
    /// Latin script prefers `lfmt` and falls back to `fmt`; a region without
    /// `fmt` uses the `ZZ` default.
    pub fn format_string(script: ScriptType, region_code: &str) -> &'static str {
        let latin = match script {
            ScriptType::Latin => region_constants::country_value(region_code, AddressDataKey::Lfmt),
            ScriptType::Local => None,
        };
        latin
            .or_else(|| region_constants::country_value_or_default(region_code, AddressDataKey::Fmt))
            .unwrap_or_default()
    }

    /// Returns the input fields of `region_code` in display order.
    ///
    /// Fields appear once, at their first occurrence. The street address
    /// expands to [`AddressField::AddressLine1`] followed by
    /// [`AddressField::AddressLine2`]. A custom order from the
    /// [`FormOptions`] rearranges only the fields it names, among the slots
    /// those fields already occupy; named fields the region does not use are
    /// ignored.
    pub fn address_field_order(&self, script: ScriptType, region_code: &str) -> Vec<AddressField> {
        let format = Self::format_string(script, region_code);
        let mut order = field_order_of(format);
        if let Some(custom) = self.options.custom_field_order(region_code) {
            apply_custom_order(&mut order, &expand_street_address(custom.iter().copied()));
        }
        order
    }

    /// Formats `address` as envelope lines using its country's format.
    ///
    /// The format is chosen by the script of the address's language code.
    pub fn envelope_address(&self, address: &AddressData) -> Vec<String> {
        let region = address.postal_country().unwrap_or_default();
        let script = address
            .language_code()
            .map_or(ScriptType::Local, ScriptType::for_language);
        Self::envelope_lines(Self::format_string(script, region), address)
    }

    /// Formats `address` with an explicit format string.
    ///
    /// Empty fields are removed together with literal text that directly
    /// follows a removed field or directly precedes an empty field. The
    /// first street address line joins the current line and each further
    /// line is emitted on its own. Lines are normalised and blank lines are
    /// skipped.
    pub fn envelope_lines(format: &str, address: &AddressData) -> Vec<String> {
        let tokens = Self::tokenize(format);
        let is_empty_field = |token: Option<&FormatToken>| {
            token
                .and_then(FormatToken::field)
                .is_some_and(|f| address.is_field_empty(f))
        };

        let mut writer = LineWriter::default();
        for (i, token) in tokens.iter().enumerate() {
            match token {
                FormatToken::NewLine => writer.flush(),
                FormatToken::Field(field) => {
                    if !address.is_field_empty(*field) {
                        render_field(&mut writer, address, *field);
                    }
                }
                FormatToken::Literal(text) => {
                    let follows_removed = i > 0 && is_empty_field(tokens.get(i - 1));
                    let precedes_empty = is_empty_field(tokens.get(i + 1));
                    if !follows_removed && !precedes_empty {
                        writer.push_str(text);
                    }
                }
            }
        }
        writer.finish()
    }

    /// Returns the required fields of `region_code`.
    ///
    /// Parsed from the region's `require` string, falling back to `ZZ`.
    /// [`AddressField::Country`] is always required.
    pub fn required_fields(region_code: &str) -> BTreeSet<AddressField> {
        let require =
            region_constants::country_value_or_default(region_code, AddressDataKey::Require)
                .unwrap_or_default();
        parse_required_fields(require)
    }

    /// Returns the width override of `field` in `region_code`, if any.
    ///
    /// The `width_overrides` value is a repetition of `%<field>:<width>`.
    /// A malformed value yields `None`.
    pub fn width_override(field: AddressField, region_code: &str) -> Option<WidthType> {
        let overrides =
            region_constants::country_value(region_code, AddressDataKey::WidthOverrides)?;
        parse_width_overrides(overrides)?
            .into_iter()
            .find(|(f, _)| *f == field)
            .map(|(_, width)| width)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn render_field(writer: &mut LineWriter, address: &AddressData, field: AddressField) {
    match field {
        AddressField::StreetAddress => {
            let Some((first, rest)) = address.address_lines().split_first() else {
                return;
            };
            writer.push_str(first);
            if rest.is_empty() {
                return;
            }
            writer.flush();
            for line in rest {
                writer.push_str(line);
                writer.flush();
            }
        }
        // The country is never printed by the format itself.
        AddressField::Country => {}
        AddressField::AdminArea
        | AddressField::Locality
        | AddressField::DependentLocality
        | AddressField::PostalCode
        | AddressField::SortingCode
        | AddressField::Organization
        | AddressField::Recipient
        | AddressField::AddressLine1
        | AddressField::AddressLine2 => {
            if let Some(value) = address.field_value(field) {
                writer.push_str(value);
            }
        }
    }
}

/// Replaces [`AddressField::StreetAddress`] with the two address line
/// fields and drops repeats.
fn expand_street_address(fields: impl IntoIterator<Item = AddressField>) -> Vec<AddressField> {
    let mut out = Vec::new();
    for field in fields {
        let expanded: &[AddressField] = match field {
            AddressField::StreetAddress => &[AddressField::AddressLine1, AddressField::AddressLine2],
            AddressField::Country
            | AddressField::AdminArea
            | AddressField::Locality
            | AddressField::DependentLocality
            | AddressField::PostalCode
            | AddressField::SortingCode
            | AddressField::Organization
            | AddressField::Recipient
            | AddressField::AddressLine1
            | AddressField::AddressLine2 => std::slice::from_ref(&field),
        };
        for f in expanded {
            if !out.contains(f) {
                out.push(*f);
            }
        }
    }
    out
}

/// Field order of a format string, before custom ordering.
fn field_order_of(format: &str) -> Vec<AddressField> {
    expand_street_address(
        FormatInterpreter::tokenize(format)
            .iter()
            .filter_map(FormatToken::field),
    )
}

/// Moves the fields of `custom` into the slots they occupy in `order`, in
/// the custom sequence.
fn apply_custom_order(order: &mut [AddressField], custom: &[AddressField]) {
    let present: Vec<AddressField> = custom
        .iter()
        .copied()
        .filter(|f| order.contains(f))
        .collect();
    let slots: Vec<usize> = order
        .iter()
        .enumerate()
        .filter(|(_, f)| present.contains(f))
        .map(|(i, _)| i)
        .collect();
    for (slot, field) in slots.into_iter().zip(present) {
        order[slot] = field;
    }
}

/// Parses a `require` string; [`AddressField::Country`] is always included.
pub(crate) fn parse_required_fields(require: &str) -> BTreeSet<AddressField> {
    let mut fields = BTreeSet::from([AddressField::Country]);
    for c in require.chars() {
        match AddressField::from_code(c) {
            Some(field) => {
                fields.insert(field);
            }
            None => tracing::warn!(code = %c, require, "unknown field code in require string"),
        }
    }
    fields
}

/// Parses the fields named in a format string, mapping the address lines to
/// [`AddressField::StreetAddress`]. [`AddressField::Country`] is always
/// included.
pub(crate) fn parse_format_fields(format: &str) -> BTreeSet<AddressField> {
    let mut fields = BTreeSet::from([AddressField::Country]);
    for field in FormatInterpreter::tokenize(format)
        .iter()
        .filter_map(FormatToken::field)
    {
        let field = match field {
            AddressField::AddressLine1 | AddressField::AddressLine2 => AddressField::StreetAddress,
            AddressField::Country
            | AddressField::AdminArea
            | AddressField::Locality
            | AddressField::DependentLocality
            | AddressField::PostalCode
            | AddressField::SortingCode
            | AddressField::Organization
            | AddressField::Recipient
            | AddressField::StreetAddress => field,
        };
        fields.insert(field);
    }
    fields
}

/// Parses `%<field>:<width>` pairs. Any malformed pair yields `None`.
fn parse_width_overrides(overrides: &str) -> Option<Vec<(AddressField, WidthType)>> {
    let rest = overrides.strip_prefix('%')?;
    rest.split('%')
        .map(|segment| {
            let mut chars = segment.chars();
            let (Some(f), Some(':'), Some(w), None) =
                (chars.next(), chars.next(), chars.next(), chars.next())
            else {
                return None;
            };
            Some((AddressField::from_code(f)?, WidthType::from_code(w)?))
        })
        .collect()
}

#[cfg(test)]
mod tests;
