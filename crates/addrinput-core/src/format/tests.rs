#![allow(clippy::expect_used)]

use super::*;
use crate::field::AddressField::{
    AddressLine1, AddressLine2, AdminArea, Country, DependentLocality, Locality, Organization,
    PostalCode, Recipient, SortingCode, StreetAddress,
};

fn lit(s: &str) -> FormatToken {
    FormatToken::Literal(s.to_owned())
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

#[test]
fn tokenizes_fields_newlines_and_literals() {
    assert_eq!(
        FormatInterpreter::tokenize("%N%n%C, %S %Z"),
        vec![
            FormatToken::Field(Recipient),
            FormatToken::NewLine,
            FormatToken::Field(Locality),
            lit(", "),
            FormatToken::Field(AdminArea),
            lit(" "),
            FormatToken::Field(PostalCode),
        ]
    );
}

#[test]
fn unknown_codes_and_trailing_percent_are_literal() {
    assert_eq!(
        FormatInterpreter::tokenize("CH-%Z %Q%"),
        vec![lit("CH-"), FormatToken::Field(PostalCode), lit(" %Q%")]
    );
}

#[test]
fn multibyte_literals_survive() {
    assert_eq!(
        FormatInterpreter::tokenize("〒%Z"),
        vec![lit("〒"), FormatToken::Field(PostalCode)]
    );
}

// ---------------------------------------------------------------------------
// Field order
// ---------------------------------------------------------------------------

#[test]
fn default_format_expands_street_address() {
    assert_eq!(
        field_order_of("%N%n%O%n%A%n%C"),
        vec![Recipient, Organization, AddressLine1, AddressLine2, Locality]
    );
}

#[test]
fn repeated_fields_keep_first_position() {
    assert_eq!(
        field_order_of("%Z %C%n%A%n%Z"),
        vec![PostalCode, Locality, AddressLine1, AddressLine2]
    );
}

#[test]
fn region_field_order() {
    let interpreter = FormatInterpreter::default();
    assert_eq!(
        interpreter.address_field_order(ScriptType::Local, "US"),
        vec![
            Recipient,
            Organization,
            AddressLine1,
            AddressLine2,
            Locality,
            AdminArea,
            PostalCode
        ]
    );
}

#[test]
fn latin_script_uses_lfmt() {
    let interpreter = FormatInterpreter::default();
    let local = interpreter.address_field_order(ScriptType::Local, "JP");
    let latin = interpreter.address_field_order(ScriptType::Latin, "JP");
    assert_eq!(local.first(), Some(&PostalCode));
    assert_eq!(latin.first(), Some(&Recipient));
}

#[test]
fn latin_script_without_lfmt_uses_fmt() {
    let interpreter = FormatInterpreter::default();
    assert_eq!(
        interpreter.address_field_order(ScriptType::Latin, "DE"),
        interpreter.address_field_order(ScriptType::Local, "DE")
    );
}

#[test]
fn unknown_region_uses_defaults() {
    let interpreter = FormatInterpreter::default();
    assert_eq!(
        interpreter.address_field_order(ScriptType::Local, "QQ"),
        vec![Recipient, Organization, AddressLine1, AddressLine2, Locality]
    );
}

#[test]
fn custom_order_moves_only_named_fields() {
    let mut builder = FormOptions::builder();
    builder
        .custom_field_order("US", &[PostalCode, Recipient, SortingCode])
        .expect("distinct fields");
    let interpreter = FormatInterpreter::new(builder.build());
    // Recipient and PostalCode swap slots; SortingCode is not used in the US.
    assert_eq!(
        interpreter.address_field_order(ScriptType::Local, "US"),
        vec![
            PostalCode,
            Organization,
            AddressLine1,
            AddressLine2,
            Locality,
            AdminArea,
            Recipient
        ]
    );
    // Other regions are unaffected.
    assert_eq!(
        interpreter.address_field_order(ScriptType::Local, "DE").first(),
        Some(&Recipient)
    );
}

#[test]
fn custom_order_expands_street_address() {
    let mut builder = FormOptions::builder();
    builder
        .custom_field_order("DE", &[Locality, StreetAddress])
        .expect("distinct fields");
    let interpreter = FormatInterpreter::new(builder.build());
    // DE: N O A1 A2 Z C -> A1, A2 and C share slots 2, 3 and 5.
    assert_eq!(
        interpreter.address_field_order(ScriptType::Local, "DE"),
        vec![Recipient, Organization, Locality, AddressLine1, PostalCode, AddressLine2]
    );
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

#[test]
fn envelope_drops_empty_lines() {
    let address = AddressData::builder()
        .set_recipient("Jane Doe")
        .add_address_line("500 Main St")
        .set_locality("Springfield")
        .set_admin_area("IL")
        .set_postal_code("62701")
        .build();
    assert_eq!(
        FormatInterpreter::envelope_lines("%N%n%O%n%A%n%C %S %Z", &address),
        vec!["Jane Doe", "500 Main St", "Springfield IL 62701"]
    );
}

#[test]
fn envelope_prunes_literals_around_empty_fields() {
    let address = AddressData::builder()
        .set_country("US")
        .add_address_line("1 Infinite Loop")
        .set_locality("Cupertino")
        .set_postal_code("95014")
        .build();
    // ", " precedes the empty admin area and " " follows it.
    assert_eq!(
        FormatInterpreter::default().envelope_address(&address),
        vec!["1 Infinite Loop", "Cupertino95014"]
    );
}

#[test]
fn envelope_keeps_literals_next_to_newlines() {
    let address = AddressData::builder()
        .set_country("CH")
        .set_organization("Google Schweiz")
        .add_address_line("Brandschenkestrasse 110")
        .set_locality("Zürich")
        .set_postal_code("8002")
        .build();
    assert_eq!(
        FormatInterpreter::default().envelope_address(&address),
        vec!["Google Schweiz", "Brandschenkestrasse 110", "CH-8002 Zürich"]
    );
}

#[test]
fn envelope_emits_extra_address_lines_separately() {
    let address = AddressData::builder()
        .set_country("JP")
        .set_language_code("ja-Latn")
        .set_address_lines(["1-13 Roppongi", "Minato-ku"])
        .set_admin_area("Tokyo")
        .set_postal_code("106-6126")
        .set_recipient("Taro Yamada")
        .build();
    assert_eq!(
        FormatInterpreter::default().envelope_address(&address),
        vec!["Taro Yamada", "1-13 Roppongi", "Minato-ku", "Tokyo", "106-6126"]
    );
}

#[test]
fn envelope_uses_local_format_without_language() {
    let address = AddressData::builder()
        .set_country("JP")
        .add_address_line("六本木6-10-1")
        .set_admin_area("東京都")
        .set_postal_code("106-6126")
        .build();
    assert_eq!(
        FormatInterpreter::default().envelope_address(&address),
        vec!["〒106-6126", "東京都", "六本木6-10-1"]
    );
}

#[test]
fn envelope_normalizes_whitespace_and_leading_punctuation() {
    let address = AddressData::builder()
        .set_locality("Paris")
        .set_sorting_code("CEDEX 07")
        .build();
    assert_eq!(
        FormatInterpreter::envelope_lines("%Z   -  %C ,  %X", &address),
        vec!["Paris , CEDEX 07"]
    );
}

#[test]
fn envelope_without_country_uses_defaults() {
    let address = AddressData::builder()
        .set_recipient("A. Person")
        .set_locality("Somewhere")
        .build();
    assert_eq!(
        FormatInterpreter::default().envelope_address(&address),
        vec!["A. Person", "Somewhere"]
    );
}

// ---------------------------------------------------------------------------
// Required fields and widths
// ---------------------------------------------------------------------------

#[test]
fn required_fields_include_country() {
    assert_eq!(
        FormatInterpreter::required_fields("US"),
        BTreeSet::from([Country, AdminArea, Locality, PostalCode, StreetAddress])
    );
    assert_eq!(
        FormatInterpreter::required_fields("AR"),
        BTreeSet::from([Country, Locality, StreetAddress])
    );
}

#[test]
fn width_overrides() {
    assert_eq!(
        FormatInterpreter::width_override(AdminArea, "BR"),
        Some(WidthType::Short)
    );
    assert_eq!(FormatInterpreter::width_override(Locality, "BR"), None);
    assert_eq!(FormatInterpreter::width_override(AdminArea, "US"), None);
    assert_eq!(AdminArea.width_for_region("BR"), WidthType::Short);
    assert_eq!(PostalCode.width_for_region("BR"), WidthType::Short);
    assert_eq!(DependentLocality.width_for_region("BR"), WidthType::Long);
}

#[test]
fn width_override_parsing() {
    assert_eq!(
        parse_width_overrides("%S:S%C:L"),
        Some(vec![(AdminArea, WidthType::Short), (Locality, WidthType::Long)])
    );
    assert_eq!(parse_width_overrides("%S:N"), Some(vec![(AdminArea, WidthType::Short)]));
    assert_eq!(parse_width_overrides("S:S"), None);
    assert_eq!(parse_width_overrides("%S:S%C"), None);
    assert_eq!(parse_width_overrides("%Q:S"), None);
    assert_eq!(parse_width_overrides("%S:Q"), None);
    assert_eq!(parse_width_overrides("%S-S"), None);
}

#[test]
fn format_field_sets() {
    assert_eq!(
        parse_format_fields("%N%n%O%n%A%n%C"),
        BTreeSet::from([Country, Recipient, Organization, StreetAddress, Locality])
    );
    assert_eq!(
        parse_required_fields("ACSZ"),
        BTreeSet::from([Country, StreetAddress, Locality, AdminArea, PostalCode])
    );
}
