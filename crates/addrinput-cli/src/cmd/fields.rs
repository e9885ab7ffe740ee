//! Implementation of `addrinput fields --region <cc>`.
//!
//! Prints the input fields of a region's address form in display order,
//! marking required fields and giving each field's width class.
//!
//! Flags:
//! - `--latin`: use the Latin-script format when the region has one.
//! - `--order a,b,..`: move the named fields into this order among the
//!   slots they already occupy.
use std::collections::BTreeSet;

use addrinput_core::region_constants::is_known_region;
use addrinput_core::{AddressField, FormOptions, FormatInterpreter, ScriptType, WidthType};
use serde_json::json;

use crate::OutputFormat;
use crate::cmd::print_data;
use crate::error::CliError;

/// Runs the `fields` command.
///
/// # Errors
///
/// [`CliError::InvalidOrder`] when `order` names a field twice.
pub fn run(
    region: &str,
    latin: bool,
    order: &[AddressField],
    mode: OutputFormat,
) -> Result<(), CliError> {
    let region = region.trim().to_ascii_uppercase();
    if !is_known_region(&region) {
        tracing::warn!(region = %region, "unknown region, using default format");
    }

    let mut options = FormOptions::builder();
    if !order.is_empty() {
        options
            .custom_field_order(&region, order)
            .map_err(|e| CliError::InvalidOrder {
                detail: e.to_string(),
            })?;
    }
    let script = if latin {
        ScriptType::Latin
    } else {
        ScriptType::Local
    };
    let fields =
        FormatInterpreter::new(options.build()).address_field_order(script, &region);
    let required = FormatInterpreter::required_fields(&region);

    let rows: Vec<FieldRow> = fields
        .iter()
        .map(|field| FieldRow {
            field: *field,
            required: is_required(*field, &required),
            width: field.width_for_region(&region),
        })
        .collect();

    let lines: Vec<String> = rows.iter().map(FieldRow::human).collect();
    let value = json!({
        "region": region,
        "fields": rows.iter().map(FieldRow::json).collect::<Vec<_>>(),
    });
    print_data(&lines, &value, mode)
}

struct FieldRow {
    field: AddressField,
    required: bool,
    width: WidthType,
}

impl FieldRow {
    fn width_name(&self) -> &'static str {
        match self.width {
            WidthType::Long => "LONG",
            WidthType::Short => "SHORT",
        }
    }

    fn human(&self) -> String {
        let marker = if self.required { " *" } else { "" };
        format!("{}{marker}\t{}", self.field, self.width_name())
    }

    fn json(&self) -> serde_json::Value {
        json!({
            "field": self.field.name(),
            "required": self.required,
            "width": self.width_name(),
        })
    }
}

/// The first street line carries the requirement of the street address.
fn is_required(field: AddressField, required: &BTreeSet<AddressField>) -> bool {
    match field {
        AddressField::AddressLine1 => required.contains(&AddressField::StreetAddress),
        AddressField::Country
        | AddressField::AdminArea
        | AddressField::Locality
        | AddressField::DependentLocality
        | AddressField::PostalCode
        | AddressField::SortingCode
        | AddressField::Organization
        | AddressField::Recipient
        | AddressField::StreetAddress
        | AddressField::AddressLine2 => required.contains(&field),
    }
}
