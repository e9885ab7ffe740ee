//! Implementation of `addrinput regions [key]`.
//!
//! Lists the sub-regions below a lookup key. Names in the key are first
//! resolved to sub-region keys, so `US/California` lists the same regions
//! as `data/US/CA`. Without a key the known countries are listed.
use std::sync::Arc;

use addrinput_core::{DataSource, FormController, FormError, LookupKey};
use serde_json::json;

use crate::OutputFormat;
use crate::cmd::print_data;
use crate::error::CliError;

/// Language tag selecting Latin-script region names.
const LATIN_LANGUAGE: &str = "und-Latn";

/// Runs the `regions` command.
///
/// # Errors
///
/// [`CliError::InvalidKey`] when `key` is not a data key.
pub fn run(
    key: Option<&str>,
    latin: bool,
    data_source: Arc<dyn DataSource>,
    mode: OutputFormat,
) -> Result<(), CliError> {
    let key = match key {
        Some(raw) => parse_data_key(raw)?,
        None => LookupKey::root(),
    };

    let mut controller = FormController::new(data_source);
    if latin {
        controller.set_language_code(Some(LATIN_LANGUAGE));
    }
    let invalid = |e: FormError| CliError::InvalidKey {
        key: key.to_string(),
        detail: e.to_string(),
    };
    let normalized = controller.normalize_lookup_key(&key).map_err(invalid)?;
    let regions = controller.region_data(&normalized).map_err(invalid)?;
    tracing::debug!(key = %normalized, regions = regions.len(), "listed sub-regions");

    let lines: Vec<String> = regions
        .iter()
        .map(|r| format!("{}\t{}", r.key, r.display_name()))
        .collect();
    let value = json!({
        "key": normalized.to_string(),
        "regions": regions
            .iter()
            .map(|r| json!({"key": r.key, "name": r.name}))
            .collect::<Vec<_>>(),
    });
    print_data(&lines, &value, mode)
}

/// Parses `raw` as a data key, accepting the short form `US/CA`.
fn parse_data_key(raw: &str) -> Result<LookupKey, CliError> {
    let raw = raw.trim().trim_matches('/');
    let full = if raw == "data" || raw.starts_with("data/") {
        raw.to_owned()
    } else {
        format!("data/{raw}")
    };
    LookupKey::parse(&full).map_err(|e| CliError::InvalidKey {
        key: raw.to_owned(),
        detail: e.to_string(),
    })
}
