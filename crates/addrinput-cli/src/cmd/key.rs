//! Implementation of `addrinput key <file>`.
//!
//! Prints the data key of the deepest hierarchy level an address names,
//! with region names resolved to sub-region keys.
use std::sync::Arc;

use addrinput_core::{DataSource, FormController};
use serde_json::json;

use crate::OutputFormat;
use crate::cmd::{parse_address, print_data};
use crate::error::CliError;

/// Runs the `key` command.
///
/// # Errors
///
/// [`CliError::ParseFailed`] when `content` is not an address object.
pub fn run(
    content: &str,
    source: &str,
    data_source: Arc<dyn DataSource>,
    mode: OutputFormat,
) -> Result<(), CliError> {
    let address = parse_address(content, source)?;
    let mut controller = FormController::new(data_source);
    controller.set_language_code(address.language_code());
    controller.set_current_country(address.postal_country());

    let key = controller.data_key_for(&address);
    let normalized = controller
        .normalize_lookup_key(&key)
        .map_err(|e| CliError::InvalidKey {
            key: key.to_string(),
            detail: e.to_string(),
        })?;
    tracing::debug!(key = %key, normalized = %normalized, "derived data key");

    let value = json!({
        "key": key.to_string(),
        "normalized": normalized.to_string(),
    });
    print_data(&[normalized.as_str()], &value, mode)
}
