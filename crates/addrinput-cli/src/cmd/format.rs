//! Implementation of `addrinput format <file>`.
//!
//! Prints the envelope lines of an address, using the format of its
//! country and the script of its language code.
use addrinput_core::FormatInterpreter;
use serde_json::json;

use crate::OutputFormat;
use crate::cmd::{parse_address, print_data};
use crate::error::CliError;

/// Runs the `format` command.
///
/// # Errors
///
/// [`CliError::ParseFailed`] when `content` is not an address object.
pub fn run(content: &str, source: &str, mode: OutputFormat) -> Result<(), CliError> {
    let address = parse_address(content, source)?;
    let lines = FormatInterpreter::default().envelope_address(&address);
    tracing::debug!(lines = lines.len(), "formatted envelope");
    print_data(&lines, &json!({ "lines": lines }), mode)
}
