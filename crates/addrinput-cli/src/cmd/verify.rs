//! Implementation of `addrinput verify <file>`.
//!
//! Verifies an address against region data and writes one problem per line
//! to stderr, followed by a summary.
//!
//! Flags:
//! - `--field <f>`: report only the problem found in that field.
//!
//! Exit codes:
//! - 0 = no problems
//! - 1 = at least one problem
//! - 2 = the address or region data could not be read
use std::sync::Arc;

use addrinput_core::{AddressField, AddressProblems, DataSource, StandardAddressVerifier};

use crate::cmd::parse_address;
use crate::error::CliError;
use crate::output::{FormatterConfig, write_problem, write_summary};

/// Runs the `verify` command.
///
/// # Errors
///
/// - [`CliError::ParseFailed`]: `content` is not an address object.
/// - [`CliError::Verification`]: the verifier could not complete.
/// - [`CliError::AddressProblems`]: one or more problems were reported.
pub fn run(
    content: &str,
    source: &str,
    data_source: Arc<dyn DataSource>,
    field: Option<AddressField>,
    config: &FormatterConfig,
) -> Result<(), CliError> {
    let address = parse_address(content, source)?;
    let verifier = StandardAddressVerifier::new(data_source);

    let problems = match field {
        Some(field) => {
            let mut problems = AddressProblems::new();
            let found = verifier
                .verify_field(&address, field)
                .map_err(|e| CliError::Verification {
                    detail: e.to_string(),
                })?;
            if let Some(problem) = found {
                problems.add(field, problem);
            }
            problems
        }
        None => verifier
            .verify(&address)
            .map_err(|e| CliError::Verification {
                detail: e.to_string(),
            })?,
    };
    tracing::debug!(problems = %problems, "verification finished");

    let stderr = std::io::stderr();
    let mut err_out = stderr.lock();
    let io_error = |e: std::io::Error| CliError::IoError {
        source: "stderr".to_owned(),
        detail: e.to_string(),
    };
    for (field, problem) in problems.iter() {
        write_problem(&mut err_out, field, problem, config).map_err(io_error)?;
    }
    write_summary(&mut err_out, problems.len(), config).map_err(io_error)?;

    if problems.is_empty() {
        Ok(())
    } else {
        Err(CliError::AddressProblems {
            count: problems.len(),
        })
    }
}
