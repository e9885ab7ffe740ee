//! Subcommand implementations, one module per command.
//!
//! Shared here: building the region data source from the global flags,
//! parsing address files, and the stdout writer used for command data.
pub mod fields;
pub mod format;
pub mod key;
pub mod regions;
pub mod verify;

use std::sync::Arc;
use std::time::Duration;

use addrinput_core::{
    AddressData, BootstrapDataSource, CachingConfig, CachingDataSource, DataSource,
    DirectoryFetcher, MapDataSource,
};

use crate::Cli;
use crate::error::CliError;
use crate::io::read_file;
use crate::output::write_data;

/// Builds the data source selected by `--data` / `--data-dir`.
///
/// - `--data FILE`: every node preloaded from a bundle.
/// - `--data-dir DIR`: nodes fetched on demand and cached, each wait
///   bounded by `--timeout-ms`.
/// - neither: compiled-in country metadata only.
///
/// # Errors
///
/// [`CliError`] with exit code 2 if the bundle cannot be read or is not a
/// JSON object.
pub fn data_source(cli: &Cli) -> Result<Arc<dyn DataSource>, CliError> {
    if let Some(path) = &cli.data {
        let text = read_file(path, cli.max_file_size)?;
        let source = MapDataSource::parse_bundle(&text).map_err(|e| CliError::DataLoad {
            detail: format!("{}: {e}", path.display()),
        })?;
        tracing::debug!(bundle = %path.display(), nodes = source.len(), "using data bundle");
        return Ok(Arc::new(source));
    }
    if let Some(dir) = &cli.data_dir {
        let config = CachingConfig {
            timeout: Duration::from_millis(cli.timeout_ms),
        };
        tracing::debug!(dir = %dir.display(), timeout_ms = cli.timeout_ms, "using data directory");
        return Ok(Arc::new(CachingDataSource::with_config(
            DirectoryFetcher::new(dir),
            config,
        )));
    }
    tracing::debug!("using compiled-in region data");
    Ok(Arc::new(BootstrapDataSource::new()))
}

/// Parses an address JSON object.
///
/// # Errors
///
/// [`CliError::ParseFailed`] with the line and column of the syntax error.
pub fn parse_address(content: &str, source: &str) -> Result<AddressData, CliError> {
    serde_json::from_str(content).map_err(|e| CliError::ParseFailed {
        source: source.to_owned(),
        detail: format!("line {}, column {}: {e}", e.line(), e.column()),
    })
}

/// Writes command data to stdout through a locked handle.
pub(crate) fn print_data<S: AsRef<str>>(
    lines: &[S],
    value: &serde_json::Value,
    mode: crate::OutputFormat,
) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_data(&mut out, lines, value, mode).map_err(|e| CliError::IoError {
        source: "stdout".to_owned(),
        detail: e.to_string(),
    })
}
