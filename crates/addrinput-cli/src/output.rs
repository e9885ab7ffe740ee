/// Rendering of command results: human-readable and JSON modes.
///
/// Data (envelope lines, field orders, region lists, keys) goes to stdout.
/// Verification problems go to stderr:
///
/// - **Human mode** (default): one line per problem, the tag colored red.
///   Colors are disabled when `--no-color` is set, the `NO_COLOR`
///   environment variable is present (per <https://no-color.org>), or stderr
///   is not a TTY.
/// - **JSON mode**: each problem is a single-line JSON object (NDJSON),
///   followed by a summary object.
///
/// The **quiet** flag suppresses the summary line.
use std::io::{IsTerminal as _, Write};

use addrinput_core::{AddressField, AddressProblemType};
use serde_json::json;

use crate::OutputFormat;

// ---------------------------------------------------------------------------
// Color support detection
// ---------------------------------------------------------------------------

/// Returns `true` if ANSI color codes should be emitted to stderr.
pub fn colors_enabled(no_color_flag: bool) -> bool {
    if no_color_flag {
        return false;
    }
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    std::io::stderr().is_terminal()
}

const ANSI_RED: &str = "\x1b[31m";
const ANSI_RESET: &str = "\x1b[0m";

// ---------------------------------------------------------------------------
// FormatterConfig
// ---------------------------------------------------------------------------

/// Output settings derived from the global CLI flags.
#[derive(Debug, Clone, Copy)]
pub struct FormatterConfig {
    pub mode: OutputFormat,
    /// Whether ANSI colors are enabled.
    pub colors: bool,
    /// Suppress summaries on stderr.
    pub quiet: bool,
}

impl FormatterConfig {
    /// Builds a config from the raw flags; color detection also checks the
    /// `NO_COLOR` env var and the stderr TTY state.
    pub fn from_flags(mode: OutputFormat, no_color_flag: bool, quiet: bool) -> Self {
        Self {
            mode,
            colors: colors_enabled(no_color_flag),
            quiet,
        }
    }
}

// ---------------------------------------------------------------------------
// Problems
// ---------------------------------------------------------------------------

/// Writes one problem in the configured mode.
///
/// Human: `[P] POSTAL_CODE  MISMATCHING_VALUE: this value does not match ...`
///
/// JSON:
/// ```json
/// {"field":"POSTAL_CODE","problem":"MISMATCHING_VALUE","message":"..."}
/// ```
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_problem<W: Write>(
    writer: &mut W,
    field: AddressField,
    problem: AddressProblemType,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    match config.mode {
        OutputFormat::Human if config.colors => writeln!(
            writer,
            "{ANSI_RED}[P]{ANSI_RESET} {field}  {problem}: {}",
            problem.description()
        ),
        OutputFormat::Human => {
            writeln!(writer, "[P] {field}  {problem}: {}", problem.description())
        }
        OutputFormat::Json => {
            let line = json!({
                "field": field.name(),
                "problem": problem.code(),
                "message": problem.description(),
            });
            writeln!(writer, "{line}")
        }
    }
}

/// Writes the problem count; suppressed in quiet mode.
///
/// Human: `2 problems`. JSON: `{"summary":{"problems":2}}`.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_summary<W: Write>(
    writer: &mut W,
    problems: usize,
    config: &FormatterConfig,
) -> std::io::Result<()> {
    if config.quiet {
        return Ok(());
    }
    match config.mode {
        OutputFormat::Human => writeln!(
            writer,
            "{problems} {}",
            pluralize(problems, "problem", "problems")
        ),
        OutputFormat::Json => writeln!(writer, "{}", json!({"summary": {"problems": problems}})),
    }
}

// ---------------------------------------------------------------------------
// Data on stdout
// ---------------------------------------------------------------------------

/// Writes `lines` one per line in human mode, or `value` as a single JSON
/// document in JSON mode.
///
/// # Errors
///
/// Returns an error only if writing to `writer` fails.
pub fn write_data<W, S>(
    writer: &mut W,
    lines: &[S],
    value: &serde_json::Value,
    mode: OutputFormat,
) -> std::io::Result<()>
where
    W: Write,
    S: AsRef<str>,
{
    match mode {
        OutputFormat::Human => {
            for line in lines {
                writeln!(writer, "{}", line.as_ref())?;
            }
            Ok(())
        }
        OutputFormat::Json => writeln!(writer, "{value}"),
    }
}

fn pluralize<'a>(count: usize, singular: &'a str, plural: &'a str) -> &'a str {
    if count == 1 { singular } else { plural }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
