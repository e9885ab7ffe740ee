//! Clap CLI definition: root struct, subcommands, and shared argument types.
use std::path::PathBuf;

use addrinput_core::AddressField;
use clap::{Parser, Subcommand, ValueEnum};

/// A CLI argument that is either a filesystem path or the stdin sentinel `"-"`.
///
/// Parsing `"-"` yields [`PathOrStdin::Stdin`]; anything else yields
/// [`PathOrStdin::Path`].
#[derive(Clone, Debug)]
pub enum PathOrStdin {
    /// Read from standard input.
    Stdin,
    /// Read from the given filesystem path.
    Path(PathBuf),
}

impl std::str::FromStr for PathOrStdin {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "-" {
            Ok(PathOrStdin::Stdin)
        } else {
            Ok(PathOrStdin::Path(PathBuf::from(s)))
        }
    }
}

/// Output format for CLI commands.
///
/// `Human` emits plain text to stdout and optionally colored problem lines
/// to stderr. `Json` emits a single JSON object for data and NDJSON for
/// problems.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, optionally colored output (default).
    Human,
    /// Structured JSON / NDJSON output.
    Json,
}

/// Parses a field given by name (`postal_code`) or format code (`Z`).
pub fn parse_field(s: &str) -> Result<AddressField, String> {
    AddressField::parse(s).ok_or_else(|| format!("unknown address field '{s}'"))
}

/// All top-level subcommands exposed by the `addrinput` binary.
#[derive(Subcommand)]
pub enum Command {
    /// Render an address as envelope lines.
    Format {
        /// Path to an address JSON file, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
    },

    /// Print the input field order of a region's address form.
    Fields {
        /// Region code, e.g. `US`.
        #[arg(long, value_name = "CC")]
        region: String,
        /// Use the Latin-script format when the region has one.
        #[arg(long)]
        latin: bool,
        /// Custom order for some of the fields, comma separated.
        #[arg(long, value_name = "FIELD,..", value_delimiter = ',', value_parser = parse_field)]
        order: Vec<AddressField>,
    },

    /// Check an address against region data.
    Verify {
        /// Path to an address JSON file, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
        /// Only report the problem found in this field.
        #[arg(long, value_name = "FIELD", value_parser = parse_field)]
        field: Option<AddressField>,
    },

    /// List the sub-regions below a lookup key.
    Regions {
        /// Lookup key such as `data/US` or `US/CA`; names are resolved to
        /// keys. Defaults to the list of countries.
        #[arg(value_name = "KEY")]
        key: Option<String>,
        /// Show Latin-script names.
        #[arg(long)]
        latin: bool,
    },

    /// Print the data lookup key of an address.
    Key {
        /// Path to an address JSON file, or `-` for stdin.
        #[arg(value_name = "FILE")]
        file: PathOrStdin,
    },
}

/// Root CLI struct for the `addrinput` binary.
///
/// All global flags are defined here and marked `global = true` so that clap
/// propagates them to every subcommand.
#[derive(Parser)]
#[command(
    name = "addrinput",
    version,
    about = "International postal address formatting and verification",
    long_about = "Formats postal addresses for envelopes, lists address form\n\
                  fields and sub-regions, and verifies addresses against\n\
                  region metadata."
)]
pub struct Cli {
    /// Active subcommand.
    #[command(subcommand)]
    pub command: Command,

    /// Output format: human (default) or json.
    #[arg(long, short = 'f', default_value = "human", global = true)]
    pub format: OutputFormat,

    /// Suppress all stderr output except errors (incompatible with `--verbose`).
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Increase stderr verbosity: debug logging of data loading and
    /// verification (incompatible with `--quiet`).
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Region data bundle: a JSON object mapping lookup keys to nodes.
    ///
    /// Can also be set via the `ADDRINPUT_DATA` environment variable.
    #[arg(long, global = true, env = "ADDRINPUT_DATA", value_name = "FILE")]
    pub data: Option<PathBuf>,

    /// Directory of per-key node files (`data_US.json`, `data_US_CA.json`),
    /// loaded on demand.
    ///
    /// Can also be set via the `ADDRINPUT_DATA_DIR` environment variable.
    #[arg(
        long,
        global = true,
        env = "ADDRINPUT_DATA_DIR",
        value_name = "DIR",
        conflicts_with = "data"
    )]
    pub data_dir: Option<PathBuf>,

    /// Time to wait for one node of `--data-dir` before falling back to
    /// bundled metadata, in milliseconds.
    #[arg(
        long,
        global = true,
        env = "ADDRINPUT_TIMEOUT_MS",
        default_value = "5000",
        value_name = "MS"
    )]
    pub timeout_ms: u64,

    /// Maximum input file size in bytes.
    ///
    /// Can also be set via the `ADDRINPUT_MAX_FILE_SIZE` environment
    /// variable. The CLI flag takes precedence over the environment variable.
    /// Default: 16777216 (16 MB).
    #[arg(
        long,
        global = true,
        env = "ADDRINPUT_MAX_FILE_SIZE",
        default_value = "16777216"
    )]
    pub max_file_size: u64,

    /// Disable ANSI color codes in human output.
    ///
    /// Also respects the `NO_COLOR` environment variable per
    /// <https://no-color.org>.
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,
}
