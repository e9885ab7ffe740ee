/// CLI error types with associated exit codes.
///
/// Every [`CliError`] variant maps to a stable exit code via
/// [`CliError::exit_code`]:
///
/// - Exit code **2**: input failure. The address, bundle or arguments could
///   not be read or understood, so no verification ran.
/// - Exit code **1**: the command ran to completion and found problems in
///   the address.
use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// CliError
// ---------------------------------------------------------------------------

/// All error conditions that the `addrinput` CLI can produce.
#[derive(Debug)]
pub enum CliError {
    // --- Exit code 2: input failures ---
    /// A file argument could not be found on the filesystem.
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// The process lacks permission to read a file.
    PermissionDenied {
        /// The path that could not be read.
        path: PathBuf,
    },

    /// The input exceeds the configured `--max-file-size` limit.
    FileTooLarge {
        /// `"-"` for stdin, or the filesystem path.
        source: String,
        /// The configured size limit in bytes.
        limit: u64,
        /// The actual size in bytes; unknown for stdin.
        actual: Option<u64>,
    },

    /// The input bytes are not valid UTF-8.
    InvalidUtf8 {
        source: String,
        /// The byte offset of the first invalid byte sequence.
        byte_offset: usize,
    },

    /// An I/O error occurred while reading from stdin.
    StdinReadError { detail: String },

    /// A generic I/O error not covered by the more specific variants above.
    IoError { source: String, detail: String },

    /// The input is not an address object or data bundle.
    ParseFailed { source: String, detail: String },

    /// A lookup key argument could not be parsed.
    InvalidKey { key: String, detail: String },

    /// `--order` lists a field twice.
    InvalidOrder { detail: String },

    /// The region data needed by the command could not be used.
    DataLoad { detail: String },

    /// Verification could not complete.
    Verification { detail: String },

    // --- Exit code 1: logical failures ---
    /// Verification found problems in the address.
    ///
    /// The problems have already been printed; this variant exists so
    /// `main` can exit with status 1 cleanly.
    AddressProblems { count: usize },
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::FileTooLarge { .. }
            | Self::InvalidUtf8 { .. }
            | Self::StdinReadError { .. }
            | Self::IoError { .. }
            | Self::ParseFailed { .. }
            | Self::InvalidKey { .. }
            | Self::InvalidOrder { .. }
            | Self::DataLoad { .. }
            | Self::Verification { .. } => 2,

            Self::AddressProblems { .. } => 1,
        }
    }

    /// Returns a human-readable error message suitable for printing to stderr.
    pub fn message(&self) -> String {
        match self {
            Self::FileNotFound { path } => {
                format!("error: file not found: {}", path.display())
            }
            Self::PermissionDenied { path } => {
                format!("error: permission denied: {}", path.display())
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: Some(actual),
            } => {
                format!("error: file too large: {source} is {actual} bytes, limit is {limit} bytes")
            }
            Self::FileTooLarge {
                source,
                limit,
                actual: None,
            } => {
                format!("error: file too large: {source} exceeded limit of {limit} bytes")
            }
            Self::InvalidUtf8 {
                source,
                byte_offset,
            } => {
                format!(
                    "error: invalid UTF-8 in {source}: first invalid byte at offset {byte_offset}"
                )
            }
            Self::StdinReadError { detail } => {
                format!("error: failed to read stdin: {detail}")
            }
            Self::IoError { source, detail } => {
                format!("error: I/O error reading {source}: {detail}")
            }
            Self::ParseFailed { source, detail } => {
                format!("error: cannot parse {source}: {detail}")
            }
            Self::InvalidKey { key, detail } => {
                format!("error: invalid lookup key '{key}': {detail}")
            }
            Self::InvalidOrder { detail } => {
                format!("error: invalid field order: {detail}")
            }
            Self::DataLoad { detail } => {
                format!("error: region data unavailable: {detail}")
            }
            Self::Verification { detail } => {
                format!("error: verification failed to run: {detail}")
            }
            Self::AddressProblems { count: 1 } => "error: address has 1 problem".to_owned(),
            Self::AddressProblems { count } => {
                format!("error: address has {count} problems")
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for CliError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
