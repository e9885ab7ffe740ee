/// File and stdin reading with size enforcement and UTF-8 validation.
///
/// All input I/O of the `addrinput` binary goes through here; the core
/// library only touches the filesystem through `DirectoryFetcher`.
///
/// - Disk files: size checked via `std::fs::metadata` before any read.
/// - Stdin: buffered with a `Read::take` cap so allocation is bounded.
/// - Invalid UTF-8 is reported with the offset of the first bad byte.
use std::io::{ErrorKind, Read as _};
use std::path::Path;

use crate::PathOrStdin;
use crate::error::CliError;

/// Reads the entire contents of `source` into a `String`.
///
/// # Errors
///
/// Returns a [`CliError`] with exit code 2 when the source is missing,
/// unreadable, larger than `max_size`, or not UTF-8.
pub fn read_input(source: &PathOrStdin, max_size: u64) -> Result<String, CliError> {
    match source {
        PathOrStdin::Path(path) => read_file(path, max_size),
        PathOrStdin::Stdin => read_stdin(max_size),
    }
}

/// Returns the label used for `source` in error messages.
pub fn source_label(source: &PathOrStdin) -> String {
    match source {
        PathOrStdin::Path(path) => path.display().to_string(),
        PathOrStdin::Stdin => "-".to_owned(),
    }
}

// ---------------------------------------------------------------------------
// Disk file reading
// ---------------------------------------------------------------------------

/// Reads a disk file, enforcing the size limit and UTF-8 requirement.
pub fn read_file(path: &Path, max_size: u64) -> Result<String, CliError> {
    let file_size = std::fs::metadata(path)
        .map_err(|e| io_error_to_cli(&e, path))?
        .len();
    if file_size > max_size {
        return Err(CliError::FileTooLarge {
            source: path.display().to_string(),
            limit: max_size,
            actual: Some(file_size),
        });
    }

    let bytes = std::fs::read(path).map_err(|e| io_error_to_cli(&e, path))?;
    bytes_to_string(&bytes, &path.display().to_string())
}

/// Maps a `std::io::Error` arising from a disk-file operation to a [`CliError`].
fn io_error_to_cli(e: &std::io::Error, path: &Path) -> CliError {
    let kind = e.kind();
    if kind == ErrorKind::NotFound {
        CliError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else if kind == ErrorKind::PermissionDenied {
        CliError::PermissionDenied {
            path: path.to_path_buf(),
        }
    } else {
        CliError::IoError {
            source: path.display().to_string(),
            detail: e.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Stdin reading
// ---------------------------------------------------------------------------

/// Reads the entire stdin stream, capped at `max_size` bytes.
///
/// When exactly `max_size` bytes arrive, one more byte is probed to tell
/// "at the limit" from "over the limit".
fn read_stdin(max_size: u64) -> Result<String, CliError> {
    let stdin = std::io::stdin();
    let mut handle = stdin.lock();

    let mut buf: Vec<u8> = Vec::new();
    (&mut handle)
        .take(max_size)
        .read_to_end(&mut buf)
        .map_err(|e| CliError::StdinReadError {
            detail: e.to_string(),
        })?;

    if buf.len() as u64 == max_size {
        let mut probe = [0u8; 1];
        let extra = handle
            .read(&mut probe)
            .map_err(|e| CliError::StdinReadError {
                detail: e.to_string(),
            })?;
        if extra > 0 {
            return Err(CliError::FileTooLarge {
                source: "-".to_owned(),
                limit: max_size,
                actual: None,
            });
        }
    }

    bytes_to_string(&buf, "-")
}

fn bytes_to_string(bytes: &[u8], source_label: &str) -> Result<String, CliError> {
    match std::str::from_utf8(bytes) {
        Ok(s) => Ok(s.to_owned()),
        Err(e) => Err(CliError::InvalidUtf8 {
            source: source_label.to_owned(),
            byte_offset: e.valid_up_to(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]
    #![allow(clippy::panic)]
    #![allow(clippy::wildcard_enum_match_arm)]

    use std::io::Write as _;
    use std::path::PathBuf;

    use super::*;

    fn temp_file_with(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().expect("create temp file");
        f.write_all(contents).expect("write temp file");
        f
    }

    #[test]
    fn read_valid_utf8_file() {
        let content = r#"{"country":"US"}"#;
        let f = temp_file_with(content.as_bytes());
        let source = PathOrStdin::Path(f.path().to_path_buf());
        let result = read_input(&source, 1024).expect("should read file");
        assert_eq!(result, content);
    }

    #[test]
    fn read_file_exactly_at_limit_succeeds() {
        let f = temp_file_with(b"hello");
        let source = PathOrStdin::Path(f.path().to_path_buf());
        let result = read_input(&source, 5).expect("should succeed at limit");
        assert_eq!(result, "hello");
    }

    #[test]
    fn read_file_over_limit_reports_actual_size() {
        let f = temp_file_with(b"hello world");
        let source = PathOrStdin::Path(f.path().to_path_buf());
        let err = read_input(&source, 4).expect_err("should fail");
        assert_eq!(err.exit_code(), 2);
        match err {
            CliError::FileTooLarge {
                actual: Some(n), ..
            } => assert_eq!(n, 11),
            other => panic!("expected FileTooLarge, got {other:?}"),
        }
    }

    #[test]
    fn read_invalid_utf8_returns_error_with_offset() {
        let mut data = b"{\"x\"".to_vec();
        data.push(0xFF);
        let f = temp_file_with(&data);
        let source = PathOrStdin::Path(f.path().to_path_buf());
        match read_input(&source, 1024).expect_err("should fail on bad UTF-8") {
            CliError::InvalidUtf8 { byte_offset, .. } => assert_eq!(byte_offset, 4),
            other => panic!("expected InvalidUtf8, got {other:?}"),
        }
    }

    #[test]
    fn read_nonexistent_file_returns_file_not_found() {
        let source = PathOrStdin::Path(PathBuf::from("/no/such/file/ever.json"));
        let err = read_input(&source, 1024).expect_err("should fail");
        assert_eq!(err.exit_code(), 2);
        assert!(matches!(err, CliError::FileNotFound { .. }));
    }

    #[test]
    fn reading_a_directory_is_an_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = read_file(dir.path(), u64::MAX).expect_err("directories are not files");
        assert!(
            matches!(err, CliError::IoError { .. }),
            "expected IoError, got {err:?}"
        );
    }

    #[test]
    fn source_label_uses_dash_for_stdin() {
        assert_eq!(source_label(&PathOrStdin::Stdin), "-");
        assert_eq!(
            source_label(&PathOrStdin::Path(PathBuf::from("a.json"))),
            "a.json"
        );
    }
}
