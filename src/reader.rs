//! Input file reading.
//!
//! Loads the labeled records file into memory as an ordered list of lines.
//! Read failures are reported to the user and turned into an empty sequence,
//! so a missing file behaves like an empty one for the rest of the run.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while reading the input file.
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("The file '{}' was not found.", path.display())]
    NotFound { path: PathBuf },

    #[error("An error occurred: {source} ({})", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ReadError {
    fn from_io(path: &Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => ReadError::NotFound {
                path: path.to_path_buf(),
            },
            _ => ReadError::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

/// Read every line of the file at `path`, in order.
///
/// `\n`, `\r\n` and a lone `\r` all end a line and are not part of the
/// returned lines. A trailing terminator does not produce an extra empty line.
pub fn read_lines(path: &Path) -> Result<Vec<String>, ReadError> {
    let content = std::fs::read_to_string(path).map_err(|e| ReadError::from_io(path, e))?;

    let normalized = content.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<String> = normalized
        .split_terminator('\n')
        .map(String::from)
        .collect();
    debug!("Read {} lines from {}", lines.len(), path.display());

    Ok(lines)
}

/// Read the file, printing any error and returning an empty sequence instead.
///
/// The message goes to stdout, next to the misaligned-input message.
pub fn read_lines_or_empty(path: &Path) -> Vec<String> {
    match read_lines(path) {
        Ok(lines) => lines,
        Err(e) => {
            warn!("Could not read {}: {}", path.display(), e);
            println!("{}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_read_lines_in_order() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "correct,a\nwrong,b\r\n\nlast").unwrap();

        let lines = read_lines(file.path()).unwrap();
        assert_eq!(lines, vec!["correct,a", "wrong,b", "", "last"]);
    }

    #[test]
    fn test_cr_only_line_endings() {
        let mut file = NamedTempFile::new().unwrap();
        for i in 0..10 {
            write!(file, "wrong,{}\r", i).unwrap();
        }

        let lines = read_lines(file.path()).unwrap();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "wrong,0");
        assert_eq!(lines[9], "wrong,9");
    }

    #[test]
    fn test_mixed_line_endings() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "a\rb\r\nc\n\r\nd").unwrap();

        let lines = read_lines(file.path()).unwrap();
        assert_eq!(lines, vec!["a", "b", "c", "", "d"]);
    }

    #[test]
    fn test_trailing_newline_adds_no_line() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "one").unwrap();
        writeln!(file, "two").unwrap();

        assert_eq!(read_lines(file.path()).unwrap().len(), 2);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.txt");

        let err = read_lines(&path).unwrap_err();
        assert!(matches!(err, ReadError::NotFound { .. }));
        assert!(err.to_string().contains("was not found"));
        assert!(err.to_string().contains("missing.txt"));
    }

    #[test]
    fn test_directory_is_generic_error() {
        let dir = TempDir::new().unwrap();

        let err = read_lines(dir.path()).unwrap_err();
        assert!(matches!(err, ReadError::Io { .. }));
        assert!(err.to_string().starts_with("An error occurred"));
    }

    #[test]
    fn test_invalid_utf8_is_generic_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xfe, b'\n']).unwrap();

        assert!(matches!(
            read_lines(file.path()),
            Err(ReadError::Io { .. })
        ));
    }

    #[test]
    fn test_read_lines_or_empty_on_missing_file() {
        let dir = TempDir::new().unwrap();
        let lines = read_lines_or_empty(&dir.path().join("nope.txt"));
        assert!(lines.is_empty());
    }
}
