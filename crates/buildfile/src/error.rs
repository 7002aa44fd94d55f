use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error produced when a build file cannot be read or parsed.
///
/// The error always carries the offending path so callers can surface
/// actionable diagnostics without pattern matching on the variant.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The file could not be read from disk.
    #[error("failed to read build file '{path}': {source}", path = path.display())]
    Read {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        #[source]
        source: io::Error,
    },

    /// The file contents violate the build-file grammar.
    #[error("syntax error in '{path}' at line {line}: {message}", path = path.display())]
    Syntax {
        /// Path of the malformed file.
        path: PathBuf,
        /// 1-based line number where parsing failed.
        line: usize,
        /// Description of the grammar violation.
        message: String,
    },
}

impl ParseError {
    /// Returns the path of the file the error refers to.
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Read { path, .. } | Self::Syntax { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_displays_line() {
        let err = ParseError::Syntax {
            path: PathBuf::from("pkg/BUILD.bazel"),
            line: 3,
            message: "expected ')'".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("pkg/BUILD.bazel"));
        assert!(msg.contains("line 3"));
        assert!(msg.contains("expected ')'"));
    }

    #[test]
    fn read_error_has_source() {
        use std::error::Error;

        let err = ParseError::Read {
            path: PathBuf::from("missing/BUILD"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.source().is_some());
        assert_eq!(err.path(), &PathBuf::from("missing/BUILD"));
    }
}
