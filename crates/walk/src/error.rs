use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error returned by a [`Configurer`](crate::Configurer) to abort the walk.
///
/// Configurer failures are always fatal: a misconfigured subtree would
/// silently propagate to every descendant directory.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ConfigureError {
    message: String,
}

impl ConfigureError {
    /// Creates an error with the provided message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Fatal error raised before or during a walk.
///
/// Unreadable entries, dangling symlinks, and parse failures inside the
/// tree are not represented here; they are logged and skipped so traversal
/// can continue.
#[derive(Debug, Error)]
pub enum WalkError {
    /// The repository root could not be resolved.
    #[error("failed to resolve repository root '{path}': {source}", path = path.display())]
    Root {
        /// Configured repository root.
        path: PathBuf,
        /// Underlying error emitted by the operating system.
        #[source]
        source: io::Error,
    },

    /// A requested directory does not name a location inside the repository.
    #[error("requested directory '{path}' is outside the repository root")]
    OutsideRoot {
        /// The offending requested path as supplied by the caller.
        path: String,
    },

    /// A configurer rejected a directory's configuration.
    #[error("configurer failed in '{rel}'")]
    Configure {
        /// Repo-relative path of the directory being configured.
        rel: String,
        /// The failure reported by the configurer.
        #[source]
        source: ConfigureError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outside_root_names_the_path() {
        let err = WalkError::OutsideRoot {
            path: "../escape".to_string(),
        };
        assert!(err.to_string().contains("../escape"));
    }

    #[test]
    fn configure_error_chains_source() {
        use std::error::Error;

        let err = WalkError::Configure {
            rel: "pkg".to_string(),
            source: ConfigureError::new("bad flag"),
        };
        assert!(err.to_string().contains("pkg"));
        assert_eq!(err.source().expect("source").to_string(), "bad flag");
    }
}
