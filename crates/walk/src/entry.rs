use std::path::Path;

use buildfile::BuildFile;

use crate::config::Configuration;

/// Snapshot of one visited directory, handed to the visitor callback.
///
/// Entries borrow from the walker's per-directory state and are only valid
/// for the duration of the callback. The walker invokes the visitor exactly
/// once per visited directory, in post-order.
#[derive(Debug)]
pub struct WalkEntry<'a> {
    pub(crate) dir: &'a Path,
    pub(crate) rel: &'a str,
    pub(crate) config: &'a Configuration,
    pub(crate) update: bool,
    pub(crate) build_file: Option<&'a BuildFile>,
    pub(crate) subdirs: &'a [String],
    pub(crate) regular_files: &'a [String],
    pub(crate) generated_files: &'a [String],
}

impl WalkEntry<'_> {
    /// Returns the absolute path of the visited directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.dir
    }

    /// Returns the directory's repo-relative slash-form path. The
    /// repository root is the empty string.
    #[must_use]
    pub fn rel(&self) -> &str {
        self.rel
    }

    /// Returns the directory's effective configuration.
    #[must_use]
    pub fn config(&self) -> &Configuration {
        self.config
    }

    /// Reports whether the generator should update this directory's build
    /// file. False for directories outside the requested set, directories
    /// marked `ignore`, and directories whose build file failed to parse.
    #[must_use]
    pub fn update(&self) -> bool {
        self.update
    }

    /// Returns the directory's parsed build file, or `None` when absent or
    /// unparseable.
    #[must_use]
    pub fn build_file(&self) -> Option<&BuildFile> {
        self.build_file
    }

    /// Returns the surviving subdirectory names in lexical order.
    #[must_use]
    pub fn subdirs(&self) -> &[String] {
        self.subdirs
    }

    /// Returns the surviving regular file names in lexical order,
    /// including the chosen build file's name.
    #[must_use]
    pub fn regular_files(&self) -> &[String] {
        self.regular_files
    }

    /// Returns the file names declared as rule outputs, in declaration
    /// order without duplicates. A name may also appear in
    /// [`WalkEntry::regular_files`] when a file of the same name exists on
    /// disk.
    #[must_use]
    pub fn generated_files(&self) -> &[String] {
        self.generated_files
    }
}
