//! Symlink descent rules.
//!
//! A symlinked directory entry is descended into only when doing so cannot
//! revisit territory the walk already covers. In-repo targets are skipped
//! because their canonical paths are reached by the ordinary descent;
//! external targets are followed by default; `follow` directives override
//! the in-repo rule for specific links. Canonical targets of every
//! followed link are recorded for the lifetime of the walk so chained and
//! nested links cannot re-enter a followed subtree.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Configuration;

pub(crate) struct SymlinkResolver {
    root: PathBuf,
    followed: Vec<PathBuf>,
}

impl SymlinkResolver {
    /// `root` must be the canonicalized repository root.
    pub(crate) fn new(root: PathBuf) -> Self {
        Self {
            root,
            followed: Vec::new(),
        }
    }

    /// Decides whether the walker may descend into the symlink `dir/base`
    /// whose repo-relative path is `rel`.
    pub(crate) fn should_descend(
        &mut self,
        config: &Configuration,
        dir: &Path,
        rel: &str,
        base: &str,
    ) -> bool {
        let link = dir.join(base);
        let target = match fs::canonicalize(&link) {
            Ok(target) => target,
            Err(error) => {
                // Dangling links and symlink cycles fail resolution.
                debug!(link = %link.display(), %error, "skipping unresolvable symlink");
                return false;
            }
        };
        if !target.is_dir() {
            return false;
        }
        if self
            .followed
            .iter()
            .any(|seen| target.starts_with(seen))
        {
            debug!(link = %link.display(), target = %target.display(), "skipping link into followed subtree");
            return false;
        }
        if config.follows(rel) {
            self.followed.push(target);
            return true;
        }
        if target.starts_with(&self.root) {
            // Reached through its canonical path instead.
            return false;
        }
        self.followed.push(target);
        true
    }
}
