//! Traversal modes and the visit/update arbiter.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::error::WalkError;
use crate::path;

/// Controls which directories are visited and which are marked for update.
///
/// The requested-directory set supplied to [`walk`](crate::walk) is
/// interpreted against the active mode:
///
/// | Mode | Visit `r`? | Update? |
/// |------|------------|---------|
/// | `VisitAllUpdateSubdirs` | always | `r` equals or descends from a requested path |
/// | `VisitAllUpdateDirs` | always | `r` equals a requested path |
/// | `UpdateSubdirs` | iff update | `r` equals or descends from a requested path |
/// | `UpdateDirs` | iff update | `r` equals a requested path |
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Mode {
    /// Visit every directory; update requested subtrees.
    VisitAllUpdateSubdirs,
    /// Visit every directory; update exact requested directories only.
    VisitAllUpdateDirs,
    /// Visit and update exact requested directories only.
    UpdateDirs,
    /// Visit and update requested subtrees only.
    UpdateSubdirs,
}

impl Mode {
    pub(crate) const fn visits_all(self) -> bool {
        matches!(self, Self::VisitAllUpdateSubdirs | Self::VisitAllUpdateDirs)
    }

    pub(crate) const fn updates_subdirs(self) -> bool {
        matches!(self, Self::VisitAllUpdateSubdirs | Self::UpdateSubdirs)
    }

    const fn name(self) -> &'static str {
        match self {
            Self::VisitAllUpdateSubdirs => "VisitAllUpdateSubdirs",
            Self::VisitAllUpdateDirs => "VisitAllUpdateDirs",
            Self::UpdateDirs => "UpdateDirs",
            Self::UpdateSubdirs => "UpdateSubdirs",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error produced when a mode string is not one of the four mode names.
#[derive(Debug, Error)]
#[error("unknown walk mode '{0}'")]
pub struct ParseModeError(String);

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VisitAllUpdateSubdirs" => Ok(Self::VisitAllUpdateSubdirs),
            "VisitAllUpdateDirs" => Ok(Self::VisitAllUpdateDirs),
            "UpdateDirs" => Ok(Self::UpdateDirs),
            "UpdateSubdirs" => Ok(Self::UpdateSubdirs),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

/// Arbitrates (visit, update) per directory from the mode and the
/// requested rel-paths.
pub(crate) struct UpdateFilter {
    mode: Mode,
    /// Normalized requested paths.
    requested: Vec<String>,
    /// Requested paths plus every ancestor; directories the descent must
    /// pass through in update-only modes.
    reachable: BTreeSet<String>,
}

impl UpdateFilter {
    pub(crate) fn new(mode: Mode, dirs: &[String]) -> Result<Self, WalkError> {
        let mut requested = Vec::new();
        let mut reachable = BTreeSet::new();
        for dir in dirs {
            let rel = path::normalize(dir).ok_or_else(|| WalkError::OutsideRoot {
                path: dir.clone(),
            })?;
            let mut end = 0usize;
            while let Some(slash) = rel[end..].find('/') {
                reachable.insert(rel[..end + slash].to_string());
                end += slash + 1;
            }
            reachable.insert(rel.clone());
            if !requested.contains(&rel) {
                requested.push(rel);
            }
        }
        Ok(Self {
            mode,
            requested,
            reachable,
        })
    }

    /// Returns the normalized requested paths.
    pub(crate) fn requested(&self) -> &[String] {
        &self.requested
    }

    /// Whether directory `rel` is eligible for update under the mode table.
    pub(crate) fn should_update(&self, rel: &str) -> bool {
        if self.mode.updates_subdirs() {
            self.requested
                .iter()
                .any(|requested| path::is_descendant(rel, requested))
        } else {
            self.requested.iter().any(|requested| requested == rel)
        }
    }

    /// Whether the walker may recurse into subdirectory `rel`.
    pub(crate) fn should_descend(&self, rel: &str) -> bool {
        if self.mode.visits_all() {
            return true;
        }
        self.reachable.contains(rel) || (self.mode == Mode::UpdateSubdirs && self.should_update(rel))
    }

    /// Whether the visitor is invoked for directory `rel`.
    pub(crate) fn should_visit(&self, rel: &str) -> bool {
        self.mode.visits_all() || self.should_update(rel)
    }
}
