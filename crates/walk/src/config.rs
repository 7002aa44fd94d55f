//! Hierarchical configuration and the configurer chain.
//!
//! A [`Configuration`] is owned per directory and propagates strictly
//! downward: each child receives a clone of its parent's state before the
//! configurer chain runs for it. Accumulative sets (exclusions, follow
//! patterns) are copied as new containers on clone, so sibling branches
//! cannot interfere.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use buildfile::BuildFile;

use crate::error::ConfigureError;
use crate::exclude::PatternSet;
use crate::mode::Mode;
use crate::path;

/// Default candidate base names for build files, in priority order.
pub const DEFAULT_BUILD_FILE_NAMES: &[&str] = &["BUILD.bazel", "BUILD"];

/// Extension-specific configuration slot stored inside a [`Configuration`].
///
/// Slots are cloned on descent along with the rest of the configuration,
/// so implementations carry per-subtree state the same way the core's own
/// pattern sets do.
pub trait Extension: Any + fmt::Debug {
    /// Clones the slot for a child directory.
    fn clone_boxed(&self) -> Box<dyn Extension>;
    /// Upcasts to [`Any`] for downcasting by the owning configurer.
    fn as_any(&self) -> &dyn Any;
    /// Mutable upcast to [`Any`].
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl Clone for Box<dyn Extension> {
    fn clone(&self) -> Self {
        self.clone_boxed()
    }
}

/// Extension point executed once per directory in pre-order.
///
/// The walker always runs its own directive configurer first, then every
/// registered configurer in registration order. Each sees the parent state
/// already applied and may mutate the configuration for the subtree.
pub trait Configurer {
    /// Directive keys the configurer consumes from build files. Keys
    /// claimed by no configurer are logged when encountered.
    fn known_directives(&self) -> &[&str] {
        &[]
    }

    /// Derives the directory's configuration, mutating `config` in place.
    ///
    /// # Errors
    ///
    /// Any error aborts the walk.
    fn configure(
        &self,
        config: &mut Configuration,
        rel: &str,
        build_file: Option<&BuildFile>,
    ) -> Result<(), ConfigureError>;
}

/// Per-directory configuration bundle.
#[derive(Clone, Debug)]
pub struct Configuration {
    repo_root: PathBuf,
    build_file_names: Vec<String>,
    excludes: PatternSet,
    follow: PatternSet,
    ignore: bool,
    mode: Mode,
    requested: Vec<String>,
    exts: BTreeMap<String, Box<dyn Extension>>,
}

impl Configuration {
    /// Creates the root configuration for a repository.
    #[must_use]
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
            build_file_names: DEFAULT_BUILD_FILE_NAMES
                .iter()
                .map(|name| (*name).to_string())
                .collect(),
            excludes: PatternSet::default(),
            follow: PatternSet::default(),
            ignore: false,
            mode: Mode::VisitAllUpdateSubdirs,
            requested: Vec::new(),
            exts: BTreeMap::new(),
        }
    }

    /// Returns the absolute repository root.
    #[must_use]
    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    pub(crate) fn set_repo_root(&mut self, root: PathBuf) {
        self.repo_root = root;
    }

    /// Returns the candidate build-file base names, head preferred.
    #[must_use]
    pub fn build_file_names(&self) -> &[String] {
        &self.build_file_names
    }

    /// Replaces the candidate build-file base names for this subtree.
    pub fn set_build_file_names(&mut self, names: Vec<String>) {
        if !names.is_empty() {
            self.build_file_names = names;
        }
    }

    /// Appends an exclusion pattern declared in directory `rel`.
    pub fn add_exclude(&mut self, rel: &str, pattern: &str) {
        self.excludes.append(rel, pattern);
    }

    /// Appends a follow pattern declared in directory `rel`.
    pub fn add_follow(&mut self, rel: &str, pattern: &str) {
        self.follow.append(rel, pattern);
    }

    /// Reports whether the entry `base` inside directory `rel` is excluded.
    ///
    /// Passing `"."` as `base` asks whether the directory itself is
    /// excluded, which is how `exclude .` self-exclusion is detected.
    #[must_use]
    pub fn excluded(&self, rel: &str, base: &str) -> bool {
        self.excludes.matches(&path::join(rel, base))
    }

    /// Reports whether a symlink at repo-relative path `rel` matches an
    /// accumulated follow pattern.
    #[must_use]
    pub fn follows(&self, rel: &str) -> bool {
        self.follow.matches(rel)
    }

    /// Returns the accumulated exclusion patterns.
    #[must_use]
    pub fn exclude_patterns(&self) -> &PatternSet {
        &self.excludes
    }

    /// Reports whether this directory's build file is marked immutable via
    /// the `ignore` directive. The flag never inherits.
    #[must_use]
    pub fn ignore(&self) -> bool {
        self.ignore
    }

    /// Marks this directory's build file as immutable.
    pub fn set_ignore(&mut self, ignore: bool) {
        self.ignore = ignore;
    }

    /// Returns the active traversal mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the normalized directories requested for update.
    #[must_use]
    pub fn requested(&self) -> &[String] {
        &self.requested
    }

    pub(crate) fn set_walk_params(&mut self, mode: Mode, requested: Vec<String>) {
        self.mode = mode;
        self.requested = requested;
    }

    /// Stores an extension slot under `key`, replacing any previous value.
    pub fn set_extension(&mut self, key: impl Into<String>, ext: Box<dyn Extension>) {
        self.exts.insert(key.into(), ext);
    }

    /// Returns the extension slot stored under `key`, downcast to `T`.
    #[must_use]
    pub fn extension<T: Extension>(&self, key: &str) -> Option<&T> {
        self.exts.get(key).and_then(|ext| ext.as_any().downcast_ref())
    }

    /// Mutable variant of [`Configuration::extension`].
    #[must_use]
    pub fn extension_mut<T: Extension>(&mut self, key: &str) -> Option<&mut T> {
        self.exts
            .get_mut(key)
            .and_then(|ext| ext.as_any_mut().downcast_mut())
    }

    /// Clones the configuration for a child directory. Identical to
    /// [`Clone::clone`] except that the per-directory `ignore` flag is
    /// reset.
    #[must_use]
    pub(crate) fn clone_for_child(&self) -> Self {
        let mut child = self.clone();
        child.ignore = false;
        child
    }
}

/// The core's own configurer: consumes the directives recognized by the
/// walker itself.
pub(crate) struct WalkConfigurer;

impl WalkConfigurer {
    pub(crate) const DIRECTIVES: &'static [&'static str] =
        &["exclude", "follow", "ignore", "build_file_name"];
}

impl Configurer for WalkConfigurer {
    fn known_directives(&self) -> &[&str] {
        Self::DIRECTIVES
    }

    fn configure(
        &self,
        config: &mut Configuration,
        rel: &str,
        build_file: Option<&BuildFile>,
    ) -> Result<(), ConfigureError> {
        let Some(file) = build_file else {
            return Ok(());
        };
        for directive in file.directives() {
            match directive.key() {
                "exclude" => config.add_exclude(rel, directive.value()),
                "follow" => config.add_follow(rel, directive.value()),
                "ignore" => config.set_ignore(true),
                "build_file_name" => config.set_build_file_names(
                    directive
                        .value()
                        .split(',')
                        .map(|name| name.trim().to_string())
                        .filter(|name| !name.is_empty())
                        .collect(),
                ),
                _ => {}
            }
        }
        Ok(())
    }
}
