#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `walk` is the traversal core of the build-file generator. It descends a
//! repository tree in a disciplined order, loads each directory's build
//! file, propagates hierarchical configuration derived from `# gazelle:`
//! directives, classifies directory contents into regular files, generated
//! outputs, and subdirectories, and invokes a caller-supplied visitor once
//! per directory in post-order.
//!
//! # Design
//!
//! - [`walk`] drives the recursion. Configuration flows strictly downward:
//!   every directory receives a clone of its parent's [`Configuration`]
//!   before the [`Configurer`] chain runs for it (pre-order), and the
//!   visitor sees the directory only after all of its children (post-order,
//!   siblings in lexical order).
//! - Exclusion and follow directives accumulate as repo-root-anchored glob
//!   patterns ([`PatternSet`]), compiled once with `globset` when declared.
//! - Symlinked directories are descended only when safe: external targets
//!   by default, in-repo targets only under a `follow` directive, and never
//!   into a subtree another link already entered.
//! - The four [`Mode`] values arbitrate which directories are visited and
//!   which are flagged for update against the requested directory set.
//!
//! # Invariants
//!
//! - Relative paths are slash-form and rooted at the repository; the root's
//!   rel path is the empty string (see [`path`]).
//! - A child never alters its parent's configuration.
//! - The visitor runs exactly once per visited directory; the repository
//!   root is visited last.
//! - Traversal never panics; unexpected filesystem failures are logged and
//!   skipped, and only pre-conditions (missing root, escaping requested
//!   path, configurer failure) surface as [`WalkError`].
//!
//! # Examples
//!
//! Visit a small tree and record what the generator would see:
//!
//! ```
//! use walk::{walk, Configuration, Mode};
//! use std::fs;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! fs::create_dir(temp.path().join("pkg"))?;
//! fs::write(
//!     temp.path().join("pkg/BUILD.bazel"),
//!     "gen(name = \"x\", out = \"pkg.gen\")\n",
//! )?;
//! fs::write(temp.path().join("pkg/lib.c"), "")?;
//!
//! walk(
//!     Configuration::new(temp.path()),
//!     &[],
//!     &["pkg".to_string()],
//!     Mode::UpdateDirs,
//!     |entry| {
//!         assert_eq!(entry.rel(), "pkg");
//!         assert!(entry.update());
//!         assert_eq!(entry.regular_files(), ["BUILD.bazel", "lib.c"]);
//!         assert_eq!(entry.generated_files(), ["pkg.gen"]);
//!     },
//! )?;
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

mod config;
mod entry;
mod error;
mod exclude;
mod mode;
pub mod path;
mod symlink;
mod walker;

pub use config::{Configuration, Configurer, Extension, DEFAULT_BUILD_FILE_NAMES};
pub use entry::WalkEntry;
pub use error::{ConfigureError, WalkError};
pub use exclude::{Pattern, PatternSet};
pub use mode::{Mode, ParseModeError};
pub use walker::walk;
