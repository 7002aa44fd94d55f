//! Recursive descent: pre-order configure, post-order visit.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

use buildfile::BuildFile;
use tracing::{debug, warn};

use crate::config::{Configuration, Configurer, WalkConfigurer};
use crate::entry::WalkEntry;
use crate::error::WalkError;
use crate::mode::{Mode, UpdateFilter};
use crate::path;
use crate::symlink::SymlinkResolver;

/// Walks the repository tree rooted at `config.repo_root()` and invokes
/// `visitor` once per visited directory, in post-order.
///
/// Descent always seeds at the repository root with rel path `""`;
/// `dirs` (repo-relative) and `mode` decide only which directories are
/// visited and which are flagged for update. At each directory the walker
/// reads the build file named by the inherited candidate list, derives the
/// child configuration through the configurer chain (the core's directive
/// configurer first, then `configurers` in order), classifies the
/// surviving entries, and recurses into subdirectories in lexical order
/// before reporting the directory itself. The repository root is the last
/// directory visited.
///
/// # Errors
///
/// Fails when the repository root cannot be resolved, when a requested
/// path escapes the repository, or when a configurer reports an error.
/// Unreadable entries, dangling symlinks, and build-file parse failures
/// are logged and skipped instead.
///
/// # Examples
///
/// ```
/// use walk::{walk, Configuration, Mode};
/// use std::fs;
///
/// # fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// let temp = tempfile::tempdir()?;
/// fs::create_dir_all(temp.path().join("a/b"))?;
///
/// let mut rels = Vec::new();
/// walk(
///     Configuration::new(temp.path()),
///     &[],
///     &[String::new()],
///     Mode::VisitAllUpdateSubdirs,
///     |entry| rels.push(entry.rel().to_string()),
/// )?;
///
/// assert_eq!(rels, vec!["a/b".to_string(), "a".to_string(), String::new()]);
/// # Ok(())
/// # }
/// # demo().unwrap();
/// ```
pub fn walk<V>(
    mut config: Configuration,
    configurers: &[Box<dyn Configurer>],
    dirs: &[String],
    mode: Mode,
    mut visitor: V,
) -> Result<(), WalkError>
where
    V: FnMut(WalkEntry<'_>),
{
    let root = fs::canonicalize(config.repo_root()).map_err(|source| WalkError::Root {
        path: config.repo_root().to_path_buf(),
        source,
    })?;
    let filter = UpdateFilter::new(mode, dirs)?;
    config.set_repo_root(root.clone());
    config.set_walk_params(mode, filter.requested().to_vec());

    let mut known: HashSet<String> = WalkConfigurer::DIRECTIVES
        .iter()
        .map(|key| (*key).to_string())
        .collect();
    for configurer in configurers {
        known.extend(
            configurer
                .known_directives()
                .iter()
                .map(|key| (*key).to_string()),
        );
    }

    let mut walker = Walker {
        configurers,
        known,
        filter,
        symlinks: SymlinkResolver::new(root.clone()),
    };
    walker.visit_dir(&config, &root, "", &mut visitor)
}

struct Walker<'w> {
    configurers: &'w [Box<dyn Configurer>],
    known: HashSet<String>,
    filter: UpdateFilter,
    symlinks: SymlinkResolver,
}

impl Walker<'_> {
    fn visit_dir<V: FnMut(WalkEntry<'_>)>(
        &mut self,
        parent: &Configuration,
        dir: &Path,
        rel: &str,
        visitor: &mut V,
    ) -> Result<(), WalkError> {
        let entries = match read_sorted_entries(dir) {
            Ok(entries) => entries,
            Err(error) => {
                warn!(dir = %dir.display(), %error, "skipping unreadable directory");
                return Ok(());
            }
        };

        // The candidate name list is the inherited one: a build_file_name
        // directive takes effect in subdirectories, not in the directory
        // that declares it.
        let (build_file, parse_failed) = load_build_file(parent, dir, &entries);

        let mut config = parent.clone_for_child();
        self.configure(&mut config, rel, build_file.as_ref())?;

        // `exclude .` removes the directory and its whole subtree.
        if config.excluded(rel, ".") {
            debug!(rel, "directory excludes itself");
            return Ok(());
        }

        let mut subdirs = Vec::new();
        let mut regular_files = Vec::new();
        for entry in &entries {
            if entry.name == ".git" || config.excluded(rel, &entry.name) {
                continue;
            }
            match entry.kind {
                EntryKind::Dir => subdirs.push(entry.name.clone()),
                EntryKind::File => regular_files.push(entry.name.clone()),
                EntryKind::Symlink => {
                    if build_file
                        .as_ref()
                        .is_some_and(|file| file.base_name() == entry.name)
                    {
                        // The chosen build file is always a regular file,
                        // even when reached through a link.
                        regular_files.push(entry.name.clone());
                        continue;
                    }
                    let link_rel = path::join(rel, &entry.name);
                    if self
                        .symlinks
                        .should_descend(&config, dir, &link_rel, &entry.name)
                    {
                        subdirs.push(entry.name.clone());
                    }
                }
            }
        }

        let generated_files = generated_files(build_file.as_ref());

        for sub in &subdirs {
            let sub_rel = path::join(rel, sub);
            if self.filter.should_descend(&sub_rel) {
                self.visit_dir(&config, &dir.join(sub), &sub_rel, visitor)?;
            }
        }

        if self.filter.should_visit(rel) {
            let update = self.filter.should_update(rel) && !config.ignore() && !parse_failed;
            visitor(WalkEntry {
                dir,
                rel,
                config: &config,
                update,
                build_file: build_file.as_ref(),
                subdirs: &subdirs,
                regular_files: &regular_files,
                generated_files: &generated_files,
            });
        }
        Ok(())
    }

    fn configure(
        &self,
        config: &mut Configuration,
        rel: &str,
        build_file: Option<&BuildFile>,
    ) -> Result<(), WalkError> {
        if let Some(file) = build_file {
            for directive in file.directives() {
                if !self.known.contains(directive.key()) {
                    warn!(
                        rel,
                        key = directive.key(),
                        "directive not recognized by any configurer"
                    );
                }
            }
        }
        WalkConfigurer
            .configure(config, rel, build_file)
            .map_err(|source| WalkError::Configure {
                rel: rel.to_string(),
                source,
            })?;
        for configurer in self.configurers {
            configurer
                .configure(config, rel, build_file)
                .map_err(|source| WalkError::Configure {
                    rel: rel.to_string(),
                    source,
                })?;
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum EntryKind {
    File,
    Dir,
    Symlink,
}

struct DirEntryInfo {
    name: String,
    kind: EntryKind,
}

fn read_sorted_entries(dir: &Path) -> io::Result<Vec<DirEntryInfo>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(error) => {
                warn!(dir = %dir.display(), %error, "skipping unreadable entry");
                continue;
            }
        };
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            warn!(dir = %dir.display(), "skipping entry with non-UTF-8 name");
            continue;
        };
        let kind = match entry.file_type() {
            Ok(file_type) if file_type.is_dir() => EntryKind::Dir,
            Ok(file_type) if file_type.is_symlink() => EntryKind::Symlink,
            Ok(_) => EntryKind::File,
            Err(error) => {
                warn!(dir = %dir.display(), %name, %error, "skipping entry with unreadable type");
                continue;
            }
        };
        entries.push(DirEntryInfo { name, kind });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}

/// Finds and parses the directory's build file, returning the parsed view
/// and whether a candidate existed but failed to parse.
fn load_build_file(
    config: &Configuration,
    dir: &Path,
    entries: &[DirEntryInfo],
) -> (Option<BuildFile>, bool) {
    for name in config.build_file_names() {
        let present = entries
            .iter()
            .any(|entry| entry.name == *name && entry.kind != EntryKind::Dir);
        if !present {
            continue;
        }
        let file_path = dir.join(name);
        return match BuildFile::load(&file_path) {
            Ok(file) => (Some(file), false),
            Err(error) => {
                warn!(path = %file_path.display(), %error, "failed to load build file");
                (None, true)
            }
        };
    }
    (None, false)
}

/// Collects output file names declared by top-level rules via the string
/// attribute `out` or the string-list attribute `outs`, preserving order
/// and dropping duplicates.
fn generated_files(build_file: Option<&BuildFile>) -> Vec<String> {
    let Some(file) = build_file else {
        return Vec::new();
    };
    let mut outs: Vec<String> = Vec::new();
    for rule in file.rules() {
        if let Some(out) = rule.attr_string("out") {
            if !outs.iter().any(|seen| seen == out) {
                outs.push(out.to_string());
            }
        }
        if let Some(list) = rule.attr_strings("outs") {
            for out in list {
                if !outs.contains(out) {
                    outs.push(out.clone());
                }
            }
        }
    }
    outs
}
