//! Shared fixture helpers for walker integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use walk::{walk, Configuration, Mode};

/// One entry of a declarative tree fixture.
pub enum Spec<'a> {
    /// An empty directory (parents created).
    Dir(&'a str),
    /// A file with the given contents (parents created).
    File(&'a str, &'a str),
    /// A symlink to `target`; relative targets resolve against the link's
    /// parent directory.
    #[cfg(unix)]
    Link(&'a str, &'a str),
}

/// Materializes `specs` inside a fresh temporary directory.
pub fn create_tree(specs: &[Spec<'_>]) -> TempDir {
    let temp = TempDir::new().expect("tempdir");
    for spec in specs {
        match spec {
            Spec::Dir(path) => {
                fs::create_dir_all(temp.path().join(path)).expect("create dir");
            }
            Spec::File(path, contents) => {
                let path = temp.path().join(path);
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent).expect("create parent");
                }
                fs::write(path, contents).expect("write file");
            }
            #[cfg(unix)]
            Spec::Link(path, target) => {
                let path = temp.path().join(path);
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent).expect("create parent");
                }
                std::os::unix::fs::symlink(target, path).expect("create symlink");
            }
        }
    }
    temp
}

/// Runs the walker over `root` with no extension configurers and collects
/// the visited rel paths in visit order.
pub fn visit_rels(root: &Path, mode: Mode, dirs: &[&str]) -> Vec<String> {
    let dirs: Vec<String> = dirs.iter().map(|dir| (*dir).to_string()).collect();
    let mut rels = Vec::new();
    walk(Configuration::new(root), &[], &dirs, mode, |entry| {
        rels.push(entry.rel().to_string());
    })
    .expect("walk");
    rels
}

/// Like [`visit_rels`], but also records each directory's update flag.
pub fn visit_updates(root: &Path, mode: Mode, dirs: &[&str]) -> Vec<(String, bool)> {
    let dirs: Vec<String> = dirs.iter().map(|dir| (*dir).to_string()).collect();
    let mut visits = Vec::new();
    walk(Configuration::new(root), &[], &dirs, mode, |entry| {
        visits.push((entry.rel().to_string(), entry.update()));
    })
    .expect("walk");
    visits
}
