//! Slash-form relative path helpers.
//!
//! Every relative path handled by the walker is slash-separated and rooted
//! at the repository root, whose rel path is the empty string. Paths never
//! start or end with `/`. Conversion to and from OS-native separators
//! happens only at the filesystem boundary.

use std::path::{Component, Path};

/// Joins a relative path and a child name.
///
/// A `name` of `.` or the empty string folds to `rel`, mirroring path
/// cleaning so that a `.` exclusion token resolves to its declaring
/// directory.
#[must_use]
pub fn join(rel: &str, name: &str) -> String {
    if name == "." || name.is_empty() {
        return rel.to_string();
    }
    if rel.is_empty() {
        name.to_string()
    } else {
        format!("{rel}/{name}")
    }
}

/// Normalizes a caller-supplied repo-relative path.
///
/// Empty and `.` segments are dropped, so `""`, `"."`, and `"a/b/"` are all
/// accepted. Returns `None` for absolute paths and for any path containing
/// `..`, since those may escape the repository.
#[must_use]
pub fn normalize(input: &str) -> Option<String> {
    if input.starts_with('/') {
        return None;
    }
    let mut parts = Vec::new();
    for segment in input.split('/') {
        match segment {
            "" | "." => {}
            ".." => return None,
            other => parts.push(other),
        }
    }
    Some(parts.join("/"))
}

/// Reports whether `rel` equals `ancestor` or lies beneath it.
///
/// The repository root (empty string) is an ancestor of every path.
#[must_use]
pub fn is_descendant(rel: &str, ancestor: &str) -> bool {
    if ancestor.is_empty() {
        return true;
    }
    rel == ancestor
        || rel
            .strip_prefix(ancestor)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Converts an absolute path under `root` back to slash form.
///
/// Returns `None` when `path` does not reside under `root` or contains a
/// component that cannot be represented as UTF-8.
#[must_use]
pub fn from_fs(root: &Path, path: &Path) -> Option<String> {
    let rest = path.strip_prefix(root).ok()?;
    let mut out = String::new();
    for component in rest.components() {
        match component {
            Component::Normal(segment) => {
                if !out.is_empty() {
                    out.push('/');
                }
                out.push_str(segment.to_str()?);
            }
            Component::CurDir => {}
            _ => return None,
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn join_handles_root_and_dot() {
        assert_eq!(join("", "a"), "a");
        assert_eq!(join("a", "b"), "a/b");
        assert_eq!(join("a/b", "."), "a/b");
        assert_eq!(join("", "."), "");
    }

    #[test]
    fn normalize_cleans_redundant_segments() {
        assert_eq!(normalize(""), Some(String::new()));
        assert_eq!(normalize("."), Some(String::new()));
        assert_eq!(normalize("a/b/"), Some("a/b".to_string()));
        assert_eq!(normalize("./a//b"), Some("a/b".to_string()));
    }

    #[test]
    fn normalize_rejects_escapes() {
        assert_eq!(normalize("/abs"), None);
        assert_eq!(normalize("../up"), None);
        assert_eq!(normalize("a/../../b"), None);
    }

    #[test]
    fn descendant_relation() {
        assert!(is_descendant("a/b", "a"));
        assert!(is_descendant("a", "a"));
        assert!(is_descendant("anything", ""));
        assert!(!is_descendant("ab", "a"));
        assert!(!is_descendant("a", "a/b"));
    }

    #[test]
    fn from_fs_round_trip() {
        let root = PathBuf::from("/repo");
        assert_eq!(from_fs(&root, &root.join("a").join("b")), Some("a/b".to_string()));
        assert_eq!(from_fs(&root, &root), Some(String::new()));
        assert_eq!(from_fs(&root, Path::new("/elsewhere")), None);
    }
}
