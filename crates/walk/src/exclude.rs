//! Glob-based exclusion and follow-pattern matching.
//!
//! Patterns are declared relative to a directory and rewritten at
//! accumulation time to a repository-root-anchored text by joining the
//! declaring directory's rel path. The special value `.` folds to the
//! declaring directory itself, which is how self-exclusion is expressed.
//!
//! Glob semantics: `*` and `?` never cross `/`; `**` spans zero or more
//! whole segments. A pattern with no metacharacters matches by string
//! equality.

use std::path::Path;

use globset::{GlobBuilder, GlobMatcher};
use tracing::warn;

use crate::path;

/// A single pattern, compiled once when it is accumulated.
#[derive(Clone, Debug)]
pub struct Pattern {
    text: String,
    matcher: Option<GlobMatcher>,
}

impl Pattern {
    /// Compiles `value` as declared in directory `rel`. Returns `None` for
    /// malformed globs, which are logged and dropped.
    fn compile(rel: &str, value: &str) -> Option<Self> {
        let text = path::join(rel, value);
        if !has_meta(&text) {
            return Some(Self {
                text,
                matcher: None,
            });
        }
        match GlobBuilder::new(&text)
            .literal_separator(true)
            .backslash_escape(true)
            .build()
        {
            Ok(glob) => Some(Self {
                matcher: Some(glob.compile_matcher()),
                text,
            }),
            Err(error) => {
                warn!(pattern = %text, %error, "dropping malformed glob pattern");
                None
            }
        }
    }

    /// Returns the repository-root-anchored pattern text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Reports whether the pattern matches a repo-relative candidate path.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        match &self.matcher {
            Some(matcher) => matcher.is_match(Path::new(candidate)),
            None => self.text == candidate,
        }
    }
}

/// Accumulated patterns, copied as a fresh container on configuration
/// clone so sibling directories cannot observe each other's additions.
#[derive(Clone, Debug, Default)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    /// Appends `value` as declared in directory `rel`.
    pub fn append(&mut self, rel: &str, value: &str) {
        if value.is_empty() {
            warn!(rel, "ignoring directive with empty pattern");
            return;
        }
        if let Some(pattern) = Pattern::compile(rel, value) {
            self.patterns.push(pattern);
        }
    }

    /// Reports whether any accumulated pattern matches `candidate`.
    #[must_use]
    pub fn matches(&self, candidate: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches(candidate))
    }

    /// Reports whether the set holds no patterns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Returns the accumulated patterns in declaration order.
    #[must_use]
    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }
}

fn has_meta(text: &str) -> bool {
    text.bytes()
        .any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' | b'\\'))
}
