//! Directive comments embedded in build files.

/// Comment prefix that marks a generator directive.
pub const DIRECTIVE_PREFIX: &str = "gazelle:";

/// Key/value pair recovered from a `# gazelle:key value` comment.
///
/// Directives are order-sensitive: accumulating keys such as `exclude`
/// append in the order they appear in the file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Directive {
    pub(crate) key: String,
    pub(crate) value: String,
}

impl Directive {
    /// Creates a directive from a key and value.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Returns the directive key, e.g. `exclude`.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the directive value. Empty for bare directives such as
    /// `# gazelle:ignore`.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Extracts a directive from a single comment line, if the line carries one.
///
/// `comment` is the comment text without the leading `#`. The key is the
/// first whitespace-delimited token after the `gazelle:` prefix; the value
/// is the trimmed remainder of the line.
#[must_use]
pub fn parse_comment(comment: &str) -> Option<Directive> {
    let rest = comment.trim_start().strip_prefix(DIRECTIVE_PREFIX)?;
    let rest = rest.trim();
    if rest.is_empty() {
        return None;
    }
    match rest.split_once(char::is_whitespace) {
        Some((key, value)) => Some(Directive::new(key, value.trim())),
        None => Some(Directive::new(rest, "")),
    }
}
