use std::fs;
use std::path::{Path, PathBuf};

use crate::directive::Directive;
use crate::error::ParseError;
use crate::parse;

/// Parsed view of a directory's build metadata file.
///
/// A `BuildFile` records where the file lives, which candidate base name
/// matched during discovery, the top-level rules, and the directive
/// comments. It never holds the raw source text.
#[derive(Clone, Debug)]
pub struct BuildFile {
    path: PathBuf,
    base_name: String,
    rules: Vec<Rule>,
    directives: Vec<Directive>,
}

impl BuildFile {
    /// Loads and parses the build file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Read`] when the file cannot be read and
    /// [`ParseError::Syntax`] when its contents violate the grammar.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ParseError> {
        let path = path.into();
        let text = fs::read_to_string(&path).map_err(|source| ParseError::Read {
            path: path.clone(),
            source,
        })?;
        let parsed = parse::parse(&path, &text)?;
        let base_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            path,
            base_name,
            rules: parsed.rules,
            directives: parsed.directives,
        })
    }

    /// Returns the absolute path of the file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the base name that matched during discovery, e.g.
    /// `BUILD.bazel`.
    #[must_use]
    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Returns the top-level rules in file order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Returns the directive comments in file order.
    #[must_use]
    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }
}

/// A top-level call expression, e.g. `go_library(name = "lib", ...)`.
#[derive(Clone, Debug)]
pub struct Rule {
    pub(crate) kind: String,
    pub(crate) attrs: Vec<(String, AttrValue)>,
}

impl Rule {
    /// Returns the rule kind (the called identifier).
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns the rule's `name` attribute, if it is a string literal.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.attr_string("name")
    }

    /// Returns the attribute `key` when its value is a string literal.
    #[must_use]
    pub fn attr_string(&self, key: &str) -> Option<&str> {
        match self.attr(key)? {
            AttrValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the attribute `key` when its value is a list of string
    /// literals.
    #[must_use]
    pub fn attr_strings(&self, key: &str) -> Option<&[String]> {
        match self.attr(key)? {
            AttrValue::StringList(items) => Some(items),
            _ => None,
        }
    }

    fn attr(&self, key: &str) -> Option<&AttrValue> {
        self.attrs
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }
}

/// Attribute value as far as the generator interprets it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttrValue {
    /// A string literal.
    String(String),
    /// A list whose elements are all string literals.
    StringList(Vec<String>),
    /// Any other well-formed expression; not interpreted.
    Opaque,
}
