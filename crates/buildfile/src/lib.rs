#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `buildfile` provides the parsed view of per-directory build metadata
//! files that the generator core consumes. A [`BuildFile`] exposes the
//! file's top-level rules (kind plus attribute map, deep enough to read
//! string and string-list attributes such as `out` and `outs`) and the
//! `# gazelle:key value` directive comments that drive hierarchical
//! configuration.
//!
//! # Design
//!
//! - [`BuildFile::load`] reads a file from disk and parses it with a small
//!   hand-rolled lexer and recursive-descent parser. The grammar is a
//!   shallow Starlark subset: anything the generator does not interpret is
//!   consumed as an opaque value so the reader stays in sync.
//! - [`Rule`] offers `attr_string`/`attr_strings` lookups; non-literal
//!   values (calls such as `glob(...)`, concatenations, dicts) surface as
//!   [`AttrValue::Opaque`] and answer `None`.
//! - [`Directive`] values are extracted from top-level comments only;
//!   comments inside rule bodies are never directive sources.
//!
//! # Invariants
//!
//! - Rules and directives preserve file order.
//! - Parsing never panics; malformed input is reported as
//!   [`ParseError::Syntax`] with the offending line.
//!
//! # Examples
//!
//! ```
//! use buildfile::BuildFile;
//! use std::fs;
//!
//! # fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! let path = temp.path().join("BUILD.bazel");
//! fs::write(&path, "# gazelle:ignore\ngen(name = \"x\", out = \"gen\")\n")?;
//!
//! let file = BuildFile::load(&path)?;
//! assert_eq!(file.directives()[0].key(), "ignore");
//! assert_eq!(file.rules()[0].attr_string("out"), Some("gen"));
//! # Ok(())
//! # }
//! # demo().unwrap();
//! ```

mod directive;
mod error;
mod file;
mod parse;

pub use directive::{parse_comment, Directive, DIRECTIVE_PREFIX};
pub use error::ParseError;
pub use file::{AttrValue, BuildFile, Rule};
