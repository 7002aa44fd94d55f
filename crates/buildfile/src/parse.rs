//! Minimal parser for the build-file grammar.
//!
//! The generator only needs a shallow view of a build file: top-level call
//! expressions (`kind(attr = value, ...)`) with string and string-list
//! attribute values, plus top-level comments for directive extraction.
//! Everything else is parsed just far enough to keep the reader in sync and
//! surfaces as an opaque attribute value.

use std::path::Path;

use crate::directive::{self, Directive};
use crate::error::ParseError;
use crate::file::{AttrValue, Rule};

#[derive(Debug)]
pub(crate) struct Parsed {
    pub(crate) rules: Vec<Rule>,
    pub(crate) directives: Vec<Directive>,
}

pub(crate) fn parse(path: &Path, text: &str) -> Result<Parsed, ParseError> {
    Parser::new(path, text).parse_file()
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Tok {
    Ident(String),
    Str(String),
    Number,
    Punct(char),
    Comment(String),
    Eof,
}

impl Tok {
    fn describe(&self) -> String {
        match self {
            Tok::Ident(name) => format!("identifier '{name}'"),
            Tok::Str(_) => "string literal".to_string(),
            Tok::Number => "number".to_string(),
            Tok::Punct(c) => format!("'{c}'"),
            Tok::Comment(_) => "comment".to_string(),
            Tok::Eof => "end of file".to_string(),
        }
    }
}

struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src: src.as_bytes(),
            pos: 0,
            line: 1,
        }
    }

    fn peek_byte(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn bump_byte(&mut self) -> Option<u8> {
        let b = self.peek_byte()?;
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
        }
        Some(b)
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek_byte() {
            if b.is_ascii_whitespace() {
                self.bump_byte();
            } else {
                break;
            }
        }
    }

    /// Produces the next token along with the line it started on.
    fn next_token(&mut self) -> Result<(Tok, usize), (usize, String)> {
        self.skip_whitespace();
        let line = self.line;
        let Some(b) = self.peek_byte() else {
            return Ok((Tok::Eof, line));
        };
        match b {
            b'#' => {
                self.bump_byte();
                let start = self.pos;
                while let Some(b) = self.peek_byte() {
                    if b == b'\n' {
                        break;
                    }
                    self.bump_byte();
                }
                let text = String::from_utf8_lossy(&self.src[start..self.pos]).into_owned();
                Ok((Tok::Comment(text), line))
            }
            b'"' | b'\'' => {
                let quote = b;
                self.bump_byte();
                let mut value = Vec::new();
                loop {
                    match self.bump_byte() {
                        Some(b) if b == quote => break,
                        Some(b'\\') => match self.bump_byte() {
                            Some(b'n') => value.push(b'\n'),
                            Some(b't') => value.push(b'\t'),
                            Some(escaped) => value.push(escaped),
                            None => return Err((line, "unterminated string".to_string())),
                        },
                        Some(b'\n') | None => {
                            return Err((line, "unterminated string".to_string()));
                        }
                        Some(b) => value.push(b),
                    }
                }
                Ok((Tok::Str(String::from_utf8_lossy(&value).into_owned()), line))
            }
            b if b.is_ascii_alphabetic() || b == b'_' => {
                let start = self.pos;
                while let Some(b) = self.peek_byte() {
                    if b.is_ascii_alphanumeric() || b == b'_' {
                        self.bump_byte();
                    } else {
                        break;
                    }
                }
                let name = String::from_utf8_lossy(&self.src[start..self.pos]).into_owned();
                Ok((Tok::Ident(name), line))
            }
            b if b.is_ascii_digit() => {
                while let Some(b) = self.peek_byte() {
                    if b.is_ascii_digit() {
                        self.bump_byte();
                    } else {
                        break;
                    }
                }
                Ok((Tok::Number, line))
            }
            b'(' | b')' | b'[' | b']' | b'{' | b'}' | b'=' | b',' | b':' | b'+' | b'-' => {
                self.bump_byte();
                Ok((Tok::Punct(b as char), line))
            }
            other => Err((line, format!("unexpected character '{}'", other as char))),
        }
    }
}

struct Parser<'a> {
    path: &'a Path,
    lexer: Lexer<'a>,
    lookahead: Option<(Tok, usize)>,
    depth: usize,
    comments: Vec<String>,
}

impl<'a> Parser<'a> {
    fn new(path: &'a Path, text: &'a str) -> Self {
        Self {
            path,
            lexer: Lexer::new(text),
            lookahead: None,
            depth: 0,
            comments: Vec::new(),
        }
    }

    fn error(&self, line: usize, message: impl Into<String>) -> ParseError {
        ParseError::Syntax {
            path: self.path.to_path_buf(),
            line,
            message: message.into(),
        }
    }

    /// Returns the next non-comment token. Comments outside any bracketed
    /// construct are recorded for directive extraction.
    fn bump(&mut self) -> Result<(Tok, usize), ParseError> {
        if let Some(tok) = self.lookahead.take() {
            return Ok(tok);
        }
        loop {
            let (tok, line) = self
                .lexer
                .next_token()
                .map_err(|(line, message)| self.error(line, message))?;
            if let Tok::Comment(text) = tok {
                if self.depth == 0 {
                    self.comments.push(text);
                }
                continue;
            }
            return Ok((tok, line));
        }
    }

    /// Peeks at the next token without consuming it.
    fn peek(&mut self) -> Result<Tok, ParseError> {
        if self.lookahead.is_none() {
            self.lookahead = Some(self.bump()?);
        }
        match &self.lookahead {
            Some((tok, _)) => Ok(tok.clone()),
            None => Ok(Tok::Eof),
        }
    }

    fn expect_punct(&mut self, want: char) -> Result<(), ParseError> {
        let (tok, line) = self.bump()?;
        if tok == Tok::Punct(want) {
            Ok(())
        } else {
            Err(self.error(line, format!("expected '{}', found {}", want, tok.describe())))
        }
    }

    fn parse_file(mut self) -> Result<Parsed, ParseError> {
        let mut rules = Vec::new();
        loop {
            let (tok, line) = self.bump()?;
            match tok {
                Tok::Eof => break,
                Tok::Ident(name) => match self.peek()? {
                    Tok::Punct('(') => rules.push(self.parse_rule(name)?),
                    Tok::Punct('=') => {
                        // Top-level assignment; value is not interpreted.
                        self.bump()?;
                        self.parse_expr()?;
                    }
                    other => {
                        return Err(self.error(
                            line,
                            format!(
                                "expected '(' or '=' after '{name}', found {}",
                                other.describe()
                            ),
                        ));
                    }
                },
                other => {
                    return Err(self.error(
                        line,
                        format!("expected rule at top level, found {}", other.describe()),
                    ));
                }
            }
        }
        let directives = self
            .comments
            .iter()
            .filter_map(|text| directive::parse_comment(text))
            .collect();
        Ok(Parsed { rules, directives })
    }

    fn parse_rule(&mut self, kind: String) -> Result<Rule, ParseError> {
        self.depth += 1;
        self.expect_punct('(')?;
        let mut attrs = Vec::new();
        loop {
            match self.peek()? {
                Tok::Punct(')') => {
                    self.bump()?;
                    break;
                }
                Tok::Ident(_) => {
                    let (tok, _) = self.bump()?;
                    if let Tok::Ident(name) = tok {
                        if self.peek()? == Tok::Punct('=') {
                            self.bump()?;
                            let value = self.parse_expr()?;
                            attrs.push((name, value));
                        } else {
                            // Positional identifier argument, e.g. a referenced
                            // constant. Consume any trailing call arguments.
                            self.finish_opaque_ident()?;
                        }
                    }
                    self.finish_argument()?;
                }
                _ => {
                    // Positional non-identifier argument (string, list, ...).
                    self.parse_expr()?;
                    self.finish_argument()?;
                }
            }
        }
        self.depth -= 1;
        Ok(Rule { kind, attrs })
    }

    /// Consumes a trailing `,` after an argument, or leaves a `)` in place.
    fn finish_argument(&mut self) -> Result<(), ParseError> {
        match self.peek()? {
            Tok::Punct(',') => {
                self.bump()?;
                Ok(())
            }
            Tok::Punct(')') => Ok(()),
            other => {
                let (_, line) = self.bump()?;
                Err(self.error(line, format!("expected ',' or ')', found {}", other.describe())))
            }
        }
    }

    fn parse_expr(&mut self) -> Result<AttrValue, ParseError> {
        let mut value = self.parse_primary()?;
        // Binary concatenation produces a value the generator cannot
        // interpret; keep consuming operands to stay in sync.
        while self.peek()? == Tok::Punct('+') {
            self.bump()?;
            self.parse_primary()?;
            value = AttrValue::Opaque;
        }
        Ok(value)
    }

    fn parse_primary(&mut self) -> Result<AttrValue, ParseError> {
        let (tok, line) = self.bump()?;
        match tok {
            Tok::Str(s) => Ok(AttrValue::String(s)),
            Tok::Number => Ok(AttrValue::Opaque),
            Tok::Punct('-') => {
                // Negative number literal.
                self.parse_primary()?;
                Ok(AttrValue::Opaque)
            }
            Tok::Punct('[') => self.parse_list(),
            Tok::Punct('{') => {
                self.consume_balanced('{', '}', line)?;
                Ok(AttrValue::Opaque)
            }
            Tok::Ident(_) => {
                self.finish_opaque_ident()?;
                Ok(AttrValue::Opaque)
            }
            other => Err(self.error(
                line,
                format!("expected attribute value, found {}", other.describe()),
            )),
        }
    }

    fn parse_list(&mut self) -> Result<AttrValue, ParseError> {
        self.depth += 1;
        let mut items = Vec::new();
        let mut all_strings = true;
        loop {
            if self.peek()? == Tok::Punct(']') {
                self.bump()?;
                break;
            }
            match self.parse_expr()? {
                AttrValue::String(s) => items.push(s),
                _ => all_strings = false,
            }
            match self.peek()? {
                Tok::Punct(',') => {
                    self.bump()?;
                }
                Tok::Punct(']') => {}
                other => {
                    let (_, line) = self.bump()?;
                    return Err(
                        self.error(line, format!("expected ',' or ']', found {}", other.describe()))
                    );
                }
            }
        }
        self.depth -= 1;
        if all_strings {
            Ok(AttrValue::StringList(items))
        } else {
            Ok(AttrValue::Opaque)
        }
    }

    /// Consumes the call arguments of an identifier used as a value, e.g.
    /// `glob(["*.go"])`.
    fn finish_opaque_ident(&mut self) -> Result<(), ParseError> {
        if self.peek()? == Tok::Punct('(') {
            let (_, line) = self.bump()?;
            self.consume_balanced('(', ')', line)?;
        }
        Ok(())
    }

    /// Consumes tokens until the bracket opened at `open_line` is balanced.
    fn consume_balanced(
        &mut self,
        open: char,
        close: char,
        open_line: usize,
    ) -> Result<(), ParseError> {
        self.depth += 1;
        let mut nesting = 1usize;
        loop {
            let (tok, _) = self.bump()?;
            match tok {
                Tok::Punct(c) if c == open => nesting += 1,
                Tok::Punct(c) if c == close => {
                    nesting -= 1;
                    if nesting == 0 {
                        self.depth -= 1;
                        return Ok(());
                    }
                }
                Tok::Eof => {
                    return Err(self.error(open_line, format!("unbalanced '{open}'")));
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_text(text: &str) -> Result<Parsed, ParseError> {
        parse(Path::new("BUILD.bazel"), text)
    }

    #[test]
    fn empty_file_has_no_rules() {
        let parsed = parse_text("").expect("parse");
        assert!(parsed.rules.is_empty());
        assert!(parsed.directives.is_empty());
    }

    #[test]
    fn directive_only_file() {
        let parsed = parse_text("# gazelle:build_file_name BUILD.test\n").expect("parse");
        assert!(parsed.rules.is_empty());
        assert_eq!(parsed.directives.len(), 1);
        assert_eq!(parsed.directives[0].key(), "build_file_name");
        assert_eq!(parsed.directives[0].value(), "BUILD.test");
    }

    #[test]
    fn directives_keep_file_order() {
        let parsed = parse_text(
            "\n# gazelle:exclude **/*.pb.go\n# gazelle:exclude *.gen.go\n# plain comment\n",
        )
        .expect("parse");
        let values: Vec<_> = parsed.directives.iter().map(|d| d.value()).collect();
        assert_eq!(values, vec!["**/*.pb.go", "*.gen.go"]);
    }

    #[test]
    fn rule_with_string_attribute() {
        let parsed = parse_text("gen(\n    name = \"x\",\n    out = \"gen\",\n)\n").expect("parse");
        assert_eq!(parsed.rules.len(), 1);
        let rule = &parsed.rules[0];
        assert_eq!(rule.kind(), "gen");
        assert_eq!(rule.attr_string("name"), Some("x"));
        assert_eq!(rule.attr_string("out"), Some("gen"));
    }

    #[test]
    fn rule_with_string_list_attribute() {
        let parsed = parse_text(
            "unknown_rule(\n    name = \"blah\",\n    outs = [\n        \"gen2\",\n        \"gen-and-static\",\n    ],\n)\n",
        )
        .expect("parse");
        let rule = &parsed.rules[0];
        assert_eq!(
            rule.attr_strings("outs"),
            Some(&["gen2".to_string(), "gen-and-static".to_string()][..])
        );
        assert_eq!(rule.attr_string("outs"), None);
    }

    #[test]
    fn glob_call_is_opaque() {
        let parsed =
            parse_text("go_library(\n    name = \"lib\",\n    srcs = glob([\"*.go\"]),\n)\n")
                .expect("parse");
        let rule = &parsed.rules[0];
        assert_eq!(rule.attr_strings("srcs"), None);
        assert_eq!(rule.attr_string("name"), Some("lib"));
    }

    #[test]
    fn comment_inside_rule_is_not_a_directive() {
        let parsed = parse_text(
            "x(\n    # gazelle:exclude inner\n    name = \"x\",\n)\n# gazelle:exclude outer\n",
        )
        .expect("parse");
        assert_eq!(parsed.directives.len(), 1);
        assert_eq!(parsed.directives[0].value(), "outer");
    }

    #[test]
    fn lone_paren_is_a_syntax_error() {
        let err = parse_text("(").expect_err("syntax error");
        assert!(matches!(err, ParseError::Syntax { line: 1, .. }));
    }

    #[test]
    fn unbalanced_call_is_a_syntax_error() {
        let err = parse_text("x(name = \"x\"").expect_err("syntax error");
        assert!(matches!(err, ParseError::Syntax { .. }));
    }

    #[test]
    fn unterminated_string_is_a_syntax_error() {
        let err = parse_text("x(name = \"oops)\n").expect_err("syntax error");
        assert!(matches!(err, ParseError::Syntax { line: 1, .. }));
    }

    #[test]
    fn top_level_assignment_is_skipped() {
        let parsed =
            parse_text("version = \"1.2\"\n\ngen(name = \"g\", out = \"o\")\n").expect("parse");
        assert_eq!(parsed.rules.len(), 1);
        assert_eq!(parsed.rules[0].attr_string("out"), Some("o"));
    }

    #[test]
    fn concatenation_is_opaque() {
        let parsed = parse_text("x(name = \"a\" + suffix)\n").expect("parse");
        assert_eq!(parsed.rules[0].attr_string("name"), None);
    }

    #[test]
    fn trailing_comma_accepted() {
        let parsed = parse_text("x(name = \"a\",)\n").expect("parse");
        assert_eq!(parsed.rules[0].attr_string("name"), Some("a"));
    }

    #[test]
    fn nested_call_arguments_stay_balanced() {
        let parsed = parse_text("x(srcs = glob([\"*.go\"], exclude = [\"a.go\"]))\n")
            .expect("parse");
        assert_eq!(parsed.rules.len(), 1);
        assert_eq!(parsed.rules[0].attr_strings("srcs"), None);
    }

    #[test]
    fn numbers_and_idents_are_opaque_values() {
        let parsed = parse_text("x(count = 3, flag = True, offset = -1)\n").expect("parse");
        assert_eq!(parsed.rules[0].attr_string("count"), None);
        assert_eq!(parsed.rules[0].attr_string("flag"), None);
    }
}
