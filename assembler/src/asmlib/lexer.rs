//! Tokenization of one source line.
//!
//! Tokens are whitespace-separated; the first character of each
//! token decides its class.  Identifiers start with a letter and
//! continue with letters and digits only; there is no comment
//! syntax in the dialect.

use std::ops::Deref;
use std::sync::OnceLock;

use regex::Regex;

use base::prelude::Word;

use crate::types::{AssemblerFailure, LineNumber};

pub(crate) struct LazyRegex {
    once: OnceLock<Regex>,
    pattern: &'static str,
}

impl LazyRegex {
    pub(crate) const fn new(pattern: &'static str) -> LazyRegex {
        LazyRegex {
            once: OnceLock::new(),
            pattern,
        }
    }
}

impl Deref for LazyRegex {
    type Target = Regex;

    fn deref(&self) -> &Regex {
        self.once.get_or_init(|| match Regex::new(self.pattern) {
            Ok(r) => r,
            Err(e) => {
                panic!("'{}' is not a valid regular expression: {e}", self.pattern);
            }
        })
    }
}

static IDENTIFIER: LazyRegex = LazyRegex::new("^[A-Za-z][A-Za-z0-9]*$");
static NUMBER: LazyRegex = LazyRegex::new("^-?[0-9]+$");

/// One source token, classified by its leading character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// A label declaration, written `name:`.
    LabelDecl(String),
    /// A register operand, `%name` or `%id`.
    Register(String),
    /// A reference to a variable or label address, `&name`.
    MemRef(String),
    /// An integer literal.
    Number(Word),
    /// A bare identifier (a mnemonic or a variable declaration).
    Symbol(String),
}

fn syntax_error(line: LineNumber, msg: String) -> AssemblerFailure {
    AssemblerFailure::SyntaxError { line, msg }
}

fn checked_identifier(
    line: LineNumber,
    what: &str,
    name: &str,
) -> Result<String, AssemblerFailure> {
    if IDENTIFIER.is_match(name) {
        Ok(name.to_string())
    } else {
        Err(syntax_error(
            line,
            format!("'{name}' is not a valid {what} name (a letter followed by letters and digits)"),
        ))
    }
}

fn classify(line: LineNumber, token: &str) -> Result<Token, AssemblerFailure> {
    if let Some(name) = token.strip_suffix(':') {
        return checked_identifier(line, "label", name).map(Token::LabelDecl);
    }
    if let Some(name) = token.strip_prefix('%') {
        // Register names are validated against the register file by
        // the parser; here the token only has to be non-empty.
        if name.is_empty() {
            return Err(syntax_error(line, "'%' must be followed by a register".to_string()));
        }
        return Ok(Token::Register(name.to_string()));
    }
    if let Some(name) = token.strip_prefix('&') {
        return checked_identifier(line, "variable or label", name).map(Token::MemRef);
    }
    if NUMBER.is_match(token) {
        return match token.parse::<Word>() {
            Ok(value) => Ok(Token::Number(value)),
            Err(_) => Err(syntax_error(
                line,
                format!("'{token}' does not fit in a machine word"),
            )),
        };
    }
    checked_identifier(line, "identifier", token).map(Token::Symbol)
}

/// Split a line into classified tokens.  An empty vector means the
/// line was blank.
pub(crate) fn tokenize_line(
    line: LineNumber,
    text: &str,
) -> Result<Vec<Token>, AssemblerFailure> {
    text.split_whitespace()
        .map(|token| classify(line, token))
        .collect()
}
