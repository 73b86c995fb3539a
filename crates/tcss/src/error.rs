//! Error types for TCSS tokenizing, parsing and stylesheet mutation.
//!
//! Two kinds of failure exist:
//!
//! - [`Diagnostic`]: a recoverable problem found while lexing or parsing. These
//!   are collected on the [`Lexer`](crate::lexer::Lexer) or
//!   [`Parser`](crate::parser::Parser) and never interrupt the scan.
//! - [`TcssError`]: an all-or-nothing failure returned from a single-shot entry
//!   point (one rule, one declaration, one component value), from a
//!   [`StyleSheet`](crate::parser::StyleSheet) mutation, or from file loading.

use std::fmt;

use thiserror::Error;

/// A 1-based line/column location in the normalized source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A recoverable lexing or parsing problem.
///
/// The lexer stamps its diagnostics with the position where the offending
/// construct started. Parser diagnostics describe the construct instead, since
/// component values do not carry source positions.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    #[error("unterminated comment at {0}")]
    UnterminatedComment(Position),

    #[error("unterminated string at {0}")]
    UnterminatedString(Position),

    /// An unescaped newline ended a string early; a bad-string token was produced.
    #[error("newline in string at {0}")]
    NewlineInString(Position),

    #[error("unterminated url at {0}")]
    UnterminatedUrl(Position),

    #[error("invalid escape in url at {0}")]
    InvalidUrlEscape(Position),

    /// A backslash followed by a newline outside of a string.
    #[error("invalid escape at {0}")]
    InvalidEscape(Position),

    #[error("block was not closed")]
    UnterminatedBlock,

    #[error("function {0}() was not closed")]
    UnterminatedFunction(String),

    #[error("at-rule @{0} is missing a semicolon")]
    UnterminatedAtRule(String),

    #[error("qualified rule is not closed")]
    UnterminatedQualifiedRule,

    #[error("declaration {0} is missing a colon")]
    MissingColon(String),

    #[error("invalid style block syntax")]
    InvalidStyleBlock,

    #[error("invalid declaration list")]
    InvalidDeclarationList,

    /// Blocks nested deeper than the configured limit were skipped.
    #[error("nesting deeper than {0} levels was skipped")]
    NestingTooDeep(usize),
}

/// Errors returned to callers that asked for an all-or-nothing result.
///
/// # Examples
///
/// ```rust
/// use tcss::parser::parse_rule;
/// use tcss::TcssError;
///
/// // Trailing tokens after the rule
/// let result = parse_rule("a {} b");
/// assert!(matches!(result, Err(TcssError::InvalidSyntax(_))));
/// ```
#[derive(Error, Debug)]
pub enum TcssError {
    /// The input did not have the shape the entry point expects.
    #[error("CSS syntax error: {0}")]
    InvalidSyntax(String),

    /// The stylesheet's origin is not clean.
    #[error("stylesheet origin is not clean")]
    Security,

    /// The stylesheet does not permit this operation right now.
    #[error("operation not allowed: {0}")]
    NotAllowed(&'static str),

    /// The mutation would break `@namespace`/`@import` ordering.
    #[error("invalid stylesheet state: {0}")]
    InvalidState(&'static str),

    /// A rule index past the end of the rule list.
    #[error("rule index {index} is out of range for {len} rules")]
    IndexSize { index: usize, len: usize },

    /// An `@charset` label that names no known encoding.
    #[error("unknown stylesheet encoding: {0}")]
    UnknownEncoding(String),

    /// An I/O error occurred while reading a stylesheet file.
    #[error("I/O error reading stylesheet")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TcssError>;
