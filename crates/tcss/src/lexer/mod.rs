//! Tokenizer for TCSS source text.
//!
//! Implements the CSS Syntax Level 3 tokenization algorithm. The lexer never
//! fails: malformed input produces recovery tokens ([`Token::BadString`],
//! [`Token::BadUrl`]) and a [`Diagnostic`] recorded on the lexer.
//!
//! # Examples
//!
//! ```
//! use tcss::lexer::Lexer;
//! use tcss::token::Token;
//!
//! let tokens: Vec<_> = Lexer::new("a{b:1}").collect();
//! assert_eq!(tokens[0], Token::Ident("a".into()));
//! assert_eq!(tokens.len(), 6);
//! ```

mod codepoint;

use std::borrow::Cow;
use std::path::Path;

use phf::phf_map;

use crate::error::{Diagnostic, Position, Result};
use crate::loader;
use crate::token::{HashKind, Numeric, NumericKind, Token};

pub use codepoint::REPLACEMENT_CHARACTER;
use codepoint::{
    is_ident_char, is_ident_start, is_non_printable, is_valid_escape, is_whitespace, starts_ident,
    starts_number,
};

/// Codepoints that always lex to a single structural token.
static STRUCTURAL: phf::Map<char, Token> = phf_map! {
    '(' => Token::LParen,
    ')' => Token::RParen,
    '[' => Token::LSquare,
    ']' => Token::RSquare,
    '{' => Token::LCurly,
    '}' => Token::RCurly,
    ',' => Token::Comma,
    ':' => Token::Colon,
    ';' => Token::Semicolon,
};

/// Rewrites CR, CRLF and form feed to `\n` and NUL to U+FFFD.
///
/// Already-normalized input is returned borrowed.
pub fn normalize(source: &str) -> Cow<'_, str> {
    if !source.contains(['\r', '\u{C}', '\0']) {
        return Cow::Borrowed(source);
    }

    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            }
            '\u{C}' => out.push('\n'),
            '\0' => out.push(REPLACEMENT_CHARACTER),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// A single-use CSS tokenizer.
///
/// Iterating yields tokens until end of input and never yields
/// [`Token::Eof`]. The iterator is not restartable: each step advances the
/// lexer's cursor.
pub struct Lexer {
    input: Vec<char>,
    pos: usize,
    line: usize,
    column: usize,
    diagnostics: Vec<Diagnostic>,
}

impl Lexer {
    /// Create a lexer over `source`, normalizing newlines and NUL first.
    pub fn new(source: &str) -> Self {
        Self {
            input: normalize(source).chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
            diagnostics: Vec::new(),
        }
    }

    /// Create a lexer over a stylesheet file, honoring a leading `@charset`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let source = loader::read_stylesheet(path)?;
        Ok(Self::new(&source))
    }

    /// Tokenize `source` in full, returning the tokens and the diagnostics.
    pub fn tokenize(source: &str) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut lexer = Self::new(source);
        let tokens = lexer.process();
        (tokens, lexer.diagnostics)
    }

    /// Consume every remaining token.
    pub fn process(&mut self) -> Vec<Token> {
        self.by_ref().collect()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Where the next token will start.
    pub fn location(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// The codepoint `offset` places ahead of the cursor, without consuming.
    pub fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset).copied()
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek3(&self) -> (Option<char>, Option<char>, Option<char>) {
        (self.peek_at(0), self.peek_at(1), self.peek_at(2))
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn advance_by(&mut self, count: usize) {
        for _ in 0..count {
            self.advance();
        }
    }

    fn text_since(&self, start: usize) -> String {
        self.input[start..self.pos].iter().collect()
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        log::trace!("lexer: {diagnostic}");
        self.diagnostics.push(diagnostic);
    }

    /// Consume and return the next token, or [`Token::Eof`] at end of input.
    pub fn next_token(&mut self) -> Token {
        let Some(c) = self.peek() else {
            return Token::Eof;
        };
        let (_, second, third) = self.peek3();

        match c {
            '/' if second == Some('*') => self.consume_comment(),
            c if is_whitespace(c) => self.consume_whitespace(),
            '"' | '\'' => {
                let start = self.location();
                self.advance();
                self.consume_string(c, start)
            }
            '#' => {
                self.advance();
                let (first, second, third) = self.peek3();
                if first.is_some_and(is_ident_char) || is_valid_escape(first, second) {
                    let kind = if starts_ident(first, second, third) {
                        HashKind::Id
                    } else {
                        HashKind::Unrestricted
                    };
                    let value = self.consume_name();
                    Token::Hash { value, kind }
                } else {
                    Token::Delim('#')
                }
            }
            '+' | '.' => {
                if starts_number(Some(c), second, third) {
                    self.consume_numeric()
                } else {
                    self.advance();
                    Token::Delim(c)
                }
            }
            '-' => {
                if starts_number(Some(c), second, third) {
                    self.consume_numeric()
                } else if second == Some('-') && third == Some('>') {
                    self.advance_by(3);
                    Token::Cdc
                } else if starts_ident(Some(c), second, third) {
                    self.consume_ident_like()
                } else {
                    self.advance();
                    Token::Delim(c)
                }
            }
            '<' => {
                if second == Some('!') && third == Some('-') && self.peek_at(3) == Some('-') {
                    self.advance_by(4);
                    Token::Cdo
                } else {
                    self.advance();
                    Token::Delim(c)
                }
            }
            '@' => {
                self.advance();
                let (first, second, third) = self.peek3();
                if starts_ident(first, second, third) {
                    Token::AtKeyword(self.consume_name())
                } else {
                    Token::Delim('@')
                }
            }
            '\\' => {
                if is_valid_escape(Some(c), second) {
                    self.consume_ident_like()
                } else {
                    let at = self.location();
                    self.report(Diagnostic::InvalidEscape(at));
                    self.advance();
                    Token::Delim(c)
                }
            }
            c if c.is_ascii_digit() => self.consume_numeric(),
            c if is_ident_start(c) => self.consume_ident_like(),
            c => {
                self.advance();
                STRUCTURAL.get(&c).cloned().unwrap_or(Token::Delim(c))
            }
        }
    }

    fn consume_comment(&mut self) -> Token {
        let start = self.pos;
        let at = self.location();
        self.advance_by(2);
        loop {
            match self.peek() {
                Some('*') if self.peek_at(1) == Some('/') => {
                    self.advance_by(2);
                    break;
                }
                Some(_) => {
                    self.advance();
                }
                None => {
                    self.report(Diagnostic::UnterminatedComment(at));
                    break;
                }
            }
        }
        Token::Comment(self.text_since(start))
    }

    fn consume_whitespace(&mut self) -> Token {
        let start = self.pos;
        while self.peek().is_some_and(is_whitespace) {
            self.advance();
        }
        Token::Whitespace(self.text_since(start))
    }

    /// The opening quote has already been consumed.
    fn consume_string(&mut self, quote: char, at: Position) -> Token {
        let mut value = String::new();
        loop {
            match self.peek() {
                None => {
                    self.report(Diagnostic::UnterminatedString(at));
                    return Token::String { value, quote };
                }
                Some(c) if c == quote => {
                    self.advance();
                    return Token::String { value, quote };
                }
                Some('\n') => {
                    // The newline is left for the next token.
                    let here = self.location();
                    self.report(Diagnostic::NewlineInString(here));
                    return Token::BadString { value, quote };
                }
                Some('\\') => {
                    self.advance();
                    match self.peek() {
                        None => {}
                        Some('\n') => {
                            self.advance();
                        }
                        Some(_) => value.push(self.consume_escape()),
                    }
                }
                Some(c) => {
                    self.advance();
                    value.push(c);
                }
            }
        }
    }

    /// The backslash has already been consumed.
    fn consume_escape(&mut self) -> char {
        let Some(c) = self.advance() else {
            return REPLACEMENT_CHARACTER;
        };
        if !c.is_ascii_hexdigit() {
            return c;
        }

        let mut hex = String::from(c);
        while hex.len() < 6 {
            match self.peek() {
                Some(h) if h.is_ascii_hexdigit() => {
                    self.advance();
                    hex.push(h);
                }
                _ => break,
            }
        }
        if self.peek().is_some_and(is_whitespace) {
            self.advance();
        }

        u32::from_str_radix(&hex, 16)
            .ok()
            .filter(|&value| value != 0)
            .and_then(char::from_u32)
            .unwrap_or(REPLACEMENT_CHARACTER)
    }

    /// Consume an ident sequence, decoding escapes.
    fn consume_name(&mut self) -> String {
        let mut name = String::new();
        loop {
            match self.peek() {
                Some(c) if is_ident_char(c) => {
                    self.advance();
                    name.push(c);
                }
                Some('\\') if is_valid_escape(Some('\\'), self.peek_at(1)) => {
                    self.advance();
                    name.push(self.consume_escape());
                }
                _ => return name,
            }
        }
    }

    fn consume_number(&mut self) -> Numeric {
        let start = self.pos;
        let mut kind = NumericKind::Integer;

        if matches!(self.peek(), Some('+' | '-')) {
            self.advance();
        }
        self.consume_digits();

        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            self.consume_digits();
            kind = NumericKind::Number;
        }

        let (first, second, third) = self.peek3();
        if matches!(first, Some('e' | 'E')) {
            let digit = |c: Option<char>| c.is_some_and(|c| c.is_ascii_digit());
            if digit(second) {
                self.advance();
                self.consume_digits();
                kind = NumericKind::Number;
            } else if matches!(second, Some('+' | '-')) && digit(third) {
                self.advance_by(2);
                self.consume_digits();
                kind = NumericKind::Number;
            }
        }

        let raw = self.text_since(start);
        let value = raw.parse::<f64>().unwrap_or_default();
        Numeric::new(value, kind, raw)
    }

    fn consume_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    fn consume_numeric(&mut self) -> Token {
        let number = self.consume_number();
        let (first, second, third) = self.peek3();
        if starts_ident(first, second, third) {
            let unit = self.consume_name();
            Token::Dimension { number, unit }
        } else if first == Some('%') {
            self.advance();
            Token::Percentage(number)
        } else {
            Token::Number(number)
        }
    }

    fn consume_ident_like(&mut self) -> Token {
        let start = self.pos;
        let at = self.location();
        let name = self.consume_name();

        if self.peek() != Some('(') {
            return Token::Ident(name);
        }
        self.advance();

        if !name.eq_ignore_ascii_case("url") {
            return Token::Function(name);
        }

        while self.peek().is_some_and(is_whitespace) && self.peek_at(1).is_some_and(is_whitespace) {
            self.advance();
        }
        let is_quote = |c: Option<char>| matches!(c, Some('"' | '\''));
        let first = self.peek();
        if is_quote(first) || (first.is_some_and(is_whitespace) && is_quote(self.peek_at(1))) {
            Token::Function(name)
        } else {
            self.consume_url(start, at)
        }
    }

    /// `url(` has already been consumed.
    fn consume_url(&mut self, start: usize, at: Position) -> Token {
        let mut url = String::new();
        while self.peek().is_some_and(is_whitespace) {
            self.advance();
        }

        loop {
            match self.advance() {
                Some(')') => return Token::Url(url),
                None => {
                    self.report(Diagnostic::UnterminatedUrl(at));
                    return Token::Url(url);
                }
                Some(c) if is_whitespace(c) => {
                    while self.peek().is_some_and(is_whitespace) {
                        self.advance();
                    }
                    match self.peek() {
                        Some(')') => {
                            self.advance();
                            return Token::Url(url);
                        }
                        None => {
                            self.report(Diagnostic::UnterminatedUrl(at));
                            return Token::Url(url);
                        }
                        Some(_) => return self.consume_bad_url(start, at),
                    }
                }
                Some('"' | '\'' | '(') => return self.consume_bad_url(start, at),
                Some(c) if is_non_printable(c) => return self.consume_bad_url(start, at),
                Some('\\') => {
                    if is_valid_escape(Some('\\'), self.peek()) {
                        url.push(self.consume_escape());
                    } else {
                        let here = self.location();
                        self.report(Diagnostic::InvalidUrlEscape(here));
                        return self.consume_bad_url(start, at);
                    }
                }
                Some(c) => url.push(c),
            }
        }
    }

    /// Discard the rest of a malformed url up to an unescaped `)`.
    fn consume_bad_url(&mut self, start: usize, at: Position) -> Token {
        loop {
            match self.advance() {
                None => {
                    self.report(Diagnostic::UnterminatedUrl(at));
                    break;
                }
                Some(')') => break,
                Some('\\') if is_valid_escape(Some('\\'), self.peek()) => {
                    self.consume_escape();
                }
                Some(_) => {}
            }
        }
        Token::BadUrl(self.text_since(start))
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Token::Eof => None,
            token => Some(token),
        }
    }
}
