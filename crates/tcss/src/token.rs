//! The token model produced by the [`Lexer`](crate::lexer::Lexer).
//!
//! Every token renders back to source text through [`Display`](fmt::Display),
//! so concatenating the rendered tokens of an escape-free input reproduces it.

use std::fmt;

/// Whether a hash token's name would also be a valid identifier.
///
/// `#main` is [`HashKind::Id`]; `#123` is [`HashKind::Unrestricted`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HashKind {
    Id,
    Unrestricted,
}

/// `integer` unless a fraction or exponent was present.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumericKind {
    Integer,
    Number,
}

/// The payload shared by number, percentage and dimension tokens.
///
/// `raw` is the literal text as written (sign, digits, fraction and exponent,
/// without any `%` or unit). `value` is a best-effort `f64` reading of it;
/// very large exponents may lose precision, `raw` never does.
#[derive(Clone, Debug, PartialEq)]
pub struct Numeric {
    pub value: f64,
    pub kind: NumericKind,
    pub raw: String,
}

impl Numeric {
    pub fn new(value: f64, kind: NumericKind, raw: impl Into<String>) -> Self {
        Self {
            value,
            kind,
            raw: raw.into(),
        }
    }

    pub fn is_integer(&self) -> bool {
        self.kind == NumericKind::Integer
    }

    /// The value truncated towards zero.
    pub fn int_value(&self) -> i64 {
        self.value as i64
    }
}

/// The three bracket pairs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Bracket {
    Curly,
    Square,
    Paren,
}

impl Bracket {
    pub const fn open_char(self) -> char {
        match self {
            Bracket::Curly => '{',
            Bracket::Square => '[',
            Bracket::Paren => '(',
        }
    }

    pub const fn close_char(self) -> char {
        match self {
            Bracket::Curly => '}',
            Bracket::Square => ']',
            Bracket::Paren => ')',
        }
    }

    pub const fn open_token(self) -> Token {
        match self {
            Bracket::Curly => Token::LCurly,
            Bracket::Square => Token::LSquare,
            Bracket::Paren => Token::LParen,
        }
    }

    pub const fn close_token(self) -> Token {
        match self {
            Bracket::Curly => Token::RCurly,
            Bracket::Square => Token::RSquare,
            Bracket::Paren => Token::RParen,
        }
    }
}

/// A CSS token.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Ident(String),
    /// A function name; the `(` is implied.
    Function(String),
    /// An at-keyword name without the `@`.
    AtKeyword(String),
    /// A hash name without the `#`.
    Hash { value: String, kind: HashKind },
    /// A string's decoded contents and the quote that delimited it.
    ///
    /// A string cut off by end of input still displays with its closing
    /// quote, so `"abc` re-renders as `"abc"`.
    String { value: String, quote: char },
    /// A string cut short by a newline.
    BadString { value: String, quote: char },
    /// The decoded url inside `url(...)`. Always displays with its `)`, even
    /// when end of input closed it.
    Url(String),
    /// The source text of a malformed `url(...)`.
    BadUrl(String),

    /// Exactly one codepoint that starts no other token.
    Delim(char),
    Colon,
    Semicolon,
    Comma,

    LCurly,
    RCurly,
    LSquare,
    RSquare,
    LParen,
    RParen,

    Number(Numeric),
    Percentage(Numeric),
    Dimension { number: Numeric, unit: String },

    /// The whole comment including its `/*` and `*/` markers.
    Comment(String),
    Whitespace(String),
    /// `<!--`
    Cdo,
    /// `-->`
    Cdc,
    /// End of input. Never produced by iteration; returned by
    /// [`Lexer::next_token`](crate::lexer::Lexer::next_token) and used by the
    /// parser as its end marker.
    Eof,
}

impl Token {
    /// The codepoint of a delim or of one of its specializations (`:`, `;`, `,`).
    pub fn as_delim(&self) -> Option<char> {
        match self {
            Token::Delim(c) => Some(*c),
            Token::Colon => Some(':'),
            Token::Semicolon => Some(';'),
            Token::Comma => Some(','),
            _ => None,
        }
    }

    pub fn is_delim(&self, c: char) -> bool {
        self.as_delim() == Some(c)
    }

    /// The bracket this token opens, if any.
    pub fn opening_bracket(&self) -> Option<Bracket> {
        match self {
            Token::LCurly => Some(Bracket::Curly),
            Token::LSquare => Some(Bracket::Square),
            Token::LParen => Some(Bracket::Paren),
            _ => None,
        }
    }

    /// The bracket this token closes, if any.
    pub fn closing_bracket(&self) -> Option<Bracket> {
        match self {
            Token::RCurly => Some(Bracket::Curly),
            Token::RSquare => Some(Bracket::Square),
            Token::RParen => Some(Bracket::Paren),
            _ => None,
        }
    }

    /// The matching bracket token: `{` for `}`, `)` for `(`, and so on.
    pub fn mirror(&self) -> Option<Token> {
        if let Some(bracket) = self.opening_bracket() {
            return Some(bracket.close_token());
        }
        self.closing_bracket().map(Bracket::open_token)
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self, Token::Whitespace(_))
    }

    pub fn is_eof(&self) -> bool {
        matches!(self, Token::Eof)
    }

    /// Whether the parser may keep this token as a preserved component value.
    pub fn is_preserved(&self) -> bool {
        !matches!(
            self,
            Token::LCurly
                | Token::LSquare
                | Token::LParen
                | Token::Function(_)
                | Token::BadString { .. }
                | Token::BadUrl(_)
        )
    }

    /// Identifier text when this is an ident token.
    pub fn ident(&self) -> Option<&str> {
        match self {
            Token::Ident(name) => Some(name),
            _ => None,
        }
    }

    /// The text between a comment's markers.
    pub fn comment_text(&self) -> Option<&str> {
        match self {
            Token::Comment(raw) => {
                let inner = raw.strip_prefix("/*").unwrap_or(raw);
                Some(inner.strip_suffix("*/").unwrap_or(inner))
            }
            _ => None,
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, value: &str, quote: char) -> fmt::Result {
    write!(f, "{quote}")?;
    for c in value.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\a ")?,
            c if c == quote => write!(f, "\\{c}")?,
            c => write!(f, "{c}")?,
        }
    }
    Ok(())
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(name) => f.write_str(name),
            Token::Function(name) => write!(f, "{name}("),
            Token::AtKeyword(name) => write!(f, "@{name}"),
            Token::Hash { value, .. } => write!(f, "#{value}"),
            Token::String { value, quote } => {
                write_quoted(f, value, *quote)?;
                write!(f, "{quote}")
            }
            Token::BadString { value, quote } => write_quoted(f, value, *quote),
            Token::Url(url) => write!(f, "url({url})"),
            Token::BadUrl(raw) => f.write_str(raw),
            Token::Delim(c) => write!(f, "{c}"),
            Token::Colon => f.write_str(":"),
            Token::Semicolon => f.write_str(";"),
            Token::Comma => f.write_str(","),
            Token::LCurly => f.write_str("{"),
            Token::RCurly => f.write_str("}"),
            Token::LSquare => f.write_str("["),
            Token::RSquare => f.write_str("]"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
            Token::Number(number) => f.write_str(&number.raw),
            Token::Percentage(number) => write!(f, "{}%", number.raw),
            Token::Dimension { number, unit } => write!(f, "{}{unit}", number.raw),
            Token::Comment(raw) | Token::Whitespace(raw) => f.write_str(raw),
            Token::Cdo => f.write_str("<!--"),
            Token::Cdc => f.write_str("-->"),
            Token::Eof => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brackets_mirror_each_other() {
        assert_eq!(Token::LCurly.mirror(), Some(Token::RCurly));
        assert_eq!(Token::RSquare.mirror(), Some(Token::LSquare));
        assert_eq!(Token::LParen.mirror(), Some(Token::RParen));
        assert_eq!(Token::Comma.mirror(), None);
    }

    #[test]
    fn delim_specializations() {
        assert_eq!(Token::Colon.as_delim(), Some(':'));
        assert!(Token::Comma.is_delim(','));
        assert!(Token::Delim('!').is_delim('!'));
        assert_eq!(Token::Ident("a".into()).as_delim(), None);
    }

    #[test]
    fn display_forms() {
        assert_eq!(Token::Function("rgb".into()).to_string(), "rgb(");
        assert_eq!(Token::AtKeyword("media".into()).to_string(), "@media");
        let hash = Token::Hash {
            value: "fff".into(),
            kind: HashKind::Unrestricted,
        };
        assert_eq!(hash.to_string(), "#fff");
        let string = Token::String {
            value: "it's".into(),
            quote: '\'',
        };
        assert_eq!(string.to_string(), r"'it\'s'");
        assert_eq!(Token::Url("a.png".into()).to_string(), "url(a.png)");
        let pct = Token::Percentage(Numeric::new(50.0, NumericKind::Integer, "50"));
        assert_eq!(pct.to_string(), "50%");
    }

    #[test]
    fn comment_text_strips_markers() {
        let comment = Token::Comment("/* hi */".into());
        assert_eq!(comment.comment_text(), Some(" hi "));
        let open = Token::Comment("/* open".into());
        assert_eq!(open.comment_text(), Some(" open"));
    }

    #[test]
    fn preserved_tokens() {
        assert!(Token::Ident("a".into()).is_preserved());
        assert!(Token::RCurly.is_preserved());
        assert!(!Token::LCurly.is_preserved());
        assert!(!Token::Function("f".into()).is_preserved());
    }
}
