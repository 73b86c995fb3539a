//! Compact re-serialization of TCSS source.
//!
//! Comments are removed and whitespace runs collapse to a single space. The
//! space is dropped entirely where it can never be significant: next to
//! `{`, `}`, `;` and `,`, inside the edges of `()`/`[]`, after `:`, and at the
//! start and end of the output. Where a removed comment sat between two tokens
//! that would merge if written side by side (`a/**/b`), a space is inserted.
//!
//! ```rust
//! use tcss::minify::minify;
//!
//! assert_eq!(
//!     minify("Button {\n    color: red; /* primary */\n}"),
//!     "Button{color:red;}"
//! );
//! ```

use crate::lexer::Lexer;
use crate::token::Token;

pub fn minify(source: &str) -> String {
    minify_tokens(Lexer::new(source))
}

pub fn minify_tokens(tokens: impl IntoIterator<Item = Token>) -> String {
    let mut out = String::new();
    let mut previous: Option<Token> = None;
    let mut whitespace = false;
    let mut comment = false;

    for token in tokens {
        match token {
            Token::Whitespace(_) => whitespace = true,
            Token::Comment(_) => comment = true,
            Token::Eof => break,
            token => {
                if let Some(prev) = &previous {
                    let separated = if whitespace {
                        !drops_space_after(prev) && !drops_space_before(&token)
                    } else {
                        comment && ends_word(prev) && starts_word(&token)
                    };
                    if separated {
                        out.push(' ');
                    }
                }
                out.push_str(&token.to_string());
                previous = Some(token);
                whitespace = false;
                comment = false;
            }
        }
    }
    out
}

fn drops_space_before(token: &Token) -> bool {
    matches!(
        token,
        Token::LCurly
            | Token::RCurly
            | Token::Semicolon
            | Token::Comma
            | Token::RParen
            | Token::RSquare
    )
}

fn drops_space_after(token: &Token) -> bool {
    matches!(
        token,
        Token::LCurly
            | Token::RCurly
            | Token::Semicolon
            | Token::Comma
            | Token::Colon
            | Token::LParen
            | Token::LSquare
            | Token::Function(_)
    )
}

fn ends_word(token: &Token) -> bool {
    matches!(
        token,
        Token::Ident(_)
            | Token::AtKeyword(_)
            | Token::Hash { .. }
            | Token::Number(_)
            | Token::Dimension { .. }
    )
}

fn starts_word(token: &Token) -> bool {
    matches!(
        token,
        Token::Ident(_)
            | Token::Function(_)
            | Token::Number(_)
            | Token::Percentage(_)
            | Token::Dimension { .. }
            | Token::Url(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comment_between_words_keeps_them_apart() {
        assert_eq!(minify("a/**/b"), "a b");
        assert_eq!(minify("a/**/{"), "a{");
    }

    #[test]
    fn descendant_whitespace_survives() {
        assert_eq!(minify("Screen   Label {}"), "Screen Label{}");
    }

    #[test]
    fn leading_and_trailing_whitespace_removed() {
        assert_eq!(minify("  \n a \n "), "a");
    }
}
