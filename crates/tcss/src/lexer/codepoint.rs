//! Codepoint classes and the three-codepoint lookahead checks from
//! CSS Syntax Level 3, section 4.2.

pub const REPLACEMENT_CHARACTER: char = '\u{FFFD}';

pub fn is_whitespace(c: char) -> bool {
    matches!(c, '\n' | '\t' | ' ')
}

pub fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

pub fn is_ident_char(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit() || c == '-'
}

pub fn is_non_printable(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{B}' | '\u{E}'..='\u{1F}' | '\u{7F}')
}

fn is_digit(c: Option<char>) -> bool {
    c.is_some_and(|c| c.is_ascii_digit())
}

/// Whether the two codepoints are a backslash that starts an escape.
pub fn is_valid_escape(first: Option<char>, second: Option<char>) -> bool {
    first == Some('\\') && second != Some('\n')
}

/// Whether the three codepoints would start an identifier.
pub fn starts_ident(first: Option<char>, second: Option<char>, third: Option<char>) -> bool {
    match first {
        Some('-') => {
            second.is_some_and(|c| is_ident_start(c) || c == '-') || is_valid_escape(second, third)
        }
        Some('\\') => is_valid_escape(first, second),
        Some(c) => is_ident_start(c),
        None => false,
    }
}

/// Whether the three codepoints would start a number.
pub fn starts_number(first: Option<char>, second: Option<char>, third: Option<char>) -> bool {
    match first {
        Some('+' | '-') => is_digit(second) || (second == Some('.') && is_digit(third)),
        Some('.') => is_digit(second),
        Some(c) => c.is_ascii_digit(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ident_starts() {
        assert!(starts_ident(Some('a'), None, None));
        assert!(starts_ident(Some('-'), Some('-'), None));
        assert!(starts_ident(Some('-'), Some('x'), None));
        assert!(starts_ident(Some('-'), Some('\\'), Some('4')));
        assert!(starts_ident(Some('é'), None, None));
        assert!(!starts_ident(Some('-'), Some('1'), None));
        assert!(!starts_ident(Some('\\'), Some('\n'), None));
        assert!(!starts_ident(Some('1'), None, None));
    }

    #[test]
    fn number_starts() {
        assert!(starts_number(Some('+'), Some('1'), None));
        assert!(starts_number(Some('-'), Some('.'), Some('5')));
        assert!(starts_number(Some('.'), Some('5'), None));
        assert!(!starts_number(Some('.'), Some('a'), None));
        assert!(!starts_number(Some('-'), Some('-'), Some('1')));
    }

    #[test]
    fn non_printable_excludes_whitespace() {
        assert!(is_non_printable('\u{0}'));
        assert!(is_non_printable('\u{7F}'));
        assert!(!is_non_printable('\t'));
        assert!(!is_non_printable('\n'));
    }
}
