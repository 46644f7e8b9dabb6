// Character classes of the surface syntax. Nothing in here holds state.

use regex::Regex;

pub(crate) const STRING_DELIMITER: char = '"';
pub(crate) const COMMENT_START: char = ';';
pub(crate) const NULL_LITERAL: &str = "null";

pub(crate) fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

pub(crate) fn is_paren(c: char) -> bool {
    is_open_paren(c) || is_close_paren(c)
}

pub(crate) fn is_open_paren(c: char) -> bool {
    matches!(c, '(' | '[' | '{')
}

pub(crate) fn is_close_paren(c: char) -> bool {
    matches!(c, ')' | ']' | '}')
}

pub(crate) fn is_string_delimiter(c: char) -> bool {
    c == STRING_DELIMITER
}

pub(crate) fn is_comment_start(c: char) -> bool {
    c == COMMENT_START
}

/// Optional sign, digit groups separated by single hyphens, optional fraction.
/// `1-000-000` is one million.
pub(crate) fn is_number(text: &str) -> bool {
    lazy_static! {
        static ref NUMBER_RE: Regex = Regex::new(
            r#"(?x)
                ^[+-]?                 # sign
                [0-9]+(?:-[0-9]+)*     # ASCII digit groups, hyphen separated
                (?:\.[0-9]+)?$         # fractional part
            "#
        )
        .unwrap();
    }
    NUMBER_RE.is_match(text)
}

/// Strips the grouping hyphens so the text can go through `str::parse`.
/// Only meaningful for text accepted by `is_number`.
pub(crate) fn normalize_number(text: &str) -> String {
    let (sign, digits) = match text.chars().next() {
        Some(c @ '+') | Some(c @ '-') => (Some(c), &text[1..]),
        _ => (None, text),
    };
    sign.into_iter()
        .chain(digits.chars().filter(|&c| c != '-'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_shapes() {
        for good in &["0", "42", "-7", "+3", "1.5", "-0.25", "1-000-000", "12-34.5"] {
            assert!(is_number(good), "{} should be numeric", good);
        }
        for bad in &["-", "+", "1.", ".5", "1--0", "1-", "-1-", "abc", "1a", "1.2.3", ""] {
            assert!(!is_number(bad), "{} should not be numeric", bad);
        }
    }

    #[test]
    fn only_ascii_digits_are_numeric() {
        assert!(!is_number("٣"));
        assert!(!is_number("١-٢"));
        assert!(!is_number("1.٥"));
    }

    #[test]
    fn grouping_hyphens_are_stripped() {
        assert_eq!(normalize_number("1-000-000"), "1000000");
        assert_eq!(normalize_number("-1-000.5"), "-1000.5");
        assert_eq!(normalize_number("+12"), "+12");
    }

    #[test]
    fn paren_classes() {
        assert!("([{".chars().all(is_open_paren));
        assert!(")]}".chars().all(is_close_paren));
        assert!("()[]{}".chars().all(is_paren));
        assert!(!is_paren('<'));
    }
}
