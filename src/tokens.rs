use crate::grammar;
use std::fmt;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Delimiter {
    Round,
    Square,
    Brace,
}

impl Delimiter {
    pub(crate) fn open_char(self) -> char {
        match self {
            Delimiter::Round => '(',
            Delimiter::Square => '[',
            Delimiter::Brace => '{',
        }
    }

    pub(crate) fn close_char(self) -> char {
        match self {
            Delimiter::Round => ')',
            Delimiter::Square => ']',
            Delimiter::Brace => '}',
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Token<'a> {
    Open(Delimiter),
    Close(Delimiter),
    StringLiteral(&'a str),
    PlainChars(&'a str),
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Open(d) => write!(f, "{}", d.open_char()),
            Token::Close(d) => write!(f, "{}", d.close_char()),
            Token::StringLiteral(s) => write!(f, "\"{}\"", s),
            Token::PlainChars(s) => write!(f, "{}", s),
        }
    }
}

fn paren_token(c: char) -> Token<'static> {
    use Delimiter::*;
    match c {
        '(' => Token::Open(Round),
        '[' => Token::Open(Square),
        '{' => Token::Open(Brace),
        ')' => Token::Close(Round),
        ']' => Token::Close(Square),
        _ => Token::Close(Brace),
    }
}

fn flush<'a>(input: &'a str, tokens: &mut Vec<Token<'a>>, start: &mut Option<usize>, end: usize) {
    if let Some(begin) = start.take() {
        if begin < end {
            tokens.push(Token::PlainChars(&input[begin..end]));
        }
    }
}

enum State {
    Normal,
    InString(usize),
    InComment,
}

/// Splits `input` into tokens in a single pass.
///
/// Strings have no escapes: everything up to the next `"` is the payload.
/// An unterminated string or comment at the end of input is dropped without
/// complaint.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut symbol_start: Option<usize> = None;
    let mut state = State::Normal;

    for (pos, c) in input.char_indices() {
        match state {
            State::InString(start) => {
                if grammar::is_string_delimiter(c) {
                    tokens.push(Token::StringLiteral(&input[start..pos]));
                    state = State::Normal;
                }
            }
            State::InComment => {
                if c == '\n' {
                    state = State::Normal;
                }
            }
            State::Normal => {
                if grammar::is_string_delimiter(c) {
                    flush(input, &mut tokens, &mut symbol_start, pos);
                    state = State::InString(pos + c.len_utf8());
                } else if grammar::is_comment_start(c) {
                    flush(input, &mut tokens, &mut symbol_start, pos);
                    state = State::InComment;
                } else if grammar::is_paren(c) {
                    flush(input, &mut tokens, &mut symbol_start, pos);
                    tokens.push(paren_token(c));
                } else if grammar::is_whitespace(c) {
                    flush(input, &mut tokens, &mut symbol_start, pos);
                } else if symbol_start.is_none() {
                    symbol_start = Some(pos);
                }
            }
        }
    }
    if let State::Normal = state {
        flush(input, &mut tokens, &mut symbol_start, input.len());
    }
    log::trace!("tokenized {} tokens", tokens.len());
    tokens
}

#[cfg(test)]
mod tests {
    use super::Delimiter::*;
    use super::Token::*;
    use super::*;

    #[test]
    fn parens_split_symbols() {
        assert_eq!(
            tokenize("(+ 1 2)"),
            vec![Open(Round), PlainChars("+"), PlainChars("1"), PlainChars("2"), Close(Round)]
        );
        assert_eq!(
            tokenize("{a}[b]"),
            vec![
                Open(Brace),
                PlainChars("a"),
                Close(Brace),
                Open(Square),
                PlainChars("b"),
                Close(Square)
            ]
        );
    }

    #[test]
    fn strings_are_verbatim() {
        assert_eq!(
            tokenize(r#"(print "a (b) ; c\n")"#),
            vec![
                Open(Round),
                PlainChars("print"),
                StringLiteral(r"a (b) ; c\n"),
                Close(Round)
            ]
        );
        assert_eq!(tokenize(r#""""#), vec![StringLiteral("")]);
    }

    #[test]
    fn string_flushes_pending_symbol() {
        assert_eq!(tokenize(r#"ab"cd""#), vec![PlainChars("ab"), StringLiteral("cd")]);
    }

    #[test]
    fn comments_are_dropped() {
        assert_eq!(
            tokenize("a ; ignored (x)\n b;tail"),
            vec![PlainChars("a"), PlainChars("b")]
        );
    }

    #[test]
    fn whitespace_kinds() {
        assert_eq!(
            tokenize(" a\tb\r\nc "),
            vec![PlainChars("a"), PlainChars("b"), PlainChars("c")]
        );
        assert!(tokenize(" \t\r\n").is_empty());
    }

    #[test]
    fn unterminated_string_is_silent() {
        assert_eq!(tokenize(r#"a "never closed"#), vec![PlainChars("a")]);
    }

    #[test]
    fn unicode_symbols() {
        assert_eq!(tokenize("(λ é)"), vec![Open(Round), PlainChars("λ"), PlainChars("é"), Close(Round)]);
    }
}
