use crate::grammar;
use crate::tokens::{tokenize, Delimiter, Token};
use crate::types::{Expr, Form, FormKind, Symbol};
use std::fmt;
use std::iter::Peekable;
use std::slice;

type Reader<'a> = Peekable<slice::Iter<'a, Token<'a>>>;

pub type Result<T> = std::result::Result<T, ReadError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ReadError {
    UnexpectedToken(String),
    MismatchedDelimiter { expected: char, found: char },
    UnexpectedEndOfInput,
    BadNumber(String),
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::UnexpectedToken(t) => write!(f, "Unexpected token {}", t),
            ReadError::MismatchedDelimiter { expected, found } => {
                write!(f, "Mismatched delimiter: expected {}, found {}", expected, found)
            }
            ReadError::UnexpectedEndOfInput => write!(f, "Unexpected end of input"),
            ReadError::BadNumber(t) => write!(f, "Malformed number {}", t),
        }
    }
}

/// Reads every top-level form in `input`.
pub fn parse(input: &str) -> Result<Vec<Expr>> {
    let tokens = tokenize(input);
    let mut reader = tokens.iter().peekable();
    let mut forms = Vec::new();
    while reader.peek().is_some() {
        forms.push(read_form(&mut reader)?);
    }
    log::debug!("parsed {} top-level forms", forms.len());
    Ok(forms)
}

fn read_form(reader: &mut Reader) -> Result<Expr> {
    match reader.next() {
        Some(Token::Open(delimiter)) => read_compound(reader, *delimiter).map(Expr::Form),
        Some(token @ Token::Close(_)) => Err(ReadError::UnexpectedToken(token.to_string())),
        Some(Token::StringLiteral(s)) => Ok(Expr::Str((*s).to_owned())),
        Some(Token::PlainChars(chars)) => read_atom(chars),
        None => Err(ReadError::UnexpectedEndOfInput),
    }
}

fn read_compound(reader: &mut Reader, opener: Delimiter) -> Result<Form> {
    let kind = match opener {
        Delimiter::Square => FormKind::Literal,
        Delimiter::Round | Delimiter::Brace => FormKind::Call,
    };
    let mut children = Vec::new();
    loop {
        match reader.peek() {
            Some(Token::Close(closer)) => {
                let closer = *closer;
                reader.next();
                if closer != opener {
                    return Err(ReadError::MismatchedDelimiter {
                        expected: opener.close_char(),
                        found: closer.close_char(),
                    });
                }
                break;
            }
            Some(_) => children.push(read_form(reader)?),
            None => return Err(ReadError::UnexpectedEndOfInput),
        }
    }
    Ok(Form { kind, children })
}

fn read_atom(chars: &str) -> Result<Expr> {
    if grammar::is_number(chars) {
        return grammar::normalize_number(chars)
            .parse::<f64>()
            .map(Expr::Number)
            .or(Err(ReadError::BadNumber(chars.to_owned())));
    }
    Ok(match chars {
        "true" => Expr::Bool(true),
        "false" => Expr::Bool(false),
        grammar::NULL_LITERAL => Expr::Null,
        _ => Expr::Identifier(Symbol::from(chars)),
    })
}
