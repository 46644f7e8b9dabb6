use crate::environment::Environment;
use derive_more::{Deref, Display};
use std::cell::RefCell;
use std::fmt;
use std::fmt::Formatter;
use std::ops::{RangeFrom, RangeInclusive};
use std::rc::Rc;

#[derive(Deref, Display, Debug, PartialEq, Eq, Hash, Clone)]
pub struct Symbol(pub String);

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol(name.to_owned())
    }
}

// Expressions: the immutable tree produced by the reader.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    /// `( … )` or `{ … }`
    Call,
    /// `[ … ]`
    Literal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    pub kind: FormKind,
    pub children: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Str(String),
    Bool(bool),
    Null,
    Identifier(Symbol),
    Form(Form),
}

impl Expr {
    pub(crate) fn as_identifier(&self) -> Option<&Symbol> {
        match self {
            Expr::Identifier(s) => Some(s),
            _ => None,
        }
    }
}

// Arity checking, shared by closures, special forms and primitives.

#[derive(Debug, Clone, PartialEq)]
pub enum Arity {
    Between(RangeInclusive<usize>),
    AtLeast(RangeFrom<usize>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BadArgCount {
    pub name: String,
    pub expected: Arity,
    pub got: usize,
}

impl fmt::Display for BadArgCount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} expected {} arguments, got {}",
            self.name, self.expected, self.got
        )
    }
}

impl Arity {
    pub const fn exactly(n: usize) -> Self {
        Self::Between(n..=n)
    }

    pub const fn at_least(n: usize) -> Self {
        Self::AtLeast(n..)
    }

    pub fn contains(&self, n: usize) -> bool {
        match self {
            Self::Between(range) => range.contains(&n),
            Self::AtLeast(range) => range.contains(&n),
        }
    }

    pub fn validate_for(&self, n: usize, name: &str) -> Result<(), BadArgCount> {
        match self.contains(n) {
            true => Ok(()),
            false => Err(BadArgCount {
                name: name.to_owned(),
                expected: self.clone(),
                got: n,
            }),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Between(r) => {
                if r.start() == r.end() {
                    write!(f, "exactly {}", r.start())
                } else {
                    write!(f, "from {} to {}", r.start(), r.end())
                }
            }
            Arity::AtLeast(r) => write!(f, "at least {}", r.start),
        }
    }
}

// Runtime values.

/// A shared, mutable sequence. Cloning the handle aliases the storage.
#[derive(Deref, Debug, Clone, Default)]
pub struct List(Rc<RefCell<Vec<Value>>>);

impl List {
    pub fn new(elements: Vec<Value>) -> Self {
        List(Rc::new(RefCell::new(elements)))
    }

    pub fn same_storage(&self, other: &List) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Copies the current elements out; later mutation of the list is not reflected.
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ClosureParameters {
    Positional(Vec<Symbol>),
    /// `(lambda x …)`: binds exactly one argument to `x`.
    Single(Symbol),
}

impl ClosureParameters {
    pub fn arity(&self) -> Arity {
        match self {
            ClosureParameters::Positional(names) => Arity::exactly(names.len()),
            ClosureParameters::Single(_) => Arity::exactly(1),
        }
    }
}

impl fmt::Display for ClosureParameters {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use itertools::Itertools;
        match self {
            ClosureParameters::Positional(names) => write!(f, "({})", names.iter().join(" ")),
            ClosureParameters::Single(name) => write!(f, "{}", name),
        }
    }
}

pub struct Closure {
    pub name: Option<Symbol>,
    pub parameters: ClosureParameters,
    pub body: Rc<[Expr]>,
    pub parent: Rc<Environment>,
}

impl Closure {
    pub(crate) fn display_name(&self) -> &str {
        self.name.as_ref().map(Symbol::as_ref).unwrap_or("lambda")
    }
}

impl fmt::Debug for Closure {
    // Not derived: the parent environment may well contain this closure.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Closure{{name: {:?}, parameters: {:?}, body: {:?}}}",
            self.name, self.parameters, self.body
        )
    }
}

/// A library function named as a value, e.g. `abs` in `(map abs xs)`.
#[derive(Display, Debug, Clone, PartialEq, Eq)]
#[display(fmt = "{}", name)]
pub struct BuiltinRef {
    pub name: Symbol,
}

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Number(f64),
    Bool(bool),
    Str(Rc<str>),
    List(List),
    Closure(Rc<Closure>),
    Builtin(BuiltinRef),
}

/// Only `false` and `null` are falsy.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(_) | Value::Str(_) | Value::List(_) | Value::Closure(_) | Value::Builtin(_) => {
            true
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeMismatch {
    NotANumber,
    NotAString,
    NotAList,
    NotABool,
    NotAnInteger,
    NotCallable,
}

impl fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let expected = match self {
            TypeMismatch::NotANumber => "a number",
            TypeMismatch::NotAString => "a string",
            TypeMismatch::NotAList => "a list",
            TypeMismatch::NotABool => "a boolean",
            TypeMismatch::NotAnInteger => "an integer",
            TypeMismatch::NotCallable => "a function",
        };
        write!(f, "expected {}", expected)
    }
}

impl Value {
    pub fn string(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }

    pub fn wrap_list(elements: Vec<Value>) -> Self {
        Value::List(List::new(elements))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Number(_) => "number",
            Value::Bool(_) => "boolean",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Closure(_) | Value::Builtin(_) => "function",
        }
    }

    pub fn as_number(&self) -> Result<f64, TypeMismatch> {
        match self {
            Value::Number(x) => Ok(*x),
            _ => Err(TypeMismatch::NotANumber),
        }
    }

    /// A number with no fractional part, usable as an index or count.
    pub fn as_integer(&self) -> Result<i64, TypeMismatch> {
        let x = self.as_number()?;
        match x.fract() == 0.0 && x.is_finite() {
            true => Ok(x as i64),
            false => Err(TypeMismatch::NotAnInteger),
        }
    }

    pub fn as_str(&self) -> Result<&str, TypeMismatch> {
        match self {
            Value::Str(s) => Ok(s.as_ref()),
            _ => Err(TypeMismatch::NotAString),
        }
    }

    pub fn as_list(&self) -> Result<&List, TypeMismatch> {
        match self {
            Value::List(l) => Ok(l),
            _ => Err(TypeMismatch::NotAList),
        }
    }

    pub fn as_bool(&self) -> Result<bool, TypeMismatch> {
        match self {
            Value::Bool(b) => Ok(*b),
            _ => Err(TypeMismatch::NotABool),
        }
    }

    /// The value itself when it can be applied, for primitives taking a callback.
    pub fn as_callable(&self) -> Result<&Value, TypeMismatch> {
        match self.is_callable() {
            true => Ok(self),
            false => Err(TypeMismatch::NotCallable),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Closure(_) | Value::Builtin(_))
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        equal_within(self, other, &mut Vec::new())
    }
}

/// `open` holds the pairs of lists currently being compared. Meeting a pair
/// again means both sides cycle the same way, so it counts as equal.
fn equal_within(a: &Value, b: &Value, open: &mut Vec<(List, List)>) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Str(x), Value::Str(y)) => x == y,
        (Value::List(x), Value::List(y)) => {
            if x.same_storage(y)
                || open
                    .iter()
                    .any(|(p, q)| p.same_storage(x) && q.same_storage(y))
            {
                return true;
            }
            let (xs, ys) = (x.to_vec(), y.to_vec());
            if xs.len() != ys.len() {
                return false;
            }
            open.push((x.clone(), y.clone()));
            let equal = xs
                .iter()
                .zip(&ys)
                .all(|(a, b)| equal_within(a, b, open));
            open.pop();
            equal
        }
        (Value::Closure(x), Value::Closure(y)) => Rc::ptr_eq(x, y),
        (Value::Builtin(x), Value::Builtin(y)) => x == y,
        _ => false,
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Number(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Rc::from(s))
    }
}

impl From<Vec<Value>> for Value {
    fn from(elements: Vec<Value>) -> Self {
        Value::wrap_list(elements)
    }
}
