use crate::types::{List, Value};
use itertools::Itertools;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintMode {
    /// Strings are quoted, so the output reads back as the same value.
    ReadableRepresentation,
    /// Strings are written as their contents, as `print` does.
    Directly,
}

pub fn pr_str(value: &Value, mode: PrintMode) -> String {
    pr_str_within(value, mode, &mut Vec::new())
}

/// `open` holds the lists currently being printed; a list that contains
/// itself prints the inner occurrence as `[...]`.
fn pr_str_within(value: &Value, mode: PrintMode, open: &mut Vec<List>) -> String {
    match value {
        Value::Null => String::from("null"),
        Value::Bool(b) => b.to_string(),
        Value::Number(x) => number_str(*x),
        Value::Str(s) => match mode {
            PrintMode::ReadableRepresentation => format!("\"{}\"", s),
            PrintMode::Directly => s.to_string(),
        },
        Value::List(list) => {
            if open.iter().any(|outer| outer.same_storage(list)) {
                return String::from("[...]");
            }
            open.push(list.clone());
            // Elements of a list are always shown readably, otherwise ["a b"] and [a b] look alike.
            let elements = list
                .to_vec()
                .iter()
                .map(|v| pr_str_within(v, PrintMode::ReadableRepresentation, open))
                .join(" ");
            open.pop();
            format!("[{}]", elements)
        }
        Value::Closure(c) => format!("#<function {}>", c.display_name()),
        Value::Builtin(b) => format!("#<builtin {}>", b),
    }
}

/// Whole numbers print without a fractional part.
pub fn number_str(x: f64) -> String {
    if x.is_nan() {
        String::from("NaN")
    } else if x.is_infinite() {
        String::from(if x > 0.0 { "Infinity" } else { "-Infinity" })
    } else if x.fract() == 0.0 && x.abs() < 1e15 {
        format!("{}", x as i64)
    } else {
        format!("{}", x)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", pr_str(self, PrintMode::Directly))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers() {
        assert_eq!(number_str(3.0), "3");
        assert_eq!(number_str(-0.5), "-0.5");
        assert_eq!(number_str(1e20), "100000000000000000000");
        assert_eq!(number_str(f64::INFINITY), "Infinity");
    }

    #[test]
    fn strings_by_mode() {
        let s = Value::string("hi");
        assert_eq!(pr_str(&s, PrintMode::Directly), "hi");
        assert_eq!(pr_str(&s, PrintMode::ReadableRepresentation), "\"hi\"");
    }

    #[test]
    fn nested_lists() {
        let inner = Value::wrap_list(vec![Value::string("a"), Value::Null]);
        let outer = Value::wrap_list(vec![Value::Number(1.0), inner, Value::Bool(true)]);
        assert_eq!(outer.to_string(), r#"[1 ["a" null] true]"#);
    }

    #[test]
    fn self_containing_list() {
        let list = Value::wrap_list(vec![Value::Number(1.0)]);
        if let Value::List(inner) = &list {
            inner.borrow_mut().push(list.clone());
        }
        assert_eq!(list.to_string(), "[1 [...]]");
    }
}
