use super::PrimitiveFn;
use crate::evaluator;
use crate::interpreter::Interpreter;
use crate::printer::{pr_str, PrintMode};
use crate::types::{Arity, Value};

use itertools::Itertools;

fn char_bound(bound: i64, len: usize) -> usize {
    bound.max(0).min(len as i64) as usize
}

const STRING_TEST: PrimitiveFn = PrimitiveFn {
    name: "string?",
    fn_ptr: |args, _| Ok(Value::Bool(args[0].as_str().is_ok())),
    arity: Arity::exactly(1),
};

/// Concatenates its arguments as `print` would show them, without separators.
const STR: PrimitiveFn = PrimitiveFn {
    name: "str",
    fn_ptr: |args, _| {
        Ok(Value::from(
            args.iter().map(|arg| pr_str(arg, PrintMode::Directly)).join(""),
        ))
    },
    arity: Arity::at_least(0),
};

const TO_STRING: PrimitiveFn = PrimitiveFn {
    name: "to-string",
    fn_ptr: |args, _| Ok(Value::from(pr_str(&args[0], PrintMode::Directly))),
    arity: Arity::exactly(1),
};

const STRING_LENGTH: PrimitiveFn = PrimitiveFn {
    name: "string-length",
    fn_ptr: |args, _| Ok(Value::Number(args[0].as_str()?.chars().count() as f64)),
    arity: Arity::exactly(1),
};

const SUBSTRING: PrimitiveFn = PrimitiveFn {
    name: "substring",
    fn_ptr: substring_,
    arity: Arity::Between(2..=3),
};

/// `(substring s start [end])`, counted in characters and clamped to the string.
fn substring_(args: &[Value], _: &Interpreter) -> evaluator::Result {
    let s = args[0].as_str()?;
    let len = s.chars().count();
    let start = char_bound(args[1].as_integer()?, len);
    let end = match args.get(2) {
        Some(end) => char_bound(end.as_integer()?, len),
        None => len,
    };
    let taken: String = s
        .chars()
        .skip(start)
        .take(end.saturating_sub(start))
        .collect();
    Ok(Value::from(taken))
}

const UPPER: PrimitiveFn = PrimitiveFn {
    name: "upper",
    fn_ptr: |args, _| Ok(Value::from(args[0].as_str()?.to_uppercase())),
    arity: Arity::exactly(1),
};

const LOWER: PrimitiveFn = PrimitiveFn {
    name: "lower",
    fn_ptr: |args, _| Ok(Value::from(args[0].as_str()?.to_lowercase())),
    arity: Arity::exactly(1),
};

const TRIM: PrimitiveFn = PrimitiveFn {
    name: "trim",
    fn_ptr: |args, _| Ok(Value::from(args[0].as_str()?.trim())),
    arity: Arity::exactly(1),
};

const SPLIT: PrimitiveFn = PrimitiveFn {
    name: "split",
    fn_ptr: split_,
    arity: Arity::exactly(2),
};

/// An empty separator splits into characters.
fn split_(args: &[Value], _: &Interpreter) -> evaluator::Result {
    let s = args[0].as_str()?;
    let separator = args[1].as_str()?;
    let parts = match separator.is_empty() {
        true => s.chars().map(|c| Value::from(c.to_string())).collect(),
        false => s.split(separator).map(Value::from).collect(),
    };
    Ok(Value::wrap_list(parts))
}

const JOIN: PrimitiveFn = PrimitiveFn {
    name: "join",
    fn_ptr: |args, _| {
        let separator = args[1].as_str()?;
        let joined = args[0]
            .as_list()?
            .borrow()
            .iter()
            .map(|v| pr_str(v, PrintMode::Directly))
            .join(separator);
        Ok(Value::from(joined))
    },
    arity: Arity::exactly(2),
};

const CONTAINS: PrimitiveFn = PrimitiveFn {
    name: "contains?",
    fn_ptr: |args, _| Ok(Value::Bool(args[0].as_str()?.contains(args[1].as_str()?))),
    arity: Arity::exactly(2),
};

const STARTS_WITH: PrimitiveFn = PrimitiveFn {
    name: "starts-with?",
    fn_ptr: |args, _| Ok(Value::Bool(args[0].as_str()?.starts_with(args[1].as_str()?))),
    arity: Arity::exactly(2),
};

const ENDS_WITH: PrimitiveFn = PrimitiveFn {
    name: "ends-with?",
    fn_ptr: |args, _| Ok(Value::Bool(args[0].as_str()?.ends_with(args[1].as_str()?))),
    arity: Arity::exactly(2),
};

pub const PRIMITIVES: &[PrimitiveFn] = &[
    STRING_TEST,
    STR,
    TO_STRING,
    STRING_LENGTH,
    SUBSTRING,
    UPPER,
    LOWER,
    TRIM,
    SPLIT,
    JOIN,
    CONTAINS,
    STARTS_WITH,
    ENDS_WITH,
];
