//! List functions. Names ending in `!` mutate their list argument in place;
//! everything else returns a new list and leaves its arguments alone.

use super::PrimitiveFn;
use crate::evaluator::{self, Error, Unwind};
use crate::interpreter::Interpreter;
use crate::types::{truthy, Arity, TypeMismatch, Value};

use std::convert::TryFrom;

fn invalid(function: &str, reason: &str) -> Unwind {
    Error::InvalidArgument {
        function: function.to_owned(),
        reason: reason.to_owned(),
    }
    .into()
}

fn checked_index(index: i64, len: usize) -> evaluator::Result<usize> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i < len)
        .ok_or_else(|| Error::BadIndex { index, len }.into())
}

/// Resolves a slice bound: negative values count from the end, out of range clamps.
fn slice_bound(bound: i64, len: usize) -> usize {
    let len = len as i64;
    let resolved = if bound < 0 { len + bound } else { bound };
    resolved.max(0).min(len) as usize
}

const LIST: PrimitiveFn = PrimitiveFn {
    name: "list",
    fn_ptr: |args, _| Ok(Value::wrap_list(args.to_vec())),
    arity: Arity::at_least(0),
};

const LIST_TEST: PrimitiveFn = PrimitiveFn {
    name: "list?",
    fn_ptr: |args, _| Ok(Value::Bool(args[0].as_list().is_ok())),
    arity: Arity::exactly(1),
};

const LENGTH: PrimitiveFn = PrimitiveFn {
    name: "length",
    fn_ptr: |args, _| Ok(Value::Number(args[0].as_list()?.len() as f64)),
    arity: Arity::exactly(1),
};

const EMPTY_TEST: PrimitiveFn = PrimitiveFn {
    name: "empty?",
    fn_ptr: |args, _| Ok(Value::Bool(args[0].as_list()?.is_empty())),
    arity: Arity::exactly(1),
};

const FIRST: PrimitiveFn = PrimitiveFn {
    name: "first",
    fn_ptr: |args, _| Ok(args[0].as_list()?.borrow().first().cloned().unwrap_or(Value::Null)),
    arity: Arity::exactly(1),
};

const LAST: PrimitiveFn = PrimitiveFn {
    name: "last",
    fn_ptr: |args, _| Ok(args[0].as_list()?.borrow().last().cloned().unwrap_or(Value::Null)),
    arity: Arity::exactly(1),
};

const REST: PrimitiveFn = PrimitiveFn {
    name: "rest",
    fn_ptr: rest_,
    arity: Arity::exactly(1),
};

fn rest_(args: &[Value], _: &Interpreter) -> evaluator::Result {
    let list = args[0].as_list()?.borrow();
    let rest = list.iter().skip(1).cloned().collect();
    Ok(Value::wrap_list(rest))
}

const NTH: PrimitiveFn = PrimitiveFn {
    name: "nth",
    fn_ptr: nth_,
    arity: Arity::exactly(2),
};

fn nth_(args: &[Value], _: &Interpreter) -> evaluator::Result {
    let list = args[0].as_list()?.borrow();
    let index = checked_index(args[1].as_integer()?, list.len())?;
    Ok(list[index].clone())
}

/// Largest list `range` will build.
const MAX_RANGE_LENGTH: usize = 10_000_000;

const RANGE: PrimitiveFn = PrimitiveFn {
    name: "range",
    fn_ptr: range_,
    arity: Arity::Between(1..=3),
};

fn range_(args: &[Value], _: &Interpreter) -> evaluator::Result {
    let numbers = args
        .iter()
        .map(Value::as_number)
        .collect::<Result<Vec<_>, TypeMismatch>>()?;
    let (start, end, step) = match numbers.as_slice() {
        [end] => (0.0, *end, 1.0),
        [start, end] => (*start, *end, 1.0),
        [start, end, step] => (*start, *end, *step),
        _ => unreachable!("arity checked"),
    };
    if step == 0.0 {
        return Err(invalid("range", "step must not be zero"));
    }
    let count = ((end - start) / step).ceil();
    if !count.is_finite() {
        return Err(invalid("range", "bounds must be finite"));
    }
    if count > MAX_RANGE_LENGTH as f64 {
        return Err(invalid("range", "too many elements"));
    }
    let count = count.max(0.0) as usize;
    let elements = (0..count)
        .map(|i| Value::Number(start + i as f64 * step))
        .collect();
    Ok(Value::wrap_list(elements))
}

const CONCAT: PrimitiveFn = PrimitiveFn {
    name: "concat",
    fn_ptr: concat_,
    arity: Arity::at_least(0),
};

fn concat_(args: &[Value], _: &Interpreter) -> evaluator::Result {
    let mut output = Vec::new();
    for arg in args {
        output.extend(arg.as_list()?.borrow().iter().cloned());
    }
    Ok(Value::wrap_list(output))
}

const REVERSE: PrimitiveFn = PrimitiveFn {
    name: "reverse",
    fn_ptr: |args, _| {
        let mut elements = args[0].as_list()?.to_vec();
        elements.reverse();
        Ok(Value::wrap_list(elements))
    },
    arity: Arity::exactly(1),
};

const SLICE: PrimitiveFn = PrimitiveFn {
    name: "slice",
    fn_ptr: slice_,
    arity: Arity::Between(2..=3),
};

fn slice_(args: &[Value], _: &Interpreter) -> evaluator::Result {
    let list = args[0].as_list()?.borrow();
    let start = slice_bound(args[1].as_integer()?, list.len());
    let end = match args.get(2) {
        Some(end) => slice_bound(end.as_integer()?, list.len()),
        None => list.len(),
    };
    let elements = match start < end {
        true => list[start..end].to_vec(),
        false => Vec::new(),
    };
    Ok(Value::wrap_list(elements))
}

const INDEX_OF: PrimitiveFn = PrimitiveFn {
    name: "index-of",
    fn_ptr: |args, _| {
        let list = args[0].as_list()?.borrow();
        let position = list.iter().position(|x| *x == args[1]);
        Ok(Value::Number(position.map(|i| i as f64).unwrap_or(-1.0)))
    },
    arity: Arity::exactly(2),
};

// Higher-order functions copy the elements out first, so the callback is free
// to mutate the list it is walking.

const MAP: PrimitiveFn = PrimitiveFn {
    name: "map",
    fn_ptr: map_,
    arity: Arity::exactly(2),
};

fn map_(args: &[Value], interp: &Interpreter) -> evaluator::Result {
    let f = args[0].as_callable()?;
    let result: evaluator::Result<Vec<_>> = args[1]
        .as_list()?
        .to_vec()
        .into_iter()
        .map(|x| interp.apply(f, &[x]))
        .collect();
    Ok(Value::wrap_list(result?))
}

const FILTER: PrimitiveFn = PrimitiveFn {
    name: "filter",
    fn_ptr: filter_,
    arity: Arity::exactly(2),
};

fn filter_(args: &[Value], interp: &Interpreter) -> evaluator::Result {
    let f = args[0].as_callable()?;
    let mut kept = Vec::new();
    for x in args[1].as_list()?.to_vec() {
        if truthy(&interp.apply(f, &[x.clone()])?) {
            kept.push(x);
        }
    }
    Ok(Value::wrap_list(kept))
}

const REDUCE: PrimitiveFn = PrimitiveFn {
    name: "reduce",
    fn_ptr: reduce_,
    arity: Arity::exactly(3),
};

/// `(reduce f initial list)`, calling `(f accumulator element)`.
fn reduce_(args: &[Value], interp: &Interpreter) -> evaluator::Result {
    let f = args[0].as_callable()?;
    let mut acc = args[1].clone();
    for x in args[2].as_list()?.to_vec() {
        acc = interp.apply(f, &[acc, x])?;
    }
    Ok(acc)
}

const PUSH: PrimitiveFn = PrimitiveFn {
    name: "push!",
    fn_ptr: |args, _| {
        let list = args[0].as_list()?;
        list.borrow_mut().extend(args[1..].iter().cloned());
        Ok(args[0].clone())
    },
    arity: Arity::at_least(2),
};

const POP: PrimitiveFn = PrimitiveFn {
    name: "pop!",
    fn_ptr: |args, _| Ok(args[0].as_list()?.borrow_mut().pop().unwrap_or(Value::Null)),
    arity: Arity::exactly(1),
};

const SET_NTH: PrimitiveFn = PrimitiveFn {
    name: "set-nth!",
    fn_ptr: set_nth_,
    arity: Arity::exactly(3),
};

fn set_nth_(args: &[Value], _: &Interpreter) -> evaluator::Result {
    let mut list = args[0].as_list()?.borrow_mut();
    let index = checked_index(args[1].as_integer()?, list.len())?;
    list[index] = args[2].clone();
    Ok(args[2].clone())
}

const SORT: PrimitiveFn = PrimitiveFn {
    name: "sort!",
    fn_ptr: sort_,
    arity: Arity::Between(1..=2),
};

/// Ascending order for numbers or strings. NaN has no place in it.
fn natural_less(a: &Value, b: &Value) -> evaluator::Result<bool> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if x.is_nan() || y.is_nan() {
                return Err(invalid("sort!", "cannot order NaN"));
            }
            Ok(x < y)
        }
        (Value::Str(x), Value::Str(y)) => Ok(x < y),
        (Value::Str(_), _) => Err(TypeMismatch::NotAString.into()),
        _ => Err(TypeMismatch::NotANumber.into()),
    }
}

/// Stable merge sort that only ever asks whether one element goes before
/// another. An inconsistent `less` gives some permutation, never a panic.
fn merge_sort(
    mut elements: Vec<Value>,
    less: &mut dyn FnMut(&Value, &Value) -> evaluator::Result<bool>,
) -> evaluator::Result<Vec<Value>> {
    if elements.len() <= 1 {
        return Ok(elements);
    }
    let right = elements.split_off(elements.len() / 2);
    let left = merge_sort(elements, less)?;
    let right = merge_sort(right, less)?;

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => less(r, l)?,
            _ => break,
        };
        match take_right {
            true => merged.extend(right.next()),
            false => merged.extend(left.next()),
        }
    }
    merged.extend(left);
    merged.extend(right);
    Ok(merged)
}

/// `(sort! list)` sorts numbers or strings ascending. `(sort! list less?)`
/// uses a function that is truthy when its first argument goes first.
fn sort_(args: &[Value], interp: &Interpreter) -> evaluator::Result {
    let list = args[0].as_list()?;
    let elements = list.to_vec();
    let sorted = match args.get(1) {
        None => merge_sort(elements, &mut natural_less)?,
        Some(less) => {
            let less = less.as_callable()?;
            merge_sort(elements, &mut |a: &Value, b: &Value| {
                Ok(truthy(&interp.apply(less, &[a.clone(), b.clone()])?))
            })?
        }
    };
    *list.borrow_mut() = sorted;
    Ok(args[0].clone())
}

pub const PRIMITIVES: &[PrimitiveFn] = &[
    LIST, LIST_TEST, LENGTH, EMPTY_TEST, FIRST, LAST, REST, NTH, RANGE, CONCAT, REVERSE, SLICE,
    INDEX_OF, MAP, FILTER, REDUCE, PUSH, POP, SET_NTH, SORT,
];

#[cfg(test)]
mod tests {
    use crate::{evaluate, Options, Value};

    fn eval(src: &str) -> Value {
        evaluate(src, &Options::default())
    }

    fn numbers(xs: &[f64]) -> Value {
        Value::wrap_list(xs.iter().map(|&x| Value::Number(x)).collect())
    }

    #[test]
    fn access() {
        assert_eq!(eval("(first [1 2 3])"), Value::Number(1.0));
        assert_eq!(eval("(first [])"), Value::Null);
        assert_eq!(eval("(last [1 2 3])"), Value::Number(3.0));
        assert_eq!(eval("(rest [1 2 3])"), numbers(&[2.0, 3.0]));
        assert_eq!(eval("(nth [1 2 3] 1)"), Value::Number(2.0));
        assert_eq!(eval("(length [1 2 3])"), Value::Number(3.0));
        assert_eq!(eval("(empty? [])"), Value::Bool(true));
    }

    #[test]
    fn bad_index() {
        assert_eq!(
            eval("(nth [1 2] 5)"),
            Value::string("Error: Index 5 out of range for list of length 2")
        );
        assert_eq!(
            eval("(nth 7 0)"),
            Value::string("Error: Type error: nth expected a list")
        );
    }

    #[test]
    fn construction() {
        assert_eq!(eval("(list 1 2)"), numbers(&[1.0, 2.0]));
        assert_eq!(eval("(range 3)"), numbers(&[0.0, 1.0, 2.0]));
        assert_eq!(eval("(range 5 1 -2)"), numbers(&[5.0, 3.0]));
        assert_eq!(eval("(concat [1] [] [2 3])"), numbers(&[1.0, 2.0, 3.0]));
        assert_eq!(eval("(reverse [1 2])"), numbers(&[2.0, 1.0]));
        assert_eq!(eval("(slice [1 2 3 4] 1 -1)"), numbers(&[2.0, 3.0]));
        assert_eq!(eval("(index-of [1 2 3] 3)"), Value::Number(2.0));
        assert_eq!(eval("(index-of [1 2 3] 9)"), Value::Number(-1.0));
    }

    #[test]
    fn higher_order() {
        assert_eq!(eval("(map (lambda x (* x x)) [1 2 3])"), numbers(&[1.0, 4.0, 9.0]));
        assert_eq!(eval("(map abs [-1 2])"), numbers(&[1.0, 2.0]));
        assert_eq!(eval("(filter (lambda x (> x 1)) [1 2 3])"), numbers(&[2.0, 3.0]));
        assert_eq!(eval("(reduce + 0 [1 2 3 4])"), Value::Number(10.0));
    }

    #[test]
    fn pure_functions_leave_their_argument_alone() {
        assert_eq!(eval("(let xs [3 1 2]) (reverse xs) xs"), numbers(&[3.0, 1.0, 2.0]));
    }

    #[test]
    fn destructive_functions_are_visible_through_every_handle() {
        assert_eq!(eval("(let xs [1]) (let ys xs) (push! ys 2 3) xs"), numbers(&[1.0, 2.0, 3.0]));
        assert_eq!(eval("(let xs [1 2]) (pop! xs)"), Value::Number(2.0));
        assert_eq!(eval("(let xs [1 2]) (set-nth! xs 0 9) xs"), numbers(&[9.0, 2.0]));
        assert_eq!(
            eval("(function f (l) (push! l 0)) (let xs []) (f xs) (f xs) (length xs)"),
            Value::Number(2.0)
        );
    }

    #[test]
    fn sorting() {
        assert_eq!(eval("(let xs [3 1 2]) (sort! xs) xs"), numbers(&[1.0, 2.0, 3.0]));
        assert_eq!(
            eval("(sort! [1 3 2] (lambda (a b) (> a b)))"),
            numbers(&[3.0, 2.0, 1.0])
        );
        assert_eq!(
            eval("(sort! [1 null])"),
            Value::string("Error: Type error: sort! expected a number")
        );
    }
}
