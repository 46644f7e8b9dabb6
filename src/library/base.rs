//! The `core` library: printing, equality, logic and type queries.

use super::{Library, PrimitiveFn, Table};
use crate::environment::Environment;
use crate::evaluator;
use crate::interpreter::Interpreter;
use crate::printer::{pr_str, PrintMode};
use crate::types::{truthy, Arity, Expr, Value};

use itertools::Itertools;
use std::rc::Rc;

const PRINT: PrimitiveFn = PrimitiveFn {
    name: "print",
    fn_ptr: print_,
    arity: Arity::at_least(0),
};

fn print_(args: &[Value], interp: &Interpreter) -> evaluator::Result {
    let line = args
        .iter()
        .map(|arg| pr_str(arg, PrintMode::Directly))
        .join(" ");
    (interp.options().printer)(&line);
    Ok(Value::Null)
}

const EQUAL: PrimitiveFn = PrimitiveFn {
    name: "=",
    fn_ptr: equal_,
    arity: Arity::at_least(1),
};

const DOUBLE_EQUAL: PrimitiveFn = PrimitiveFn {
    name: "==",
    fn_ptr: equal_,
    arity: Arity::at_least(1),
};

fn equal_(args: &[Value], _: &Interpreter) -> evaluator::Result {
    Ok(Value::Bool(args.iter().tuple_windows().all(|(a, b)| a == b)))
}

const NOT_EQUAL: PrimitiveFn = PrimitiveFn {
    name: "!=",
    fn_ptr: |args, _| Ok(Value::Bool(args[0] != args[1])),
    arity: Arity::exactly(2),
};

const NOT: PrimitiveFn = PrimitiveFn {
    name: "not",
    fn_ptr: |args, _| Ok(Value::Bool(!truthy(&args[0]))),
    arity: Arity::exactly(1),
};

// Reached only when `and`/`or` are called through a builtin reference, with
// every argument already evaluated. Direct calls short-circuit in `try_eval`.
const AND: PrimitiveFn = PrimitiveFn {
    name: "and",
    fn_ptr: |args, _| {
        Ok(args
            .iter()
            .find(|v| !truthy(v))
            .or_else(|| args.last())
            .cloned()
            .unwrap_or(Value::Bool(true)))
    },
    arity: Arity::at_least(0),
};

const OR: PrimitiveFn = PrimitiveFn {
    name: "or",
    fn_ptr: |args, _| {
        Ok(args
            .iter()
            .find(|v| truthy(v))
            .or_else(|| args.last())
            .cloned()
            .unwrap_or(Value::Bool(false)))
    },
    arity: Arity::at_least(0),
};

const TYPE_OF: PrimitiveFn = PrimitiveFn {
    name: "type-of",
    fn_ptr: |args, _| Ok(Value::string(args[0].type_name())),
    arity: Arity::exactly(1),
};

const NULL_TEST: PrimitiveFn = PrimitiveFn {
    name: "null?",
    fn_ptr: |args, _| Ok(Value::Bool(args[0].is_null())),
    arity: Arity::exactly(1),
};

const BOOLEAN_TEST: PrimitiveFn = PrimitiveFn {
    name: "boolean?",
    fn_ptr: |args, _| Ok(Value::Bool(args[0].as_bool().is_ok())),
    arity: Arity::exactly(1),
};

const FUNCTION_TEST: PrimitiveFn = PrimitiveFn {
    name: "function?",
    fn_ptr: |args, _| Ok(Value::Bool(args[0].is_callable())),
    arity: Arity::exactly(1),
};

const APPLY: PrimitiveFn = PrimitiveFn {
    name: "apply",
    fn_ptr: apply_,
    arity: Arity::exactly(2),
};

fn apply_(args: &[Value], interp: &Interpreter) -> evaluator::Result {
    let f = args[0].as_callable()?;
    let arguments = args[1].as_list()?.to_vec();
    interp.apply(f, &arguments)
}

pub const PRIMITIVES: &[PrimitiveFn] = &[
    PRINT,
    EQUAL,
    DOUBLE_EQUAL,
    NOT_EQUAL,
    NOT,
    AND,
    OR,
    TYPE_OF,
    NULL_TEST,
    BOOLEAN_TEST,
    FUNCTION_TEST,
    APPLY,
];

/// `and` and `or` need their arguments unevaluated, so this wraps a plain
/// table and intercepts them.
pub struct Base {
    table: Table,
}

impl Base {
    pub fn new() -> Self {
        Self {
            table: Table::new("core", PRIMITIVES),
        }
    }
}

impl Default for Base {
    fn default() -> Self {
        Self::new()
    }
}

impl Library for Base {
    fn name(&self) -> &str {
        self.table.name()
    }

    fn owns(&self, name: &str) -> bool {
        self.table.owns(name)
    }

    fn try_eval(
        &self,
        name: &str,
        args: &[Expr],
        env: &Rc<Environment>,
        interp: &Interpreter,
    ) -> evaluator::Result {
        match name {
            "and" => {
                let mut last = Value::Bool(true);
                for arg in args {
                    last = interp.eval(arg, env)?;
                    if !truthy(&last) {
                        break;
                    }
                }
                Ok(last)
            }
            "or" => {
                let mut last = Value::Bool(false);
                for arg in args {
                    last = interp.eval(arg, env)?;
                    if truthy(&last) {
                        break;
                    }
                }
                Ok(last)
            }
            _ => self.table.try_eval(name, args, env, interp),
        }
    }

    fn call(&self, name: &str, args: &[Value], interp: &Interpreter) -> evaluator::Result {
        self.table.call(name, args, interp)
    }
}
