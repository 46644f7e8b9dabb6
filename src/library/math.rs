use super::{two_numbers, PrimitiveFn};
use crate::evaluator::{self, Error};
use crate::interpreter::Interpreter;
use crate::types::{Arity, TypeMismatch, Value};
use std::cmp::Ordering;

fn grab_numbers(args: &[Value]) -> evaluator::Result<Vec<f64>> {
    let type_check: Result<Vec<_>, _> = args.iter().map(Value::as_number).collect();
    Ok(type_check?)
}

const SUM: PrimitiveFn = PrimitiveFn {
    name: "+",
    fn_ptr: sum_,
    arity: Arity::at_least(0),
};

fn sum_(args: &[Value], _: &Interpreter) -> evaluator::Result {
    Ok(Value::Number(grab_numbers(args)?.iter().sum()))
}

const SUB: PrimitiveFn = PrimitiveFn {
    name: "-",
    fn_ptr: sub_,
    arity: Arity::at_least(1),
};

fn sub_(args: &[Value], _: &Interpreter) -> evaluator::Result {
    match grab_numbers(args)?.as_slice() {
        [x] => Ok(Value::Number(-x)),
        [x, rest @ ..] => Ok(Value::Number(rest.iter().fold(*x, |acc, y| acc - y))),
        [] => unreachable!("arity checked"),
    }
}

const MUL: PrimitiveFn = PrimitiveFn {
    name: "*",
    fn_ptr: mul_,
    arity: Arity::at_least(0),
};

fn mul_(args: &[Value], _: &Interpreter) -> evaluator::Result {
    Ok(Value::Number(grab_numbers(args)?.iter().product()))
}

const DIV: PrimitiveFn = PrimitiveFn {
    name: "/",
    fn_ptr: div_,
    arity: Arity::at_least(2),
};

fn div_(args: &[Value], _: &Interpreter) -> evaluator::Result {
    let numbers = grab_numbers(args)?;
    let mut acc = numbers[0];
    for y in &numbers[1..] {
        if *y == 0.0 {
            return Err(Error::DivideByZero.into());
        }
        acc /= y;
    }
    Ok(Value::Number(acc))
}

const MOD: PrimitiveFn = PrimitiveFn {
    name: "%",
    fn_ptr: mod_,
    arity: Arity::exactly(2),
};

fn mod_(args: &[Value], _: &Interpreter) -> evaluator::Result {
    match two_numbers(args)? {
        (_, y) if y == 0.0 => Err(Error::DivideByZero.into()),
        (x, y) => Ok(Value::Number(x % y)),
    }
}

/// Numbers compare with numbers and strings with strings; anything else is a type error.
fn comparison_(args: &[Value], accept: fn(Ordering) -> bool) -> evaluator::Result {
    let ordering = match (&args[0], &args[1]) {
        (Value::Number(x), Value::Number(y)) => x.partial_cmp(y),
        (Value::Str(x), Value::Str(y)) => Some(x.cmp(y)),
        (Value::Number(_), _) => return Err(TypeMismatch::NotANumber.into()),
        (Value::Str(_), _) => return Err(TypeMismatch::NotAString.into()),
        _ => return Err(TypeMismatch::NotANumber.into()),
    };
    Ok(Value::Bool(ordering.map(accept).unwrap_or(false)))
}

macro_rules! comparison_primitive {
    ($SYMBOL:tt, $NAME:ident) => {
        paste::item! {
            const $NAME: PrimitiveFn = PrimitiveFn {
                name: stringify!($SYMBOL),
                fn_ptr: |args, _| comparison_(args, Ordering::[<is_ $NAME:lower>]),
                arity: Arity::exactly(2),
            };
        }
    };
}

comparison_primitive!(<, LT);
comparison_primitive!(<=, LE);
comparison_primitive!(>, GT);
comparison_primitive!(>=, GE);

const MIN: PrimitiveFn = PrimitiveFn {
    name: "min",
    fn_ptr: |args, _| Ok(Value::Number(grab_numbers(args)?.into_iter().fold(f64::INFINITY, f64::min))),
    arity: Arity::at_least(1),
};

const MAX: PrimitiveFn = PrimitiveFn {
    name: "max",
    fn_ptr: |args, _| {
        Ok(Value::Number(
            grab_numbers(args)?.into_iter().fold(f64::NEG_INFINITY, f64::max),
        ))
    },
    arity: Arity::at_least(1),
};

macro_rules! unary_primitive {
    ($SYMBOL:expr, $NAME:ident, $METHOD:ident) => {
        const $NAME: PrimitiveFn = PrimitiveFn {
            name: $SYMBOL,
            fn_ptr: |args, _| Ok(Value::Number(args[0].as_number()?.$METHOD())),
            arity: Arity::exactly(1),
        };
    };
}

unary_primitive!("abs", ABS, abs);
unary_primitive!("floor", FLOOR, floor);
unary_primitive!("ceil", CEIL, ceil);
unary_primitive!("round", ROUND, round);
unary_primitive!("sqrt", SQRT, sqrt);

const POW: PrimitiveFn = PrimitiveFn {
    name: "pow",
    fn_ptr: |args, _| {
        let (base, exponent) = two_numbers(args)?;
        Ok(Value::Number(base.powf(exponent)))
    },
    arity: Arity::exactly(2),
};

pub const PRIMITIVES: &[PrimitiveFn] = &[
    SUM, SUB, MUL, DIV, MOD, LT, LE, GT, GE, MIN, MAX, ABS, FLOOR, CEIL, ROUND, SQRT, POW,
];

#[cfg(test)]
mod tests {
    use crate::{evaluate, Options, Value};

    fn eval(src: &str) -> Value {
        evaluate(src, &Options::default())
    }

    #[test]
    fn arithmetic() {
        assert_eq!(eval("(+ 1 2)"), Value::Number(3.0));
        assert_eq!(eval("(+)"), Value::Number(0.0));
        assert_eq!(eval("(- 10 1 2)"), Value::Number(7.0));
        assert_eq!(eval("(- 4)"), Value::Number(-4.0));
        assert_eq!(eval("(* 2 3 4)"), Value::Number(24.0));
        assert_eq!(eval("(/ 9 2)"), Value::Number(4.5));
        assert_eq!(eval("(% 7 3)"), Value::Number(1.0));
        assert_eq!(eval("(+ 1-000 1)"), Value::Number(1001.0));
    }

    #[test]
    fn division_by_zero() {
        assert_eq!(eval("(/ 1 0)"), Value::string("Error: Division by zero"));
        assert_eq!(eval("(% 1 0)"), Value::string("Error: Division by zero"));
    }

    #[test]
    fn comparisons() {
        assert_eq!(eval("(< 1 2)"), Value::Bool(true));
        assert_eq!(eval("(>= 2 2)"), Value::Bool(true));
        assert_eq!(eval("(> 1 2)"), Value::Bool(false));
        assert_eq!(eval(r#"(< "a" "b")"#), Value::Bool(true));
        assert_eq!(
            eval(r#"(< 1 "b")"#),
            Value::string("Error: Type error: < expected a number")
        );
    }

    #[test]
    fn non_numbers_are_rejected() {
        assert_eq!(
            eval(r#"(+ 1 "2")"#),
            Value::string("Error: Type error: + expected a number")
        );
    }

    #[test]
    fn helpers() {
        assert_eq!(eval("(max 1 5 3)"), Value::Number(5.0));
        assert_eq!(eval("(min 4 -2)"), Value::Number(-2.0));
        assert_eq!(eval("(abs -3)"), Value::Number(3.0));
        assert_eq!(eval("(floor 2.7)"), Value::Number(2.0));
        assert_eq!(eval("(pow 2 10)"), Value::Number(1024.0));
    }
}
