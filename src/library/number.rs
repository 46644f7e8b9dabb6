use super::PrimitiveFn;
use crate::evaluator::Error;
use crate::grammar;
use crate::types::{Arity, Value};

const NUMBER_TEST: PrimitiveFn = PrimitiveFn {
    name: "number?",
    fn_ptr: |args, _| Ok(Value::Bool(args[0].as_number().is_ok())),
    arity: Arity::exactly(1),
};

const INTEGER_TEST: PrimitiveFn = PrimitiveFn {
    name: "integer?",
    fn_ptr: |args, _| Ok(Value::Bool(args[0].as_integer().is_ok())),
    arity: Arity::exactly(1),
};

const NAN_TEST: PrimitiveFn = PrimitiveFn {
    name: "nan?",
    fn_ptr: |args, _| Ok(Value::Bool(args[0].as_number()?.is_nan())),
    arity: Arity::exactly(1),
};

/// Accepts source-style literals (`1-000`) as well as anything `f64` parses.
/// Unparseable text gives `null`.
const PARSE_NUMBER: PrimitiveFn = PrimitiveFn {
    name: "parse-number",
    fn_ptr: |args, _| {
        let text = args[0].as_str()?.trim();
        let parsed = match grammar::is_number(text) {
            true => grammar::normalize_number(text).parse::<f64>().ok(),
            false => text.parse::<f64>().ok(),
        };
        Ok(parsed.map(Value::Number).unwrap_or(Value::Null))
    },
    arity: Arity::exactly(1),
};

const MAX_FIXED_DIGITS: i64 = 100;

const TO_FIXED: PrimitiveFn = PrimitiveFn {
    name: "to-fixed",
    fn_ptr: |args, _| {
        let x = args[0].as_number()?;
        let digits = match args.get(1) {
            Some(d) => match d.as_integer()? {
                n @ 0..=MAX_FIXED_DIGITS => n as usize,
                _ => {
                    return Err(Error::InvalidArgument {
                        function: "to-fixed".to_owned(),
                        reason: format!("digits must be between 0 and {}", MAX_FIXED_DIGITS),
                    }
                    .into())
                }
            },
            None => 0,
        };
        Ok(Value::from(format!("{:.*}", digits, x)))
    },
    arity: Arity::Between(1..=2),
};

pub const PRIMITIVES: &[PrimitiveFn] = &[NUMBER_TEST, INTEGER_TEST, NAN_TEST, PARSE_NUMBER, TO_FIXED];

#[cfg(test)]
mod tests {
    use crate::{evaluate, Options, Value};

    fn eval(src: &str) -> Value {
        evaluate(src, &Options::default())
    }

    #[test]
    fn predicates() {
        assert_eq!(eval("(number? 1.5)"), Value::Bool(true));
        assert_eq!(eval(r#"(number? "1")"#), Value::Bool(false));
        assert_eq!(eval("(integer? 2)"), Value::Bool(true));
        assert_eq!(eval("(integer? 2.5)"), Value::Bool(false));
    }

    #[test]
    fn parsing() {
        assert_eq!(eval(r#"(parse-number "1-000-000")"#), Value::Number(1_000_000.0));
        assert_eq!(eval(r#"(parse-number " 2.5 ")"#), Value::Number(2.5));
        assert_eq!(eval(r#"(parse-number "1e3")"#), Value::Number(1000.0));
        assert_eq!(eval(r#"(parse-number "nope")"#), Value::Null);
    }

    #[test]
    fn formatting() {
        assert_eq!(eval("(to-fixed 3.14159 2)"), Value::string("3.14"));
        assert_eq!(eval("(to-fixed 2.7)"), Value::string("3"));
        assert_eq!(eval("(to-fixed 1 100)").as_str().map(str::len), Ok(102));
    }

    #[test]
    fn formatting_precision_is_bounded() {
        assert_eq!(
            eval("(to-fixed 1 1-000-000-000-000)"),
            Value::string("Error: to-fixed: digits must be between 0 and 100")
        );
        assert_eq!(
            eval("(to-fixed 1 -1)"),
            Value::string("Error: to-fixed: digits must be between 0 and 100")
        );
    }
}
