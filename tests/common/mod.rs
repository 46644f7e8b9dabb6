#![allow(dead_code)]

use brace_lisp::{evaluate, Options, Value};

use std::cell::RefCell;
use std::rc::Rc;

pub fn eval(source: &str) -> Value {
    let _ = pretty_env_logger::try_init();
    evaluate(source, &Options::default())
}

pub fn list(elements: &[f64]) -> Value {
    Value::wrap_list(elements.iter().map(|&x| Value::Number(x)).collect())
}

/// Runs `source` and returns what `print` wrote, one entry per call.
pub fn printed(source: &str) -> (Value, Vec<String>) {
    let _ = pretty_env_logger::try_init();
    let lines = Rc::new(RefCell::new(Vec::new()));
    let sink = lines.clone();
    let options = Options::default().with_printer(move |line| sink.borrow_mut().push(line.to_owned()));
    let value = evaluate(source, &options);
    let lines = lines.borrow().clone();
    (value, lines)
}
