mod common;

use brace_lisp::Value;
use common::{eval, list};

fn numbers_source(count: usize) -> String {
    let items: Vec<String> = (0..count).map(|i| ((i * 37) % 101).to_string()).collect();
    format!("[{}]", items.join(" "))
}

#[test]
fn sort_survives_an_inconsistent_comparator() {
    let source = format!(
        "{{let xs {}}} (sort! xs (lambda (a b) (< (% a 7) (% b 5)))) (length xs)",
        numbers_source(80)
    );
    assert_eq!(eval(&source), Value::Number(80.0));
}

#[test]
fn sort_is_stable_under_a_custom_order() {
    let source = "(sort! [[1 0] [0 1] [1 2] [0 3]] (lambda (a b) (< (first a) (first b))))";
    let pair = |a: f64, b: f64| list(&[a, b]);
    assert_eq!(
        eval(source),
        Value::wrap_list(vec![pair(0.0, 1.0), pair(0.0, 3.0), pair(1.0, 0.0), pair(1.0, 2.0)])
    );
}

#[test]
fn sort_rejects_nan() {
    let source = format!("(sort! (concat {} [(sqrt -1)]))", numbers_source(60));
    assert_eq!(eval(&source), Value::string("Error: sort!: cannot order NaN"));
}

#[test]
fn sort_orders_large_inputs() {
    let source = format!("(let xs (sort! {})) [(first xs) (last xs)]", numbers_source(101));
    assert_eq!(eval(&source), list(&[0.0, 100.0]));
}

#[test]
fn range_near_the_limits_of_precision() {
    assert_eq!(
        eval("(length (range (pow 10 16) (+ (pow 10 16) 4) 1))"),
        Value::Number(4.0)
    );
}

#[test]
fn range_refuses_huge_or_unbounded_spans() {
    assert_eq!(
        eval("(range 0 1-000-000-000-000)"),
        Value::string("Error: range: too many elements")
    );
    assert_eq!(
        eval("(range 0 (pow 10 400))"),
        Value::string("Error: range: bounds must be finite")
    );
    assert_eq!(eval("(range 5 1)"), list(&[]));
}

#[test]
fn self_containing_lists_compare() {
    let source = "
        (let a [1]) (push! a a)
        (let b [1]) (push! b b)
        [(= a b) (!= a b) (index-of [b] a)]";
    assert_eq!(
        eval(source),
        Value::wrap_list(vec![Value::Bool(true), Value::Bool(false), Value::Number(0.0)])
    );
}

#[test]
fn callback_type_errors_name_the_real_culprit() {
    assert_eq!(
        eval(r#"(let s "text") (map (lambda x (inc s)) [1 2])"#),
        Value::string("Error: Type error: inc expected a number")
    );
    assert_eq!(
        eval(r#"(filter (lambda x (+ x "1")) [1])"#),
        Value::string("Error: Type error: + expected a number")
    );
}

#[test]
fn callbacks_must_be_functions() {
    assert_eq!(
        eval("(map 1 [1 2])"),
        Value::string("Error: Type error: map expected a function")
    );
    assert_eq!(
        eval("(sort! [2 1] 5)"),
        Value::string("Error: Type error: sort! expected a function")
    );
    assert_eq!(
        eval("(apply null [])"),
        Value::string("Error: Type error: apply expected a function")
    );
}
