use crate::environment::Environment;
use crate::evaluator::{Error, Result, Unwind};
use crate::interpreter::Interpreter;
use crate::types::{
    truthy, Arity, Closure, ClosureParameters, Expr, Form, Symbol, TypeMismatch, Value,
};

use std::rc::Rc;

fn bad_form(form: &'static str, reason: impl Into<String>) -> Unwind {
    Error::BadSpecialForm {
        form,
        reason: reason.into(),
    }
    .into()
}

fn mismatch_in(form: &'static str) -> impl Fn(TypeMismatch) -> Unwind {
    move |mismatch| {
        Error::BadArgument {
            function: form.to_owned(),
            mismatch,
        }
        .into()
    }
}

fn expect_identifier<'a>(expr: &'a Expr, form: &'static str) -> Result<&'a Symbol> {
    expr.as_identifier()
        .ok_or_else(|| bad_form(form, "expected an identifier"))
}

pub fn apply_let(interp: &Interpreter, args: &[Expr], env: &Rc<Environment>) -> Result {
    Arity::exactly(2).validate_for(args.len(), "let")?;
    let key = expect_identifier(&args[0], "let")?;
    let value = interp.eval(&args[1], env)?;
    log::debug!("define {} as {}", key, value);
    env.define(key.clone(), value.clone());
    Ok(value)
}

pub fn apply_set(interp: &Interpreter, args: &[Expr], env: &Rc<Environment>) -> Result {
    Arity::exactly(2).validate_for(args.len(), "set!")?;
    let key = expect_identifier(&args[0], "set!")?;
    let value = interp.eval(&args[1], env)?;
    log::trace!("assign {} in {}", key, env);
    Ok(env.assign(key, value)?)
}

/// `inc` and `dec`: `sign` is applied to the delta, which defaults to 1.
pub fn apply_step(
    interp: &Interpreter,
    args: &[Expr],
    env: &Rc<Environment>,
    form: &'static str,
    sign: f64,
) -> Result {
    Arity::Between(1..=2).validate_for(args.len(), form)?;
    let key = expect_identifier(&args[0], form)?;
    let current = env.lookup(key)?.as_number().map_err(mismatch_in(form))?;
    let delta = match args.get(1) {
        Some(expr) => interp
            .eval(expr, env)?
            .as_number()
            .map_err(mismatch_in(form))?,
        None => 1.0,
    };
    Ok(env.assign(key, Value::Number(current + sign * delta))?)
}

pub fn apply_if(interp: &Interpreter, args: &[Expr], env: &Rc<Environment>) -> Result {
    Arity::Between(2..=3).validate_for(args.len(), "if")?;
    let condition = interp.eval(&args[0], env)?;
    if truthy(&condition) {
        interp.eval(&args[1], env)
    } else if args.len() == 3 {
        interp.eval(&args[2], env)
    } else {
        Ok(Value::Null)
    }
}

pub fn apply_unless(interp: &Interpreter, args: &[Expr], env: &Rc<Environment>) -> Result {
    Arity::exactly(2).validate_for(args.len(), "unless")?;
    let condition = interp.eval(&args[0], env)?;
    match truthy(&condition) {
        false => interp.eval(&args[1], env),
        true => Ok(Value::Null),
    }
}

pub fn apply_begin(interp: &Interpreter, args: &[Expr], env: &Rc<Environment>) -> Result {
    let scope = Environment::spawn_from(env);
    interp.evaluate_body(args, &scope)
}

fn parse_parameters(expr: &Expr, form: &'static str) -> Result<ClosureParameters> {
    match expr {
        Expr::Identifier(name) => Ok(ClosureParameters::Single(name.clone())),
        Expr::Form(Form { children, .. }) => children
            .iter()
            .map(|child| expect_identifier(child, form).map(Symbol::clone))
            .collect::<Result<Vec<_>>>()
            .map(ClosureParameters::Positional),
        _ => Err(bad_form(form, "parameters must be an identifier or a list of identifiers")),
    }
}

fn make_closure(
    name: Option<Symbol>,
    parameters: &Expr,
    body: &[Expr],
    env: &Rc<Environment>,
    form: &'static str,
) -> Result<Rc<Closure>> {
    Ok(Rc::new(Closure {
        name,
        parameters: parse_parameters(parameters, form)?,
        body: body.iter().cloned().collect(),
        parent: env.clone(),
    }))
}

/// `(function name params body…)` defines `name` in the current frame.
pub fn apply_function(args: &[Expr], env: &Rc<Environment>) -> Result {
    Arity::at_least(2).validate_for(args.len(), "function")?;
    let name = expect_identifier(&args[0], "function")?;
    let closure = make_closure(Some(name.clone()), &args[1], &args[2..], env, "function")?;
    log::debug!("define function {} {}", name, closure.parameters);
    let value = Value::Closure(closure);
    env.define(name.clone(), value.clone());
    Ok(value)
}

pub fn apply_lambda(args: &[Expr], env: &Rc<Environment>) -> Result {
    Arity::at_least(1).validate_for(args.len(), "lambda")?;
    make_closure(None, &args[0], &args[1..], env, "lambda").map(Value::Closure)
}

enum Iteration {
    Completed(Value),
    Continued,
    Broken,
}

/// Runs one pass of a loop body in its own frame, absorbing loop signals.
fn run_iteration(interp: &Interpreter, body: &[Expr], env: &Rc<Environment>) -> Result<Iteration> {
    let scope = Environment::spawn_from(env);
    match interp.evaluate_body(body, &scope) {
        Ok(value) => Ok(Iteration::Completed(value)),
        Err(Unwind::Continue) => Ok(Iteration::Continued),
        Err(Unwind::Break) => Ok(Iteration::Broken),
        Err(failure) => Err(failure),
    }
}

pub fn apply_while(interp: &Interpreter, args: &[Expr], env: &Rc<Environment>) -> Result {
    Arity::at_least(1).validate_for(args.len(), "while")?;
    let (condition, body) = (&args[0], &args[1..]);
    let mut result = Value::Null;
    while truthy(&interp.eval(condition, env)?) {
        match run_iteration(interp, body, env)? {
            Iteration::Completed(value) => result = value,
            Iteration::Continued => result = Value::Null,
            Iteration::Broken => return Ok(Value::Null),
        }
    }
    Ok(result)
}

/// `(do condition body…)`: the body runs once before the condition is first tested.
pub fn apply_do(interp: &Interpreter, args: &[Expr], env: &Rc<Environment>) -> Result {
    Arity::at_least(1).validate_for(args.len(), "do")?;
    let (condition, body) = (&args[0], &args[1..]);
    loop {
        let result = match run_iteration(interp, body, env)? {
            Iteration::Completed(value) => value,
            Iteration::Continued => Value::Null,
            Iteration::Broken => return Ok(Value::Null),
        };
        if !truthy(&interp.eval(condition, env)?) {
            return Ok(result);
        }
    }
}

/// `(for (name init) condition step body…)`. `name` lives in a frame spanning
/// the whole loop and the value of `step` is assigned to it after each pass.
pub fn apply_for(interp: &Interpreter, args: &[Expr], env: &Rc<Environment>) -> Result {
    Arity::at_least(3).validate_for(args.len(), "for")?;
    let (name, init) = match &args[0] {
        Expr::Form(Form { children, .. }) if children.len() == 2 => {
            (expect_identifier(&children[0], "for")?, &children[1])
        }
        _ => return Err(bad_form("for", "expected (name initial-value)")),
    };
    let (condition, step, body) = (&args[1], &args[2], &args[3..]);

    let loop_env = Environment::spawn_from(env);
    loop_env.define(name.clone(), interp.eval(init, env)?);
    let mut result = Value::Null;
    while truthy(&interp.eval(condition, &loop_env)?) {
        match run_iteration(interp, body, &loop_env)? {
            Iteration::Completed(value) => result = value,
            Iteration::Continued => result = Value::Null,
            Iteration::Broken => return Ok(Value::Null),
        }
        let next = interp.eval(step, &loop_env)?;
        loop_env.assign(name, next)?;
    }
    Ok(result)
}

pub fn apply_signal(args: &[Expr], signal: Unwind, keyword: &'static str) -> Result {
    Arity::exactly(0).validate_for(args.len(), keyword)?;
    Err(signal)
}

pub fn apply_throw(interp: &Interpreter, args: &[Expr], env: &Rc<Environment>) -> Result {
    Arity::exactly(1).validate_for(args.len(), "throw")?;
    let value = interp.eval(&args[0], env)?;
    log::debug!("throw {}", value);
    Err(Error::UserThrow(value).into())
}
