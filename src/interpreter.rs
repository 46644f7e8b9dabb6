//! Entry points. An `Interpreter` owns its configuration, the active
//! libraries and the root environment; `evaluate` is the failure boundary
//! that turns any error into an `"Error: …"` string value.

use crate::environment::Environment;
use crate::evaluator::Error;
use crate::library::{ConfigError, Registry};
use crate::options::Options;
use crate::reader;
use crate::types::Value;

use std::rc::Rc;

pub struct Interpreter {
    options: Options,
    registry: Registry,
    root: Rc<Environment>,
}

impl Interpreter {
    pub fn new(options: Options) -> Result<Self, ConfigError> {
        let registry = Registry::from_options(&options)?;
        Ok(Self {
            options,
            registry,
            root: Environment::root(),
        })
    }

    /// Parses and evaluates `source` in the root environment, which persists
    /// between runs. Yields the value of the last top-level expression.
    pub fn run(&self, source: &str) -> Result<Value, Error> {
        let program = reader::parse(source)?;
        log::debug!("running {} top-level expressions", program.len());
        let mut last = Value::Null;
        for expr in &program {
            last = self.eval(expr, &self.root)?;
        }
        Ok(last)
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub(crate) fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn root(&self) -> &Rc<Environment> {
        &self.root
    }
}

fn run_fresh(source: &str, options: &Options) -> Result<Value, Error> {
    Interpreter::new(options.clone())?.run(source)
}

/// Runs `source` with a fresh interpreter. Failures of any kind come back as
/// a string value `"Error: <message>"`.
pub fn evaluate(source: &str, options: &Options) -> Value {
    match run_fresh(source, options) {
        Ok(value) => value,
        Err(e) => {
            log::debug!("evaluation failed: {}", e);
            Value::from(format!("Error: {}", e))
        }
    }
}

/// Like `evaluate`, but a failure is reported to `on_error` as
/// `"Error: <message>"` and the result is `null`.
pub fn evaluate_with_callback(
    source: &str,
    options: &Options,
    on_error: impl FnOnce(String),
) -> Value {
    match run_fresh(source, options) {
        Ok(value) => value,
        Err(e) => {
            on_error(format!("Error: {}", e));
            Value::Null
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_environment_persists_between_runs() {
        let interp = Interpreter::new(Options::default()).unwrap();
        interp.run("{let a 41}").unwrap();
        assert_eq!(interp.run("(+ a 1)").unwrap(), Value::Number(42.0));
        assert!(interp.root().get("a").is_some());
    }

    #[test]
    fn empty_program_is_null() {
        assert_eq!(evaluate("", &Options::default()), Value::Null);
        assert_eq!(evaluate("; only a comment", &Options::default()), Value::Null);
    }

    #[test]
    fn failures_become_strings() {
        assert_eq!(
            evaluate("(+ 1", &Options::default()),
            Value::string("Error: Syntax error: Unexpected end of input")
        );
    }

    #[test]
    fn bad_configuration_is_reported_at_the_boundary() {
        let options = Options::default().with_libs(&["nope"]);
        assert_eq!(
            evaluate("1", &options),
            Value::string("Error: Configuration error: unknown library nope")
        );
    }

    #[test]
    fn callback_receives_the_message() {
        let mut seen = None;
        let result = evaluate_with_callback("(throw \"boom\")", &Options::default(), |msg| {
            seen = Some(msg)
        });
        assert_eq!(result, Value::Null);
        assert_eq!(seen.as_deref(), Some("Error: boom"));
    }

    #[test]
    fn callback_is_silent_on_success() {
        let mut called = false;
        let result = evaluate_with_callback("(* 6 7)", &Options::default(), |_| called = true);
        assert_eq!(result, Value::Number(42.0));
        assert!(!called);
    }
}
