//! Builtin function modules.
//!
//! A call whose head is neither a special form nor bound in the environment
//! is offered to the active libraries in configured order; the first one that
//! owns the name evaluates it.

pub mod base;
pub mod ext;
pub mod list;
pub mod math;
pub mod number;
pub mod string;

use crate::environment::{Environment, UnboundIdentifier};
use crate::evaluator::{self, Error, Unwind};
use crate::interpreter::Interpreter;
use crate::options::Options;
use crate::types::{Arity, Expr, Symbol, Value};

use itertools::Itertools;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Library order used when `Options::libs` is left alone.
pub const DEFAULT_LIBS: &[&str] = &["core", "math", "number", "list", "string", "ext"];

pub trait Library {
    fn name(&self) -> &str;

    fn owns(&self, name: &str) -> bool;

    /// Evaluates an unevaluated call `(name args…)`. By default the arguments
    /// are evaluated left to right and handed to `call`.
    fn try_eval(
        &self,
        name: &str,
        args: &[Expr],
        env: &Rc<Environment>,
        interp: &Interpreter,
    ) -> evaluator::Result {
        let values = interp.evaluate_sequence(args, env)?;
        self.call(name, &values, interp)
    }

    /// Calls `name` with evaluated arguments.
    fn call(&self, name: &str, args: &[Value], interp: &Interpreter) -> evaluator::Result;
}

pub struct PrimitiveFn {
    pub name: &'static str,
    pub arity: Arity,
    pub fn_ptr: fn(&[Value], &Interpreter) -> evaluator::Result,
}

impl fmt::Debug for PrimitiveFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "primitive function #<{}>", self.name)
    }
}

/// A library backed by a fixed table of primitives.
pub struct Table {
    name: &'static str,
    fns: HashMap<&'static str, &'static PrimitiveFn>,
}

impl Table {
    pub fn new(name: &'static str, primitives: &'static [PrimitiveFn]) -> Self {
        let fns = primitives.iter().map(|f| (f.name, f)).collect();
        Self { name, fns }
    }
}

impl Library for Table {
    fn name(&self) -> &str {
        self.name
    }

    fn owns(&self, name: &str) -> bool {
        self.fns.contains_key(name)
    }

    fn call(&self, name: &str, args: &[Value], interp: &Interpreter) -> evaluator::Result {
        let func = self
            .fns
            .get(name)
            .ok_or_else(|| UnboundIdentifier(Symbol::from(name)))?;
        call_primitive(func, args, interp)
    }
}

pub fn call_primitive(func: &PrimitiveFn, args: &[Value], interp: &Interpreter) -> evaluator::Result {
    func.arity.validate_for(args.len(), func.name)?;
    log::trace!("Call {} with {}", func.name, evaluator::pretty_print_args(args));
    let result = (func.fn_ptr)(args, interp).map_err(|e| match e {
        Unwind::Failure(Error::TypeMismatch(mismatch)) => Error::BadArgument {
            function: func.name.to_owned(),
            mismatch,
        }
        .into(),
        other => other,
    });
    match &result {
        Ok(val) => log::trace!("Call to {} resulted in {}", func.name, val),
        Err(e) => log::trace!("Call to {} failed: {:?}", func.name, e),
    }
    result
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    UnknownLibrary(String),
    DuplicateLibrary(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownLibrary(name) => write!(f, "unknown library {}", name),
            ConfigError::DuplicateLibrary(name) => write!(f, "library {} listed twice", name),
        }
    }
}

impl std::error::Error for ConfigError {}

/// The active libraries, in dispatch order.
pub struct Registry {
    libraries: Vec<Rc<dyn Library>>,
}

impl Registry {
    pub fn from_options(options: &Options) -> Result<Self, ConfigError> {
        let mut libraries: Vec<Rc<dyn Library>> = Vec::new();
        for name in &options.libs {
            if libraries.iter().any(|lib| lib.name() == name.as_str()) {
                return Err(ConfigError::DuplicateLibrary(name.clone()));
            }
            let library: Rc<dyn Library> = match name.as_str() {
                "core" => Rc::new(base::Base::new()),
                "math" => Rc::new(Table::new("math", math::PRIMITIVES)),
                "number" => Rc::new(Table::new("number", number::PRIMITIVES)),
                "list" => Rc::new(Table::new("list", list::PRIMITIVES)),
                "string" => Rc::new(Table::new("string", string::PRIMITIVES)),
                "ext" => Rc::new(ext::Ext::new(options)),
                _ => return Err(ConfigError::UnknownLibrary(name.clone())),
            };
            libraries.push(library);
        }
        log::debug!(
            "active libraries: {}",
            libraries.iter().map(|lib| lib.name()).join(", ")
        );
        Ok(Self { libraries })
    }

    /// First library, in configured order, that owns `name`.
    pub fn owner_of(&self, name: &str) -> Option<&Rc<dyn Library>> {
        self.libraries.iter().find(|lib| lib.owns(name))
    }

    pub fn call(&self, name: &Symbol, args: &[Value], interp: &Interpreter) -> evaluator::Result {
        match self.owner_of(name) {
            Some(library) => library.call(name, args, interp),
            None => Err(UnboundIdentifier(name.clone()).into()),
        }
    }
}

/// Pulls two numbers out of `args`, which the arity check guarantees exist.
pub(crate) fn two_numbers(args: &[Value]) -> evaluator::Result<(f64, f64)> {
    Ok((args[0].as_number()?, args[1].as_number()?))
}
