use crate::environment::{Environment, UnboundIdentifier};
use crate::interpreter::Interpreter;
use crate::library::ConfigError;
use crate::printer::{pr_str, PrintMode};
use crate::reader::ReadError;
use crate::types::{
    BadArgCount, BuiltinRef, Closure, ClosureParameters, Expr, FormKind, Symbol, TypeMismatch,
    Value,
};
use crate::special_forms;

use itertools::Itertools;
use std::fmt;
use std::rc::Rc;

pub type Result<T = Value> = std::result::Result<T, Unwind>;

/// Everything that can cut an evaluation short. Loops consume `Break` and
/// `Continue`; only the top level consumes `Failure`.
#[derive(Debug)]
pub enum Unwind {
    Break,
    Continue,
    Failure(Error),
}

#[derive(Debug)]
pub enum Error {
    Syntax(ReadError),
    UnboundIdentifier(UnboundIdentifier),
    Arity(BadArgCount),
    TypeMismatch(TypeMismatch),
    BadArgument {
        function: String,
        mismatch: TypeMismatch,
    },
    InvalidArgument {
        function: String,
        reason: String,
    },
    NotAFunction(String),
    UserThrow(Value),
    ControlSignalMisuse(&'static str),
    BadSpecialForm {
        form: &'static str,
        reason: String,
    },
    DivideByZero,
    BadIndex {
        index: i64,
        len: usize,
    },
    HostError {
        function: String,
        message: String,
    },
    Config(ConfigError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Syntax(e) => write!(f, "Syntax error: {}", e),
            Error::UnboundIdentifier(e) => write!(f, "{}", e),
            Error::Arity(e) => write!(f, "Arity error: {}", e),
            Error::TypeMismatch(e) => write!(f, "Type error: {}", e),
            Error::BadArgument { function, mismatch } => {
                write!(f, "Type error: {} {}", function, mismatch)
            }
            Error::InvalidArgument { function, reason } => write!(f, "{}: {}", function, reason),
            Error::NotAFunction(s) => write!(f, "Not a function: {}", s),
            Error::UserThrow(value) => write!(f, "{}", value),
            Error::ControlSignalMisuse(keyword) => write!(f, "{} outside of a loop", keyword),
            Error::BadSpecialForm { form, reason } => write!(f, "Bad {} form: {}", form, reason),
            Error::DivideByZero => write!(f, "Division by zero"),
            Error::BadIndex { index, len } => write!(
                f,
                "Index {} out of range for list of length {}",
                index, len
            ),
            Error::HostError { function, message } => write!(f, "{}: {}", function, message),
            Error::Config(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<ReadError> for Error {
    fn from(e: ReadError) -> Self {
        Self::Syntax(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// A signal that reached the top level is a failure like any other.
impl From<Unwind> for Error {
    fn from(u: Unwind) -> Self {
        match u {
            Unwind::Break => Error::ControlSignalMisuse("break"),
            Unwind::Continue => Error::ControlSignalMisuse("continue"),
            Unwind::Failure(e) => e,
        }
    }
}

impl From<Error> for Unwind {
    fn from(e: Error) -> Self {
        Unwind::Failure(e)
    }
}

impl From<TypeMismatch> for Unwind {
    fn from(t: TypeMismatch) -> Self {
        Unwind::Failure(Error::TypeMismatch(t))
    }
}

impl From<UnboundIdentifier> for Unwind {
    fn from(e: UnboundIdentifier) -> Self {
        Unwind::Failure(Error::UnboundIdentifier(e))
    }
}

impl From<BadArgCount> for Unwind {
    fn from(e: BadArgCount) -> Self {
        Unwind::Failure(Error::Arity(e))
    }
}

pub(crate) fn pretty_print_args(args: &[Value]) -> String {
    match args.len() {
        0 => "no args".into(),
        1 => pr_str(&args[0], PrintMode::ReadableRepresentation),
        _ => format!(
            "\n\t{}",
            args.iter()
                .map(|arg| pr_str(arg, PrintMode::ReadableRepresentation))
                .join("\n\t")
        ),
    }
}

impl Interpreter {
    pub fn eval(&self, expr: &Expr, env: &Rc<Environment>) -> Result {
        match expr {
            Expr::Number(x) => Ok(Value::Number(*x)),
            Expr::Str(s) => Ok(Value::string(s)),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Null => Ok(Value::Null),
            Expr::Identifier(name) => self.eval_identifier(name, env),
            Expr::Form(form) => match form.kind {
                FormKind::Literal => self
                    .evaluate_sequence(&form.children, env)
                    .map(Value::wrap_list),
                FormKind::Call => self.eval_call(&form.children, env),
            },
        }
    }

    fn eval_identifier(&self, name: &Symbol, env: &Rc<Environment>) -> Result {
        if let Some(value) = env.get(name) {
            return Ok(value);
        }
        match self.registry().owner_of(name) {
            Some(_) => Ok(Value::Builtin(BuiltinRef { name: name.clone() })),
            None => Err(UnboundIdentifier(name.clone()).into()),
        }
    }

    fn eval_call(&self, argv: &[Expr], env: &Rc<Environment>) -> Result {
        let (head, args) = match argv.split_first() {
            Some(split) => split,
            None => return Ok(Value::Null),
        };
        if let Expr::Identifier(name) = head {
            log::trace!("apply ({} …{} args)", name, args.len());
            match name.as_str() {
                "let" => return special_forms::apply_let(self, args, env),
                "set!" => return special_forms::apply_set(self, args, env),
                "inc" => return special_forms::apply_step(self, args, env, "inc", 1.0),
                "dec" => return special_forms::apply_step(self, args, env, "dec", -1.0),
                "if" => return special_forms::apply_if(self, args, env),
                "unless" => return special_forms::apply_unless(self, args, env),
                "begin" => return special_forms::apply_begin(self, args, env),
                "function" => return special_forms::apply_function(args, env),
                "lambda" => return special_forms::apply_lambda(args, env),
                "while" => return special_forms::apply_while(self, args, env),
                "do" => return special_forms::apply_do(self, args, env),
                "for" => return special_forms::apply_for(self, args, env),
                "break" => return special_forms::apply_signal(args, Unwind::Break, "break"),
                "continue" => {
                    return special_forms::apply_signal(args, Unwind::Continue, "continue")
                }
                "throw" => return special_forms::apply_throw(self, args, env),
                // Anything else is a user binding or a library function.
                _ => (),
            };
            match env.get(name) {
                Some(callee) => {
                    let values = self.evaluate_sequence(args, env)?;
                    return self.apply(&callee, &values);
                }
                None => {
                    if let Some(library) = self.registry().owner_of(name) {
                        log::trace!("dispatch {} to library {}", name, library.name());
                        return library.try_eval(name, args, env, self);
                    }
                    return Err(UnboundIdentifier(name.clone()).into());
                }
            }
        }
        let callee = self.eval(head, env)?;
        let values = self.evaluate_sequence(args, env)?;
        self.apply(&callee, &values)
    }

    /// Calls a function value with already evaluated arguments.
    pub fn apply(&self, callee: &Value, args: &[Value]) -> Result {
        match callee {
            Value::Closure(f) => self.apply_closure(f, args),
            Value::Builtin(BuiltinRef { name }) => self.registry().call(name, args, self),
            other => Err(Error::NotAFunction(pr_str(other, PrintMode::ReadableRepresentation)).into()),
        }
    }

    fn apply_closure(&self, func: &Closure, args: &[Value]) -> Result {
        log::trace!("Call {} with {}", func.display_name(), pretty_print_args(args));
        func.parameters
            .arity()
            .validate_for(args.len(), func.display_name())?;
        let env = Environment::spawn_from(&func.parent);
        log::trace!("{} runs at frame depth {}", func.display_name(), env.depth());
        match &func.parameters {
            ClosureParameters::Positional(names) => {
                for (key, value) in names.iter().zip(args) {
                    env.define(key.clone(), value.clone());
                }
            }
            ClosureParameters::Single(name) => env.define(name.clone(), args[0].clone()),
        }
        // Loop signals do not cross a function boundary, and a bare type
        // mismatch is pinned on the function it happened in.
        let result = match self.evaluate_body(&func.body, &env) {
            Err(Unwind::Break) => Err(Error::ControlSignalMisuse("break").into()),
            Err(Unwind::Continue) => Err(Error::ControlSignalMisuse("continue").into()),
            Err(Unwind::Failure(Error::TypeMismatch(mismatch))) => Err(Error::BadArgument {
                function: func.display_name().to_owned(),
                mismatch,
            }
            .into()),
            other => other,
        };
        if let Ok(value) = &result {
            log::trace!("Call to {} resulted in {}", func.display_name(), value);
        }
        result
    }

    /// Evaluates each expression left to right, stopping at the first signal.
    pub fn evaluate_sequence(&self, seq: &[Expr], env: &Rc<Environment>) -> Result<Vec<Value>> {
        seq.iter().map(|expr| self.eval(expr, env)).collect()
    }

    /// Evaluates a body in `env` and yields its last value, `null` when empty.
    pub(crate) fn evaluate_body(&self, body: &[Expr], env: &Rc<Environment>) -> Result {
        let mut last = Value::Null;
        for expr in body {
            last = self.eval(expr, env)?;
        }
        Ok(last)
    }
}
