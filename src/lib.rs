//! A small Lisp with three bracket kinds: `(…)` and `{…}` are calls, `[…]`
//! builds a list. Source text is tokenized, read into expressions and
//! evaluated against a chain of environments, with builtin functions supplied
//! by configurable libraries.

pub mod cmdline;
pub mod environment;
pub mod evaluator;
pub mod interpreter;
pub mod library;
pub mod options;
pub mod printer;
pub mod reader;
pub mod types;

#[macro_use]
extern crate lazy_static;

mod grammar;
mod special_forms;
mod tokens;

pub use evaluator::Error;
pub use interpreter::{evaluate, evaluate_with_callback, Interpreter};
pub use options::Options;
pub use types::Value;
