//! The interactive front end: a line editor with persistent history, or a
//! one-shot run of a source file.

use crate::interpreter::Interpreter;
use crate::printer::{pr_str, PrintMode};

use ansi_term::Colour;
use linefeed::{DefaultTerminal, Interface, ReadResult, Terminal};
use std::fmt;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Eval(crate::Error),
    Usage(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "{}", e),
            Error::Eval(e) => write!(f, "Error: {}", e),
            Error::Usage(program) => write!(f, "usage: {} [FILE]", program),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<crate::Error> for Error {
    fn from(e: crate::Error) -> Self {
        Error::Eval(e)
    }
}

pub fn setup() -> std::io::Result<Interface<DefaultTerminal>> {
    let interface = linefeed::Interface::new("brace-lisp")?;
    interface.set_prompt("lisp> ")?;
    if let Some(path) = history_path() {
        interface.load_history(path).ok();
    };
    Ok(interface)
}

fn history_path() -> Option<PathBuf> {
    match dirs::data_dir() {
        Some(mut path) => {
            path.push(".brace_lisp_history");
            Some(path)
        }
        None => None,
    }
}

pub fn save_history<T: Terminal>(interface: &Interface<T>) -> std::io::Result<()> {
    match history_path() {
        Some(path) => interface.save_history(path),
        None => Ok(()),
    }
}

fn paint_error(message: String) -> String {
    match atty::is(atty::Stream::Stdout) {
        true => Colour::Red.paint(message).to_string(),
        false => message,
    }
}

/// Evaluates one line of input against the interpreter's persistent root
/// environment and renders the outcome for display.
pub fn rep(interp: &Interpreter, line: &str) -> String {
    match interp.run(line) {
        Ok(value) => pr_str(&value, PrintMode::ReadableRepresentation),
        Err(e) => paint_error(format!("Error: {}", e)),
    }
}

pub fn repl<T: Terminal>(interface: &Interface<T>, interp: &Interpreter) {
    loop {
        match interface.read_line() {
            Ok(ReadResult::Eof) => break,
            Ok(ReadResult::Signal(sig)) => {
                writeln!(interface, "Received signal {:?}", sig).ok();
            }
            Ok(ReadResult::Input(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                interface.add_history_unique(line.clone());
                writeln!(interface, "{}", rep(interp, &line)).ok();
            }
            Err(e) => {
                writeln!(interface, "Error: {}", e).ok();
                break;
            }
        }
    }
}

/// With no arguments, starts the line editor. With a single path, runs that
/// file and prints the value of its last expression.
pub fn launch(args: Vec<String>, interp: &Interpreter) -> Result<(), Error> {
    match args.as_slice() {
        [_] => {
            let interface = setup()?;
            repl(&interface, interp);
            save_history(&interface)?;
            Ok(())
        }
        [_, path] => {
            let source = std::fs::read_to_string(path)?;
            let value = interp.run(&source)?;
            let stdout = std::io::stdout();
            writeln!(stdout.lock(), "{}", pr_str(&value, PrintMode::ReadableRepresentation))?;
            Ok(())
        }
        _ => Err(Error::Usage(
            args.first().cloned().unwrap_or_else(|| "repl".to_owned()),
        )),
    }
}
