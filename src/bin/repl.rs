use brace_lisp::{cmdline, Interpreter, Options};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let interp = Interpreter::new(Options::default())?;
    let args = std::env::args().collect();
    cmdline::launch(args, &interp)?;
    Ok(())
}
