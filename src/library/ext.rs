//! Host-supplied functions. The names this library owns are exactly the keys
//! of `Options::ext_functions`; every call receives `Options::ext_context`.

use super::Library;
use crate::environment::UnboundIdentifier;
use crate::evaluator::{self, Error};
use crate::interpreter::Interpreter;
use crate::options::{HostFn, Options};
use crate::types::{Symbol, Value};

use std::any::Any;
use std::collections::HashMap;
use std::rc::Rc;

pub struct Ext {
    context: Rc<dyn Any>,
    functions: HashMap<String, HostFn>,
}

impl Ext {
    pub fn new(options: &Options) -> Self {
        Self {
            context: options.ext_context.clone(),
            functions: options.ext_functions.clone(),
        }
    }
}

impl Library for Ext {
    fn name(&self) -> &str {
        "ext"
    }

    fn owns(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    fn call(&self, name: &str, args: &[Value], _: &Interpreter) -> evaluator::Result {
        let function = self
            .functions
            .get(name)
            .ok_or_else(|| UnboundIdentifier(Symbol::from(name)))?;
        log::debug!("host call {} with {}", name, evaluator::pretty_print_args(args));
        function(self.context.as_ref(), args).map_err(|message| {
            Error::HostError {
                function: name.to_owned(),
                message,
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{evaluate, Options, Value};
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn host_functions_receive_evaluated_arguments() {
        let options = Options::default().with_ext_function("twice", |_, args| {
            let x = args[0].as_number().map_err(|e| e.to_string())?;
            Ok(Value::Number(x * 2.0))
        });
        assert_eq!(evaluate("(twice (+ 1 2))", &options), Value::Number(6.0));
    }

    #[test]
    fn host_functions_receive_the_context() {
        let counter = Rc::new(Cell::new(0));
        let options = Options::default()
            .with_ext_context(counter.clone())
            .with_ext_function("tick", |context, _| {
                let counter = context
                    .downcast_ref::<Cell<i32>>()
                    .ok_or_else(|| String::from("wrong context"))?;
                counter.set(counter.get() + 1);
                Ok(Value::Number(f64::from(counter.get())))
            });
        assert_eq!(evaluate("(tick) (tick) (tick)", &options), Value::Number(3.0));
        assert_eq!(counter.get(), 3);
    }

    #[test]
    fn host_errors_reach_the_boundary() {
        let options = Options::default()
            .with_ext_function("fail", |_, _| Err(String::from("host refused")));
        assert_eq!(evaluate("(fail)", &options), Value::string("Error: fail: host refused"));
    }

    #[test]
    fn unregistered_names_stay_unbound() {
        assert_eq!(
            evaluate("(fetch 1)", &Options::default()),
            Value::string("Error: Unbound identifier: fetch")
        );
    }

    #[test]
    fn user_bindings_shadow_host_functions() {
        let options = Options::default().with_ext_function("f", |_, _| Ok(Value::Number(1.0)));
        assert_eq!(evaluate("(function f () 2) (f)", &options), Value::Number(2.0));
    }
}
