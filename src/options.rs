use crate::library::DEFAULT_LIBS;
use crate::types::Value;

use itertools::Itertools;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Receives each line written by `print`.
pub type Printer = Rc<dyn Fn(&str)>;

/// A function supplied by the embedding program. It gets the shared context
/// and the evaluated arguments; an `Err` becomes a failure of the program.
pub type HostFn = Rc<dyn Fn(&dyn Any, &[Value]) -> Result<Value, String>>;

/// How an interpreter is put together: where output goes, which libraries
/// are active and in what order, and what the host exposes through `ext`.
#[derive(Clone)]
pub struct Options {
    pub printer: Printer,
    pub libs: Vec<String>,
    pub ext_context: Rc<dyn Any>,
    pub ext_functions: HashMap<String, HostFn>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            printer: Rc::new(|line: &str| println!("{}", line)),
            libs: DEFAULT_LIBS.iter().map(|&name| name.to_owned()).collect(),
            ext_context: Rc::new(()),
            ext_functions: HashMap::new(),
        }
    }
}

impl Options {
    pub fn with_printer(mut self, printer: impl Fn(&str) + 'static) -> Self {
        self.printer = Rc::new(printer);
        self
    }

    /// Replaces the active libraries. Order decides which library answers a
    /// name that several of them define.
    pub fn with_libs(mut self, libs: &[&str]) -> Self {
        self.libs = libs.iter().map(|&name| name.to_owned()).collect();
        self
    }

    pub fn with_ext_context(mut self, context: Rc<dyn Any>) -> Self {
        self.ext_context = context;
        self
    }

    pub fn with_ext_function(
        mut self,
        name: &str,
        function: impl Fn(&dyn Any, &[Value]) -> Result<Value, String> + 'static,
    ) -> Self {
        self.ext_functions.insert(name.to_owned(), Rc::new(function));
        self
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("libs", &self.libs)
            .field("ext_functions", &self.ext_functions.keys().sorted().join(", "))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_every_library() {
        let options = Options::default();
        assert_eq!(options.libs, vec!["core", "math", "number", "list", "string", "ext"]);
        assert!(options.ext_functions.is_empty());
    }

    #[test]
    fn builders_replace_fields() {
        let options = Options::default()
            .with_libs(&["math"])
            .with_ext_function("now", |_, _| Ok(Value::Number(0.0)));
        assert_eq!(options.libs, vec!["math"]);
        assert!(options.ext_functions.contains_key("now"));
        assert_eq!(
            format!("{:?}", options),
            r#"Options { libs: ["math"], ext_functions: "now" }"#
        );
    }
}
