use crate::types::{Symbol, Value};
use itertools::Itertools;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub struct UnboundIdentifier(pub Symbol);

impl fmt::Display for UnboundIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unbound identifier: {}", self.0)
    }
}

/// One lexical scope. Frames point at their parent, never at their children;
/// a frame stays alive as long as some closure or child frame holds it.
#[derive(Default)]
pub struct Environment {
    frame: RefCell<HashMap<Symbol, Value>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    pub fn root() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn spawn_from(parent: &Rc<Environment>) -> Rc<Self> {
        Rc::new(Self {
            frame: RefCell::new(HashMap::new()),
            parent: Some(parent.clone()),
        })
    }

    /// Binds `key` in this frame only, replacing any binding it already had here.
    pub fn define<T>(&self, key: T, value: Value)
    where
        T: Into<Symbol>,
    {
        self.frame.borrow_mut().insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        let mut env = self;
        loop {
            if let Some(value) = env.frame.borrow().get(key) {
                return Some(value.clone());
            }
            env = env.parent.as_deref()?;
        }
    }

    pub fn lookup(&self, key: &str) -> Result<Value, UnboundIdentifier> {
        self.get(key)
            .ok_or_else(|| UnboundIdentifier(Symbol::from(key)))
    }

    /// Overwrites the nearest existing binding of `key`. Never creates one.
    pub fn assign(&self, key: &str, value: Value) -> Result<Value, UnboundIdentifier> {
        let mut env = self;
        loop {
            if let Some(slot) = env.frame.borrow_mut().get_mut(key) {
                *slot = value.clone();
                return Ok(value);
            }
            env = match env.parent.as_deref() {
                Some(parent) => parent,
                None => return Err(UnboundIdentifier(Symbol::from(key))),
            };
        }
    }

    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut env = self;
        while let Some(parent) = env.parent.as_deref() {
            depth += 1;
            env = parent;
        }
        depth
    }
}

impl fmt::Display for Environment {
    // Keys only: values may be closures that print this environment again.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let frame = self.frame.borrow();
        write!(
            f,
            "{{{}}}",
            frame.keys().map(|k| k.0.as_str()).sorted().join(" ")
        )?;
        if let Some(parent) = &self.parent {
            write!(f, " -> {}", parent)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_to_the_root() {
        let root = Environment::root();
        root.define("x", Value::Number(1.0));
        let child = Environment::spawn_from(&root);
        let grandchild = Environment::spawn_from(&child);
        assert_eq!(grandchild.lookup("x"), Ok(Value::Number(1.0)));
        assert_eq!(grandchild.depth(), 2);
    }

    #[test]
    fn unbound_lookup_names_the_identifier() {
        let root = Environment::root();
        let err = root.lookup("nope").unwrap_err();
        assert_eq!(err.to_string(), "Unbound identifier: nope");
    }

    #[test]
    fn define_shadows_in_the_current_frame_only() {
        let root = Environment::root();
        root.define("x", Value::Number(1.0));
        let child = Environment::spawn_from(&root);
        child.define("x", Value::Number(2.0));
        assert_eq!(child.lookup("x"), Ok(Value::Number(2.0)));
        assert_eq!(root.lookup("x"), Ok(Value::Number(1.0)));
    }

    #[test]
    fn redefinition_in_the_same_frame_overwrites() {
        let root = Environment::root();
        root.define("x", Value::Number(1.0));
        root.define("x", Value::Number(5.0));
        assert_eq!(root.lookup("x"), Ok(Value::Number(5.0)));
    }

    #[test]
    fn assign_mutates_the_nearest_binding() {
        let root = Environment::root();
        root.define("x", Value::Number(1.0));
        let child = Environment::spawn_from(&root);
        assert_eq!(child.assign("x", Value::Number(3.0)), Ok(Value::Number(3.0)));
        assert_eq!(root.lookup("x"), Ok(Value::Number(3.0)));
        assert!(child.frame.borrow().is_empty());
    }

    #[test]
    fn assign_never_creates() {
        let root = Environment::root();
        assert!(root.assign("y", Value::Null).is_err());
        assert!(root.get("y").is_none());
    }
}
