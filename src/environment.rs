//! Name bindings for evaluation.
//!
//! An [`Environment`] maps names to numbers, to unevaluated expressions
//! (call-by-name arguments) or to definitions. Lookups that miss walk up to the
//! parent environment.

use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::NodeRef;
use crate::module::Module;

#[derive(Debug, Clone)]
pub enum Binding {
    Number(f64),
    /// An argument expression together with the scope it was written in.
    Thunk { expr: NodeRef, env: Rc<Environment> },
    /// A function, macro, struct or union definition.
    Definition(NodeRef),
}

#[derive(Debug, Clone, Default)]
pub struct Environment {
    bindings: HashMap<String, Binding>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment::default()
    }

    pub fn with_parent(parent: Rc<Environment>) -> Self {
        Environment {
            bindings: HashMap::new(),
            parent: Some(parent),
        }
    }

    /// Bind every definition of `module` under its name.
    ///
    /// Plain expressions such as `__main__` are not bound.
    pub fn from_module(module: &Module) -> Self {
        let mut env = Environment::new();
        for (name, node) in module.iter() {
            if node.is_def() {
                env.bind_definition(name, NodeRef::clone(node));
            }
        }
        env
    }

    pub fn bind(&mut self, name: impl Into<String>, binding: Binding) {
        self.bindings.insert(name.into(), binding);
    }

    pub fn bind_number(&mut self, name: impl Into<String>, value: f64) {
        self.bind(name, Binding::Number(value));
    }

    pub fn bind_definition(&mut self, name: impl Into<String>, node: NodeRef) {
        self.bind(name, Binding::Definition(node));
    }

    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        match self.bindings.get(name) {
            Some(binding) => Some(binding),
            None => self.parent.as_ref()?.lookup(name),
        }
    }

    /// Number bound to `name`, if that is what it is bound to.
    pub fn number(&self, name: &str) -> Option<f64> {
        match self.lookup(name)? {
            Binding::Number(x) => Some(*x),
            _ => None,
        }
    }

    /// The outermost environment of the chain.
    pub fn global(self: &Rc<Self>) -> Rc<Environment> {
        match &self.parent {
            Some(parent) => parent.global(),
            None => Rc::clone(self),
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl FromIterator<(String, f64)> for Environment {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut env = Environment::new();
        for (name, value) in iter {
            env.bind_number(name, value);
        }
        env
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_walks_parents() {
        let mut global = Environment::new();
        global.bind_number("x", 1.0);
        global.bind_number("y", 2.0);
        let global = Rc::new(global);

        let mut local = Environment::with_parent(Rc::clone(&global));
        local.bind_number("x", 10.0);
        let local = Rc::new(local);

        assert_eq!(local.number("x"), Some(10.0));
        assert_eq!(local.number("y"), Some(2.0));
        assert_eq!(local.number("z"), None);
        assert!(Rc::ptr_eq(&local.global(), &global));
    }
}
