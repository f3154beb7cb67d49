use std::collections::HashMap;

use crate::ast::NodeRef;
use crate::root::Root;

/// Name of the implicit top-level expression.
pub const MAIN: &str = "__main__";

/// Top-level declarations in the order they were parsed.
///
/// The module owns its declarations; dropping it releases them.
#[derive(Debug, Default)]
pub struct Module {
    entries: Vec<(String, Root)>,
    index: HashMap<String, usize>,
}

impl Module {
    pub fn new() -> Self {
        Module::default()
    }

    /// Add a declaration. A name that is already declared keeps its first
    /// declaration; the new one is dropped and `false` is returned.
    pub fn insert(&mut self, name: impl Into<String>, root: Root) -> bool {
        let name = name.into();
        if self.index.contains_key(&name) {
            log::warn!("`{name}` is already declared, keeping the first declaration");
            return false;
        }

        self.index.insert(name.clone(), self.entries.len());
        self.entries.push((name, root));
        true
    }

    pub fn get(&self, name: &str) -> Option<&NodeRef> {
        self.index.get(name).map(|&i| self.entries[i].1.node())
    }

    pub fn main(&self) -> Option<&NodeRef> {
        self.get(MAIN)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NodeRef)> {
        self.entries
            .iter()
            .map(|(name, root)| (name.as_str(), root.node()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Value;
    use crate::builder::Builder;

    #[test]
    fn test_insertion_order_and_duplicates() {
        let builder = Builder::new();
        let mut module = Module::new();

        assert!(module.insert("b", builder.value(1.0)));
        assert!(module.insert("a", builder.value(2.0)));
        assert!(!module.insert("b", builder.value(3.0)));

        assert_eq!(module.names().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(module.get("b").unwrap().as_value(), Some(&Value::F64(1.0)));
        assert_eq!(module.len(), 2);
        assert!(module.main().is_none());
    }
}
