//! Named numeric operators.
//!
//! The parser asks the registry whether an identifier or symbol is an operator and
//! how many operands it takes; the evaluators ask it for the function to apply.
//! Build one with [`OperatorRegistry::standard`] and register extra operators
//! before handing it to a parser or evaluator.

use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::error::{Either, EmptyOption};

pub type UnaryOperator = Rc<dyn Fn(f64) -> f64>;
pub type BinaryOperator = Rc<dyn Fn(f64, f64) -> f64>;

/// Unary on the left, binary on the right.
pub type Operator = Either<UnaryOperator, BinaryOperator>;

/// A word (`sqrt`, `max-of`) or a single symbol character (`+`, `^`).
static OPERATOR_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:[A-Za-z][A-Za-z0-9_?!-]*|[^\sA-Za-z0-9()"':,_])$"#)
        .expect("operator name pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("invalid operator name `{0}`")]
    InvalidName(String),
}

#[derive(Clone, Default)]
pub struct OperatorRegistry {
    operators: BTreeMap<String, Operator>,
}

impl OperatorRegistry {
    /// Registry without any operator.
    pub fn empty() -> Self {
        OperatorRegistry::default()
    }

    /// `+ - * /` and `ln exp sqrt return`.
    pub fn standard() -> Self {
        let mut registry = OperatorRegistry::empty();

        let binary: [(&str, fn(f64, f64) -> f64); 4] = [
            ("+", |a, b| a + b),
            ("-", |a, b| a - b),
            ("*", |a, b| a * b),
            ("/", |a, b| a / b),
        ];
        for (name, f) in binary {
            registry
                .operators
                .insert(name.to_string(), Either::Right(Rc::new(f)));
        }

        let unary: [(&str, fn(f64) -> f64); 4] = [
            ("ln", f64::ln),
            ("exp", f64::exp),
            ("sqrt", f64::sqrt),
            ("return", |x| x),
        ];
        for (name, f) in unary {
            registry
                .operators
                .insert(name.to_string(), Either::Left(Rc::new(f)));
        }

        registry
    }

    fn check_name(name: &str) -> Result<(), RegistryError> {
        if OPERATOR_NAME.is_match(name) {
            Ok(())
        } else {
            Err(RegistryError::InvalidName(name.to_string()))
        }
    }

    /// Add or replace a one-operand operator.
    pub fn register_unary(
        &mut self,
        name: &str,
        f: impl Fn(f64) -> f64 + 'static,
    ) -> Result<(), RegistryError> {
        Self::check_name(name)?;
        if self.operators.insert(name.to_string(), Either::Left(Rc::new(f))).is_some() {
            log::debug!("operator `{name}` replaced");
        }
        Ok(())
    }

    /// Add or replace a two-operand operator.
    pub fn register_binary(
        &mut self,
        name: &str,
        f: impl Fn(f64, f64) -> f64 + 'static,
    ) -> Result<(), RegistryError> {
        Self::check_name(name)?;
        if self.operators.insert(name.to_string(), Either::Right(Rc::new(f))).is_some() {
            log::debug!("operator `{name}` replaced");
        }
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Result<&Operator, EmptyOption> {
        self.operators
            .get(name)
            .ok_or_else(|| EmptyOption::new(format!("operator `{name}`")))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.operators.contains_key(name)
    }

    /// 1 or 2, `None` when `name` is not an operator.
    pub fn arity(&self, name: &str) -> Option<usize> {
        self.operators
            .get(name)
            .map(|op| op.fold(|_| 1, |_| 2))
    }

    pub fn is_unary(&self, name: &str) -> bool {
        self.arity(name) == Some(1)
    }

    pub fn is_binary(&self, name: &str) -> bool {
        self.arity(name) == Some(2)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.operators.keys().map(String::as_str)
    }
}

impl fmt::Debug for OperatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (name, op) in &self.operators {
            map.entry(name, &op.fold(|_| "unary", |_| "binary"));
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EitherError;

    #[test]
    fn test_standard_table() {
        let registry = OperatorRegistry::standard();
        for name in ["+", "-", "*", "/"] {
            assert!(registry.is_binary(name), "{name}");
        }
        for name in ["ln", "exp", "sqrt", "return"] {
            assert!(registry.is_unary(name), "{name}");
        }
        assert_eq!(registry.arity("max"), None);
    }

    #[test]
    fn test_lookup_and_apply() {
        let registry = OperatorRegistry::standard();
        let add = registry.lookup("+").unwrap().right().unwrap();
        assert_eq!(add(2.0, 3.0), 5.0);

        let ret = registry.lookup("return").unwrap().left().unwrap();
        assert_eq!(ret(7.5), 7.5);
    }

    #[test]
    fn test_wrong_side_and_missing() {
        let registry = OperatorRegistry::standard();
        assert_eq!(
            registry.lookup("sqrt").unwrap().right().err(),
            Some(EitherError::NotRight)
        );
        assert!(registry.lookup("max").is_err());
    }

    #[test]
    fn test_register() {
        let mut registry = OperatorRegistry::standard();
        registry.register_binary("max", f64::max).unwrap();
        registry.register_unary("neg", |x| -x).unwrap();
        registry.register_binary("^", f64::powf).unwrap();

        assert!(registry.is_binary("max"));
        assert!(registry.is_unary("neg"));
        assert!(registry.is_binary("^"));
    }

    #[test]
    fn test_register_rejects_bad_names() {
        let mut registry = OperatorRegistry::empty();
        assert_eq!(
            registry.register_unary("2x", |x| x),
            Err(RegistryError::InvalidName("2x".to_string()))
        );
        assert!(registry.register_binary("a b", |a, _| a).is_err());
        assert!(registry.register_binary("(", |a, _| a).is_err());
        assert!(registry.register_binary("", |a, _| a).is_err());
    }
}
