use std::cell::OnceCell;

use crate::ast::NodeRef;

/// A type the language knows natively (`f64`, `i32`, `Type`, ...).
#[derive(Debug)]
pub struct BuiltinType {
    pub name: String,
}

/// Function type: argument types and return type.
///
/// # Example
/// ```text
/// (f64, f64) -> f64
/// ```
#[derive(Debug)]
pub struct Arrow {
    pub args: Vec<NodeRef>,
    pub ret: NodeRef,
}

/// A type that is not known yet.
///
/// It can be resolved once, later, to another type node.
#[derive(Debug, Default)]
pub struct UnknownType {
    resolved: OnceCell<NodeRef>,
}

impl UnknownType {
    pub fn resolved(&self) -> Option<&NodeRef> {
        self.resolved.get()
    }

    /// Record the resolved type. Returns the rejected node if it was already resolved.
    pub fn resolve(&self, ty: NodeRef) -> Result<(), NodeRef> {
        self.resolved.set(ty)
    }
}

/// A spot the parser could not make sense of.
///
/// Stands in for the missing node so a partial tree can still be printed and inspected.
#[derive(Debug)]
pub struct ErrorNode {
    pub message: String,
    /// Whatever was parsed before the error, if anything.
    pub partial: Option<NodeRef>,
}
