use std::rc::Weak;

use crate::ast::{Node, NodeRef};

/// A name reference: a variable, a parameter, or the operator slot of a call.
///
/// # Example
/// ```text
/// x
/// sqrt
/// ```
#[derive(Debug)]
pub struct Placeholder {
    pub name: String,
    /// Declared type, when the source gave one (`x: f64`).
    pub ty: Option<NodeRef>,
}

/// Application of a one-argument operator.
///
/// # Example
/// ```text
/// sqrt 2.0
/// ```
#[derive(Debug)]
pub struct UnaryCall {
    pub fun: NodeRef,
    pub arg: NodeRef,
}

/// Application of a two-argument operator.
///
/// # Example
/// ```text
/// 2 + x
/// ```
#[derive(Debug)]
pub struct BinaryCall {
    pub fun: NodeRef,
    pub lhs: NodeRef,
    pub rhs: NodeRef,
}

/// Call of a user function with any number of arguments, kept in source order.
///
/// # Example
/// ```text
/// sqr(3.0)
/// ```
#[derive(Debug)]
pub struct FunctionCall {
    pub fun: NodeRef,
    pub args: Vec<NodeRef>,
}

/// `match` expression: the first branch whose pattern equals the target wins.
#[derive(Debug)]
pub struct Match {
    pub target: NodeRef,
    pub branches: Vec<(NodeRef, NodeRef)>,
    pub default: Option<NodeRef>,
}

/// Non-owning reference to a subtree owned somewhere else.
///
/// Holding the target weakly means dropping a tree never releases the
/// borrowed subtree, and the borrow itself cannot keep it alive.
#[derive(Debug)]
pub struct Borrow {
    pub target: Weak<Node>,
}

impl Borrow {
    /// The borrowed node, if its owner is still alive.
    pub fn get(&self) -> Option<NodeRef> {
        self.target.upgrade()
    }
}
