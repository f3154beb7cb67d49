//! Release of owned subtrees.
//!
//! Walks the children a node owns and unlinks each one from its parent. Borrows
//! are skipped: their target belongs to another tree. Parent links are never
//! followed.
//!
//! The count returned is the number of nodes actually released, that is nodes
//! nothing outside the subtree still holds.

use std::rc::Rc;

use crate::ast::{Borrow, NodeKind, NodeRef};
use crate::root::Root;
use crate::visitor::Visitor;

#[derive(Debug, Default)]
pub struct Free {
    shared: usize,
}

impl Free {
    pub fn new() -> Self {
        Free::default()
    }

    /// Nodes visited that were still held elsewhere and so stayed alive.
    pub fn shared(&self) -> usize {
        self.shared
    }

    /// 1 if `node` itself goes away with its owner.
    fn count(&mut self, node: &NodeRef) -> usize {
        if Rc::strong_count(node) == 1 {
            1
        } else {
            self.shared += 1;
            0
        }
    }

    fn release(&mut self, node: &NodeRef) -> usize {
        let mut released = 0;
        for child in node.children() {
            child.unlink();
            released += self.traverse(child, ());
        }
        released + self.count(node)
    }
}

impl Visitor for Free {
    type Output = usize;
    type Args = ();

    fn unhandled(&mut self, node: &NodeRef, _: ()) -> usize {
        self.release(node)
    }

    fn traverse(&mut self, node: &NodeRef, args: ()) -> usize {
        match node.kind() {
            NodeKind::Borrow(borrow) => self.visit_borrow(node, borrow, args),
            _ => self.unhandled(node, args),
        }
    }

    fn visit_borrow(&mut self, node: &NodeRef, _borrow: &Borrow, _: ()) -> usize {
        self.count(node)
    }
}

/// Release the subtree owned by `root`.
pub fn free(root: Root) -> usize {
    let node = root.into_node();
    Free::new().traverse(&node, ())
}
