//! Ownership handles.
//!
//! Every factory of the [`Builder`](crate::builder::Builder) returns a [`Root`].
//! A root is move-only. Handing it to another factory moves the node into its new
//! parent; a root whose node was never placed releases its subtree when dropped.
//!
//! A node can still be *reached* twice: through [`Root::view`] or by calling
//! [`Root::take_ownership`] again. Taking ownership of something that already
//! has an owner never shares it; the caller receives a deep copy.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::ast::NodeRef;
use crate::builder::Builder;
use crate::copy::Copier;
use crate::free::Free;
use crate::visitor::Visitor;

pub struct Root {
    node: NodeRef,
    /// `false` for views: such a handle never owns and never releases.
    owning: bool,
    /// Set once the node has been handed to a parent.
    taken: Cell<bool>,
}

impl Root {
    pub(crate) fn new(node: NodeRef) -> Self {
        Root {
            node,
            owning: true,
            taken: Cell::new(false),
        }
    }

    /// Non-owning handle on a node that belongs to some other tree.
    pub fn detached(node: NodeRef) -> Self {
        Root {
            node,
            owning: false,
            taken: Cell::new(false),
        }
    }

    /// Non-owning handle on the same node.
    pub fn view(&self) -> Root {
        Root::detached(Rc::clone(&self.node))
    }

    pub fn node(&self) -> &NodeRef {
        &self.node
    }

    /// `true` while this handle is responsible for releasing its node.
    pub fn owned(&self) -> bool {
        self.owning && !self.taken.get()
    }

    /// Hand the node to a new owner.
    ///
    /// The first call on an owning handle returns the node itself. Any later call,
    /// and every call on a view, returns a fresh deep copy so the node keeps a
    /// single owner.
    pub fn take_ownership(&self) -> NodeRef {
        if self.owned() {
            self.taken.set(true);
            return Rc::clone(&self.node);
        }

        log::debug!("`{}` node is already owned, copying", self.node.tag());
        self.copy().into_node()
    }

    /// Take ownership and drop the handle.
    pub fn into_node(self) -> NodeRef {
        self.take_ownership()
    }

    /// Explicit deep copy, owned by the returned handle.
    pub fn clone_subtree(&self) -> Root {
        self.copy()
    }

    fn copy(&self) -> Root {
        Copier::new(Builder::new()).copy(&self.node)
    }
}

impl Drop for Root {
    fn drop(&mut self) {
        if self.owned() {
            let released = Free::new().traverse(&self.node, ());
            log::trace!("released {} `{}` subtree node(s)", released, self.node.tag());
        }
    }
}

impl fmt::Debug for Root {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Root")
            .field("tag", &self.node.tag())
            .field("owning", &self.owning)
            .field("taken", &self.taken.get())
            .finish()
    }
}
