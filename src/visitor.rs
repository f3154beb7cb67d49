//! Tag-dispatched tree traversal.
//!
//! [`Visitor::traverse`] matches on the node variant and calls the `visit_*`
//! method for it, passing the node, its payload and the visitor's extra
//! arguments (an indentation depth, an environment, ...). The match is
//! exhaustive, so a new variant cannot be added without a dispatch arm.
//!
//! Every `visit_*` method has a default that logs a warning and falls back to
//! [`Visitor::unhandled`]. A visitor that forgets a variant keeps working but
//! says so in the log.
//!
//! ```
//! use fern_lang::ast::{NodeRef, Value};
//! use fern_lang::builder::Builder;
//! use fern_lang::visitor::Visitor;
//!
//! /// Counts literals.
//! struct Literals;
//!
//! impl Visitor for Literals {
//!     type Output = usize;
//!     type Args = ();
//!
//!     fn unhandled(&mut self, node: &NodeRef, _: ()) -> usize {
//!         node.children().into_iter().map(|c| self.traverse(c, ())).sum()
//!     }
//!
//!     fn visit_value(&mut self, _: &NodeRef, _: &Value, _: ()) -> usize {
//!         1
//!     }
//! }
//!
//! let builder = Builder::new();
//! let tree = builder.binary("*", builder.value(2.0), builder.placeholder("x"));
//! assert_eq!(Literals.traverse(tree.node(), ()), 1);
//! ```

use crate::ast::{
    Arrow, BinaryCall, Borrow, BuiltinType, ErrorNode, Function, FunctionCall, Match, NodeKind,
    NodeRef, Placeholder, Record, UnaryCall, UnknownType, Value,
};

pub trait Visitor {
    type Output;
    type Args: Clone;

    /// Result for a node kind the visitor does not handle.
    fn unhandled(&mut self, node: &NodeRef, args: Self::Args) -> Self::Output;

    fn traverse(&mut self, node: &NodeRef, args: Self::Args) -> Self::Output {
        log::trace!("{}: visiting `{}`", std::any::type_name::<Self>(), node.tag());

        match node.kind() {
            NodeKind::Borrow(b) => self.visit_borrow(node, b, args),
            NodeKind::Value(v) => self.visit_value(node, v, args),
            NodeKind::Placeholder(p) => self.visit_placeholder(node, p, args),
            NodeKind::UnaryCall(c) => self.visit_unary_call(node, c, args),
            NodeKind::BinaryCall(c) => self.visit_binary_call(node, c, args),
            NodeKind::FunctionCall(c) => self.visit_function_call(node, c, args),
            NodeKind::Match(m) => self.visit_match(node, m, args),
            NodeKind::FunctionDef(f) => self.visit_function(node, f, args),
            NodeKind::MacroDef(f) => self.visit_macro(node, f, args),
            NodeKind::StructDef(r) => self.visit_struct(node, r, args),
            NodeKind::UnionDef(r) => self.visit_union(node, r, args),
            NodeKind::BuiltinType(t) => self.visit_builtin(node, t, args),
            NodeKind::FunctionType(a) => self.visit_arrow(node, a, args),
            NodeKind::UnknownType(u) => self.visit_unknown(node, u, args),
            NodeKind::ErrorType(e) => self.visit_error(node, e, args),
        }
    }

    fn default_visit(&mut self, node: &NodeRef, args: Self::Args) -> Self::Output {
        log::warn!(
            "{}: unimplemented default behavior for `{}`",
            std::any::type_name::<Self>(),
            node.tag()
        );
        self.unhandled(node, args)
    }

    fn visit_borrow(&mut self, node: &NodeRef, _borrow: &Borrow, args: Self::Args) -> Self::Output {
        self.default_visit(node, args)
    }

    fn visit_value(&mut self, node: &NodeRef, _value: &Value, args: Self::Args) -> Self::Output {
        self.default_visit(node, args)
    }

    fn visit_placeholder(
        &mut self,
        node: &NodeRef,
        _placeholder: &Placeholder,
        args: Self::Args,
    ) -> Self::Output {
        self.default_visit(node, args)
    }

    fn visit_unary_call(
        &mut self,
        node: &NodeRef,
        _call: &UnaryCall,
        args: Self::Args,
    ) -> Self::Output {
        self.default_visit(node, args)
    }

    fn visit_binary_call(
        &mut self,
        node: &NodeRef,
        _call: &BinaryCall,
        args: Self::Args,
    ) -> Self::Output {
        self.default_visit(node, args)
    }

    fn visit_function_call(
        &mut self,
        node: &NodeRef,
        _call: &FunctionCall,
        args: Self::Args,
    ) -> Self::Output {
        self.default_visit(node, args)
    }

    fn visit_match(&mut self, node: &NodeRef, _m: &Match, args: Self::Args) -> Self::Output {
        self.default_visit(node, args)
    }

    fn visit_function(
        &mut self,
        node: &NodeRef,
        _function: &Function,
        args: Self::Args,
    ) -> Self::Output {
        self.default_visit(node, args)
    }

    fn visit_macro(
        &mut self,
        node: &NodeRef,
        _function: &Function,
        args: Self::Args,
    ) -> Self::Output {
        self.default_visit(node, args)
    }

    fn visit_struct(&mut self, node: &NodeRef, _record: &Record, args: Self::Args) -> Self::Output {
        self.default_visit(node, args)
    }

    fn visit_union(&mut self, node: &NodeRef, _record: &Record, args: Self::Args) -> Self::Output {
        self.default_visit(node, args)
    }

    fn visit_builtin(
        &mut self,
        node: &NodeRef,
        _ty: &BuiltinType,
        args: Self::Args,
    ) -> Self::Output {
        self.default_visit(node, args)
    }

    fn visit_arrow(&mut self, node: &NodeRef, _arrow: &Arrow, args: Self::Args) -> Self::Output {
        self.default_visit(node, args)
    }

    fn visit_unknown(
        &mut self,
        node: &NodeRef,
        _ty: &UnknownType,
        args: Self::Args,
    ) -> Self::Output {
        self.default_visit(node, args)
    }

    fn visit_error(&mut self, node: &NodeRef, _error: &ErrorNode, args: Self::Args) -> Self::Output {
        self.default_visit(node, args)
    }
}
