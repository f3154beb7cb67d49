//! Deep copies.
//!
//! The copy is rebuilt through the [`Builder`], so additions are folded again on
//! the way: a copy of a tree is not always shaped exactly like its source.

use crate::ast::{
    Arrow, BinaryCall, Borrow, BuiltinType, ErrorNode, Function, FunctionCall, Match, NodeRef,
    Placeholder, Record, UnaryCall, UnknownType, Value,
};
use crate::builder::Builder;
use crate::root::Root;
use crate::visitor::Visitor;

#[derive(Debug, Default)]
pub struct Copier {
    builder: Builder,
    /// Keep borrows pointing at their original target instead of copying it.
    keep_borrowed: bool,
}

impl Copier {
    pub fn new(builder: Builder) -> Self {
        Copier {
            builder,
            keep_borrowed: false,
        }
    }

    pub fn keep_borrowed(mut self, keep: bool) -> Self {
        self.keep_borrowed = keep;
        self
    }

    pub fn copy(&mut self, node: &NodeRef) -> Root {
        self.traverse(node, ())
    }

    fn copy_all(&mut self, nodes: &[NodeRef]) -> Vec<Root> {
        nodes.iter().map(|n| self.traverse(n, ())).collect()
    }

    fn copy_pairs(&mut self, pairs: &[(String, NodeRef)]) -> Vec<(String, Root)> {
        pairs
            .iter()
            .map(|(name, node)| (name.clone(), self.traverse(node, ())))
            .collect()
    }

    fn copy_function(&mut self, function: &Function) -> (Vec<String>, Option<Root>, Root) {
        let signature = function.signature.as_ref().map(|s| self.traverse(s, ()));
        let body = self.traverse(&function.body, ());
        (function.params.clone(), signature, body)
    }
}

impl Visitor for Copier {
    type Output = Root;
    type Args = ();

    fn unhandled(&mut self, node: &NodeRef, _: ()) -> Root {
        self.builder
            .error(format!("cannot copy a `{}` node", node.tag()), None)
    }

    fn visit_borrow(&mut self, _node: &NodeRef, borrow: &Borrow, _: ()) -> Root {
        match borrow.get() {
            Some(target) if self.keep_borrowed => self.builder.borrow(&target),
            Some(target) => self.traverse(&target, ()),
            None => self.builder.error("dangling borrow", None),
        }
    }

    fn visit_value(&mut self, _node: &NodeRef, value: &Value, _: ()) -> Root {
        self.builder.value(value.clone())
    }

    fn visit_placeholder(&mut self, _node: &NodeRef, p: &Placeholder, _: ()) -> Root {
        match &p.ty {
            Some(ty) => {
                let ty = self.traverse(ty, ());
                self.builder.typed_placeholder(p.name.clone(), ty)
            }
            None => self.builder.placeholder(p.name.clone()),
        }
    }

    fn visit_unary_call(&mut self, _node: &NodeRef, call: &UnaryCall, _: ()) -> Root {
        let fun = self.traverse(&call.fun, ());
        let arg = self.traverse(&call.arg, ());
        self.builder.unary_call(fun, arg)
    }

    fn visit_binary_call(&mut self, _node: &NodeRef, call: &BinaryCall, _: ()) -> Root {
        let fun = self.traverse(&call.fun, ());
        let lhs = self.traverse(&call.lhs, ());
        let rhs = self.traverse(&call.rhs, ());
        self.builder.binary_call(fun, lhs, rhs)
    }

    fn visit_function_call(&mut self, _node: &NodeRef, call: &FunctionCall, _: ()) -> Root {
        let fun = self.traverse(&call.fun, ());
        let args = self.copy_all(&call.args);
        self.builder.function_call(fun, args)
    }

    fn visit_match(&mut self, _node: &NodeRef, m: &Match, _: ()) -> Root {
        let target = self.traverse(&m.target, ());
        let branches = m
            .branches
            .iter()
            .map(|(pattern, branch)| (self.traverse(pattern, ()), self.traverse(branch, ())))
            .collect();
        let default = m.default.as_ref().map(|d| self.traverse(d, ()));
        self.builder.match_expr(target, branches, default)
    }

    fn visit_function(&mut self, _node: &NodeRef, function: &Function, _: ()) -> Root {
        let (params, signature, body) = self.copy_function(function);
        self.builder
            .function(function.name.clone(), params, signature, body)
    }

    fn visit_macro(&mut self, _node: &NodeRef, function: &Function, _: ()) -> Root {
        let (params, signature, body) = self.copy_function(function);
        self.builder
            .macro_def(function.name.clone(), params, signature, body)
    }

    fn visit_struct(&mut self, _node: &NodeRef, record: &Record, _: ()) -> Root {
        let meta = self.copy_pairs(&record.meta_types);
        let attributes = self.copy_pairs(&record.attributes);
        self.builder.struct_def(record.name.clone(), meta, attributes)
    }

    fn visit_union(&mut self, _node: &NodeRef, record: &Record, _: ()) -> Root {
        let meta = self.copy_pairs(&record.meta_types);
        let attributes = self.copy_pairs(&record.attributes);
        self.builder.union_def(record.name.clone(), meta, attributes)
    }

    fn visit_builtin(&mut self, _node: &NodeRef, ty: &BuiltinType, _: ()) -> Root {
        self.builder.builtin(ty.name.clone())
    }

    fn visit_arrow(&mut self, _node: &NodeRef, arrow: &Arrow, _: ()) -> Root {
        let args = self.copy_all(&arrow.args);
        let ret = self.traverse(&arrow.ret, ());
        self.builder.arrow(args, ret)
    }

    fn visit_unknown(&mut self, _node: &NodeRef, ty: &UnknownType, _: ()) -> Root {
        let unknown = self.builder.unknown();
        if let Some(resolved) = ty.resolved() {
            let resolved = self.traverse(resolved, ());
            // a fresh unknown node is unresolved, this cannot be refused
            let _ = self.builder.resolve(unknown.node(), resolved);
        }
        unknown
    }

    fn visit_error(&mut self, _node: &NodeRef, error: &ErrorNode, _: ()) -> Root {
        let partial = error.partial.as_ref().map(|p| self.traverse(p, ()));
        self.builder.error(error.message.clone(), partial)
    }
}

/// Deep copy of `node`.
pub fn copy(node: &NodeRef) -> Root {
    Copier::new(Builder::new()).copy(node)
}
