//! Node factories.
//!
//! The builder is the only way to create nodes. Each factory takes its children as
//! [`Root`] handles, claims them with [`Root::take_ownership`], links them to the
//! new parent and returns the new node in a fresh [`Root`].
//!
//! Additions are folded while they are built:
//!
//! ```
//! use fern_lang::builder::Builder;
//! use fern_lang::ast::{NodeTag, Value};
//!
//! let builder = Builder::new();
//! let sum = builder.add(builder.value(Value::I64(2)), builder.value(Value::I64(3)));
//! assert_eq!(sum.node().tag(), NodeTag::Value);
//! assert_eq!(sum.node().as_value(), Some(&Value::I64(5)));
//! ```

use std::rc::Rc;

use crate::ast::{
    Arrow, BinaryCall, Borrow, BuiltinType, ErrorNode, Function, FunctionCall, Match, Node,
    NodeKind, NodeRef, Placeholder, Record, UnaryCall, UnknownType, Value,
};
use crate::root::Root;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuilderOptions {
    /// Point every new child back at its parent.
    pub link_parents: bool,
    /// Magnitude under which a literal counts as zero when folding.
    pub zero_epsilon: f64,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        BuilderOptions {
            link_parents: true,
            zero_epsilon: 1e-12,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Builder {
    options: BuilderOptions,
}

fn take_all(roots: Vec<Root>) -> Vec<NodeRef> {
    roots.iter().map(Root::take_ownership).collect()
}

fn take_pairs(pairs: Vec<(String, Root)>) -> Vec<(String, NodeRef)> {
    pairs
        .into_iter()
        .map(|(name, root)| (name, root.take_ownership()))
        .collect()
}

impl Builder {
    pub fn new() -> Self {
        Builder::default()
    }

    pub fn with_options(options: BuilderOptions) -> Self {
        Builder { options }
    }

    pub fn options(&self) -> &BuilderOptions {
        &self.options
    }

    fn make(&self, kind: NodeKind) -> Root {
        let node = Node::new(kind);
        if self.options.link_parents {
            for child in node.children() {
                child.set_parent(&node);
            }
        }
        Root::new(node)
    }

    fn is_zero(&self, root: &Root) -> bool {
        root.node()
            .as_value()
            .and_then(Value::numeric)
            .is_some_and(|x| x.abs() <= self.options.zero_epsilon)
    }

    pub fn value(&self, value: impl Into<Value>) -> Root {
        self.make(NodeKind::Value(value.into()))
    }

    pub fn placeholder(&self, name: impl Into<String>) -> Root {
        self.make(NodeKind::Placeholder(Placeholder {
            name: name.into(),
            ty: None,
        }))
    }

    pub fn typed_placeholder(&self, name: impl Into<String>, ty: Root) -> Root {
        self.make(NodeKind::Placeholder(Placeholder {
            name: name.into(),
            ty: Some(ty.take_ownership()),
        }))
    }

    /// `lhs + rhs`, folded.
    ///
    /// A literal zero on either side yields the other operand itself, and two
    /// literals yield their sum.
    pub fn add(&self, lhs: Root, rhs: Root) -> Root {
        if self.is_zero(&lhs) {
            return rhs;
        }
        if self.is_zero(&rhs) {
            return lhs;
        }

        if let (Some(a), Some(b)) = (lhs.node().as_value(), rhs.node().as_value()) {
            if let Some(sum) = a.add(b) {
                return self.value(sum);
            }
        }

        let fun = self.placeholder("+");
        self.binary_call_unfolded(fun, lhs, rhs)
    }

    pub fn unary_call(&self, fun: Root, arg: Root) -> Root {
        self.make(NodeKind::UnaryCall(UnaryCall {
            fun: fun.take_ownership(),
            arg: arg.take_ownership(),
        }))
    }

    /// Binary application. A `+` callee goes through [`Builder::add`].
    pub fn binary_call(&self, fun: Root, lhs: Root, rhs: Root) -> Root {
        let is_add = fun.node().as_placeholder().is_some_and(|p| p.name == "+");
        if is_add {
            return self.add(lhs, rhs);
        }
        self.binary_call_unfolded(fun, lhs, rhs)
    }

    fn binary_call_unfolded(&self, fun: Root, lhs: Root, rhs: Root) -> Root {
        self.make(NodeKind::BinaryCall(BinaryCall {
            fun: fun.take_ownership(),
            lhs: lhs.take_ownership(),
            rhs: rhs.take_ownership(),
        }))
    }

    /// Unary application of a named operator.
    pub fn unary(&self, op: &str, arg: Root) -> Root {
        self.unary_call(self.placeholder(op), arg)
    }

    /// Binary application of a named operator.
    pub fn binary(&self, op: &str, lhs: Root, rhs: Root) -> Root {
        self.binary_call(self.placeholder(op), lhs, rhs)
    }

    pub fn function_call(&self, fun: Root, args: Vec<Root>) -> Root {
        self.make(NodeKind::FunctionCall(FunctionCall {
            fun: fun.take_ownership(),
            args: take_all(args),
        }))
    }

    /// Call of a function by name.
    pub fn call(&self, name: &str, args: Vec<Root>) -> Root {
        self.function_call(self.placeholder(name), args)
    }

    pub fn match_expr(
        &self,
        target: Root,
        branches: Vec<(Root, Root)>,
        default: Option<Root>,
    ) -> Root {
        self.make(NodeKind::Match(Match {
            target: target.take_ownership(),
            branches: branches
                .into_iter()
                .map(|(pattern, branch)| (pattern.take_ownership(), branch.take_ownership()))
                .collect(),
            default: default.map(|d| d.take_ownership()),
        }))
    }

    fn function_parts(
        name: impl Into<String>,
        params: Vec<String>,
        signature: Option<Root>,
        body: Root,
    ) -> Function {
        Function {
            name: name.into(),
            params,
            signature: signature.map(|s| s.take_ownership()),
            body: body.take_ownership(),
        }
    }

    pub fn function(
        &self,
        name: impl Into<String>,
        params: Vec<String>,
        signature: Option<Root>,
        body: Root,
    ) -> Root {
        self.make(NodeKind::FunctionDef(Self::function_parts(
            name, params, signature, body,
        )))
    }

    pub fn macro_def(
        &self,
        name: impl Into<String>,
        params: Vec<String>,
        signature: Option<Root>,
        body: Root,
    ) -> Root {
        self.make(NodeKind::MacroDef(Self::function_parts(
            name, params, signature, body,
        )))
    }

    pub fn struct_def(
        &self,
        name: impl Into<String>,
        meta_types: Vec<(String, Root)>,
        attributes: Vec<(String, Root)>,
    ) -> Root {
        self.make(NodeKind::StructDef(Record {
            name: name.into(),
            meta_types: take_pairs(meta_types),
            attributes: take_pairs(attributes),
        }))
    }

    pub fn union_def(
        &self,
        name: impl Into<String>,
        meta_types: Vec<(String, Root)>,
        attributes: Vec<(String, Root)>,
    ) -> Root {
        self.make(NodeKind::UnionDef(Record {
            name: name.into(),
            meta_types: take_pairs(meta_types),
            attributes: take_pairs(attributes),
        }))
    }

    pub fn arrow(&self, args: Vec<Root>, ret: Root) -> Root {
        self.make(NodeKind::FunctionType(Arrow {
            args: take_all(args),
            ret: ret.take_ownership(),
        }))
    }

    pub fn builtin(&self, name: impl Into<String>) -> Root {
        self.make(NodeKind::BuiltinType(BuiltinType { name: name.into() }))
    }

    pub fn unknown(&self) -> Root {
        self.make(NodeKind::UnknownType(UnknownType::default()))
    }

    /// Resolve an unknown type node. Hands `ty` back if `unknown` is not an
    /// unresolved unknown type.
    pub fn resolve(&self, unknown: &NodeRef, ty: Root) -> Result<(), Root> {
        let NodeKind::UnknownType(slot) = unknown.kind() else {
            return Err(ty);
        };
        if slot.resolved().is_some() {
            return Err(ty);
        }

        let node = ty.take_ownership();
        if self.options.link_parents {
            node.set_parent(unknown);
        }
        slot.resolve(node).map_err(Root::new)
    }

    pub fn error(&self, message: impl Into<String>, partial: Option<Root>) -> Root {
        self.make(NodeKind::ErrorType(ErrorNode {
            message: message.into(),
            partial: partial.map(|p| p.take_ownership()),
        }))
    }

    /// Non-owning reference to `target`.
    pub fn borrow(&self, target: &NodeRef) -> Root {
        self.make(NodeKind::Borrow(Borrow {
            target: Rc::downgrade(target),
        }))
    }
}
