use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::ast::definitions::{Function, Record};
use crate::ast::expressions::{BinaryCall, Borrow, FunctionCall, Match, Placeholder, UnaryCall};
use crate::ast::tag::NodeTag;
use crate::ast::types::{Arrow, BuiltinType, ErrorNode, UnknownType};
use crate::ast::value::Value;

/// Shared handle to a tree node. Identity is `Rc::ptr_eq`.
pub type NodeRef = Rc<Node>;

/// One element of the tree.
///
/// A node owns its children through strong references. The parent link is weak
/// and is only there for navigation; nothing that releases nodes ever follows it.
#[derive(Debug)]
pub struct Node {
    kind: NodeKind,
    parent: RefCell<Weak<Node>>,
}

/// The closed set of node variants.
#[derive(Debug)]
pub enum NodeKind {
    Borrow(Borrow),

    // Expressions
    Value(Value),
    Placeholder(Placeholder),
    UnaryCall(UnaryCall),
    BinaryCall(BinaryCall),
    FunctionCall(FunctionCall),
    Match(Match),

    // Definitions
    FunctionDef(Function),
    MacroDef(Function),
    StructDef(Record),
    UnionDef(Record),

    // Types
    BuiltinType(BuiltinType),
    FunctionType(Arrow),
    UnknownType(UnknownType),
    ErrorType(ErrorNode),
}

impl NodeKind {
    pub fn tag(&self) -> NodeTag {
        match self {
            NodeKind::Borrow(_) => NodeTag::Borrow,
            NodeKind::Value(_) => NodeTag::Value,
            NodeKind::Placeholder(_) => NodeTag::Placeholder,
            NodeKind::UnaryCall(_) => NodeTag::UnaryCall,
            NodeKind::BinaryCall(_) => NodeTag::BinaryCall,
            NodeKind::FunctionCall(_) => NodeTag::FunctionCall,
            NodeKind::Match(_) => NodeTag::Match,
            NodeKind::FunctionDef(_) => NodeTag::FunctionDef,
            NodeKind::MacroDef(_) => NodeTag::MacroDef,
            NodeKind::StructDef(_) => NodeTag::StructDef,
            NodeKind::UnionDef(_) => NodeTag::UnionDef,
            NodeKind::BuiltinType(_) => NodeTag::BuiltinType,
            NodeKind::FunctionType(_) => NodeTag::FunctionType,
            NodeKind::UnknownType(_) => NodeTag::UnknownType,
            NodeKind::ErrorType(_) => NodeTag::ErrorType,
        }
    }
}

impl Node {
    pub(crate) fn new(kind: NodeKind) -> NodeRef {
        Rc::new(Node {
            kind,
            parent: RefCell::new(Weak::new()),
        })
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn tag(&self) -> NodeTag {
        self.kind.tag()
    }

    /// The tag of the node this one stands for.
    ///
    /// A borrow resolves to its target's tag. A borrow whose target is gone
    /// resolves to [`NodeTag::Borrow`].
    pub fn resolve_tag(&self) -> NodeTag {
        match &self.kind {
            NodeKind::Borrow(borrow) => match borrow.get() {
                Some(target) => target.resolve_tag(),
                None => NodeTag::Borrow,
            },
            kind => kind.tag(),
        }
    }

    pub fn is_def(&self) -> bool {
        self.resolve_tag().is_def()
    }

    pub fn is_type(&self) -> bool {
        self.resolve_tag().is_type()
    }

    pub fn is_expr(&self) -> bool {
        self.resolve_tag().is_expr()
    }

    pub fn parent(&self) -> Option<NodeRef> {
        self.parent.borrow().upgrade()
    }

    pub(crate) fn set_parent(&self, parent: &NodeRef) {
        *self.parent.borrow_mut() = Rc::downgrade(parent);
    }

    pub(crate) fn unlink(&self) {
        *self.parent.borrow_mut() = Weak::new();
    }

    /// Children this node owns, in source order.
    ///
    /// Borrow targets are not owned and are never listed.
    pub fn children(&self) -> Vec<&NodeRef> {
        match &self.kind {
            NodeKind::Borrow(_) | NodeKind::Value(_) | NodeKind::BuiltinType(_) => Vec::new(),
            NodeKind::Placeholder(p) => p.ty.iter().collect(),
            NodeKind::UnaryCall(call) => vec![&call.fun, &call.arg],
            NodeKind::BinaryCall(call) => vec![&call.fun, &call.lhs, &call.rhs],
            NodeKind::FunctionCall(call) => {
                let mut out = vec![&call.fun];
                out.extend(call.args.iter());
                out
            }
            NodeKind::Match(m) => {
                let mut out = vec![&m.target];
                for (pattern, branch) in &m.branches {
                    out.push(pattern);
                    out.push(branch);
                }
                out.extend(m.default.iter());
                out
            }
            NodeKind::FunctionDef(f) | NodeKind::MacroDef(f) => {
                let mut out: Vec<&NodeRef> = f.signature.iter().collect();
                out.push(&f.body);
                out
            }
            NodeKind::StructDef(r) | NodeKind::UnionDef(r) => r
                .meta_types
                .iter()
                .chain(r.attributes.iter())
                .map(|(_, ty)| ty)
                .collect(),
            NodeKind::FunctionType(arrow) => {
                let mut out: Vec<&NodeRef> = arrow.args.iter().collect();
                out.push(&arrow.ret);
                out
            }
            NodeKind::UnknownType(unknown) => unknown.resolved().into_iter().collect(),
            NodeKind::ErrorType(err) => err.partial.iter().collect(),
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match &self.kind {
            NodeKind::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_placeholder(&self) -> Option<&Placeholder> {
        match &self.kind {
            NodeKind::Placeholder(p) => Some(p),
            _ => None,
        }
    }

    /// The function of a function or macro definition.
    pub fn as_function(&self) -> Option<&Function> {
        match &self.kind {
            NodeKind::FunctionDef(f) | NodeKind::MacroDef(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match &self.kind {
            NodeKind::StructDef(r) | NodeKind::UnionDef(r) => Some(r),
            _ => None,
        }
    }

    /// Name of the operator or callee of a call node, when it is a plain name.
    pub fn callee_name(&self) -> Option<&str> {
        let fun = match &self.kind {
            NodeKind::UnaryCall(call) => &call.fun,
            NodeKind::BinaryCall(call) => &call.fun,
            NodeKind::FunctionCall(call) => &call.fun,
            _ => return None,
        };
        fun.as_placeholder().map(|p| p.name.as_str())
    }

    /// Declared name of a definition.
    pub fn definition_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::FunctionDef(f) | NodeKind::MacroDef(f) => Some(&f.name),
            NodeKind::StructDef(r) | NodeKind::UnionDef(r) => Some(&r.name),
            _ => None,
        }
    }

    /// Structural equality: same variants, same names and payloads, same shape.
    ///
    /// Borrows compare equal when they point at the same node.
    pub fn structurally_eq(&self, other: &Node) -> bool {
        fn all(a: &[NodeRef], b: &[NodeRef]) -> bool {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.structurally_eq(y))
        }

        fn opt(a: Option<&NodeRef>, b: Option<&NodeRef>) -> bool {
            match (a, b) {
                (Some(x), Some(y)) => x.structurally_eq(y),
                (None, None) => true,
                _ => false,
            }
        }

        fn pairs(a: &[(String, NodeRef)], b: &[(String, NodeRef)]) -> bool {
            a.len() == b.len()
                && a.iter()
                    .zip(b)
                    .all(|((n1, t1), (n2, t2))| n1 == n2 && t1.structurally_eq(t2))
        }

        match (&self.kind, &other.kind) {
            (NodeKind::Borrow(a), NodeKind::Borrow(b)) => a.target.ptr_eq(&b.target),
            (NodeKind::Value(a), NodeKind::Value(b)) => a == b,
            (NodeKind::Placeholder(a), NodeKind::Placeholder(b)) => {
                a.name == b.name && opt(a.ty.as_ref(), b.ty.as_ref())
            }
            (NodeKind::UnaryCall(a), NodeKind::UnaryCall(b)) => {
                a.fun.structurally_eq(&b.fun) && a.arg.structurally_eq(&b.arg)
            }
            (NodeKind::BinaryCall(a), NodeKind::BinaryCall(b)) => {
                a.fun.structurally_eq(&b.fun)
                    && a.lhs.structurally_eq(&b.lhs)
                    && a.rhs.structurally_eq(&b.rhs)
            }
            (NodeKind::FunctionCall(a), NodeKind::FunctionCall(b)) => {
                a.fun.structurally_eq(&b.fun) && all(&a.args, &b.args)
            }
            (NodeKind::Match(a), NodeKind::Match(b)) => {
                a.target.structurally_eq(&b.target)
                    && a.branches.len() == b.branches.len()
                    && a.branches.iter().zip(&b.branches).all(|((p1, e1), (p2, e2))| {
                        p1.structurally_eq(p2) && e1.structurally_eq(e2)
                    })
                    && opt(a.default.as_ref(), b.default.as_ref())
            }
            (NodeKind::FunctionDef(a), NodeKind::FunctionDef(b))
            | (NodeKind::MacroDef(a), NodeKind::MacroDef(b)) => {
                a.name == b.name
                    && a.params == b.params
                    && opt(a.signature.as_ref(), b.signature.as_ref())
                    && a.body.structurally_eq(&b.body)
            }
            (NodeKind::StructDef(a), NodeKind::StructDef(b))
            | (NodeKind::UnionDef(a), NodeKind::UnionDef(b)) => {
                a.name == b.name
                    && pairs(&a.meta_types, &b.meta_types)
                    && pairs(&a.attributes, &b.attributes)
            }
            (NodeKind::BuiltinType(a), NodeKind::BuiltinType(b)) => a.name == b.name,
            (NodeKind::FunctionType(a), NodeKind::FunctionType(b)) => {
                all(&a.args, &b.args) && a.ret.structurally_eq(&b.ret)
            }
            (NodeKind::UnknownType(a), NodeKind::UnknownType(b)) => {
                opt(a.resolved(), b.resolved())
            }
            (NodeKind::ErrorType(a), NodeKind::ErrorType(b)) => {
                a.message == b.message && opt(a.partial.as_ref(), b.partial.as_ref())
            }
            _ => false,
        }
    }
}
