//! Partial evaluation.
//!
//! Replaces placeholders that have a number in the environment, then folds every
//! unary or binary call whose operands have become literals. Everything else is
//! kept symbolic, and function calls are copied untouched.
//!
//! ```
//! use fern_lang::builder::Builder;
//! use fern_lang::environment::Environment;
//! use fern_lang::operators::OperatorRegistry;
//! use fern_lang::partial::PartialEval;
//! use fern_lang::print::print;
//!
//! let builder = Builder::new();
//! let tree = builder.binary(
//!     "*",
//!     builder.binary("-", builder.placeholder("a"), builder.value(1.0)),
//!     builder.placeholder("b"),
//! );
//!
//! let env: Environment = [("a".to_string(), 3.0)].into_iter().collect();
//! let registry = OperatorRegistry::standard();
//! let folded = PartialEval::new(&registry, &env).eval(tree.node());
//! assert_eq!(print(folded.node()), "(2.0 * b)");
//! ```

use crate::ast::{
    Arrow, BinaryCall, Borrow, BuiltinType, ErrorNode, Function, FunctionCall, Match, NodeKind,
    NodeRef, Placeholder, Record, UnaryCall, UnknownType, Value,
};
use crate::builder::Builder;
use crate::copy::Copier;
use crate::environment::Environment;
use crate::error::Either;
use crate::operators::OperatorRegistry;
use crate::root::Root;
use crate::visitor::Visitor;

pub struct PartialEval<'a> {
    builder: Builder,
    registry: &'a OperatorRegistry,
    env: &'a Environment,
    /// Parameter names of the definitions being walked; they hide outer bindings.
    shadowed: Vec<String>,
}

impl<'a> PartialEval<'a> {
    pub fn new(registry: &'a OperatorRegistry, env: &'a Environment) -> Self {
        PartialEval {
            builder: Builder::new(),
            registry,
            env,
            shadowed: Vec::new(),
        }
    }

    pub fn eval(&mut self, node: &NodeRef) -> Root {
        self.traverse(node, ())
    }

    fn copy(&self, node: &NodeRef) -> Root {
        Copier::new(self.builder.clone()).copy(node)
    }

    fn literal(root: &Root) -> Option<f64> {
        root.node().as_value().and_then(Value::numeric)
    }

    fn lookup(&self, name: &str) -> Option<f64> {
        if self.shadowed.iter().any(|s| s == name) {
            return None;
        }
        self.env.number(name)
    }

    fn definition(&mut self, function: &Function) -> (Option<Root>, Root) {
        let depth = self.shadowed.len();
        self.shadowed.extend(function.params.iter().cloned());

        let signature = function.signature.as_ref().map(|s| self.copy(s));
        let body = self.traverse(&function.body, ());

        self.shadowed.truncate(depth);
        (signature, body)
    }
}

impl Visitor for PartialEval<'_> {
    type Output = Root;
    type Args = ();

    fn unhandled(&mut self, node: &NodeRef, _: ()) -> Root {
        self.copy(node)
    }

    fn visit_borrow(&mut self, node: &NodeRef, borrow: &Borrow, _: ()) -> Root {
        match borrow.get() {
            Some(target) => self.traverse(&target, ()),
            None => self.copy(node),
        }
    }

    fn visit_value(&mut self, _node: &NodeRef, value: &Value, _: ()) -> Root {
        self.builder.value(value.clone())
    }

    fn visit_placeholder(&mut self, node: &NodeRef, p: &Placeholder, _: ()) -> Root {
        match self.lookup(&p.name) {
            Some(x) => self.builder.value(x),
            None => self.copy(node),
        }
    }

    fn visit_unary_call(&mut self, _node: &NodeRef, call: &UnaryCall, _: ()) -> Root {
        let arg = self.traverse(&call.arg, ());

        let registry = self.registry;
        let op = call
            .fun
            .as_placeholder()
            .and_then(|p| registry.lookup(&p.name).ok());
        if let (Some(Either::Left(f)), Some(x)) = (op, Self::literal(&arg)) {
            return self.builder.value(f(x));
        }

        let fun = self.copy(&call.fun);
        self.builder.unary_call(fun, arg)
    }

    fn visit_binary_call(&mut self, _node: &NodeRef, call: &BinaryCall, _: ()) -> Root {
        let lhs = self.traverse(&call.lhs, ());
        let rhs = self.traverse(&call.rhs, ());

        let registry = self.registry;
        let op = call
            .fun
            .as_placeholder()
            .and_then(|p| registry.lookup(&p.name).ok());
        if let (Some(Either::Right(f)), Some(a), Some(b)) =
            (op, Self::literal(&lhs), Self::literal(&rhs))
        {
            return self.builder.value(f(a, b));
        }

        let fun = self.copy(&call.fun);
        self.builder.binary_call(fun, lhs, rhs)
    }

    fn visit_function_call(&mut self, node: &NodeRef, _call: &FunctionCall, _: ()) -> Root {
        self.copy(node)
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

    fn visit_function(&mut self, node: &NodeRef, function: &Function, _: ()) -> Root {
        let (signature, body) = self.definition(function);
        let params = function.params.clone();
        match node.kind() {
            NodeKind::MacroDef(_) => {
                self.builder
                    .macro_def(function.name.clone(), params, signature, body)
            }
            _ => self
                .builder
                .function(function.name.clone(), params, signature, body),
        }
    }

    fn visit_macro(&mut self, node: &NodeRef, function: &Function, args: ()) -> Root {
        self.visit_function(node, function, args)
    }

    // records and types hold no expressions
    fn visit_struct(&mut self, node: &NodeRef, _record: &Record, _: ()) -> Root {
        self.copy(node)
    }

    fn visit_union(&mut self, node: &NodeRef, _record: &Record, _: ()) -> Root {
        self.copy(node)
    }

    fn visit_builtin(&mut self, node: &NodeRef, _ty: &BuiltinType, _: ()) -> Root {
        self.copy(node)
    }

    fn visit_arrow(&mut self, node: &NodeRef, _arrow: &Arrow, _: ()) -> Root {
        self.copy(node)
    }

    fn visit_unknown(&mut self, node: &NodeRef, _ty: &UnknownType, _: ()) -> Root {
        self.copy(node)
    }

    fn visit_error(&mut self, node: &NodeRef, _error: &ErrorNode, _: ()) -> Root {
        self.copy(node)
    }
}
