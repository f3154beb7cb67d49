//! Full evaluation of expression trees to numbers.
//!
//! Function calls are call-by-name: parameters are bound to the unevaluated
//! argument expressions, and each use of a parameter in the body evaluates its
//! argument again in the caller's scope.
//!
//! ```
//! use fern_lang::builder::Builder;
//! use fern_lang::environment::Environment;
//! use fern_lang::evaluator::full_eval;
//!
//! let builder = Builder::new();
//! let tree = builder.binary("*", builder.placeholder("x"), builder.value(2.0));
//!
//! let env: Environment = [("x".to_string(), 21.0)].into_iter().collect();
//! assert_eq!(full_eval(env, tree.node()), Ok(42.0));
//! ```

use std::rc::Rc;

use thiserror::Error;

use crate::ast::{
    BinaryCall, Borrow, BuiltinKind, ErrorNode, FunctionCall, Match, NodeKind, NodeRef, NodeTag,
    Placeholder, UnaryCall, Value, ValueError,
};
use crate::builder::BuilderOptions;
use crate::environment::{Binding, Environment};
use crate::error::{EitherError, EmptyOption};
use crate::operators::OperatorRegistry;
use crate::visitor::Visitor;

/// Errors that can occur during evaluation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Placeholder with no binding
    #[error("`{0}` is not defined")]
    UndefinedName(String),

    /// Call of something that is not a function definition
    #[error("`{0}` is not a function")]
    NotAFunction(String),

    /// A function name used where a number is expected
    #[error("`{0}` is a definition, not a value")]
    NotAValue(String),

    #[error("`{name}` takes {expected} argument(s), {found} given")]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error(transparent)]
    WrongValueKind(#[from] ValueError),

    /// Operator missing from the registry
    #[error("unknown operator: {0}")]
    UnknownOperator(#[from] EmptyOption),

    /// Unary operator applied to two operands, or the reverse
    #[error("operator used with the wrong number of operands: {0}")]
    OperatorArity(#[from] EitherError),

    #[error("borrowed node no longer exists")]
    DanglingBorrow,

    #[error("cannot evaluate a `{0}` node")]
    Unsupported(NodeTag),

    /// The parser left an error node here
    #[error("error node: {0}")]
    ErrorNode(String),

    #[error("no branch matches {0}")]
    NoMatchingBranch(f64),
}

/// Evaluation visitor. Its argument is the scope to evaluate in.
pub struct FullEval<'a> {
    registry: &'a OperatorRegistry,
    epsilon: f64,
}

impl<'a> FullEval<'a> {
    pub fn new(registry: &'a OperatorRegistry) -> Self {
        FullEval {
            registry,
            epsilon: BuilderOptions::default().zero_epsilon,
        }
    }

    pub fn eval(&mut self, node: &NodeRef, env: Rc<Environment>) -> Result<f64, EvalError> {
        self.traverse(node, env)
    }

    fn operator_name(fun: &NodeRef) -> Result<&str, EvalError> {
        fun.as_placeholder()
            .map(|p| p.name.as_str())
            .ok_or(EvalError::Unsupported(fun.tag()))
    }
}

impl Visitor for FullEval<'_> {
    type Output = Result<f64, EvalError>;
    type Args = Rc<Environment>;

    fn unhandled(&mut self, node: &NodeRef, _env: Rc<Environment>) -> Self::Output {
        Err(EvalError::Unsupported(node.tag()))
    }

    fn visit_borrow(
        &mut self,
        _node: &NodeRef,
        borrow: &Borrow,
        env: Rc<Environment>,
    ) -> Self::Output {
        let target = borrow.get().ok_or(EvalError::DanglingBorrow)?;
        self.traverse(&target, env)
    }

    fn visit_value(
        &mut self,
        _node: &NodeRef,
        value: &Value,
        _env: Rc<Environment>,
    ) -> Self::Output {
        value.numeric().ok_or_else(|| {
            EvalError::WrongValueKind(ValueError::WrongKind {
                expected: BuiltinKind::F64,
                found: value.kind(),
            })
        })
    }

    fn visit_placeholder(
        &mut self,
        _node: &NodeRef,
        placeholder: &Placeholder,
        env: Rc<Environment>,
    ) -> Self::Output {
        let name = &placeholder.name;
        match env.lookup(name) {
            Some(Binding::Number(x)) => Ok(*x),
            Some(Binding::Thunk { expr, env: scope }) => {
                let (expr, scope) = (NodeRef::clone(expr), Rc::clone(scope));
                self.traverse(&expr, scope)
            }
            Some(Binding::Definition(_)) => Err(EvalError::NotAValue(name.clone())),
            None => Err(EvalError::UndefinedName(name.clone())),
        }
    }

    fn visit_unary_call(
        &mut self,
        _node: &NodeRef,
        call: &UnaryCall,
        env: Rc<Environment>,
    ) -> Self::Output {
        let registry = self.registry;
        let op = registry.lookup(Self::operator_name(&call.fun)?)?.left()?;
        let arg = self.traverse(&call.arg, env)?;
        Ok(op(arg))
    }

    fn visit_binary_call(
        &mut self,
        _node: &NodeRef,
        call: &BinaryCall,
        env: Rc<Environment>,
    ) -> Self::Output {
        let registry = self.registry;
        let op = registry.lookup(Self::operator_name(&call.fun)?)?.right()?;
        let lhs = self.traverse(&call.lhs, Rc::clone(&env))?;
        let rhs = self.traverse(&call.rhs, env)?;
        Ok(op(lhs, rhs))
    }

    fn visit_function_call(
        &mut self,
        _node: &NodeRef,
        call: &FunctionCall,
        env: Rc<Environment>,
    ) -> Self::Output {
        let name = Self::operator_name(&call.fun)?;

        let definition = match env.lookup(name) {
            Some(Binding::Definition(node)) => NodeRef::clone(node),
            Some(_) => return Err(EvalError::NotAFunction(name.to_string())),
            None => return Err(EvalError::UndefinedName(name.to_string())),
        };
        let NodeKind::FunctionDef(function) = definition.kind() else {
            return Err(EvalError::NotAFunction(name.to_string()));
        };

        if function.arity() != call.args.len() {
            return Err(EvalError::ArityMismatch {
                name: name.to_string(),
                expected: function.arity(),
                found: call.args.len(),
            });
        }

        let mut scope = Environment::with_parent(env.global());
        for (param, arg) in function.params.iter().zip(&call.args) {
            scope.bind(
                param.as_str(),
                Binding::Thunk {
                    expr: NodeRef::clone(arg),
                    env: Rc::clone(&env),
                },
            );
        }

        log::trace!("calling `{}` with {} argument(s)", name, call.args.len());
        self.traverse(&function.body, Rc::new(scope))
    }

    fn visit_match(&mut self, _node: &NodeRef, m: &Match, env: Rc<Environment>) -> Self::Output {
        let target = self.traverse(&m.target, Rc::clone(&env))?;

        for (pattern, branch) in &m.branches {
            let pattern = self.traverse(pattern, Rc::clone(&env))?;
            if (target - pattern).abs() <= self.epsilon {
                return self.traverse(branch, env);
            }
        }

        match &m.default {
            Some(default) => self.traverse(default, env),
            None => Err(EvalError::NoMatchingBranch(target)),
        }
    }

    fn visit_error(
        &mut self,
        _node: &NodeRef,
        error: &ErrorNode,
        _env: Rc<Environment>,
    ) -> Self::Output {
        Err(EvalError::ErrorNode(error.message.clone()))
    }
}

/// Evaluate `node` in `env` with the standard operator table.
pub fn full_eval(env: Environment, node: &NodeRef) -> Result<f64, EvalError> {
    let registry = OperatorRegistry::standard();
    FullEval::new(&registry).eval(node, Rc::new(env))
}
