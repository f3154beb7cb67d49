//! Render trees back to source form.
//!
//! Calls are always parenthesized so the printed text parses back to the same
//! tree. Definitions put their body on the next line, indented four spaces per
//! depth level.

use crate::ast::{
    Arrow, BinaryCall, Borrow, BuiltinType, ErrorNode, Function, FunctionCall, Match, NodeKind,
    NodeRef, Placeholder, Record, UnaryCall, UnknownType, Value,
};
use crate::visitor::Visitor;

const INDENT: &str = "    ";

#[derive(Debug, Default)]
pub struct Printer;

impl Printer {
    pub fn new() -> Self {
        Printer
    }

    pub fn print(&mut self, node: &NodeRef) -> String {
        self.traverse(node, 0)
    }

    fn indent(depth: usize) -> String {
        INDENT.repeat(depth)
    }

    fn is_symbolic(name: &str) -> bool {
        !name.starts_with(|c: char| c.is_alphabetic())
    }

    /// Parameter list, with declared types taken from the signature when known.
    fn params(&mut self, function: &Function) -> String {
        let arg_types = match function.signature.as_ref().map(|s| s.kind()) {
            Some(NodeKind::FunctionType(arrow)) => arrow.args.as_slice(),
            _ => &[],
        };

        function
            .params
            .iter()
            .enumerate()
            .map(|(i, name)| match arg_types.get(i) {
                Some(ty) if !is_unresolved(ty) => format!("{name}: {}", self.traverse(ty, 0)),
                _ => name.clone(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn return_type(&mut self, function: &Function) -> String {
        match function.signature.as_ref().map(|s| s.kind()) {
            Some(NodeKind::FunctionType(arrow)) if !is_unresolved(&arrow.ret) => {
                format!(" -> {}", self.traverse(&arrow.ret, 0))
            }
            _ => String::new(),
        }
    }

    fn definition(&mut self, keyword: &str, function: &Function, depth: usize) -> String {
        let params = self.params(function);
        let ret = self.return_type(function);
        let body = self.traverse(&function.body, depth + 1);
        format!(
            "{keyword} {}({params}){ret}:\n{}{body}",
            function.name,
            Self::indent(depth + 1)
        )
    }

    fn record(&mut self, keyword: &str, record: &Record, depth: usize) -> String {
        let mut out = format!("{keyword} {}", record.name);

        if !record.meta_types.is_empty() {
            let meta = record
                .meta_types
                .iter()
                .map(|(name, ty)| format!("{name}: {}", self.traverse(ty, 0)))
                .collect::<Vec<_>>()
                .join(", ");
            out.push_str(&format!("({meta})"));
        }
        out.push(':');

        for (name, ty) in &record.attributes {
            let ty = self.traverse(ty, depth + 1);
            out.push_str(&format!("\n{}{name}: {ty}", Self::indent(depth + 1)));
        }
        out
    }
}

fn is_unresolved(ty: &NodeRef) -> bool {
    matches!(ty.kind(), NodeKind::UnknownType(u) if u.resolved().is_none())
}

impl Visitor for Printer {
    type Output = String;
    type Args = usize;

    fn unhandled(&mut self, node: &NodeRef, _depth: usize) -> String {
        format!("<{}>", node.tag())
    }

    fn visit_borrow(&mut self, _node: &NodeRef, borrow: &Borrow, depth: usize) -> String {
        match borrow.get() {
            Some(target) => self.traverse(&target, depth),
            None => "<dangling>".to_string(),
        }
    }

    fn visit_value(&mut self, _node: &NodeRef, value: &Value, _depth: usize) -> String {
        value.to_string()
    }

    fn visit_placeholder(&mut self, _node: &NodeRef, p: &Placeholder, _depth: usize) -> String {
        p.name.clone()
    }

    fn visit_unary_call(&mut self, _node: &NodeRef, call: &UnaryCall, depth: usize) -> String {
        let fun = self.traverse(&call.fun, depth);
        let arg = self.traverse(&call.arg, depth);
        format!("({fun} {arg})")
    }

    fn visit_binary_call(&mut self, _node: &NodeRef, call: &BinaryCall, depth: usize) -> String {
        let fun = self.traverse(&call.fun, depth);
        let lhs = self.traverse(&call.lhs, depth);
        let rhs = self.traverse(&call.rhs, depth);

        // named binary operators are written prefix, the way they are parsed
        if Self::is_symbolic(&fun) {
            format!("({lhs} {fun} {rhs})")
        } else {
            format!("({fun} {lhs} {rhs})")
        }
    }

    fn visit_function_call(
        &mut self,
        _node: &NodeRef,
        call: &FunctionCall,
        depth: usize,
    ) -> String {
        let fun = self.traverse(&call.fun, depth);
        let args = call
            .args
            .iter()
            .map(|arg| self.traverse(arg, depth))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{fun}({args})")
    }

    fn visit_match(&mut self, _node: &NodeRef, m: &Match, depth: usize) -> String {
        let mut out = format!("match {}:", self.traverse(&m.target, depth));
        let indent = Self::indent(depth + 1);

        for (pattern, branch) in &m.branches {
            let pattern = self.traverse(pattern, depth + 1);
            let branch = self.traverse(branch, depth + 1);
            out.push_str(&format!("\n{indent}{pattern} => {branch}"));
        }
        if let Some(default) = &m.default {
            let default = self.traverse(default, depth + 1);
            out.push_str(&format!("\n{indent}_ => {default}"));
        }
        out
    }

    fn visit_function(&mut self, _node: &NodeRef, function: &Function, depth: usize) -> String {
        self.definition("def", function, depth)
    }

    fn visit_macro(&mut self, _node: &NodeRef, function: &Function, depth: usize) -> String {
        self.definition("macro", function, depth)
    }

    fn visit_struct(&mut self, _node: &NodeRef, record: &Record, depth: usize) -> String {
        self.record("struct", record, depth)
    }

    fn visit_union(&mut self, _node: &NodeRef, record: &Record, depth: usize) -> String {
        self.record("union", record, depth)
    }

    fn visit_builtin(&mut self, _node: &NodeRef, ty: &BuiltinType, _depth: usize) -> String {
        ty.name.clone()
    }

    fn visit_arrow(&mut self, _node: &NodeRef, arrow: &Arrow, depth: usize) -> String {
        let args = arrow
            .args
            .iter()
            .map(|arg| self.traverse(arg, depth))
            .collect::<Vec<_>>()
            .join(", ");
        let ret = self.traverse(&arrow.ret, depth);
        format!("({args}) -> {ret}")
    }

    fn visit_unknown(&mut self, _node: &NodeRef, ty: &UnknownType, depth: usize) -> String {
        match ty.resolved() {
            Some(resolved) => self.traverse(resolved, depth),
            None => "?".to_string(),
        }
    }

    fn visit_error(&mut self, _node: &NodeRef, error: &ErrorNode, _depth: usize) -> String {
        format!("<error: {}>", error.message)
    }
}

/// Print `node` at depth 0.
pub fn print(node: &NodeRef) -> String {
    Printer::new().print(node)
}
