//! JSON export of trees.
//!
//! Every node becomes an object with a `"tag"` field naming its variant, plus one
//! field per payload item. Children are nested objects, lists stay in source
//! order.
//!
//! # Examples
//!
//! ```
//! use fern_lang::builder::Builder;
//! use fern_lang::output::{to_json, to_json_string};
//!
//! let builder = Builder::new();
//! let tree = builder.unary("sqrt", builder.placeholder("x"));
//!
//! let json = to_json(tree.node());
//! assert_eq!(json["tag"], "unary_call");
//! assert_eq!(json["arg"]["name"], "x");
//!
//! let text = to_json_string(tree.node(), false).unwrap();
//! assert!(text.starts_with(r#"{"#));
//! ```

use serde_json::{Map, Value as Json, json};

use crate::ast::{
    Arrow, BinaryCall, Borrow, BuiltinType, ErrorNode, Function, FunctionCall, Match, NodeRef,
    NodeTag, Placeholder, Record, UnaryCall, UnknownType, Value,
};
use crate::visitor::Visitor;

#[derive(Debug, Default)]
pub struct JsonExport;

impl JsonExport {
    pub fn new() -> Self {
        JsonExport
    }

    pub fn export(&mut self, node: &NodeRef) -> Json {
        self.traverse(node, ())
    }

    fn list(&mut self, nodes: &[NodeRef]) -> Json {
        Json::Array(nodes.iter().map(|n| self.traverse(n, ())).collect())
    }

    fn optional(&mut self, node: Option<&NodeRef>) -> Json {
        node.map_or(Json::Null, |n| self.traverse(n, ()))
    }

    fn pairs(&mut self, pairs: &[(String, NodeRef)]) -> Json {
        Json::Array(
            pairs
                .iter()
                .map(|(name, ty)| json!({ "name": name, "type": self.traverse(ty, ()) }))
                .collect(),
        )
    }

    fn function(&mut self, tag: NodeTag, function: &Function) -> Json {
        json!({
            "tag": tag.name(),
            "name": function.name,
            "params": function.params,
            "signature": self.optional(function.signature.as_ref()),
            "body": self.traverse(&function.body, ()),
        })
    }

    fn record(&mut self, tag: NodeTag, record: &Record) -> Json {
        json!({
            "tag": tag.name(),
            "name": record.name,
            "meta_types": self.pairs(&record.meta_types),
            "attributes": self.pairs(&record.attributes),
        })
    }
}

fn literal(value: &Value) -> Json {
    match value {
        Value::I8(v) => json!(v),
        Value::I16(v) => json!(v),
        Value::I32(v) => json!(v),
        Value::I64(v) => json!(v),
        Value::U8(v) => json!(v),
        Value::U16(v) => json!(v),
        Value::U32(v) => json!(v),
        Value::U64(v) => json!(v),
        Value::F32(v) => json!(v),
        Value::F64(v) => json!(v),
        Value::Object(name) => json!(name),
        Value::Type => Json::Null,
    }
}

impl Visitor for JsonExport {
    type Output = Json;
    type Args = ();

    fn unhandled(&mut self, node: &NodeRef, _: ()) -> Json {
        let mut map = Map::new();
        map.insert("tag".to_string(), json!(node.tag().name()));
        Json::Object(map)
    }

    fn visit_borrow(&mut self, _node: &NodeRef, borrow: &Borrow, _: ()) -> Json {
        let target = borrow.get();
        json!({
            "tag": NodeTag::Borrow.name(),
            "target": self.optional(target.as_ref()),
        })
    }

    fn visit_value(&mut self, _node: &NodeRef, value: &Value, _: ()) -> Json {
        json!({
            "tag": NodeTag::Value.name(),
            "kind": value.kind().name(),
            "value": literal(value),
        })
    }

    fn visit_placeholder(&mut self, _node: &NodeRef, p: &Placeholder, _: ()) -> Json {
        json!({
            "tag": NodeTag::Placeholder.name(),
            "name": p.name,
            "type": self.optional(p.ty.as_ref()),
        })
    }

    fn visit_unary_call(&mut self, _node: &NodeRef, call: &UnaryCall, _: ()) -> Json {
        json!({
            "tag": NodeTag::UnaryCall.name(),
            "fun": self.traverse(&call.fun, ()),
            "arg": self.traverse(&call.arg, ()),
        })
    }

    fn visit_binary_call(&mut self, _node: &NodeRef, call: &BinaryCall, _: ()) -> Json {
        json!({
            "tag": NodeTag::BinaryCall.name(),
            "fun": self.traverse(&call.fun, ()),
            "lhs": self.traverse(&call.lhs, ()),
            "rhs": self.traverse(&call.rhs, ()),
        })
    }

    fn visit_function_call(&mut self, _node: &NodeRef, call: &FunctionCall, _: ()) -> Json {
        json!({
            "tag": NodeTag::FunctionCall.name(),
            "fun": self.traverse(&call.fun, ()),
            "args": self.list(&call.args),
        })
    }

    fn visit_match(&mut self, _node: &NodeRef, m: &Match, _: ()) -> Json {
        let branches: Vec<Json> = m
            .branches
            .iter()
            .map(|(pattern, branch)| {
                json!({
                    "pattern": self.traverse(pattern, ()),
                    "branch": self.traverse(branch, ()),
                })
            })
            .collect();

        json!({
            "tag": NodeTag::Match.name(),
            "target": self.traverse(&m.target, ()),
            "branches": branches,
            "default": self.optional(m.default.as_ref()),
        })
    }

    fn visit_function(&mut self, _node: &NodeRef, function: &Function, _: ()) -> Json {
        self.function(NodeTag::FunctionDef, function)
    }

    fn visit_macro(&mut self, _node: &NodeRef, function: &Function, _: ()) -> Json {
        self.function(NodeTag::MacroDef, function)
    }

    fn visit_struct(&mut self, _node: &NodeRef, record: &Record, _: ()) -> Json {
        self.record(NodeTag::StructDef, record)
    }

    fn visit_union(&mut self, _node: &NodeRef, record: &Record, _: ()) -> Json {
        self.record(NodeTag::UnionDef, record)
    }

    fn visit_builtin(&mut self, _node: &NodeRef, ty: &BuiltinType, _: ()) -> Json {
        json!({ "tag": NodeTag::BuiltinType.name(), "name": ty.name })
    }

    fn visit_arrow(&mut self, _node: &NodeRef, arrow: &Arrow, _: ()) -> Json {
        json!({
            "tag": NodeTag::FunctionType.name(),
            "args": self.list(&arrow.args),
            "ret": self.traverse(&arrow.ret, ()),
        })
    }

    fn visit_unknown(&mut self, _node: &NodeRef, ty: &UnknownType, _: ()) -> Json {
        json!({
            "tag": NodeTag::UnknownType.name(),
            "resolved": self.optional(ty.resolved()),
        })
    }

    fn visit_error(&mut self, _node: &NodeRef, error: &ErrorNode, _: ()) -> Json {
        json!({
            "tag": NodeTag::ErrorType.name(),
            "message": error.message,
            "partial": self.optional(error.partial.as_ref()),
        })
    }
}

pub fn to_json(node: &NodeRef) -> Json {
    JsonExport::new().export(node)
}

/// Serialize `node`, compact or indented.
pub fn to_json_string(node: &NodeRef, pretty: bool) -> Result<String, serde_json::Error> {
    let json = to_json(node);
    if pretty {
        serde_json::to_string_pretty(&json)
    } else {
        serde_json::to_string(&json)
    }
}
