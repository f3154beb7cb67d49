//! # Fern - Abstract Syntax Tree
//!
//! This module defines the tree the parser builds and every visitor walks.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[tag]** - Node tags and their `DEF` / `TYPE` / `EXPR` categories
//! - **[node]** - The node type, its variants and parent links
//! - **[value]** - Literal payloads of `Value` nodes
//! - **[expressions]** - Placeholders, calls, `match` and borrows
//! - **[definitions]** - Function, macro, struct and union definitions
//! - **[types]** - Builtin, function, unknown and error types
//!
//! ## Quick Start
//!
//! ```text
//! def sqr(x: f64) -> f64:
//!     x * x
//!
//! sqr(3.0) + 1
//! ```
//!
//! The definition parses into a `FunctionDef` node whose body is
//! `BinaryCall(*, Placeholder(x), Placeholder(x))`; the trailing expression is
//! stored under `__main__`.
//!
//! ## Ownership
//!
//! Nodes are reference counted ([`NodeRef`]) but the tree keeps a single-owner
//! discipline: nodes are only created by the [`Builder`](crate::builder::Builder)
//! and handed around in [`Root`](crate::root::Root) handles that copy a subtree
//! instead of sharing it when it already has an owner. Parent links and borrow
//! targets are weak.
pub mod definitions;
pub mod expressions;
pub mod node;
pub mod tag;
pub mod tokens;
pub mod types;
pub mod value;

pub use definitions::{Function, Record};
pub use expressions::{BinaryCall, Borrow, FunctionCall, Match, Placeholder, UnaryCall};
pub use node::{Node, NodeKind, NodeRef};
pub use tag::NodeTag;
pub use tokens::{Lexeme, Position, Token};
pub use types::{Arrow, BuiltinType, ErrorNode, UnknownType};
pub use value::{BuiltinKind, Value, ValueError};
